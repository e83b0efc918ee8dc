//! Pointer tracking with smoothed speed

use glam::Vec3;

/// Weight kept from the previous smoothed speed each step
pub const SPEED_RETENTION: f32 = 0.8;

/// Pointer position in simulation space plus its smoothed speed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Latest sampled position
    pub position: Vec3,
    /// Position at the previous simulation step
    pub previous_position: Vec3,
    /// Exponential moving average of per-step displacement
    pub smoothed_speed: f32,
}

impl PointerState {
    /// Start at rest at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
            smoothed_speed: 0.0,
        }
    }

    /// Record a new sample from a move event
    pub fn set_position(&mut self, position: Vec3) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Fold the displacement since the last step into the smoothed speed
    ///
    /// Returns the instantaneous speed that was sampled.
    pub fn advance(&mut self) -> f32 {
        let speed = self.position.distance(self.previous_position);
        self.smoothed_speed =
            self.smoothed_speed * SPEED_RETENTION + speed * (1.0 - SPEED_RETENTION);
        self.previous_position = self.position;
        speed
    }
}
