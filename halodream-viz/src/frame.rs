//! Frame timing and viewport state shared by every effect
//!
//! The page drives each mounted effect from its own animation loop. Effects
//! advance in fixed steps so their behavior does not depend on how often the
//! browser delivers frames.

use serde::{Deserialize, Serialize};

/// Visible area of a mount point in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport with no area cannot host an effect
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Something that advances by one fixed simulation step
pub trait Animated {
    fn step(&mut self);
}

/// Converts wall-clock deltas into whole fixed steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Duration of one step in seconds
    pub step: f32,
    /// Upper bound on steps taken by a single `advance` call
    pub max_steps: u32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 4)
    }
}

impl FrameClock {
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps,
            accumulator: 0.0,
        }
    }

    /// Add `dt` seconds and return how many steps are due
    ///
    /// Backlog beyond `max_steps` is dropped, not carried into later calls.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let due = (self.accumulator / self.step).floor();

        if due >= self.max_steps as f32 {
            self.accumulator = 0.0;
            return self.max_steps;
        }

        let steps = due as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    /// Advance and run the due steps on `target`
    pub fn drive<A: Animated + ?Sized>(&mut self, dt: f32, target: &mut A) -> u32 {
        let steps = self.advance(dt);
        for _ in 0..steps {
            target.step();
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
