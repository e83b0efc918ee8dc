//! Footer spotlight reveal
//!
//! The footer starts dark with a transparent circle following the pointer.
//! The first click lights it up for good.
//!
//! The gradient is painted over the footer by an overlay, so its transparent
//! centre is where the footer shows through.

use serde::{Deserialize, Serialize};

/// CSS custom property the footer overlay reads its background from
pub const OVERLAY_PROPERTY: &str = "--spotlight-overlay";

/// Presentation state of the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotlightState {
    Dark,
    Lit,
}

/// Tunables for the spotlight overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightConfig {
    /// Radius of the transparent circle in CSS pixels
    pub radius: f32,
    /// Opacity of the shade outside the circle
    pub shade: f32,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            radius: 180.0,
            shade: 0.95,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spotlight {
    pub config: SpotlightConfig,
    state: SpotlightState,
    pointer: Option<(f32, f32)>,
}

impl Spotlight {
    pub fn new(config: SpotlightConfig) -> Self {
        Self {
            config,
            state: SpotlightState::Dark,
            pointer: None,
        }
    }

    pub fn state(&self) -> SpotlightState {
        self.state
    }

    /// Light the footer; returns `true` only for the transition itself
    pub fn click(&mut self) -> bool {
        match self.state {
            SpotlightState::Dark => {
                self.state = SpotlightState::Lit;
                self.pointer = None;
                tracing::debug!("spotlight lit");
                true
            }
            SpotlightState::Lit => false,
        }
    }

    /// Track the pointer relative to the footer while dark
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.state == SpotlightState::Dark && x.is_finite() && y.is_finite() {
            self.pointer = Some((x, y));
        }
    }

    /// Overlay gradient for the current state, `None` once lit
    ///
    /// Before the first pointer move the circle sits off-element so the whole
    /// footer is shaded.
    pub fn mask(&self) -> Option<String> {
        if self.state == SpotlightState::Lit {
            return None;
        }
        let (x, y) = self.pointer.unwrap_or((-self.config.radius, -self.config.radius));
        Some(format!(
            "radial-gradient(circle {}px at {}px {}px, transparent 0%, rgba(0, 0, 0, {}) 100%)",
            self.config.radius, x, y, self.config.shade
        ))
    }
}

impl Default for Spotlight {
    fn default() -> Self {
        Self::new(SpotlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dark() {
        let spot = Spotlight::default();
        assert_eq!(spot.state(), SpotlightState::Dark);
        assert!(spot.mask().is_some());
    }

    #[test]
    fn first_click_lights() {
        let mut spot = Spotlight::default();
        assert!(spot.click());
        assert_eq!(spot.state(), SpotlightState::Lit);
        assert_eq!(spot.mask(), None);
    }

    #[test]
    fn later_clicks_are_no_ops() {
        let mut spot = Spotlight::default();
        spot.click();
        assert!(!spot.click());
        assert!(!spot.click());
        assert_eq!(spot.state(), SpotlightState::Lit);
    }

    #[test]
    fn mask_follows_pointer_while_dark() {
        let mut spot = Spotlight::default();
        spot.pointer_move(120.0, 80.5);
        insta::assert_snapshot!(
            spot.mask().unwrap(),
            @"radial-gradient(circle 180px at 120px 80.5px, transparent 0%, rgba(0, 0, 0, 0.95) 100%)"
        );
    }

    #[test]
    fn pointer_ignored_once_lit() {
        let mut spot = Spotlight::default();
        spot.click();
        spot.pointer_move(10.0, 10.0);
        assert_eq!(spot.mask(), None);
    }

    #[test]
    fn shade_is_clear_at_pointer_and_dark_at_edge() {
        let mut spot = Spotlight::default();
        spot.pointer_move(40.0, 60.0);
        let mask = spot.mask().unwrap();
        let stops = mask.split_once("px, ").unwrap().1;
        assert!(stops.starts_with("transparent 0%"));
        assert!(stops.ends_with("rgba(0, 0, 0, 0.95) 100%)"));
    }

    #[test]
    fn mask_before_any_pointer_is_off_element() {
        let spot = Spotlight::new(SpotlightConfig {
            radius: 50.0,
            shade: 0.5,
        });
        assert_eq!(
            spot.mask().unwrap(),
            "radial-gradient(circle 50px at -50px -50px, transparent 0%, rgba(0, 0, 0, 0.5) 100%)"
        );
    }
}
