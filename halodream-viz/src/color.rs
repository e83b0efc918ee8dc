//! Color helpers shared by all effects
//!
//! Colors are stored as normalized RGB. Palettes are written as CSS hex
//! strings in configuration files, so `Rgb` (de)serializes through that form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// sRGB color, each channel in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Error returned when a hex color cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from hue/saturation/lightness.
    ///
    /// Hue wraps around 1.0; saturation and lightness are clamped, so a
    /// negative lightness (far outside a glow falloff) yields black.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Self::new(
            hue_to_channel(q, p, h + 1.0 / 3.0),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - 1.0 / 3.0),
        )
    }

    /// Parse `#rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError(hex.to_string());
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.is_ascii())
            .ok_or_else(err)?;

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(err()),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err())
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels as bytes (rounded, clamped)
    pub fn to_bytes(self) -> [u8; 3] {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(self.r), byte(self.g), byte(self.b)]
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS `rgba(...)` string for canvas fill/stroke styles
    pub fn to_css(self, alpha: f32) -> String {
        let [r, g, b] = self.to_bytes();
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Parse a list of hex colors, used for the built-in palettes
pub(crate) fn palette(hexes: &[&str]) -> Vec<Rgb> {
    hexes
        .iter()
        .filter_map(|h| Rgb::from_hex(h).ok())
        .collect()
}
