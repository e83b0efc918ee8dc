//! Ambient grid of stars and moons
//!
//! Glyphs sit on a fixed lattice and stay invisible until the pointer comes
//! near. Lit glyphs occasionally flip between the two shapes.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{Rgb, palette};
use crate::frame::Viewport;

const DEFAULT_COLORS: [&str; 3] = ["#FFB7C5", "#C3AED6", "#a7d8de"];

/// Glyph outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Star,
    Moon,
}

impl Glyph {
    pub fn flipped(self) -> Self {
        match self {
            Glyph::Star => Glyph::Moon,
            Glyph::Moon => Glyph::Star,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Lattice spacing in CSS pixels
    pub grid_size: f32,
    /// Nominal glyph size, jittered by 0.8..1.2 per glyph
    pub glyph_size: f32,
    /// Distance from the pointer at which glyphs disappear
    pub effect_radius: f32,
    /// Alpha of the black wash applied before every frame
    pub trail_fade_alpha: f32,
    pub colors: Vec<Rgb>,
    /// Opacity right under the pointer
    pub max_brightness: f32,
    /// Per-frame sample above which a lit glyph swaps shape
    pub change_threshold: f32,
    /// Glyphs at or below this opacity are not drawn
    pub visibility_floor: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 60.0,
            glyph_size: 7.0,
            effect_radius: 180.0,
            trail_fade_alpha: 0.05,
            colors: palette(&DEFAULT_COLORS),
            max_brightness: 0.05,
            change_threshold: 0.99,
            visibility_floor: 0.01,
        }
    }
}

impl GridConfig {
    /// Opacity of a glyph `distance` pixels from the pointer
    pub fn opacity_at(&self, distance: f32) -> f32 {
        if !(distance < self.effect_radius) {
            return 0.0;
        }
        let ratio = distance / self.effect_radius;
        self.max_brightness * (1.0 - ratio * ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSprite {
    pub x: f32,
    pub y: f32,
    pub glyph: Glyph,
    pub color: Rgb,
    pub size: f32,
}

/// A glyph to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleGlyph {
    pub sprite: GlyphSprite,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct GlyphGrid {
    pub config: GridConfig,
    pub glyphs: Vec<GlyphSprite>,
    pointer: Option<(f32, f32)>,
}

impl GlyphGrid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            glyphs: Vec::new(),
            pointer: None,
        }
    }

    /// Number of lattice points needed to cover `viewport` plus one cell
    pub fn lattice_dims(&self, viewport: Viewport) -> (usize, usize) {
        let g = self.config.grid_size;
        if !(g > 0.0) || viewport.is_empty() {
            return (0, 0);
        }
        let cols = ((viewport.width + g) / g).ceil() as usize;
        let rows = ((viewport.height + g) / g).ceil() as usize;
        (cols, rows)
    }

    /// Rebuild every glyph for a new viewport
    pub fn layout<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let (cols, rows) = self.lattice_dims(viewport);
        let g = self.config.grid_size;
        let config = &self.config;

        self.glyphs = (0..cols)
            .flat_map(|i| (0..rows).map(move |j| (i, j)))
            .map(|(i, j)| {
                let glyph = if rng.r#gen::<f32>() > 0.5 {
                    Glyph::Star
                } else {
                    Glyph::Moon
                };
                let color = if config.colors.is_empty() {
                    Rgb::WHITE
                } else {
                    config.colors[rng.gen_range(0..config.colors.len())]
                };
                GlyphSprite {
                    x: i as f32 * g,
                    y: j as f32 * g,
                    glyph,
                    color,
                    size: config.glyph_size * (0.8 + rng.r#gen::<f32>() * 0.4),
                }
            })
            .collect();

        tracing::debug!(cols, rows, "laid out glyph grid");
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Some((x, y));
        }
    }

    /// Pointer left the page; everything fades out
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Glyphs lit by the pointer this frame
    ///
    /// Each lit glyph may swap shape before being returned.
    pub fn frame<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<VisibleGlyph> {
        let Some((px, py)) = self.pointer else {
            return Vec::new();
        };
        let config = &self.config;

        let mut visible = Vec::new();
        for sprite in &mut self.glyphs {
            let distance = (sprite.x - px).hypot(sprite.y - py);
            let opacity = config.opacity_at(distance);
            if opacity <= config.visibility_floor {
                continue;
            }
            if rng.r#gen::<f32>() > config.change_threshold {
                sprite.glyph = sprite.glyph.flipped();
            }
            visible.push(VisibleGlyph {
                sprite: *sprite,
                opacity,
            });
        }
        visible
    }
}

/// Outline of a five-point star centered on (x, y)
///
/// Alternates outer points at `size` and inner points at `size / 2`.
pub fn star_vertices(x: f32, y: f32, size: f32) -> [(f32, f32); 10] {
    let mut out = [(0.0, 0.0); 10];
    for k in 0..5 {
        let outer = (18.0 + 72.0 * k as f32) * PI / 180.0;
        let inner = (54.0 + 72.0 * k as f32) * PI / 180.0;
        out[2 * k] = (x + size * outer.cos(), y + size * outer.sin());
        out[2 * k + 1] = (x + size / 2.0 * inner.cos(), y + size / 2.0 * inner.sin());
    }
    out
}
