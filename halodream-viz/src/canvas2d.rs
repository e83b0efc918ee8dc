//! 2D Canvas rendering for every effect
//!
//! Thin layer over `CanvasRenderingContext2d`; all state lives in the
//! simulation modules and is only read here.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::frame::Viewport;
use crate::grid::{Glyph, VisibleGlyph, star_vertices};
use crate::orbit::{PlanetSystem, SpriteSwarm};
use crate::raster::PointRaster;

/// 2D Canvas renderer
pub struct Canvas2DRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl Canvas2DRenderer {
    /// Create renderer from canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("Failed to get 2d context: {:?}", e))?
            .ok_or("2d context not available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);

        Ok(Self {
            canvas,
            ctx,
            viewport,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update canvas dimensions
    pub fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(0.0) as u32);
        self.canvas.set_height(viewport.height.max(0.0) as u32);
        self.viewport = viewport;
    }

    /// Wash the canvas with translucent black, leaving trails of earlier frames
    pub fn fade(&self, alpha: f32) {
        self.ctx
            .set_fill_style_str(&format!("rgba(0, 0, 0, {alpha})"));
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.viewport.width as f64,
            self.viewport.height as f64,
        );
    }

    /// Copy a resolved point raster onto the canvas
    pub fn blit(&self, raster: &mut PointRaster) -> Result<(), String> {
        let (width, height) = (raster.width(), raster.height());
        if width == 0 || height == 0 {
            return Ok(());
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(raster.to_rgba8()),
            width,
            height,
        )
        .map_err(|e| format!("Failed to create image data: {:?}", e))?;

        self.ctx
            .clear_rect(0.0, 0.0, width as f64, height as f64);
        self.ctx
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| format!("Failed to put image data: {:?}", e))
    }

    /// Draw lit grid glyphs
    pub fn render_glyphs(&self, glyphs: &[VisibleGlyph]) {
        for visible in glyphs {
            let sprite = &visible.sprite;
            self.ctx.save();
            self.ctx.set_fill_style_str(&sprite.color.to_hex());
            self.ctx.set_global_alpha(visible.opacity as f64);
            self.ctx.begin_path();

            match sprite.glyph {
                Glyph::Star => {
                    for (x, y) in star_vertices(sprite.x, sprite.y, sprite.size) {
                        self.ctx.line_to(x as f64, y as f64);
                    }
                }
                Glyph::Moon => {
                    let (x, y, size) = (sprite.x as f64, sprite.y as f64, sprite.size as f64);
                    self.ctx
                        .arc_with_anticlockwise(x, y, size, 0.5 * PI, 1.5 * PI, false)
                        .ok();
                    self.ctx
                        .arc_with_anticlockwise(x + size * 0.5, y, size * 0.7, 1.5 * PI, 0.5 * PI, true)
                        .ok();
                }
            }

            self.ctx.close_path();
            self.ctx.fill();
            self.ctx.restore();
        }
    }

    /// Draw the companion swarm: a glowing arrowhead with a bright core per sprite
    pub fn render_swarm(&self, swarm: &SpriteSwarm) {
        for sprite in &swarm.sprites {
            let radius = sprite.radius as f64;
            let color = sprite.color.to_hex();

            self.ctx.save();
            self.ctx
                .translate(sprite.position.x as f64, sprite.position.y as f64)
                .ok();
            self.ctx.rotate(sprite.heading as f64).ok();
            self.ctx.set_shadow_color(&color);
            self.ctx.set_shadow_blur(sprite.glow as f64);
            self.ctx.set_fill_style_str(&color);

            self.ctx.begin_path();
            self.ctx.move_to(radius * 0.8, 0.0);
            self.ctx.line_to(-radius * 0.7, -radius * 0.6);
            self.ctx.line_to(-radius * 0.7, radius * 0.6);
            self.ctx.close_path();
            self.ctx.fill();

            self.ctx.begin_path();
            self.ctx.arc(0.0, 0.0, radius, 0.0, TAU).ok();
            self.ctx.fill();

            self.ctx.begin_path();
            self.ctx.arc(0.0, 0.0, radius * 0.6, 0.0, TAU).ok();
            self.ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
            self.ctx.fill();

            self.ctx.restore();
        }
    }

    /// Draw orbit guides, planets and their rings
    pub fn render_planets(&self, system: &PlanetSystem) {
        let center = system.center();
        let (cx, cy) = (center.x as f64, center.y as f64);

        self.ctx.set_stroke_style_str("rgba(255, 255, 255, 0.06)");
        self.ctx.set_line_width(1.0);
        for planet in &system.planets {
            self.ctx.begin_path();
            self.ctx
                .arc(cx, cy, planet.orbit_radius as f64, 0.0, TAU)
                .ok();
            self.ctx.stroke();
        }

        for planet in &system.planets {
            let position = system.position_of(planet);
            let size = planet.size as f64;
            let color = planet.color.to_hex();

            self.ctx.save();
            self.ctx
                .translate(position.x as f64, position.y as f64)
                .ok();
            self.ctx.rotate(planet.spin as f64).ok();
            self.ctx.set_shadow_color(&color);
            self.ctx.set_shadow_blur(size);

            self.ctx.begin_path();
            self.ctx.arc(0.0, 0.0, size, 0.0, TAU).ok();
            self.ctx.set_fill_style_str(&color);
            self.ctx.fill();

            if planet.ring {
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_stroke_style_str(&planet.color.to_css(0.7));
                self.ctx.set_line_width(1.5);
                self.ctx.begin_path();
                self.ctx
                    .ellipse(0.0, 0.0, size * 1.8, size * 0.5, 0.0, 0.0, TAU)
                    .ok();
                self.ctx.stroke();
            }

            self.ctx.restore();
        }
    }
}
