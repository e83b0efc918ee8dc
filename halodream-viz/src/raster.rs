//! Software point rasterizer
//!
//! Particles are splatted as small squares with additive blending into a
//! floating-point accumulation buffer, then resolved to straight-alpha RGBA
//! bytes that can be handed to `putImageData` in one call per frame.

use glam::Vec3;

use crate::camera3d::Camera3D;
use crate::color::Rgb;
use crate::frame::Viewport;
use crate::particle_field::ParticleField;

/// Additive RGBA point raster
#[derive(Debug, Clone)]
pub struct PointRaster {
    width: u32,
    height: u32,
    /// Premultiplied color and coverage per pixel
    accum: Vec<[f32; 4]>,
    bytes: Vec<u8>,
}

impl PointRaster {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            accum: vec![[0.0; 4]; len],
            bytes: vec![0; len * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate for new dimensions (contents are cleared)
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Reset to fully transparent
    pub fn clear(&mut self) {
        self.accum.fill([0.0; 4]);
    }

    /// Add a square point of `size` pixels centered on (x, y)
    ///
    /// Points smaller than a pixel cover one pixel with proportionally lower
    /// alpha.
    pub fn splat(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        if !(x.is_finite() && y.is_finite() && size.is_finite()) || size <= 0.0 {
            return;
        }

        let (x0, x1, y0, y1, alpha) = if size < 1.0 {
            let px = x.floor();
            let py = y.floor();
            (px, px + 1.0, py, py + 1.0, alpha * size * size)
        } else {
            let half = size / 2.0;
            let x0 = (x - half).round();
            let y0 = (y - half).round();
            (
                x0,
                (x + half).round().max(x0 + 1.0),
                y0,
                (y + half).round().max(y0 + 1.0),
                alpha,
            )
        };

        let x0 = x0.max(0.0) as i64;
        let y0 = y0.max(0.0) as i64;
        let x1 = (x1 as i64).min(self.width as i64);
        let y1 = (y1 as i64).min(self.height as i64);

        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            for px in x0..x1 {
                let cell = &mut self.accum[row + px as usize];
                cell[0] += color.r * alpha;
                cell[1] += color.g * alpha;
                cell[2] += color.b * alpha;
                cell[3] = (cell[3] + alpha).min(1.0);
            }
        }
    }

    /// Resolve the accumulation buffer to straight-alpha RGBA bytes
    pub fn to_rgba8(&mut self) -> &[u8] {
        for (cell, out) in self.accum.iter().zip(self.bytes.chunks_exact_mut(4)) {
            let coverage = cell[3];
            if coverage <= 0.0 {
                out.fill(0);
                continue;
            }
            for channel in 0..3 {
                let value = (cell[channel] / coverage).clamp(0.0, 1.0);
                out[channel] = (value * 255.0).round() as u8;
            }
            out[3] = (coverage * 255.0).round() as u8;
        }
        &self.bytes
    }

    /// RGBA bytes of one pixel after the last `to_rgba8`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.bytes[i], self.bytes[i + 1], self.bytes[i + 2], self.bytes[i + 3]])
    }
}

/// Project and splat every particle of `field`
///
/// The cloud is rotated by its accumulated orientation and moved to `anchor`
/// before projection. Returns the number of points drawn.
pub fn rasterize_field(
    field: &ParticleField,
    camera: &Camera3D,
    anchor: Vec3,
    viewport: Viewport,
    raster: &mut PointRaster,
) -> usize {
    raster.clear();

    let view_proj = camera.view_projection_matrix();
    let orientation = field.orientation();
    let size = field.config.point_size;
    let alpha = field.config.opacity;

    let mut drawn = 0;
    for particle in &field.particles {
        let world = anchor + orientation * particle.position;
        if let Some(point) = camera.project(&view_proj, world, viewport) {
            let px = camera.point_scale(size, point.depth, viewport);
            raster.splat(point.x, point.y, px, particle.color, alpha);
            drawn += 1;
        }
    }
    drawn
}
