//! Perspective camera for the particle field
//!
//! Projects world points to canvas pixels for the point rasterizer and maps
//! pointer positions back into the world, onto a fixed depth plane.

use glam::{Mat4, Vec3};

use crate::frame::Viewport;

/// A projected point in canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Distance along the view axis (clip-space w)
    pub depth: f32,
}

/// Fixed perspective camera looking at `target`
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Camera position in world space
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up vector (Y-up)
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    /// Camera at z = 20 with a 75° vertical field of view
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 20.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 75f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Update aspect ratio on resize
    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point into canvas pixels
    ///
    /// Returns `None` for points behind the camera or outside the depth range.
    pub fn project(&self, view_proj: &Mat4, world: Vec3, viewport: Viewport) -> Option<ScreenPoint> {
        let clip = *view_proj * world.extend(1.0);
        if clip.w <= self.near {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * viewport.width,
            y: (1.0 - ndc.y) * 0.5 * viewport.height,
            depth: clip.w,
        })
    }

    /// Map a canvas position onto the plane `z = plane_z`
    ///
    /// The ray through the pixel is taken from the eye through the point at
    /// half depth in normalized device coordinates.
    pub fn unproject_to_plane(
        &self,
        canvas_x: f32,
        canvas_y: f32,
        viewport: Viewport,
        plane_z: f32,
    ) -> Option<Vec3> {
        if viewport.is_empty() {
            return None;
        }

        let ndc = Vec3::new(
            canvas_x / viewport.width * 2.0 - 1.0,
            -(canvas_y / viewport.height) * 2.0 + 1.0,
            0.5,
        );

        let inverse = self.view_projection_matrix().inverse();
        let through = inverse.project_point3(ndc);
        let direction = (through - self.eye).normalize_or_zero();

        if direction.z.abs() < f32::EPSILON {
            return None;
        }

        let distance = (plane_z - self.eye.z) / direction.z;
        Some(self.eye + direction * distance)
    }

    /// Pixel size of a point of world `size` at `depth`
    pub fn point_scale(&self, size: f32, depth: f32, viewport: Viewport) -> f32 {
        size * viewport.height * 0.5 / depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn camera_creates_with_defaults() {
        let cam = Camera3D::new(4.0 / 3.0);
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 20.0));
        assert!((cam.fov - 1.308_997).abs() < 1e-5);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = Camera3D::new(1.0);
        cam.resize(Viewport::new(1920.0, 1080.0));
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn canvas_center_maps_to_origin() {
        let vp = viewport();
        let cam = Camera3D::new(vp.aspect());
        let p = cam.unproject_to_plane(400.0, 300.0, vp, 0.0).unwrap();
        assert!(p.length() < 1e-4, "got {p:?}");
    }

    #[test]
    fn canvas_edge_maps_to_frustum_edge() {
        let vp = Viewport::new(600.0, 600.0);
        let cam = Camera3D::new(vp.aspect());
        let p = cam.unproject_to_plane(600.0, 300.0, vp, 0.0).unwrap();

        // Half-width of the frustum at distance 20
        let expected = 20.0 * (cam.fov / 2.0).tan();
        assert!((p.x - expected).abs() < 1e-3, "got {p:?}");
        assert!(p.y.abs() < 1e-3);
        assert!(p.z.abs() < 1e-4);
    }

    #[test]
    fn upper_canvas_is_positive_y() {
        let vp = viewport();
        let cam = Camera3D::new(vp.aspect());
        let p = cam.unproject_to_plane(400.0, 0.0, vp, 0.0).unwrap();
        assert!(p.y > 0.0);
    }

    #[test]
    fn project_inverts_unproject() {
        let vp = viewport();
        let cam = Camera3D::new(vp.aspect());
        let world = cam.unproject_to_plane(123.0, 456.0, vp, 0.0).unwrap();

        let screen = cam
            .project(&cam.view_projection_matrix(), world, vp)
            .unwrap();
        assert!((screen.x - 123.0).abs() < 0.05);
        assert!((screen.y - 456.0).abs() < 0.05);
        assert!((screen.depth - 20.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let vp = viewport();
        let cam = Camera3D::new(vp.aspect());
        let vp_matrix = cam.view_projection_matrix();
        assert!(cam.project(&vp_matrix, Vec3::new(0.0, 0.0, 30.0), vp).is_none());
    }

    #[test]
    fn empty_viewport_has_no_pointer_projection() {
        let cam = Camera3D::new(1.0);
        assert!(cam.unproject_to_plane(1.0, 1.0, Viewport::new(0.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn point_scale_attenuates_with_depth() {
        let cam = Camera3D::new(1.0);
        let vp = viewport();
        let near = cam.point_scale(0.1, 10.0, vp);
        let far = cam.point_scale(0.1, 20.0, vp);
        assert!((near - 3.0).abs() < 1e-5);
        assert!((far - 1.5).abs() < 1e-5);
    }
}
