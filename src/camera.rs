//! Orbit camera for the hero scene.
//!
//! The camera circles a fixed target. Auto-rotation is off until the scan
//! reveal completes, then the yaw advances a little every frame for the
//! page's ambient motion.

use glam::{Mat4, Vec3};

use crate::mesh::BoundingBox;

/// Default orbit speed once auto-rotation starts, radians per second.
pub const AUTO_ROTATE_SPEED: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    auto_rotate: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 4.0,
            yaw: 0.6,
            pitch: 0.35,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            auto_rotate: false,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the orbit at a mesh and back off far enough to frame it.
    pub fn frame_bounds(&mut self, bounds: &BoundingBox) {
        let center = bounds.center();
        self.target = Vec3::new(center[0], center[1], center[2]);

        let size = bounds.size();
        let extent = size[0].max(size[1]).max(size[2]).max(0.1);
        self.radius = extent * 2.2;
    }

    /// Begin the ambient rotation (called once, when the scan completes).
    pub fn start_auto_rotate(&mut self) {
        self.auto_rotate = true;
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Advance the orbit. No-op until auto-rotation has started.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.yaw += AUTO_ROTATE_SPEED * dt;
        }
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        self.target
            + Vec3::new(
                self.radius * cos_pitch * sin_yaw,
                self.radius * sin_pitch,
                self.radius * cos_pitch * cos_yaw,
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_sits_at_orbit_radius() {
        let camera = OrbitCamera::default();
        let distance = (camera.eye() - camera.target).length();
        assert!((distance - camera.radius).abs() < 1e-4);
    }

    #[test]
    fn test_update_is_inert_until_auto_rotate() {
        let mut camera = OrbitCamera::default();
        let yaw = camera.yaw;

        camera.update(1.0);
        assert_eq!(camera.yaw, yaw);

        camera.start_auto_rotate();
        camera.update(1.0);
        assert!((camera.yaw - yaw - AUTO_ROTATE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_frame_bounds_centers_target() {
        let bounds = BoundingBox {
            min: [-1.0, 0.0, -1.0],
            max: [1.0, 2.0, 1.0],
        };

        let mut camera = OrbitCamera::default();
        camera.frame_bounds(&bounds);

        assert_eq!(camera.target, Vec3::new(0.0, 1.0, 0.0));
        assert!(camera.radius > 2.0);
    }

    #[test]
    fn test_view_projection_is_finite() {
        let camera = OrbitCamera::default();
        let vp = camera.view_projection_matrix(16.0 / 9.0);
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
