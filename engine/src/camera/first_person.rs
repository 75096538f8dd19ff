//! First-Person Camera
//!
//! Yaw/pitch camera driven directly by mouse deltas. There is no smoothing:
//! each pixel of mouse travel turns the view by `sensitivity` radians.
//!
//! Coordinate system:
//! - +X = right
//! - +Y = up
//! - -Z = forward at yaw 0 (wgpu/OpenGL convention)

use glam::{Mat4, Vec3};

/// Pitch limit: ±89 degrees, so the view never flips over the pole
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Perspective camera with first-person look controls.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Horizontal angle in radians, unrestricted
    pub yaw: f32,
    /// Vertical angle in radians, clamped to ±89°
    pub pitch: f32,
    /// Radians per pixel of mouse travel
    pub sensitivity: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.002,
            fov_y: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera with the given lens, at the default position.
    pub fn with_lens(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_degrees.to_radians(),
            near,
            far,
            ..Self::default()
        }
    }

    /// Set the pitch in radians, clamped to the limits.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Rotate by a raw mouse delta in pixels.
    ///
    /// Moving the mouse right turns right; moving it down looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Unit view direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Unit right vector, always horizontal.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Forward direction flattened onto the ground plane.
    #[inline]
    pub fn ground_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Right direction on the ground plane.
    #[inline]
    pub fn ground_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Turn to face `target`. No-op when the target is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        let distance = to_target.length();
        if distance > 0.001 {
            self.yaw = to_target.x.atan2(-to_target.z);
            self.set_pitch((to_target.y / distance).asin());
        }
    }

    /// Face -Z with a level view.
    pub fn reset_orientation(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_delta_turns_and_tilts() {
        let mut camera = FirstPersonCamera::new();
        camera.apply_mouse_delta(100.0, 0.0);
        assert!((camera.yaw - 0.2).abs() < 0.001);
        camera.apply_mouse_delta(0.0, 100.0);
        assert!((camera.pitch + 0.2).abs() < 0.001);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FirstPersonCamera::new();
        camera.apply_mouse_delta(0.0, -100000.0);
        assert!((camera.pitch - PITCH_LIMIT).abs() < 0.001);
        camera.apply_mouse_delta(0.0, 100000.0);
        assert!((camera.pitch + PITCH_LIMIT).abs() < 0.001);
    }

    #[test]
    fn test_forward_at_rest_is_negative_z() {
        let camera = FirstPersonCamera::new();
        let forward = camera.forward();
        assert!(forward.x.abs() < 0.001);
        assert!((forward.z + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ground_vectors_ignore_pitch() {
        let mut camera = FirstPersonCamera::new();
        camera.apply_mouse_delta(300.0, -400.0);
        let forward = camera.ground_forward();
        let right = camera.ground_right();
        assert_eq!(forward.y, 0.0);
        assert_eq!(right.y, 0.0);
        assert!(forward.dot(right).abs() < 0.001);
        assert!((right - camera.right()).length() < 0.001);
    }

    #[test]
    fn test_look_at() {
        let mut camera = FirstPersonCamera::new();
        camera.position = Vec3::new(0.0, 1.7, 0.0);
        camera.look_at(Vec3::new(10.0, 1.7, 0.0));
        let forward = camera.forward();
        assert!((forward.x - 1.0).abs() < 0.001);
        assert!(camera.pitch.abs() < 0.001);
    }

    #[test]
    fn test_look_at_self_is_noop() {
        let mut camera = FirstPersonCamera::new();
        camera.yaw = 1.0;
        camera.look_at(camera.position);
        assert_eq!(camera.yaw, 1.0);
    }

    #[test]
    fn test_view_matrix_maps_forward_to_negative_z() {
        let mut camera = FirstPersonCamera::new();
        camera.position = Vec3::new(3.0, 1.7, 2.0);
        camera.look_at(Vec3::new(3.0, 1.7, -8.0));
        let p = camera.view_matrix().transform_point3(Vec3::new(3.0, 1.7, -8.0));
        assert!(p.x.abs() < 0.001 && p.y.abs() < 0.001);
        assert!((p.z + 10.0).abs() < 0.001);
    }

    #[test]
    fn test_set_aspect_ignores_zero() {
        let mut camera = FirstPersonCamera::new();
        camera.set_aspect(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
