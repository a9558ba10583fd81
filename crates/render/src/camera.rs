use glam::{Mat4, Vec3};
use walkroom_locomotion::CameraRig;

/// First-person camera: position plus yaw/pitch mouse look.
///
/// Horizontal moves ignore pitch, so looking up or down never changes the
/// viewer's height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            // Looking down -Z.
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.002,
        }
    }
}

impl FirstPersonCamera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// View direction flattened onto the ground plane.
    pub fn ground_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.ground_forward().cross(Vec3::Y).normalize()
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        tracing::debug!(width, height, aspect = self.aspect, "camera aspect updated");
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse of [`Self::view_projection`], for unprojecting pick rays.
    pub fn inverse_view_projection(&self) -> Mat4 {
        self.view_projection().inverse()
    }
}

impl CameraRig for FirstPersonCamera {
    fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    fn move_forward(&mut self, distance: f32) {
        self.position += self.ground_forward() * distance;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
