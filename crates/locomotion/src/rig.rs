use glam::Vec3;

/// The camera-side operations locomotion needs.
///
/// Distances are in camera-relative terms: `move_forward` travels along the
/// view direction flattened onto the ground, `move_right` along the horizontal
/// right vector. Neither changes height.
pub trait CameraRig {
    fn move_right(&mut self, distance: f32);
    fn move_forward(&mut self, distance: f32);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}
