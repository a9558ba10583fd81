use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identity of an object placed in the scene.
///
/// Ids are handed out in insertion order by the scene store, so iteration
/// over objects is deterministic and a given layout always gets the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_order_by_value() {
        assert!(ObjectId(1) < ObjectId(2));
        assert_eq!(ObjectId(7).to_string(), "#7");
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_applies_rotation_before_translation() {
        let t = Transform::from_position(Vec3::new(0.0, 0.0, -10.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::PI));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(-1.0, 0.0, -10.0)).length() < 1e-5);
    }
}
