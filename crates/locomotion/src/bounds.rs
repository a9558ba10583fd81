use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned walkable rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl RoomBounds {
    /// The room the scene is built around: walls at ±10, viewer kept 1 unit inside.
    pub const ROOM: RoomBounds = RoomBounds {
        min_x: -9.0,
        max_x: 9.0,
        min_z: -9.0,
        max_z: 9.0,
    };

    /// Clamp X and Z into the rectangle. Y is left untouched.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y,
            p.z.clamp(self.min_z, self.max_z),
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_z..=self.max_z).contains(&p.z)
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::ROOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_constants() {
        let b = RoomBounds::ROOM;
        assert_eq!((b.min_x, b.max_x, b.min_z, b.max_z), (-9.0, 9.0, -9.0, 9.0));
    }

    #[test]
    fn clamp_only_touches_ground_axes() {
        let p = RoomBounds::ROOM.clamp(Vec3::new(12.0, 40.0, -30.0));
        assert_eq!(p, Vec3::new(9.0, 40.0, -9.0));
    }

    #[test]
    fn inside_points_are_unchanged() {
        let p = Vec3::new(1.5, 0.0, -8.999);
        assert!(RoomBounds::ROOM.contains(p));
        assert_eq!(RoomBounds::ROOM.clamp(p), p);
    }

    #[test]
    fn edges_are_inclusive() {
        assert!(RoomBounds::ROOM.contains(Vec3::new(9.0, 0.0, -9.0)));
        assert!(!RoomBounds::ROOM.contains(Vec3::new(9.01, 0.0, 0.0)));
    }
}
