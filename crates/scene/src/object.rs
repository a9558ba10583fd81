use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use walkroom_assets::{MediaKind, TextureId};
use walkroom_common::{ObjectId, Transform};

use crate::pick::Ray;

/// Which wall of the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Back,
    Front,
    Left,
    Right,
}

/// What role an object plays in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Floor,
    Wall(WallSide),
    ImagePlane,
    VideoPlane,
    Water,
}

impl ObjectKind {
    /// Media shown by this object, if it is one of the swappable planes.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            ObjectKind::ImagePlane => Some(MediaKind::Image),
            ObjectKind::VideoPlane => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// A flat rectangle in its local XY plane, normal +Z, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub width: f32,
    pub height: f32,
}

impl Quad {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Which faces of a quad are visible (and pickable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Front,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterParams {
    /// Linear RGB tint.
    pub color: [f32; 3],
    /// Ripple pattern tiling.
    pub scale: f32,
    /// Direction the surface appears to flow in, unit length.
    pub flow_direction: Vec2,
}

/// Surface appearance. All materials are unlit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Textured {
        texture: TextureId,
        /// UV tiling along the quad's width and height.
        repeat: [f32; 2],
        side: Side,
    },
    Water(WaterParams),
}

impl Material {
    pub fn textured(texture: TextureId, side: Side) -> Self {
        Material::Textured {
            texture,
            repeat: [1.0, 1.0],
            side,
        }
    }

    pub fn texture(&self) -> Option<TextureId> {
        match self {
            Material::Textured { texture, .. } => Some(*texture),
            Material::Water(_) => None,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Material::Textured { side, .. } => *side,
            Material::Water(_) => Side::Double,
        }
    }
}

/// A placed, drawable quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub quad: Quad,
    pub material: Material,
}

impl SceneObject {
    /// World-space outward normal of the front face.
    pub fn normal(&self) -> Vec3 {
        (self.transform.rotation * Vec3::Z).normalize()
    }

    /// Distance along `ray` to this quad, if the ray hits a visible face.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let model = self.transform.matrix();
        let inverse = model.inverse();
        let origin = inverse.transform_point3(ray.origin);
        let direction = inverse.transform_vector3(ray.direction);

        if direction.z.abs() < f32::EPSILON {
            return None;
        }
        // Front face is hit only by rays travelling against the +Z normal.
        if self.material.side() == Side::Front && direction.z > 0.0 {
            return None;
        }

        let t = -origin.z / direction.z;
        if t < 0.0 {
            return None;
        }
        let local = origin + direction * t;
        if local.x.abs() > self.quad.width * 0.5 || local.y.abs() > self.quad.height * 0.5 {
            return None;
        }

        let world = model.transform_point3(local);
        Some(world.distance(ray.origin))
    }
}
