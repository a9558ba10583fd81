use glam::{Mat4, Vec2, Vec3};
use walkroom_assets::MediaKind;
use walkroom_common::ObjectId;

use crate::store::Scene;

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Unproject a point in normalized device coordinates through the camera.
    ///
    /// Expects a 0..1 depth range (wgpu / glam `perspective_rh`). The ray
    /// starts on the near plane.
    pub fn from_ndc(ndc: Vec2, inverse_view_proj: Mat4) -> Self {
        let near = inverse_view_proj.project_point3(ndc.extend(0.0));
        let far = inverse_view_proj.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One intersection between a ray and a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// A media plane found by a pick, with the kind of media it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTarget {
    pub object: ObjectId,
    pub kind: MediaKind,
}

impl Scene {
    /// Every object the ray hits, nearest first.
    pub fn intersect(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .objects()
            .filter_map(|obj| {
                obj.intersect(ray).map(|distance| Hit {
                    object: obj.id,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// The nearest media plane along the ray.
    ///
    /// Objects in front of the plane do not block it: the hit list is walked
    /// in distance order and the first image or video plane wins.
    pub fn pick_media(&self, ray: &Ray) -> Option<MediaTarget> {
        let target = self.intersect(ray).into_iter().find_map(|hit| {
            let kind = self.get(hit.object)?.kind.media_kind()?;
            Some(MediaTarget {
                object: hit.object,
                kind,
            })
        });
        tracing::debug!(?target, "media pick");
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.point_at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn centre_ray_follows_view_direction() {
        let view = Mat4::look_at_rh(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 0.0), Vec3::Y);
        let proj = Mat4::perspective_rh(75f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        let ray = Ray::from_ndc(Vec2::ZERO, (proj * view).inverse());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-3);
        assert!((ray.origin - Vec3::new(1.0, 2.0, 2.9)).length() < 1e-3);
    }

    #[test]
    fn corner_ray_leans_right_and_up() {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(90f32.to_radians(), 1.0, 0.1, 100.0);
        let ray = Ray::from_ndc(Vec2::new(1.0, 1.0), (proj * view).inverse());
        assert!(ray.direction.x > 0.0 && ray.direction.y > 0.0 && ray.direction.z < 0.0);
        // 90 degree fov: the corner sits at 45 degrees on both axes.
        assert!((ray.direction.x - ray.direction.y).abs() < 1e-3);
        assert!((ray.direction.x + ray.direction.z).abs() < 1e-3);
    }
}
