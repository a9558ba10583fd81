use glam::{Quat, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use std::path::{Path, PathBuf};
use walkroom_assets::TextureSource;
use walkroom_common::Transform;

use crate::object::{Material, ObjectKind, Quad, Side, WallSide, WaterParams};
use crate::store::Scene;

/// `#87CEEB`, sRGB.
pub const SKY_BLUE: [f32; 3] = [135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0];
/// `#0096FF`.
pub const WATER_BLUE: [f32; 3] = [0.0, 150.0 / 255.0, 1.0];

const ROOM_SIZE: f32 = 20.0;
const WALL_HEIGHT: f32 = 5.0;
const FLOOR_Y: f32 = -1.5;
const WATER_Y: f32 = -1.4;
const MEDIA_PLANE: Quad = Quad {
    width: 5.0,
    height: 3.0,
};
/// Media planes sit just in front of the front and back walls.
const MEDIA_OFFSET: f32 = 9.9;

/// Where the startup textures live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub floor: PathBuf,
    pub wall: PathBuf,
    pub image: PathBuf,
    pub video: PathBuf,
}

impl AssetPaths {
    /// Default file names inside an asset directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            floor: dir.join("floor-texture.jpg"),
            wall: dir.join("wall-texture.jpg"),
            image: dir.join("image-texture.jpg"),
            video: dir.join("video-texture.gif"),
        }
    }
}

/// Build the room: floor, four walls, image plane, video plane and water.
///
/// Missing textures are the texture source's concern; building never fails.
pub fn build_room(textures: &mut impl TextureSource, paths: &AssetPaths) -> Scene {
    let mut scene = Scene::new(SKY_BLUE);

    let floor_texture = textures.load_texture(&paths.floor);
    scene.insert(
        ObjectKind::Floor,
        Transform::from_position(Vec3::new(0.0, FLOOR_Y, 0.0))
            .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
        Quad::new(ROOM_SIZE, ROOM_SIZE),
        Material::Textured {
            texture: floor_texture,
            repeat: [10.0, 10.0],
            side: Side::Double,
        },
    );

    let wall_texture = textures.load_texture(&paths.wall);
    let half = ROOM_SIZE / 2.0;
    let walls = [
        (WallSide::Back, Vec3::new(0.0, 0.0, -half), 0.0),
        (WallSide::Front, Vec3::new(0.0, 0.0, half), PI),
        (WallSide::Left, Vec3::new(-half, 0.0, 0.0), -FRAC_PI_2),
        (WallSide::Right, Vec3::new(half, 0.0, 0.0), FRAC_PI_2),
    ];
    for (side, position, yaw) in walls {
        scene.insert(
            ObjectKind::Wall(side),
            Transform::from_position(position).with_rotation(Quat::from_rotation_y(yaw)),
            Quad::new(ROOM_SIZE, WALL_HEIGHT),
            Material::Textured {
                texture: wall_texture,
                repeat: [5.0, 1.0],
                side: Side::Double,
            },
        );
    }

    let image_texture = textures.load_texture(&paths.image);
    scene.insert(
        ObjectKind::ImagePlane,
        Transform::from_position(Vec3::new(0.0, 0.0, MEDIA_OFFSET)),
        MEDIA_PLANE,
        Material::textured(image_texture, Side::Double),
    );

    let video_texture = textures.load_video(&paths.video);
    scene.insert(
        ObjectKind::VideoPlane,
        Transform::from_position(Vec3::new(0.0, 0.0, -MEDIA_OFFSET)),
        MEDIA_PLANE,
        Material::textured(video_texture, Side::Front),
    );

    scene.insert(
        ObjectKind::Water,
        Transform::from_position(Vec3::new(0.0, WATER_Y, 0.0))
            .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
        Quad::new(4.0, 4.0),
        Material::Water(WaterParams {
            color: WATER_BLUE,
            scale: 4.0,
            flow_direction: Vec2::ONE.normalize(),
        }),
    );

    tracing::info!(objects = scene.len(), "room built");
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pick::Ray;
    use walkroom_assets::{MediaKind, TextureId};

    /// Hands out sequential ids and remembers what was asked for.
    #[derive(Default)]
    struct CountingSource {
        requests: Vec<(PathBuf, bool)>,
    }

    impl TextureSource for CountingSource {
        fn load_texture(&mut self, path: &Path) -> TextureId {
            self.requests.push((path.to_path_buf(), false));
            TextureId(self.requests.len() as u64)
        }

        fn load_video(&mut self, path: &Path) -> TextureId {
            self.requests.push((path.to_path_buf(), true));
            TextureId(self.requests.len() as u64)
        }
    }

    fn room() -> (Scene, CountingSource) {
        let mut source = CountingSource::default();
        let scene = build_room(&mut source, &AssetPaths::in_dir("assets"));
        (scene, source)
    }

    #[test]
    fn room_has_every_object() {
        let (scene, _) = room();
        assert_eq!(scene.len(), 8);
        assert!(scene.find_kind(ObjectKind::Floor).is_some());
        for side in [WallSide::Back, WallSide::Front, WallSide::Left, WallSide::Right] {
            assert!(scene.find_kind(ObjectKind::Wall(side)).is_some(), "{side:?}");
        }
        assert!(scene.image_plane().is_some());
        assert!(scene.video_plane().is_some());
        assert!(scene.find_kind(ObjectKind::Water).is_some());
        assert_eq!(scene.background(), SKY_BLUE);
    }

    #[test]
    fn textures_are_loaded_once_each() {
        let (_, source) = room();
        let names: Vec<_> = source
            .requests
            .iter()
            .map(|(p, video)| (p.file_name().unwrap().to_string_lossy().into_owned(), *video))
            .collect();
        assert_eq!(
            names,
            vec![
                ("floor-texture.jpg".to_string(), false),
                ("wall-texture.jpg".to_string(), false),
                ("image-texture.jpg".to_string(), false),
                ("video-texture.gif".to_string(), true),
            ]
        );
    }

    #[test]
    fn walls_stand_square_to_the_room() {
        let (scene, _) = room();
        for obj in scene.objects() {
            if let ObjectKind::Wall(_) = obj.kind {
                let inward = -obj.transform.position.normalize();
                assert!(obj.normal().dot(inward).abs() > 0.99, "{:?}", obj.kind);
            }
        }
    }

    #[test]
    fn media_planes_placed_on_front_and_back() {
        let (scene, _) = room();
        let image = scene.get(scene.image_plane().unwrap()).unwrap();
        let video = scene.get(scene.video_plane().unwrap()).unwrap();
        assert_eq!(image.transform.position, Vec3::new(0.0, 0.0, 9.9));
        assert_eq!(video.transform.position, Vec3::new(0.0, 0.0, -9.9));
        assert_eq!(image.material.side(), Side::Double);
        assert_eq!(video.material.side(), Side::Front);
    }

    #[test]
    fn pick_image_plane_looking_toward_plus_z() {
        let (scene, _) = room();
        let target = scene.pick_media(&Ray::new(Vec3::ZERO, Vec3::Z)).unwrap();
        assert_eq!(target.kind, MediaKind::Image);
        assert_eq!(Some(target.object), scene.image_plane());
    }

    #[test]
    fn pick_video_plane_looking_toward_minus_z() {
        let (scene, _) = room();
        let target = scene.pick_media(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(target.kind, MediaKind::Video);
    }

    #[test]
    fn video_plane_is_not_pickable_from_behind() {
        let (scene, _) = room();
        // Squeezed between the back wall and the video plane, looking into the room:
        // the video plane is seen from behind, so the pick falls through to the
        // image plane on the far side.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -9.95), Vec3::Z);
        let target = scene.pick_media(&ray).unwrap();
        assert_eq!(target.kind, MediaKind::Image);
    }

    #[test]
    fn nearer_objects_do_not_block_media() {
        let (scene, _) = room();
        // From outside the room the front wall is hit first, yet the image
        // plane just behind it is still the pick.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 11.0), Vec3::NEG_Z);
        let hits = scene.intersect(&ray);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        let first = scene.get(hits[0].object).unwrap();
        assert_eq!(first.kind, ObjectKind::Wall(WallSide::Front));
        assert_eq!(scene.pick_media(&ray).map(|t| t.kind), Some(MediaKind::Image));
    }

    #[test]
    fn looking_at_a_side_wall_picks_nothing() {
        let (scene, _) = room();
        assert!(scene.pick_media(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn scene_serializes_to_json() {
        let (scene, _) = room();
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("ImagePlane"));
        assert!(json.contains("Water"));
    }
}
