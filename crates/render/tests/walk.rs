//! Locomotion driving the real first-person camera.

use glam::Vec3;
use walkroom_locomotion::{Intent, Locomotion, MoveDirection, RoomBounds};
use walkroom_render::FirstPersonCamera;

fn hold(dirs: &[MoveDirection]) -> Intent {
    let mut intent = Intent::new();
    for d in dirs {
        intent.set(*d, true);
    }
    intent
}

#[test]
fn forward_walks_along_view_direction() {
    let mut cam = FirstPersonCamera::default();
    let mut loco = Locomotion::new();
    for _ in 0..30 {
        loco.update(1.0 / 60.0, &hold(&[MoveDirection::Forward]), &mut cam, &RoomBounds::ROOM);
    }
    assert!(cam.position.z < -1.0);
    assert!(cam.position.x.abs() < 1e-4);
    assert_eq!(cam.position.y, 0.0);
}

#[test]
fn turned_camera_walks_its_own_forward() {
    let mut cam = FirstPersonCamera::default();
    cam.yaw = 0.0; // facing +X
    let mut loco = Locomotion::new();
    for _ in 0..30 {
        loco.update(1.0 / 60.0, &hold(&[MoveDirection::Forward]), &mut cam, &RoomBounds::ROOM);
    }
    assert!(cam.position.x > 1.0);
    assert!(cam.position.z.abs() < 1e-4);
}

#[test]
fn strafe_right_hits_the_wall_exactly() {
    let mut cam = FirstPersonCamera::default();
    cam.position = Vec3::new(8.99, 0.0, 0.0);
    let mut loco = Locomotion::new();
    loco.update(0.1, &hold(&[MoveDirection::Right]), &mut cam, &RoomBounds::ROOM);
    assert_eq!(cam.position.x, 9.0);
}

#[test]
fn looking_around_never_escapes_the_room() {
    let mut cam = FirstPersonCamera::default();
    let mut loco = Locomotion::new();
    let intent = hold(&[MoveDirection::Forward, MoveDirection::Left]);
    for frame in 0..2_000 {
        cam.rotate(7.0, if frame % 2 == 0 { 3.0 } else { -3.0 });
        loco.update(1.0 / 60.0, &intent, &mut cam, &RoomBounds::ROOM);
        assert!(RoomBounds::ROOM.contains(cam.position));
    }
}
