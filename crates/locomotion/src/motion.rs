use crate::bounds::RoomBounds;
use crate::intent::Intent;
use crate::rig::CameraRig;
use glam::Vec3;

/// Exponential velocity decay per second.
pub const DAMPING: f32 = 10.0;
/// Velocity gained per second while a movement key is held.
pub const ACCELERATION: f32 = 100.0;

/// Kinematic state carried from frame to frame.
///
/// `velocity.x` is lateral, `velocity.z` is forward/back; `y` is always zero.
/// Signs follow the camera-local convention: holding forward drives
/// `velocity.z` negative, and the rig is moved by the *negated* velocity.
/// Velocity is only ever reduced by damping, never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Locomotion {
    velocity: Vec3,
    direction: Vec3,
}

impl Locomotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing velocity (the vertical component is dropped).
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity: Vec3::new(velocity.x, 0.0, velocity.z),
            direction: Vec3::ZERO,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Unit (or zero) direction derived from the intent of the last update.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one frame.
    ///
    /// `delta` is the elapsed time in seconds; negative or non-finite values
    /// are treated as zero.
    pub fn update<R>(&mut self, delta: f32, intent: &Intent, rig: &mut R, bounds: &RoomBounds)
    where
        R: CameraRig + ?Sized,
    {
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };

        // Large frames would push the multiplier below zero and flip the sign.
        let decay = (1.0 - DAMPING * delta).max(0.0);
        self.velocity.x *= decay;
        self.velocity.z *= decay;

        self.direction = Vec3::new(
            axis(intent.right, intent.left),
            0.0,
            axis(intent.forward, intent.backward),
        )
        .normalize_or_zero();

        if intent.forward || intent.backward {
            self.velocity.z -= self.direction.z * ACCELERATION * delta;
        }
        if intent.left || intent.right {
            self.velocity.x -= self.direction.x * ACCELERATION * delta;
        }

        rig.move_right(-self.velocity.x * delta);
        rig.move_forward(-self.velocity.z * delta);

        let position = rig.position();
        let clamped = bounds.clamp(position);
        if clamped != position {
            rig.set_position(clamped);
        }

        tracing::trace!(
            vx = self.velocity.x,
            vz = self.velocity.z,
            x = clamped.x,
            z = clamped.z,
            "locomotion step"
        );
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoveDirection;

    /// Rig that always faces -Z with +X to the right.
    #[derive(Debug, Default)]
    struct FlatRig {
        position: Vec3,
    }

    impl FlatRig {
        fn at(x: f32, y: f32, z: f32) -> Self {
            Self {
                position: Vec3::new(x, y, z),
            }
        }
    }

    impl CameraRig for FlatRig {
        fn move_right(&mut self, distance: f32) {
            self.position.x += distance;
        }

        fn move_forward(&mut self, distance: f32) {
            self.position.z -= distance;
        }

        fn position(&self) -> Vec3 {
            self.position
        }

        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }
    }

    const OPEN_FIELD: RoomBounds = RoomBounds {
        min_x: -1000.0,
        max_x: 1000.0,
        min_z: -1000.0,
        max_z: 1000.0,
    };

    fn held(dirs: &[MoveDirection]) -> Intent {
        let mut intent = Intent::new();
        for d in dirs {
            intent.set(*d, true);
        }
        intent
    }

    #[test]
    fn idle_velocity_decays_toward_zero_without_crossing() {
        for delta in [0.0, 1.0 / 144.0, 1.0 / 60.0, 0.05, 0.1, 0.25, 5.0] {
            let mut loco = Locomotion::with_velocity(Vec3::new(-7.0, 0.0, 4.0));
            let mut rig = FlatRig::default();
            let mut prev = loco.velocity();
            for _ in 0..50 {
                loco.update(delta, &Intent::new(), &mut rig, &OPEN_FIELD);
                let v = loco.velocity();
                assert!(v.x <= 0.0 && v.x >= prev.x, "x crossed or grew at delta={delta}");
                assert!(v.z >= 0.0 && v.z <= prev.z, "z crossed or grew at delta={delta}");
                prev = v;
            }
        }
    }

    #[test]
    fn oversized_delta_stops_instead_of_reversing() {
        let mut loco = Locomotion::with_velocity(Vec3::new(3.0, 0.0, -3.0));
        let mut rig = FlatRig::default();
        loco.update(1.0, &Intent::new(), &mut rig, &OPEN_FIELD);
        assert_eq!(loco.velocity(), Vec3::ZERO);
        assert_eq!(rig.position, Vec3::ZERO);
    }

    #[test]
    fn position_stays_in_bounds_every_frame() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        let mut state = 0x2545_f491_u32;
        for _ in 0..5_000 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let intent = Intent {
                forward: state & 1 != 0,
                backward: state & 2 != 0 && state & 16 == 0,
                left: state & 4 != 0,
                right: state & 8 != 0 && state & 32 == 0,
            };
            let delta = (state % 100) as f32 / 1000.0;
            loco.update(delta, &intent, &mut rig, &RoomBounds::ROOM);
            assert!(RoomBounds::ROOM.contains(rig.position), "escaped: {:?}", rig.position);
        }
    }

    #[test]
    fn diagonal_direction_is_normalized() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        let intent = held(&[MoveDirection::Forward, MoveDirection::Right]);
        loco.update(1.0 / 60.0, &intent, &mut rig, &OPEN_FIELD);
        assert!((loco.direction().length() - 1.0).abs() < 1e-6);
        assert!((loco.velocity().x - loco.velocity().z).abs() < 1e-6);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        let intent = held(&[MoveDirection::Forward, MoveDirection::Backward]);
        loco.update(1.0 / 60.0, &intent, &mut rig, &OPEN_FIELD);
        assert_eq!(loco.direction().z, 0.0);
        assert_eq!(loco.velocity().z, 0.0);
        assert_eq!(rig.position, Vec3::ZERO);
    }

    #[test]
    fn sign_convention_forward_and_left() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        loco.update(0.05, &held(&[MoveDirection::Forward]), &mut rig, &OPEN_FIELD);
        assert_eq!(loco.direction().z, 1.0);
        assert!(loco.velocity().z < 0.0);
        assert!(rig.position.z < 0.0, "forward should move toward -Z");

        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        loco.update(0.05, &held(&[MoveDirection::Left]), &mut rig, &OPEN_FIELD);
        assert_eq!(loco.direction().x, -1.0);
        assert!(loco.velocity().x > 0.0);
        assert!(rig.position.x < 0.0, "left should move toward -X");
    }

    #[test]
    fn one_second_forward_stays_under_terminal_velocity() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        let intent = held(&[MoveDirection::Forward]);
        for _ in 0..60 {
            loco.update(1.0 / 60.0, &intent, &mut rig, &OPEN_FIELD);
            assert!(loco.speed() < ACCELERATION / DAMPING);
        }
        let travelled = -rig.position.z;
        assert!(travelled > 9.0, "travelled {travelled}");
        assert!(travelled < ACCELERATION / DAMPING, "travelled {travelled}");
    }

    #[test]
    fn single_frame_into_wall_clamps_exactly() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::at(8.99, 0.0, 0.0);
        loco.update(0.1, &held(&[MoveDirection::Right]), &mut rig, &RoomBounds::ROOM);
        assert_eq!(rig.position.x, 9.0);
        assert_eq!(rig.position.z, 0.0);
    }

    #[test]
    fn release_keeps_coasting_for_several_frames() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::default();
        let forward = held(&[MoveDirection::Forward]);
        for _ in 0..20 {
            loco.update(1.0 / 60.0, &forward, &mut rig, &OPEN_FIELD);
        }

        let mut last_z = rig.position.z;
        let mut last_step = f32::INFINITY;
        for _ in 0..5 {
            loco.update(1.0 / 60.0, &Intent::new(), &mut rig, &OPEN_FIELD);
            let step = last_z - rig.position.z;
            assert!(step > 0.0, "stopped too early");
            assert!(step < last_step, "should decelerate");
            last_step = step;
            last_z = rig.position.z;
        }
    }

    // Known quirk: pressing into a wall keeps full velocity even though the
    // position is pinned, so motion resumes at speed once the key is released.
    #[test]
    fn wall_contact_leaves_velocity_untouched() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::at(0.0, 0.0, -8.5);
        let forward = held(&[MoveDirection::Forward]);
        for _ in 0..120 {
            loco.update(1.0 / 60.0, &forward, &mut rig, &RoomBounds::ROOM);
        }
        assert_eq!(rig.position.z, -9.0);
        assert!(loco.velocity().z < -9.0);
    }

    #[test]
    fn height_is_never_touched() {
        let mut loco = Locomotion::new();
        let mut rig = FlatRig::at(20.0, 1.7, 20.0);
        loco.update(1.0 / 60.0, &Intent::new(), &mut rig, &RoomBounds::ROOM);
        assert_eq!(rig.position, Vec3::new(9.0, 1.7, 9.0));
    }

    #[test]
    fn invalid_delta_is_a_no_op() {
        for delta in [-0.5, f32::NAN, f32::INFINITY] {
            let mut loco = Locomotion::with_velocity(Vec3::new(2.0, 0.0, 2.0));
            let mut rig = FlatRig::default();
            loco.update(delta, &held(&[MoveDirection::Forward]), &mut rig, &OPEN_FIELD);
            assert_eq!(loco.velocity(), Vec3::new(2.0, 0.0, 2.0));
            assert_eq!(rig.position, Vec3::ZERO);
        }
    }

    #[test]
    fn same_inputs_same_result() {
        let run = || {
            let mut loco = Locomotion::new();
            let mut rig = FlatRig::default();
            let seq = [
                held(&[MoveDirection::Forward]),
                held(&[MoveDirection::Forward, MoveDirection::Left]),
                Intent::new(),
                held(&[MoveDirection::Backward, MoveDirection::Right]),
            ];
            for (i, intent) in seq.iter().cycle().take(200).enumerate() {
                loco.update(0.004 + (i % 7) as f32 * 0.003, intent, &mut rig, &RoomBounds::ROOM);
            }
            (loco, rig.position)
        };
        assert_eq!(run(), run());
    }
}
