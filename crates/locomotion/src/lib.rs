//! Locomotion: turns held movement keys into smooth, decaying camera motion
//! and keeps the viewer inside the room.
//!
//! # Invariants
//! - After every update, the rig position lies inside [`RoomBounds`] on X and Z.
//! - Damping never flips the sign of a velocity component.
//! - Velocity is never cancelled on wall contact; only the position is clamped.
//! - No rendering context is needed; the camera is reached through [`CameraRig`].

mod bounds;
mod intent;
mod motion;
mod rig;

pub use bounds::RoomBounds;
pub use intent::{Intent, MoveDirection};
pub use motion::{ACCELERATION, DAMPING, Locomotion};
pub use rig::CameraRig;

pub fn crate_info() -> &'static str {
    "walkroom-locomotion v0.1.0"
}
