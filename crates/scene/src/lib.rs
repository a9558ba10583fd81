//! Scene: the room's objects, their materials, and how a click finds them.
//!
//! # Invariants
//! - Objects are added once at startup and never removed; ids are stable.
//! - The only mutation after startup is a texture swap on a media plane, and
//!   every swap is recorded as a [`SceneEvent`] for the renderer to pick up.
//! - Picking follows raycaster semantics: all hits sorted by distance, and a
//!   media plane is found even when another object is in front of it.

mod layout;
mod object;
mod pick;
mod store;

pub use layout::{AssetPaths, SKY_BLUE, WATER_BLUE, build_room};
pub use object::{Material, ObjectKind, Quad, SceneObject, Side, WallSide, WaterParams};
pub use pick::{Hit, MediaTarget, Ray};
pub use store::{Scene, SceneError, SceneEvent};

pub fn crate_info() -> &'static str {
    "walkroom-scene v0.1.0"
}
