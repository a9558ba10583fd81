//! Rendering adapter: renderer-agnostic interface and the first-person camera.
//!
//! # Invariants
//! - Renderers read the scene and a view; they never mutate either.
//! - The camera is the only thing locomotion moves, through [`walkroom_locomotion::CameraRig`].

mod camera;
mod renderer;

pub use camera::FirstPersonCamera;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "walkroom-render v0.1.0"
}
