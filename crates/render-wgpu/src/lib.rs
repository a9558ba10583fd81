//! wgpu render backend for the room.
//!
//! Draws every scene object as an unlit quad: textured quads first, then the
//! translucent water surface. Animated textures advance with wall-clock time.
//!
//! # Invariants
//! - Renderer never mutates the scene; texture swaps reach it as drained
//!   [`walkroom_scene::SceneEvent`]s passed to [`WgpuRenderer::sync`].
//! - GPU textures are cached by content id and dropped once no object uses them.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
