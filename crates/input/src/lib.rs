//! Input collection: raw keyboard and mouse events mapped to [`Action`]s.
//!
//! # Invariants
//! - Only the eight movement keys ever touch the movement intent.
//! - Pick rays are described in normalized device coordinates, so the
//!   consumer never deals with window pixels.

pub mod action;
mod mapping;

pub use action::Action;
pub use mapping::{InputMapper, binding, cursor_to_ndc};

pub fn crate_info() -> &'static str {
    "walkroom-input v0.1.0"
}
