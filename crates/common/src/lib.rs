//! Shared types for the walkroom workspace.

mod types;

pub use types::{ObjectId, Transform};
