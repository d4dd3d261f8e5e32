//! Shared types for the ember engine.
//!
//! # Invariants
//! - Entity handles are allocated monotonically and never reused.
//! - GPU resource handles are opaque; only the backend that issued them can resolve them.

mod handles;
mod types;

pub use handles::{BindGroupHandle, BufferHandle, PipelineHandle, PipelineKind, TextureHandle};
pub use types::{EntityHandle, Transform};
