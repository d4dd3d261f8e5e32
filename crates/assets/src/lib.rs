//! Geometry provider for the ember engine.
//!
//! Supplies vertex positions and triangle indices to the renderer and the
//! physics world. Geometry produced here is already triangulated; the core
//! does not revalidate it.
//!
//! # Layout
//! - [`MeshData`]: CPU-side positions and `u32` triangle indices.
//! - [`Mesh`]: `MeshData` plus the GPU buffers it was uploaded to.
//! - [`obj`]: Wavefront OBJ text import.
//! - [`primitives`]: procedural triangle, cube and plane.

mod mesh;
pub mod obj;
pub mod primitives;

pub use mesh::{Mesh, MeshData};
pub use obj::{ObjFace, ObjModel};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },
}
