//! wgpu render backend for the ember engine.
//!
//! Implements `ember_render::RenderBackend` on a wgpu device and a surface
//! supplied by the host. Every pipeline shares one bind group layout: a
//! uniform buffer at binding 0 read through a dynamic offset.
//!
//! # Invariants
//! - Passes are encoded and queued in submission order.
//! - Only the first pass of a frame clears; later passes load.
//! - The depth target always matches the surface size.

mod gpu;

pub use gpu::WgpuBackend;
