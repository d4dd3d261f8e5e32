//! Rendering adapter: pipeline selection and draw dispatch.
//!
//! [`Renderer`] turns `(Transform, Mesh, Material)` triples into draw
//! commands. Each draw writes its MVP into its own slot of the pipeline's
//! uniform buffer and binds that slot by dynamic offset, so all draws of a
//! frame go out in one submission. The GPU itself sits behind
//! [`RenderBackend`]; [`RecordingBackend`] runs the same code headless.
//!
//! # Invariants
//! - Renderer never mutates component state.
//! - Draws are submitted in the order they were recorded.
//! - No two draws in one submission share a uniform slot.

mod backend;
mod camera;
mod pipeline;
mod recording;
mod renderer;
pub mod shaders;

pub use backend::{
    BufferDescriptor, BufferUsage, DrawCommand, LoadAction, PassPlan, PipelineDescriptor,
    RenderBackend,
};
pub use camera::{Camera, CameraConfig};
pub use pipeline::{
    MvpUniforms, PipelineEntry, PipelineRegistry, TintedUniforms, UniformInputs, UniformLayout,
};
pub use recording::{BufferRecord, RecordingBackend};
pub use renderer::{FrameStats, Renderer, RendererConfig};

use ember_common::PipelineKind;

/// Errors from the renderer and its backends.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Pipeline {0} not found")]
    PipelineNotRegistered(PipelineKind),
    #[error("pipeline {0} has a custom uniform layout and cannot upload model-view-projection data")]
    UniformUploadUnsupported(PipelineKind),
    #[error("pipeline {0} has no free uniform slot this pass")]
    UniformSlotsExhausted(PipelineKind),
    #[error("failed to create {label}: {reason}")]
    ResourceCreation { label: String, reason: String },
    #[error("unknown buffer {0:?}")]
    UnknownBuffer(ember_common::BufferHandle),
    #[error("unknown pipeline {0:?}")]
    UnknownPipeline(ember_common::PipelineHandle),
    #[error("unknown bind group {0:?}")]
    UnknownBindGroup(ember_common::BindGroupHandle),
    #[error("no frame in progress")]
    FrameNotStarted,
    #[error("mesh {0} has no geometry")]
    EmptyMesh(String),
    #[error("surface error: {0}")]
    Surface(String),
}
