use crate::RenderError;
use ember_common::{BindGroupHandle, BufferHandle, PipelineHandle, PipelineKind};

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
    /// Written every frame through [`RenderBackend::write_buffer`].
    Uniform,
}

#[derive(Debug, Clone, Copy)]
pub struct BufferDescriptor<'a> {
    pub label: &'a str,
    pub usage: BufferUsage,
    pub size: u64,
    /// Initial contents; when set, `size` is taken from it.
    pub contents: Option<&'a [u8]>,
}

impl<'a> BufferDescriptor<'a> {
    pub fn with_contents(label: &'a str, usage: BufferUsage, contents: &'a [u8]) -> Self {
        Self {
            label,
            usage,
            size: contents.len() as u64,
            contents: Some(contents),
        }
    }

    pub fn zeroed(label: &'a str, usage: BufferUsage, size: u64) -> Self {
        Self {
            label,
            usage,
            size,
            contents: None,
        }
    }
}

/// A render pipeline over `vec3<f32>` positions with one uniform binding.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDescriptor<'a> {
    pub kind: &'a PipelineKind,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub shader: &'a str,
    /// Bytes of uniform data one draw reads.
    pub uniform_size: u64,
}

/// How a pass treats the existing color and depth targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadAction {
    /// Clear color to RGBA and depth to 1.0.
    Clear([f32; 4]),
    /// Keep what earlier passes of this frame drew.
    Load,
}

/// One indexed draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub pipeline: PipelineHandle,
    pub bind_group: BindGroupHandle,
    /// Dynamic offset of this draw's uniform slot.
    pub uniform_offset: u32,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
}

/// Draws recorded into a single render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan {
    pub load: LoadAction,
    pub draws: Vec<DrawCommand>,
}

/// The graphics device as the renderer sees it.
///
/// Implementations own the real resources and hand out opaque handles.
/// Calls are fire-and-forget; ordering follows call order.
pub trait RenderBackend {
    fn create_buffer(&mut self, desc: &BufferDescriptor<'_>) -> Result<BufferHandle, RenderError>;

    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError>;

    fn create_pipeline(
        &mut self,
        desc: &PipelineDescriptor<'_>,
    ) -> Result<PipelineHandle, RenderError>;

    /// Bind `binding_size` bytes of `uniform_buffer` at binding 0 with a dynamic offset.
    fn create_bind_group(
        &mut self,
        pipeline: PipelineHandle,
        uniform_buffer: BufferHandle,
        binding_size: u64,
    ) -> Result<BindGroupHandle, RenderError>;

    /// Required alignment of dynamic uniform offsets, in bytes.
    fn uniform_offset_alignment(&self) -> u64;

    fn surface_size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    /// Acquire the target for a new frame.
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Encode and queue one pass.
    fn submit(&mut self, pass: &PassPlan) -> Result<(), RenderError>;

    /// Present the frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Release the current frame target without presenting it. No-op outside a frame.
    fn abort_frame(&mut self);
}
