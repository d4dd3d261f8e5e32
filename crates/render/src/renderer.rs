use crate::backend::{BufferDescriptor, BufferUsage, DrawCommand, LoadAction, PassPlan, RenderBackend};
use crate::camera::Camera;
use crate::pipeline::{PipelineRegistry, UniformInputs};
use crate::RenderError;
use ember_assets::{Mesh, MeshData};
use ember_common::Transform;
use ember_ecs::Material;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// RGBA the color target is cleared to each frame.
    pub clear_color: [f32; 4],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Uniform slots per pipeline before a mid-frame flush.
    pub uniform_slots: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.1, 0.1, 0.15, 1.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            uniform_slots: 1024,
        }
    }
}

/// Counters for one finished frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: u64,
    pub draws: u32,
    pub submissions: u32,
}

#[derive(Debug)]
struct FrameState {
    load: LoadAction,
    draws: Vec<DrawCommand>,
    draw_count: u32,
    submissions: u32,
}

/// Records draws for a frame and hands them to the backend as render passes.
pub struct Renderer<B: RenderBackend> {
    backend: B,
    registry: PipelineRegistry,
    config: RendererConfig,
    frame: Option<FrameState>,
    frames: u64,
}

impl<B: RenderBackend> Renderer<B> {
    /// Wrap a backend and compile the built-in pipelines on it.
    pub fn new(mut backend: B, config: RendererConfig) -> Result<Self, RenderError> {
        let registry = PipelineRegistry::with_builtins(&mut backend, &config)?;
        Ok(Self {
            backend,
            registry,
            config,
            frame: None,
            frames: 0,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    /// Registry together with the backend, for compiling and adding pipelines.
    pub fn registry_mut(&mut self) -> (&mut PipelineRegistry, &mut B) {
        (&mut self.registry, &mut self.backend)
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    /// Width over height of the surface; 1.0 for a degenerate surface.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.backend.surface_size();
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            self.aspect_ratio(),
            self.config.near,
            self.config.far,
        )
    }

    /// Upload geometry as a vertex and an index buffer.
    pub fn upload_mesh(
        &mut self,
        label: &str,
        data: MeshData,
    ) -> Result<Arc<Mesh>, RenderError> {
        if data.is_empty() {
            return Err(RenderError::EmptyMesh(label.to_string()));
        }
        let vertex_label = format!("{label}_vertices");
        let vertex_buffer = self.backend.create_buffer(&BufferDescriptor::with_contents(
            &vertex_label,
            BufferUsage::Vertex,
            bytemuck::cast_slice(&data.positions),
        ))?;
        let index_label = format!("{label}_indices");
        let index_buffer = self.backend.create_buffer(&BufferDescriptor::with_contents(
            &index_label,
            BufferUsage::Index,
            bytemuck::cast_slice(&data.indices),
        ))?;
        tracing::debug!(
            label,
            vertices = data.vertex_count(),
            indices = data.index_count(),
            "uploaded mesh"
        );
        Ok(Arc::new(Mesh::new(label, data, vertex_buffer, index_buffer)))
    }

    pub fn is_frame_active(&self) -> bool {
        self.frame.is_some()
    }

    /// Start a frame cleared to the configured color.
    pub fn begin_frame(&mut self) -> Result<(), RenderError> {
        let clear = self.config.clear_color;
        self.begin_frame_with(clear)
    }

    pub fn begin_frame_with(&mut self, clear_color: [f32; 4]) -> Result<(), RenderError> {
        if self.frame.is_some() {
            tracing::warn!("begin_frame while a frame is open; discarding pending draws");
        }
        self.backend.begin_frame()?;
        self.registry.reset_slots();
        self.frame = Some(FrameState {
            load: LoadAction::Clear(clear_color),
            draws: Vec::new(),
            draw_count: 0,
            submissions: 0,
        });
        Ok(())
    }

    /// Record one draw of `mesh` at `transform` with the pipeline `material` selects.
    pub fn render_mesh(
        &mut self,
        transform: &Transform,
        mesh: &Mesh,
        material: &Material,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        if self.frame.is_none() {
            return Err(RenderError::FrameNotStarted);
        }
        let kind = material.pipeline_kind();
        if self.registry.get(&kind)?.is_full() {
            self.flush()?;
        }

        let mvp = self.projection_matrix() * camera.view_matrix() * transform.model_matrix();
        let inputs = UniformInputs {
            mvp,
            tint: material.uniforms.map_or([1.0; 4], |u| u.tint),
        };
        let entry = self.registry.get_mut(&kind)?;
        let uniform_offset = entry.upload_uniforms(&mut self.backend, &inputs)?;
        let draw = DrawCommand {
            pipeline: entry.pipeline,
            bind_group: entry.bind_group,
            uniform_offset,
            vertex_buffer: mesh.vertex_buffer,
            index_buffer: mesh.index_buffer,
            index_count: mesh.index_count,
        };

        let frame = self.frame.as_mut().ok_or(RenderError::FrameNotStarted)?;
        frame.draws.push(draw);
        frame.draw_count += 1;
        Ok(())
    }

    /// Submit pending draws now and recycle every uniform slot.
    /// Later draws this frame load what has been drawn so far.
    pub fn flush(&mut self) -> Result<(), RenderError> {
        let frame = self.frame.as_mut().ok_or(RenderError::FrameNotStarted)?;
        let pass = PassPlan {
            load: frame.load,
            draws: std::mem::take(&mut frame.draws),
        };
        frame.load = LoadAction::Load;
        frame.submissions += 1;
        self.backend.submit(&pass)?;
        self.registry.reset_slots();
        tracing::debug!(draws = pass.draws.len(), "flushed render pass");
        Ok(())
    }

    /// Submit what remains and present.
    pub fn end_frame(&mut self) -> Result<FrameStats, RenderError> {
        let Some(frame) = self.frame.as_ref() else {
            return Err(RenderError::FrameNotStarted);
        };
        if !frame.draws.is_empty() || frame.submissions == 0 {
            self.flush()?;
        }
        let frame = self.frame.take().ok_or(RenderError::FrameNotStarted)?;
        self.backend.end_frame()?;
        let stats = FrameStats {
            frame: self.frames,
            draws: frame.draw_count,
            submissions: frame.submissions,
        };
        self.frames += 1;
        tracing::trace!(?stats, "frame complete");
        Ok(stats)
    }

    /// Drop the open frame without presenting it. Draws already flushed stay
    /// submitted; pending ones are discarded.
    pub fn abort_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        self.registry.reset_slots();
        self.backend.abort_frame();
        tracing::warn!(discarded = frame.draws.len(), "frame aborted");
    }
}
