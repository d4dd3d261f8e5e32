use crate::backend::{BufferDescriptor, BufferUsage, PipelineDescriptor, RenderBackend};
use crate::shaders;
use crate::{RenderError, RendererConfig};
use bytemuck::{Pod, Zeroable};
use ember_common::{BindGroupHandle, BufferHandle, PipelineHandle, PipelineKind};
use glam::Mat4;
use std::collections::BTreeMap;

/// Uniform block of `basic_mesh`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MvpUniforms {
    pub mvp: [[f32; 4]; 4],
}

/// Uniform block of `tinted_mesh`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TintedUniforms {
    pub mvp: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

/// Per-draw values a layout may pack.
#[derive(Debug, Clone, Copy)]
pub struct UniformInputs {
    pub mvp: Mat4,
    pub tint: [f32; 4],
}

impl UniformInputs {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            mvp,
            tint: [1.0; 4],
        }
    }
}

/// Byte layout of a pipeline's uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformLayout {
    /// A single column-major 4x4 matrix.
    ModelViewProjection,
    /// Matrix followed by an RGBA tint.
    TintedModelViewProjection,
    /// Caller-defined block the renderer cannot fill.
    Custom { size: u64 },
}

impl UniformLayout {
    pub fn size(self) -> u64 {
        match self {
            UniformLayout::ModelViewProjection => size_of::<MvpUniforms>() as u64,
            UniformLayout::TintedModelViewProjection => size_of::<TintedUniforms>() as u64,
            UniformLayout::Custom { size } => size,
        }
    }
}

/// A compiled pipeline plus the uniform buffer and bind group its draws use.
///
/// The uniform buffer is split into fixed-stride slots, one per draw.
/// Slots are handed out in order and recycled when the renderer flushes.
#[derive(Debug, Clone)]
pub struct PipelineEntry {
    pub kind: PipelineKind,
    pub pipeline: PipelineHandle,
    pub uniform_buffer: BufferHandle,
    pub bind_group: BindGroupHandle,
    pub layout: UniformLayout,
    slot_stride: u64,
    slot_count: u32,
    next_slot: u32,
}

impl PipelineEntry {
    /// Compile `shader` and allocate `slot_count` uniform slots for it.
    pub fn create<B: RenderBackend>(
        backend: &mut B,
        kind: PipelineKind,
        shader: &str,
        layout: UniformLayout,
        slot_count: u32,
    ) -> Result<Self, RenderError> {
        let uniform_size = layout.size();
        let slot_stride = align_to(uniform_size.max(1), backend.uniform_offset_alignment());
        let slot_count = slot_count.max(1);

        let pipeline = backend.create_pipeline(&PipelineDescriptor {
            kind: &kind,
            shader,
            uniform_size,
        })?;
        let label = format!("{kind}_uniforms");
        let uniform_buffer = backend.create_buffer(&BufferDescriptor::zeroed(
            &label,
            BufferUsage::Uniform,
            slot_stride * slot_count as u64,
        ))?;
        let bind_group = backend.create_bind_group(pipeline, uniform_buffer, uniform_size)?;

        tracing::debug!(%kind, slot_stride, slot_count, "created pipeline entry");
        Ok(Self {
            kind,
            pipeline,
            uniform_buffer,
            bind_group,
            layout,
            slot_stride,
            slot_count,
            next_slot: 0,
        })
    }

    pub fn slot_stride(&self) -> u64 {
        self.slot_stride
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Slots written since the last reset.
    pub fn used_slots(&self) -> u32 {
        self.next_slot
    }

    pub fn is_full(&self) -> bool {
        self.next_slot >= self.slot_count
    }

    pub fn reset_slots(&mut self) {
        self.next_slot = 0;
    }

    /// Pack `inputs` per the layout into the next free slot.
    ///
    /// Returns the slot's dynamic offset.
    pub fn upload_uniforms<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        inputs: &UniformInputs,
    ) -> Result<u32, RenderError> {
        let mvp = inputs.mvp.to_cols_array_2d();
        let tinted;
        let plain;
        let bytes: &[u8] = match self.layout {
            UniformLayout::ModelViewProjection => {
                plain = MvpUniforms { mvp };
                bytemuck::bytes_of(&plain)
            }
            UniformLayout::TintedModelViewProjection => {
                tinted = TintedUniforms {
                    mvp,
                    tint: inputs.tint,
                };
                bytemuck::bytes_of(&tinted)
            }
            UniformLayout::Custom { .. } => {
                return Err(RenderError::UniformUploadUnsupported(self.kind.clone()));
            }
        };
        if self.is_full() {
            return Err(RenderError::UniformSlotsExhausted(self.kind.clone()));
        }
        let offset = self.next_slot as u64 * self.slot_stride;
        // Dynamic offsets are 32-bit.
        let dynamic_offset = u32::try_from(offset)
            .map_err(|_| RenderError::UniformSlotsExhausted(self.kind.clone()))?;
        backend.write_buffer(self.uniform_buffer, offset, bytes)?;
        self.next_slot += 1;
        Ok(dynamic_offset)
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Pipeline entries keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    entries: BTreeMap<PipelineKind, PipelineEntry>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `basic_mesh` and `tinted_mesh`.
    pub fn with_builtins<B: RenderBackend>(
        backend: &mut B,
        config: &RendererConfig,
    ) -> Result<Self, RenderError> {
        let mut registry = Self::new();
        registry.add(
            PipelineKind::BASIC_MESH,
            PipelineEntry::create(
                backend,
                PipelineKind::BASIC_MESH,
                shaders::BASIC_MESH_SHADER,
                UniformLayout::ModelViewProjection,
                config.uniform_slots,
            )?,
        );
        registry.add(
            PipelineKind::TINTED_MESH,
            PipelineEntry::create(
                backend,
                PipelineKind::TINTED_MESH,
                shaders::TINTED_MESH_SHADER,
                UniformLayout::TintedModelViewProjection,
                config.uniform_slots,
            )?,
        );
        tracing::info!(pipelines = registry.len(), "pipeline registry ready");
        Ok(registry)
    }

    pub fn get(&self, kind: &PipelineKind) -> Result<&PipelineEntry, RenderError> {
        self.entries
            .get(kind)
            .ok_or_else(|| RenderError::PipelineNotRegistered(kind.clone()))
    }

    pub fn get_mut(&mut self, kind: &PipelineKind) -> Result<&mut PipelineEntry, RenderError> {
        self.entries
            .get_mut(kind)
            .ok_or_else(|| RenderError::PipelineNotRegistered(kind.clone()))
    }

    /// Register an entry, replacing any existing one for the kind.
    pub fn add(&mut self, kind: PipelineKind, entry: PipelineEntry) {
        if self.entries.contains_key(&kind) {
            tracing::debug!(%kind, "replacing pipeline");
        } else {
            tracing::debug!(%kind, "registering pipeline");
        }
        self.entries.insert(kind, entry);
    }

    pub fn contains(&self, kind: &PipelineKind) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &PipelineKind> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset_slots(&mut self) {
        for entry in self.entries.values_mut() {
            entry.reset_slots();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingBackend;

    fn registry(backend: &mut RecordingBackend) -> PipelineRegistry {
        PipelineRegistry::with_builtins(backend, &RendererConfig::default()).unwrap()
    }

    #[test]
    fn offset_past_u32_is_reported_not_truncated() {
        let mut backend = RecordingBackend::new(4, 4);
        let mut entry = PipelineEntry::create(
            &mut backend,
            PipelineKind::BASIC_MESH,
            shaders::BASIC_MESH_SHADER,
            UniformLayout::ModelViewProjection,
            4,
        )
        .unwrap();
        entry.slot_stride = 1 << 31;
        entry.next_slot = 2;
        let inputs = UniformInputs::new(Mat4::IDENTITY);
        assert_eq!(
            entry.upload_uniforms(&mut backend, &inputs),
            Err(RenderError::UniformSlotsExhausted(PipelineKind::BASIC_MESH))
        );
        assert_eq!(entry.used_slots(), 2);
    }

    #[test]
    fn builtins_are_registered() {
        let mut backend = RecordingBackend::new(800, 600);
        let reg = registry(&mut backend);
        assert!(reg.contains(&PipelineKind::BASIC_MESH));
        assert!(reg.contains(&PipelineKind::TINTED_MESH));
        assert_eq!(reg.len(), 2);
        assert_eq!(backend.pipeline_count(), 2);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let mut backend = RecordingBackend::new(800, 600);
        let reg = registry(&mut backend);
        let err = reg.get(&PipelineKind::new("nonexistent")).unwrap_err();
        assert_eq!(err, RenderError::PipelineNotRegistered(PipelineKind::new("nonexistent")));
        assert_eq!(err.to_string(), "Pipeline nonexistent not found");
    }

    #[test]
    fn slots_are_aligned_to_backend() {
        let mut backend = RecordingBackend::new(800, 600);
        let reg = registry(&mut backend);
        let basic = reg.get(&PipelineKind::BASIC_MESH).unwrap();
        assert_eq!(basic.slot_stride(), 256);
        let buffer = backend.buffer(basic.uniform_buffer).unwrap();
        assert_eq!(buffer.size, 256 * RendererConfig::default().uniform_slots as u64);
    }

    #[test]
    fn upload_advances_slot_offsets() {
        let mut backend = RecordingBackend::new(800, 600);
        let mut reg = registry(&mut backend);
        let entry = reg.get_mut(&PipelineKind::BASIC_MESH).unwrap();
        let inputs = UniformInputs::new(Mat4::IDENTITY);
        assert_eq!(entry.upload_uniforms(&mut backend, &inputs).unwrap(), 0);
        assert_eq!(entry.upload_uniforms(&mut backend, &inputs).unwrap(), 256);
        assert_eq!(entry.used_slots(), 2);
        entry.reset_slots();
        assert_eq!(entry.upload_uniforms(&mut backend, &inputs).unwrap(), 0);
    }

    #[test]
    fn tinted_upload_packs_tint_after_matrix() {
        let mut backend = RecordingBackend::new(800, 600);
        let mut reg = registry(&mut backend);
        let entry = reg.get_mut(&PipelineKind::TINTED_MESH).unwrap();
        let buffer = entry.uniform_buffer;
        let inputs = UniformInputs {
            mvp: Mat4::IDENTITY,
            tint: [1.0, 0.5, 0.25, 1.0],
        };
        entry.upload_uniforms(&mut backend, &inputs).unwrap();
        let floats = backend.read_f32s(buffer, 0, 20).unwrap();
        assert_eq!(&floats[16..20], &[1.0, 0.5, 0.25, 1.0]);
        assert_eq!(floats[0], 1.0);
    }

    #[test]
    fn custom_layout_rejects_mvp_upload() {
        let mut backend = RecordingBackend::new(800, 600);
        let mut entry = PipelineEntry::create(
            &mut backend,
            PipelineKind::new("custom"),
            shaders::BASIC_MESH_SHADER,
            UniformLayout::Custom { size: 32 },
            4,
        )
        .unwrap();
        assert_eq!(
            entry
                .upload_uniforms(&mut backend, &UniformInputs::new(Mat4::IDENTITY))
                .unwrap_err(),
            RenderError::UniformUploadUnsupported(PipelineKind::new("custom"))
        );
    }

    #[test]
    fn full_entry_refuses_upload() {
        let mut backend = RecordingBackend::new(800, 600);
        let mut entry = PipelineEntry::create(
            &mut backend,
            PipelineKind::BASIC_MESH,
            shaders::BASIC_MESH_SHADER,
            UniformLayout::ModelViewProjection,
            1,
        )
        .unwrap();
        let inputs = UniformInputs::new(Mat4::IDENTITY);
        entry.upload_uniforms(&mut backend, &inputs).unwrap();
        assert!(entry.is_full());
        assert!(matches!(
            entry.upload_uniforms(&mut backend, &inputs),
            Err(RenderError::UniformSlotsExhausted(_))
        ));
    }

    #[test]
    fn add_overwrites_existing_kind() {
        let mut backend = RecordingBackend::new(800, 600);
        let mut reg = registry(&mut backend);
        let replacement = PipelineEntry::create(
            &mut backend,
            PipelineKind::BASIC_MESH,
            shaders::TINTED_MESH_SHADER,
            UniformLayout::TintedModelViewProjection,
            8,
        )
        .unwrap();
        let pipeline = replacement.pipeline;
        reg.add(PipelineKind::BASIC_MESH, replacement);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(&PipelineKind::BASIC_MESH).unwrap().pipeline, pipeline);
    }
}
