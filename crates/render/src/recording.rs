use crate::backend::{BufferDescriptor, BufferUsage, PassPlan, PipelineDescriptor, RenderBackend};
use crate::RenderError;
use ember_common::{BindGroupHandle, BufferHandle, PipelineHandle, PipelineKind};

/// A buffer as the recording backend holds it.
#[derive(Debug, Clone)]
pub struct BufferRecord {
    pub label: String,
    pub usage: BufferUsage,
    pub size: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct BindGroupRecord {
    pipeline: PipelineHandle,
    buffer: BufferHandle,
    binding_size: u64,
}

/// Headless backend that keeps every resource in memory and records each
/// submitted pass. Used by tests and the CLI.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    size: (u32, u32),
    alignment: u64,
    resource_limit: Option<usize>,
    buffers: Vec<BufferRecord>,
    pipelines: Vec<PipelineKind>,
    bind_groups: Vec<BindGroupRecord>,
    in_frame: bool,
    frames: u64,
    aborted_frames: u64,
    frame_submissions: Vec<PassPlan>,
    submissions: Vec<PassPlan>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            alignment: 256,
            resource_limit: None,
            buffers: Vec::new(),
            pipelines: Vec::new(),
            bind_groups: Vec::new(),
            in_frame: false,
            frames: 0,
            aborted_frames: 0,
            frame_submissions: Vec::new(),
            submissions: Vec::new(),
        }
    }

    /// Fail resource creation once `limit` buffers, pipelines and bind groups exist.
    pub fn with_resource_limit(mut self, limit: usize) -> Self {
        self.resource_limit = Some(limit);
        self
    }

    pub fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = alignment.max(1);
        self
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&BufferRecord> {
        self.buffers.get(handle.0 as usize)
    }

    /// `count` native-endian floats starting at byte `offset` of a buffer.
    pub fn read_f32s(&self, handle: BufferHandle, offset: u64, count: usize) -> Option<Vec<f32>> {
        let start = offset as usize;
        let bytes = self.buffer(handle)?.data.get(start..start + count * 4)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn pipeline_kind(&self, handle: PipelineHandle) -> Option<&PipelineKind> {
        self.pipelines.get(handle.0 as usize)
    }

    /// Every pass submitted since creation, oldest first.
    pub fn submissions(&self) -> &[PassPlan] {
        &self.submissions
    }

    /// Passes submitted during the last completed (or current) frame.
    pub fn last_frame(&self) -> &[PassPlan] {
        &self.frame_submissions
    }

    /// Frames presented.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames released without being presented.
    pub fn aborted_frames(&self) -> u64 {
        self.aborted_frames
    }

    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }

    fn resource_count(&self) -> usize {
        self.buffers.len() + self.pipelines.len() + self.bind_groups.len()
    }

    fn check_limit(&self, label: &str) -> Result<(), RenderError> {
        match self.resource_limit {
            Some(limit) if self.resource_count() >= limit => Err(RenderError::ResourceCreation {
                label: label.to_string(),
                reason: format!("resource limit of {limit} reached"),
            }),
            _ => Ok(()),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn create_buffer(&mut self, desc: &BufferDescriptor<'_>) -> Result<BufferHandle, RenderError> {
        self.check_limit(desc.label)?;
        let data = match desc.contents {
            Some(bytes) => bytes.to_vec(),
            None => vec![0; desc.size as usize],
        };
        let handle = BufferHandle(self.buffers.len() as u64);
        self.buffers.push(BufferRecord {
            label: desc.label.to_string(),
            usage: desc.usage,
            size: data.len() as u64,
            data,
        });
        Ok(handle)
    }

    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), RenderError> {
        let record = self
            .buffers
            .get_mut(buffer.0 as usize)
            .ok_or(RenderError::UnknownBuffer(buffer))?;
        let start = offset as usize;
        let end = start + data.len();
        let Some(target) = record.data.get_mut(start..end) else {
            return Err(RenderError::ResourceCreation {
                label: record.label.clone(),
                reason: format!("write of {} bytes at {offset} overruns {} bytes", data.len(), record.size),
            });
        };
        target.copy_from_slice(data);
        Ok(())
    }

    fn create_pipeline(
        &mut self,
        desc: &PipelineDescriptor<'_>,
    ) -> Result<PipelineHandle, RenderError> {
        self.check_limit(desc.kind.as_str())?;
        let handle = PipelineHandle(self.pipelines.len() as u64);
        self.pipelines.push(desc.kind.clone());
        Ok(handle)
    }

    fn create_bind_group(
        &mut self,
        pipeline: PipelineHandle,
        uniform_buffer: BufferHandle,
        binding_size: u64,
    ) -> Result<BindGroupHandle, RenderError> {
        self.check_limit("bind_group")?;
        if pipeline.0 as usize >= self.pipelines.len() {
            return Err(RenderError::UnknownPipeline(pipeline));
        }
        if uniform_buffer.0 as usize >= self.buffers.len() {
            return Err(RenderError::UnknownBuffer(uniform_buffer));
        }
        let handle = BindGroupHandle(self.bind_groups.len() as u64);
        self.bind_groups.push(BindGroupRecord {
            pipeline,
            buffer: uniform_buffer,
            binding_size,
        });
        Ok(handle)
    }

    fn uniform_offset_alignment(&self) -> u64 {
        self.alignment
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.in_frame = true;
        self.frame_submissions.clear();
        Ok(())
    }

    fn submit(&mut self, pass: &PassPlan) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        for draw in &pass.draws {
            let group = self
                .bind_groups
                .get(draw.bind_group.0 as usize)
                .ok_or(RenderError::UnknownBindGroup(draw.bind_group))?;
            if group.pipeline != draw.pipeline {
                tracing::warn!(
                    draw = ?draw.pipeline,
                    bound = ?group.pipeline,
                    "bind group belongs to another pipeline"
                );
            }
            let end = draw.uniform_offset as u64 + group.binding_size;
            let size = self.buffers.get(group.buffer.0 as usize).map_or(0, |b| b.size);
            if end > size {
                return Err(RenderError::UnknownBuffer(group.buffer));
            }
        }
        self.frame_submissions.push(pass.clone());
        self.submissions.push(pass.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        self.in_frame = false;
        self.frames += 1;
        Ok(())
    }

    fn abort_frame(&mut self) {
        if self.in_frame {
            self.in_frame = false;
            self.aborted_frames += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, LoadAction};

    #[test]
    fn buffers_keep_initial_contents() {
        let mut backend = RecordingBackend::new(4, 4);
        let handle = backend
            .create_buffer(&BufferDescriptor::with_contents("v", BufferUsage::Vertex, &[1, 2, 3, 4]))
            .unwrap();
        let record = backend.buffer(handle).unwrap();
        assert_eq!(record.data, vec![1, 2, 3, 4]);
        assert_eq!(record.usage, BufferUsage::Vertex);
    }

    #[test]
    fn out_of_range_write_is_an_error() {
        let mut backend = RecordingBackend::new(4, 4);
        let handle = backend
            .create_buffer(&BufferDescriptor::zeroed("u", BufferUsage::Uniform, 8))
            .unwrap();
        assert!(backend.write_buffer(handle, 4, &[0; 8]).is_err());
        assert!(matches!(
            backend.write_buffer(BufferHandle(9), 0, &[0]),
            Err(RenderError::UnknownBuffer(_))
        ));
    }

    #[test]
    fn resource_limit_fails_creation() {
        let mut backend = RecordingBackend::new(4, 4).with_resource_limit(1);
        backend
            .create_buffer(&BufferDescriptor::zeroed("a", BufferUsage::Vertex, 4))
            .unwrap();
        let err = backend
            .create_buffer(&BufferDescriptor::zeroed("b", BufferUsage::Vertex, 4))
            .unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreation { ref label, .. } if label == "b"));
    }

    #[test]
    fn submit_outside_frame_is_rejected() {
        let mut backend = RecordingBackend::new(4, 4);
        let pass = PassPlan {
            load: LoadAction::Load,
            draws: Vec::new(),
        };
        assert_eq!(backend.submit(&pass), Err(RenderError::FrameNotStarted));
        backend.begin_frame().unwrap();
        backend.submit(&pass).unwrap();
        backend.end_frame().unwrap();
        assert_eq!(backend.frames(), 1);
        assert_eq!(backend.submissions().len(), 1);
    }

    #[test]
    fn unknown_bind_group_is_rejected() {
        let mut backend = RecordingBackend::new(4, 4);
        let pass = PassPlan {
            load: LoadAction::Load,
            draws: vec![DrawCommand {
                pipeline: PipelineHandle(0),
                bind_group: BindGroupHandle(3),
                uniform_offset: 0,
                vertex_buffer: BufferHandle(0),
                index_buffer: BufferHandle(1),
                index_count: 3,
            }],
        };
        backend.begin_frame().unwrap();
        assert_eq!(
            backend.submit(&pass),
            Err(RenderError::UnknownBindGroup(BindGroupHandle(3)))
        );
    }

    #[test]
    fn abort_releases_the_frame_without_presenting() {
        let mut backend = RecordingBackend::new(4, 4);
        backend.abort_frame();
        assert_eq!(backend.aborted_frames(), 0);
        backend.begin_frame().unwrap();
        backend.abort_frame();
        assert!(!backend.is_in_frame());
        assert_eq!(backend.aborted_frames(), 1);
        assert_eq!(backend.frames(), 0);
        assert_eq!(backend.end_frame(), Err(RenderError::FrameNotStarted));
    }
}
