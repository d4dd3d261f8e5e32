use ember_common::BufferHandle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// CPU-side triangle geometry: vertex positions and `u32` triangle indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Build from flat `x, y, z, x, y, z, ...` floats. A trailing partial
    /// vertex is dropped.
    pub fn from_flat(vertices: &[f32], indices: Vec<u32>) -> Self {
        let positions = vertices
            .chunks_exact(3)
            .map(|v| [v[0], v[1], v[2]])
            .collect();
        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Indices grouped per triangle. A trailing partial triangle is dropped.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from_array(*self.positions.first()?);
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            let p = Vec3::from_array(*p);
            (lo.min(p), hi.max(p))
        }))
    }
}

/// Geometry uploaded to the GPU.
///
/// Entities share a `Mesh` through `Arc`; the mesh never changes after
/// upload, so sharing cannot leak one entity's edits into another.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub label: String,
    pub data: MeshData,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
}

impl Mesh {
    pub fn new(
        label: impl Into<String>,
        data: MeshData,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
    ) -> Self {
        let index_count = data.indices.len() as u32;
        Self {
            label: label.into(),
            data,
            vertex_buffer,
            index_buffer,
            index_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_groups_triples() {
        let data = MeshData::from_flat(&[0.0, 0.5, 0.0, -0.5, -0.5, 0.0, 0.5, -0.5, 0.0], vec![0, 1, 2]);
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.positions[1], [-0.5, -0.5, 0.0]);
        assert_eq!(data.triangles(), vec![[0, 1, 2]]);
    }

    #[test]
    fn bounds_cover_all_positions() {
        let data = MeshData::new(vec![[1.0, -2.0, 0.0], [-1.0, 3.0, 4.0]], vec![0, 1, 0]);
        let (lo, hi) = data.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Vec3::new(1.0, 3.0, 4.0));
        assert!(MeshData::default().bounds().is_none());
    }

    #[test]
    fn mesh_index_count_matches_data() {
        let data = MeshData::new(vec![[0.0; 3]; 4], vec![0, 1, 2, 2, 3, 0]);
        let mesh = Mesh::new("quad", data, BufferHandle(0), BufferHandle(1));
        assert_eq!(mesh.index_count, 6);
    }
}
