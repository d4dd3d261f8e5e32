//! Wavefront OBJ import.
//!
//! Understands `v`, `vt`, `vn` and `f` records. Face corners may be written
//! as `v`, `v/vt`, `v//vn` or `v/vt/vn`, with 1-based or negative (relative)
//! indices. Every other record (`o`, `g`, `s`, `usemtl`, comments) is skipped.

use crate::{AssetError, MeshData};
use std::path::Path;

/// One polygon of an OBJ model, with 0-based indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjFace {
    pub vertex_indices: Vec<u32>,
    pub uv_indices: Vec<u32>,
    pub normal_indices: Vec<u32>,
}

/// A parsed OBJ model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    pub vertices: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<ObjFace>,
}

impl ObjModel {
    /// Positions and fan-triangulated indices, ready for upload.
    pub fn to_mesh_data(&self) -> MeshData {
        let mut indices = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            let v = &face.vertex_indices;
            for i in 1..v.len().saturating_sub(1) {
                indices.extend_from_slice(&[v[0], v[i], v[i + 1]]);
            }
        }
        MeshData::new(self.vertices.clone(), indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.vertex_indices.len().saturating_sub(2))
            .sum()
    }
}

/// Parse OBJ text.
pub fn parse(text: &str) -> Result<ObjModel, AssetError> {
    let mut model = ObjModel::default();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let mut parts = raw.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        match keyword {
            "v" => {
                let v = parse_floats::<3>(parts, line, "vertex")?;
                model.vertices.push(v);
            }
            "vt" => {
                let vt = parse_floats::<2>(parts, line, "texture coordinate")?;
                model.uvs.push(vt);
            }
            "vn" => {
                let vn = parse_floats::<3>(parts, line, "normal")?;
                model.normals.push(vn);
            }
            "f" => {
                let face = parse_face(parts, line, &model)?;
                model.faces.push(face);
            }
            _ => {}
        }
    }

    tracing::debug!(
        vertices = model.vertices.len(),
        faces = model.faces.len(),
        "parsed OBJ model"
    );
    Ok(model)
}

/// Read and parse an OBJ file.
pub fn load(path: impl AsRef<Path>) -> Result<ObjModel, AssetError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse(&text)
}

fn parse_floats<'a, const N: usize>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    let mut count = 0;
    // Extra components (e.g. a `w` weight) are ignored.
    for (slot, token) in out.iter_mut().zip(parts) {
        *slot = token.parse().map_err(|_| AssetError::ObjParse {
            line,
            message: format!("invalid {what} component `{token}`"),
        })?;
        count += 1;
    }
    if count < N {
        return Err(AssetError::ObjParse {
            line,
            message: format!("{what} needs {N} components, found {count}"),
        });
    }
    Ok(out)
}

fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
    model: &ObjModel,
) -> Result<ObjFace, AssetError> {
    let mut face = ObjFace::default();
    for corner in parts {
        let mut fields = corner.split('/');
        let v = fields.next().unwrap_or_default();
        let vt = fields.next().unwrap_or_default();
        let vn = fields.next().unwrap_or_default();

        face.vertex_indices
            .push(resolve_index(v, model.vertices.len(), line)?);
        if !vt.is_empty() {
            face.uv_indices.push(resolve_index(vt, model.uvs.len(), line)?);
        }
        if !vn.is_empty() {
            face.normal_indices
                .push(resolve_index(vn, model.normals.len(), line)?);
        }
    }
    if face.vertex_indices.len() < 3 {
        return Err(AssetError::ObjParse {
            line,
            message: format!(
                "face needs at least 3 vertices, found {}",
                face.vertex_indices.len()
            ),
        });
    }
    Ok(face)
}

/// Turn a 1-based or negative OBJ index into a 0-based one.
fn resolve_index(token: &str, len: usize, line: usize) -> Result<u32, AssetError> {
    let raw: i64 = token.parse().map_err(|_| AssetError::ObjParse {
        line,
        message: format!("invalid index `{token}`"),
    })?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(len as i64 + r),
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < len => Ok(i as u32),
        _ => Err(AssetError::ObjParse {
            line,
            message: format!("index {raw} out of range (have {len})"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
vn 0 1 0
vt 0 0
f 1/1/1 2/1/1 3/1/1 4/1/1
";

    #[test]
    fn parses_vertices_and_faces() {
        let model = parse(QUAD).unwrap();
        assert_eq!(model.vertices.len(), 4);
        assert_eq!(model.normals.len(), 1);
        assert_eq!(model.uvs.len(), 1);
        assert_eq!(model.faces.len(), 1);
        assert_eq!(model.faces[0].vertex_indices, vec![0, 1, 2, 3]);
        assert_eq!(model.faces[0].normal_indices, vec![0, 0, 0, 0]);
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let data = parse(QUAD).unwrap().to_mesh_data();
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(data.vertex_count(), 4);
    }

    #[test]
    fn negative_indices_are_relative() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(model.faces[0].vertex_indices, vec![0, 1, 2]);
    }

    #[test]
    fn vertex_normal_without_uv() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        assert!(model.faces[0].uv_indices.is_empty());
        assert_eq!(model.faces[0].normal_indices.len(), 3);
    }

    #[test]
    fn out_of_range_index_reports_line() {
        let err = parse("v 0 0 0\nf 1 2 3\n").unwrap_err();
        match err {
            AssetError::ObjParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_vertex_is_rejected() {
        assert!(parse("v 0 zero 0\n").is_err());
        assert!(parse("v 0 0\n").is_err());
    }

    #[test]
    fn degenerate_face_is_rejected() {
        assert!(parse("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(QUAD.as_bytes()).unwrap();
        let model = load(tmp.path()).unwrap();
        assert_eq!(model.triangle_count(), 2);
    }
}
