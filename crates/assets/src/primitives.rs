//! Procedural geometry.

use crate::MeshData;

/// Single triangle in the XY plane, facing +Z.
pub fn triangle() -> MeshData {
    MeshData::new(
        vec![[0.0, 0.5, 0.0], [-0.5, -0.5, 0.0], [0.5, -0.5, 0.0]],
        vec![0, 1, 2],
    )
}

/// Axis-aligned cube centred on the origin with 8 shared corners.
pub fn cube(half_extent: f32) -> MeshData {
    let h = half_extent;
    #[rustfmt::skip]
    let positions = vec![
        [-h, -h,  h], [ h, -h,  h], [ h,  h,  h], [-h,  h,  h],
        [-h, -h, -h], [ h, -h, -h], [ h,  h, -h], [-h,  h, -h],
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0, // +Z
        5, 4, 7, 7, 6, 5, // -Z
        1, 5, 6, 6, 2, 1, // +X
        4, 0, 3, 3, 7, 4, // -X
        3, 2, 6, 6, 7, 3, // +Y
        4, 5, 1, 1, 0, 4, // -Y
    ];
    MeshData::new(positions, indices)
}

/// Square in the XZ plane centred on the origin, facing +Y.
pub fn plane(size: f32) -> MeshData {
    let h = size * 0.5;
    MeshData::new(
        vec![[-h, 0.0, -h], [-h, 0.0, h], [h, 0.0, h], [h, 0.0, -h]],
        vec![0, 1, 2, 2, 3, 0],
    )
}
