//! Merged quad emission with per-corner ambient occlusion.

use glam::IVec3;

use crate::core::{ChunkKey, FaceDirection};
use crate::mesh::{Color32, MeshBuffers};
use crate::terrain::VoxelAccessor;
use super::mask::FaceCell;

/// Fixed UVs per emitted vertex.
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

/// AO intensity removed per occluding neighbour.
const AO_STEP: u8 = 85;

/// A rectangle produced by the greedy merge, in slice space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergedQuad {
    pub dir: FaceDirection,
    pub u: i32,
    pub v: i32,
    /// Slice layer along the face normal's axis.
    pub w: i32,
    pub width: i32,
    pub height: i32,
    pub cell: FaceCell,
}

/// Place slice coordinates into a voxel-space vector.
#[inline]
pub(crate) fn slice_to_local(dir: FaceDirection, u: i32, v: i32, w: i32) -> IVec3 {
    let (ua, va, wa) = dir.basis();
    let mut p = IVec3::ZERO;
    p[ua] = u;
    p[va] = v;
    p[wa] = w;
    p
}

/// Vertex order over the canonical corners `(u,v), (u,v+h), (u+w,v+h), (u+w,v)`
/// that makes the triangles face outward.
fn winding(dir: FaceDirection) -> [usize; 4] {
    match dir {
        FaceDirection::NegX | FaceDirection::PosY | FaceDirection::NegZ => [0, 1, 2, 3],
        FaceDirection::PosX | FaceDirection::NegY | FaceDirection::PosZ => [0, 3, 2, 1],
    }
}

/// Map an occluder count to vertex alpha.
#[inline]
pub fn ao_value(side_u: bool, side_v: bool, corner: bool) -> u8 {
    let occlusion = if side_u && side_v {
        3
    } else {
        side_u as u8 + side_v as u8 + corner as u8
    };
    255 - occlusion * AO_STEP
}

/// AO at one quad corner.
///
/// `(cu, cv)` is the face cell touching the corner and `(su, sv)` points
/// away from the quad. Occluders are sampled in the layer in front of the
/// face, so they may live in a neighbouring chunk.
fn corner_ao<A: VoxelAccessor + ?Sized>(
    accessor: &A,
    key: ChunkKey,
    dir: FaceDirection,
    front: i32,
    (cu, cv): (i32, i32),
    (su, sv): (i32, i32),
) -> u8 {
    let solid = |u: i32, v: i32| {
        accessor.is_solid(key.volume, key.coord, slice_to_local(dir, u, v, front))
    };
    ao_value(solid(cu + su, cv), solid(cu, cv + sv), solid(cu + su, cv + sv))
}

/// Emit one merged quad: 4 vertices and 2 triangles.
pub fn append_merged_face<A: VoxelAccessor + ?Sized>(
    accessor: &A,
    key: ChunkKey,
    quad: &MergedQuad,
    voxel_size: f32,
    buffers: &mut MeshBuffers,
) {
    let MergedQuad { dir, u, v, w, width, height, cell } = *quad;
    let step = dir.normal()[dir.basis().2];
    let plane = if dir.is_positive() { w + 1 } else { w };
    let front = w + step;

    let u1 = u + width;
    let v1 = v + height;
    let corners = [(u, v), (u, v1), (u1, v1), (u1, v)];
    let cells = [(u, v), (u, v1 - 1), (u1 - 1, v1 - 1), (u1 - 1, v)];
    let sides = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

    let normal = dir.normal_f32();
    let base = buffers.positions.len() as u32;

    for (slot, &k) in winding(dir).iter().enumerate() {
        let (cu, cv) = corners[k];
        let position = slice_to_local(dir, cu, cv, plane).as_vec3() * voxel_size;
        let ao = corner_ao(accessor, key, dir, front, cells[k], sides[k]);

        buffers.positions.push(position.to_array());
        buffers.normals.push(normal);
        buffers.uvs.push(QUAD_UVS[slot]);
        buffers.colors.push(Color32::new(cell.material_id, cell.ore_grade, 0, ao));
    }

    buffers.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}
