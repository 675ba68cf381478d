//! Greedy merge for one face direction.
//!
//! The chunk is swept slice by slice along the face normal. Each slice
//! builds a 2D mask of exposed faces, then rectangles of matching faces
//! are grown row-major: width along `u` first, then height along `v`.

use glam::UVec3;

use crate::core::{ChunkKey, FaceDirection};
use crate::mesh::MeshBuffers;
use crate::terrain::VoxelAccessor;
use super::emit::{append_merged_face, slice_to_local, MergedQuad};
use super::mask::{FaceCell, SliceMask};
use super::QuadCounts;

/// Fill `mask` with the exposed faces of slice `w`.
///
/// A face is exposed when its voxel is solid and the voxel one step along
/// the normal is not (or does not exist).
fn build_slice_mask<A: VoxelAccessor + ?Sized>(
    accessor: &A,
    key: ChunkKey,
    dir: FaceDirection,
    w: i32,
    mask: &mut SliceMask,
) {
    let normal = dir.normal();
    for v in 0..mask.v_dim() {
        for u in 0..mask.u_dim() {
            let local = slice_to_local(dir, u as i32, v as i32, w);
            let Some(voxel) = accessor.sample(key.volume, key.coord, local) else {
                continue;
            };
            if !voxel.is_solid() || accessor.is_solid(key.volume, key.coord, local + normal) {
                continue;
            }
            mask.set(u, v, FaceCell::exposed(voxel));
        }
    }
}

/// Grow a rectangle from `(u, v)` over unused, mergeable cells.
fn grow_rect(mask: &SliceMask, u: usize, v: usize, seed: &FaceCell) -> (usize, usize) {
    let mergeable = |cu: usize, cv: usize| !mask.is_used(cu, cv) && seed.can_merge(&mask.get(cu, cv));

    let mut width = 1;
    while u + width < mask.u_dim() && mergeable(u + width, v) {
        width += 1;
    }

    let mut height = 1;
    while v + height < mask.v_dim() && (u..u + width).all(|cu| mergeable(cu, v + height)) {
        height += 1;
    }

    (width, height)
}

/// Mesh every slice of one face direction into `buffers`.
pub fn greedy_mesh_direction<A: VoxelAccessor + ?Sized>(
    accessor: &A,
    key: ChunkKey,
    dims: UVec3,
    dir: FaceDirection,
    voxel_size: f32,
    mask: &mut SliceMask,
    buffers: &mut MeshBuffers,
) -> QuadCounts {
    let (ua, va, wa) = dir.basis();
    let (u_dim, v_dim, w_dim) = (dims[ua] as usize, dims[va] as usize, dims[wa] as i32);
    let mut counts = QuadCounts::default();

    for w in 0..w_dim {
        mask.reset(u_dim, v_dim);
        build_slice_mask(accessor, key, dir, w, mask);
        counts.before_merge += mask.exposed_count();

        for v in 0..v_dim {
            for u in 0..u_dim {
                let cell = mask.get(u, v);
                if !cell.exists || mask.is_used(u, v) {
                    continue;
                }

                let (width, height) = grow_rect(mask, u, v, &cell);
                mask.mark_used(u, v, width, height);

                let quad = MergedQuad {
                    dir,
                    u: u as i32,
                    v: v as i32,
                    w,
                    width: width as i32,
                    height: height as i32,
                    cell,
                };
                append_merged_face(accessor, key, &quad, voxel_size, buffers);
                counts.after_merge += 1;
            }
        }
    }

    counts
}
