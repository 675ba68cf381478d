//! Chunk meshing pipeline.
//!
//! For each of the 6 face directions:
//! 1. Build a per-slice mask of exposed faces (neighbour chunks included)
//! 2. Greedily merge matching faces into rectangles
//! 3. Emit each rectangle as a quad with per-corner ambient occlusion

pub mod emit;
pub mod greedy;
pub mod mask;

use std::ops::AddAssign;

use crate::core::FaceDirection;
use crate::mesh::MeshBuffers;
use crate::terrain::{ChunkInfo, VoxelAccessor};

pub use emit::{append_merged_face, ao_value, MergedQuad};
pub use greedy::greedy_mesh_direction;
pub use mask::{FaceCell, SliceMask};

/// Face counts before and after greedy merging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadCounts {
    /// Exposed voxel faces (one quad each without merging).
    pub before_merge: usize,
    /// Quads actually emitted.
    pub after_merge: usize,
}

impl QuadCounts {
    /// Fraction of quads removed by merging (0.0 = none, close to 1.0 = most).
    pub fn merge_efficiency(&self) -> f32 {
        if self.before_merge == 0 {
            0.0
        } else {
            1.0 - self.after_merge as f32 / self.before_merge as f32
        }
    }
}

impl AddAssign for QuadCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.before_merge += rhs.before_merge;
        self.after_merge += rhs.after_merge;
    }
}

/// Greedy-mesh all 6 directions of a chunk into `buffers`.
///
/// Appends to `buffers`; callers clear it between chunks. A chunk with
/// any zero dimension produces nothing.
pub fn build_chunk_mesh<A: VoxelAccessor + ?Sized>(
    accessor: &A,
    chunk: &ChunkInfo,
    voxel_size: f32,
    mask: &mut SliceMask,
    buffers: &mut MeshBuffers,
) -> QuadCounts {
    let dims = chunk.voxels_per_chunk;
    let mut counts = QuadCounts::default();
    if dims.min_element() == 0 {
        return counts;
    }

    for dir in FaceDirection::ALL {
        counts += greedy_mesh_direction(accessor, chunk.key, dims, dir, voxel_size, mask, buffers);
    }
    counts
}

/// Scratch storage for meshing chunks one after another.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesher {
    mask: SliceMask,
    buffers: MeshBuffers,
}

impl ChunkMesher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the scratch buffers and mesh `chunk` into them.
    pub fn build<A: VoxelAccessor + ?Sized>(
        &mut self,
        accessor: &A,
        chunk: &ChunkInfo,
        voxel_size: f32,
    ) -> QuadCounts {
        self.buffers.clear();
        build_chunk_mesh(accessor, chunk, voxel_size, &mut self.mask, &mut self.buffers)
    }

    /// Output of the last [`build`](ChunkMesher::build).
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }
}
