//! Greedy voxel meshing and budgeted rebuild scheduling for asteroid
//! terrain chunks.
//!
//! Each chunk is meshed one face direction at a time: exposed faces of a
//! slice are collected into a 2D mask and merged into the largest
//! rectangles of matching material and ore grade. Rebuilds are driven by
//! per-chunk edit versions and spread over frames under a time budget,
//! nearest chunks first.
//!
//! # Example
//!
//! ```
//! use asteroid_mesher::{ChunkCoord, ChunkKey, ChunkMesher, TerrainSource, TerrainWorld, VolumeConfig, VolumeId, Voxel};
//! use glam::{IVec3, UVec3};
//!
//! let mut world = TerrainWorld::new(1.0).unwrap();
//! world.insert_volume(VolumeId(0), VolumeConfig::new(UVec3::splat(16)));
//!
//! let key = ChunkKey::new(VolumeId(0), ChunkCoord::ZERO);
//! world.insert_chunk(key);
//! world.set_voxel(key, IVec3::new(8, 8, 8), Voxel::solid(1, 0)); // Single voxel
//!
//! let mut mesher = ChunkMesher::new();
//! mesher.build(&world, &world.chunk(key).unwrap(), 1.0);
//! assert_eq!(mesher.buffers().triangle_count(), 12); // Cube = 6 faces × 2 triangles
//! ```

pub mod core;
pub mod error;
pub mod mesh;
pub mod terrain;
pub mod mesher;
pub mod chunk;

// Re-export primary types
pub use crate::core::{
    ChunkCoord,
    ChunkKey,
    FaceDirection,
    MaterialId,
    VolumeId,
    Voxel,
    quantize_ore_grade,
    // Constants
    MAX_U16_VERTICES, ORE_GRADE_BINS,
};
pub use crate::error::{MesherError, Result};
pub use crate::mesh::{Aabb, Color32, IndexFormat, MaterialHandle, MeshBuffers, MeshResource};
pub use crate::terrain::{ChunkInfo, TerrainSource, TerrainWorld, VolumeConfig, VoxelAccessor};

// Re-export main entry points
pub use crate::mesher::{build_chunk_mesh, ChunkMesher, QuadCounts};
pub use crate::chunk::{ChunkMeshManager, RebuildConfig, RenderHost, StaticHost};
