//! Chunk mesh scheduling for streamed asteroid terrain.
//!
//! This module decides which chunks need (re)meshing and builds them
//! within a per-frame budget:
//! - [`MeshState`]: Built/queued versions per chunk
//! - [`RebuildQueue`]: Deduplicated pending rebuilds
//! - [`RenderHost`]: Material and focus supplied by the renderer
//! - [`ChunkMeshManager`]: Central orchestrator for all of the above
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ChunkMeshManager                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  HashMap<ChunkKey, ChunkRecord>  - State, mesh, telemetry       │
//! │  HashSet<ChunkKey>               - Last frame's live chunks     │
//! │  RebuildQueue                    - Pending rebuilds             │
//! │  ChunkMesher                     - Reused scratch buffers       │
//! │  RebuildConfig                   - Budget configuration         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Frame Pipeline
//!
//! ```text
//!   tick N                               tick N+1
//! ┌─────────┐    ┌─────────────┐       ┌─────────┐
//! │  drain  │───▶│  reconcile  │──────▶│  drain  │───▶ ...
//! └─────────┘    └─────────────┘       └─────────┘
//!                      │                    ▲
//!                      └─── RebuildQueue ───┘
//! ```
//!
//! A chunk edited during frame N is queued by that frame's reconcile and
//! built by the drain of frame N+1.
//!
//! # Usage
//!
//! ```
//! use asteroid_mesher::chunk::{ChunkMeshManager, StaticHost};
//! use asteroid_mesher::core::{ChunkCoord, ChunkKey, Voxel, VolumeId};
//! use asteroid_mesher::mesh::MaterialHandle;
//! use asteroid_mesher::terrain::{TerrainWorld, VolumeConfig};
//! use glam::UVec3;
//!
//! let mut world = TerrainWorld::new(1.0).unwrap();
//! world.insert_volume(VolumeId(0), VolumeConfig::new(UVec3::splat(8)));
//!
//! let key = ChunkKey::new(VolumeId(0), ChunkCoord::ZERO);
//! world.insert_chunk(key);
//! world.fill(key, Voxel::solid(1, 0));
//!
//! let mut manager = ChunkMeshManager::new();
//! let mut host = StaticHost::new(MaterialHandle(0));
//!
//! manager.tick(&world, &mut host); // queues the chunk
//! let stats = manager.tick(&world, &mut host); // builds it
//!
//! assert_eq!(stats.rebuild.chunks_rebuilt, 1);
//! assert_eq!(manager.mesh(key).unwrap().vertex_count(), 24);
//! ```

pub mod host;
pub mod manager;
pub mod queue;
pub mod scheduler;
pub mod state;
pub mod stats;

// Re-export primary types
pub use host::{RenderHost, StaticHost};
pub use manager::ChunkMeshManager;
pub use queue::{ReconcilePass, RebuildQueue, RebuildRequest};
pub use scheduler::{closest_pending, exceeded_time_budget, PendingChunk};
pub use state::MeshState;
pub use stats::{
    ChunkDebugInfo, ChunkMeshTelemetry, FrameStats, RebuildConfig, RebuildStats, ReconcileStats,
};
