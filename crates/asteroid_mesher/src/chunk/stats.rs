//! Configuration and statistics for chunk mesh scheduling.

use serde::{Deserialize, Serialize};

use crate::error::{MesherError, Result};

/// Configuration for rebuild scheduling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildConfig {
    /// Wall-clock budget (ms) for rebuilding per frame. Zero or negative
    /// allows only `min_chunks_per_frame` builds.
    pub max_build_ms_per_frame: f32,

    /// Builds per frame that happen regardless of the time budget.
    pub min_chunks_per_frame: usize,

    /// Builds per frame reserved for chunks within `near_radius` of the focus.
    pub near_rebuild_cap: usize,

    /// Radius (world units) of the near-priority phase.
    pub near_radius: f32,

    /// Skip all meshing work (server / batch runs without a renderer).
    pub headless: bool,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            max_build_ms_per_frame: 3.0,
            min_chunks_per_frame: 1,
            near_rebuild_cap: 2,
            near_radius: 40.0,
            headless: false,
        }
    }
}

impl RebuildConfig {
    /// Create a config optimized for high-end systems.
    pub fn high_performance() -> Self {
        Self {
            max_build_ms_per_frame: 6.0,
            min_chunks_per_frame: 2,
            near_rebuild_cap: 4,
            ..Self::default()
        }
    }

    /// Create a config optimized for low-end systems.
    pub fn low_performance() -> Self {
        Self {
            max_build_ms_per_frame: 1.5,
            min_chunks_per_frame: 1,
            near_rebuild_cap: 1,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot interpret.
    pub fn validate(&self) -> Result<()> {
        if self.max_build_ms_per_frame.is_nan() {
            return Err(MesherError::InvalidConfig("max_build_ms_per_frame is NaN".into()));
        }
        if self.near_radius.is_nan() {
            return Err(MesherError::InvalidConfig("near_radius is NaN".into()));
        }
        Ok(())
    }

    /// Squared near radius; negative radii count as zero.
    pub fn near_radius_sq(&self) -> f32 {
        let r = self.near_radius.max(0.0);
        r * r
    }
}

/// Statistics from a single frame's drain pass.
#[derive(Clone, Debug, Default)]
pub struct RebuildStats {
    /// Number of chunks rebuilt this frame.
    pub chunks_rebuilt: usize,
    /// Of those, how many were built by the near-priority phase.
    pub near_rebuilt: usize,
    /// Total vertices generated across all rebuilt chunks.
    pub vertices_generated: usize,
    /// Total indices generated across all rebuilt chunks.
    pub indices_generated: usize,
    /// Number of requests dropped because the chunk no longer exists.
    pub chunks_missing: usize,
    /// Number of chunks remaining in the queue.
    pub queue_remaining: usize,
    /// Whether work was deferred because the budget ran out.
    pub time_budget_exceeded: bool,
    /// Whether meshing was skipped because the host had no material.
    pub disabled: bool,
    /// Total time spent rebuilding (milliseconds).
    pub elapsed_ms: f64,
}

impl RebuildStats {
    /// Check if any rebuilds occurred.
    pub fn any_rebuilt(&self) -> bool {
        self.chunks_rebuilt > 0
    }

    /// Check if more work remains.
    pub fn has_remaining(&self) -> bool {
        self.queue_remaining > 0
    }
}

/// Statistics from one reconciliation pass.
#[derive(Clone, Debug, Default)]
pub struct ReconcileStats {
    /// Chunks appended to the queue.
    pub enqueued: usize,
    /// Live chunks not seen in the previous pass.
    pub new_chunks: usize,
    /// Chunks seen previously that are gone now.
    pub removed_chunks: usize,
}

/// Combined frame statistics.
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    /// Frame counter after this tick.
    pub tick: u64,
    /// Statistics from the drain phase.
    pub rebuild: RebuildStats,
    /// Statistics from the reconcile phase.
    pub reconcile: ReconcileStats,
    /// Live chunks known to the mesher.
    pub total_chunks: usize,
    /// Chunks currently holding a mesh.
    pub chunks_with_mesh: usize,
    /// Queue length after reconciling, i.e. next frame's work.
    pub queue_len: usize,
}

/// Build telemetry for one chunk's most recent mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChunkMeshTelemetry {
    pub last_build_ms: f32,
    pub vertex_count: usize,
    pub index_count: usize,
    pub quads_before_merge: usize,
    pub quads_after_merge: usize,
    /// Frame the mesh was built in.
    pub tick_built: u64,
}

/// Debug information about mesher state.
#[derive(Clone, Debug, Default)]
pub struct ChunkDebugInfo {
    /// Live chunks seen by the last reconcile.
    pub total_chunks: usize,
    /// Chunks with a mesh.
    pub meshed_chunks: usize,
    /// Size of the rebuild queue.
    pub queue_size: usize,
    /// Total vertices across all meshes.
    pub total_vertices: usize,
    /// Total indices across all meshes.
    pub total_indices: usize,
    /// Estimated memory usage for mesh data (bytes).
    pub mesh_memory_bytes: usize,
}

impl ChunkDebugInfo {
    /// Get mesh memory usage in megabytes.
    pub fn mesh_memory_mb(&self) -> f32 {
        self.mesh_memory_bytes as f32 / (1024.0 * 1024.0)
    }
}
