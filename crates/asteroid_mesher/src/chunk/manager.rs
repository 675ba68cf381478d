//! ChunkMeshManager - orchestrates reconciliation, scheduling and rebuilds.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use glam::Vec3;
use log::{debug, info, trace, warn};

use crate::core::ChunkKey;
use crate::mesh::{Aabb, MaterialHandle, MeshResource};
use crate::mesher::ChunkMesher;
use crate::terrain::TerrainSource;
use super::host::RenderHost;
use super::queue::{ReconcilePass, RebuildQueue};
use super::scheduler::{closest_pending, exceeded_time_budget, PendingChunk};
use super::state::MeshState;
use super::stats::{
    ChunkDebugInfo, ChunkMeshTelemetry, FrameStats, RebuildConfig, RebuildStats, ReconcileStats,
};

/// Everything the mesher owns for one chunk.
#[derive(Debug, Default)]
struct ChunkRecord {
    state: Option<MeshState>,
    mesh: Option<MeshResource>,
    telemetry: Option<ChunkMeshTelemetry>,
}

/// Central manager for chunk meshes.
///
/// Handles:
/// - Reconciling the live chunk set against the previous frame
/// - Version-based rebuild queueing with neighbour forcing
/// - Distance-prioritised, time-budgeted rebuilds
/// - Per-chunk mesh resources and telemetry
///
/// Voxel data stays with the host; the manager reads it through a
/// [`TerrainSource`].
pub struct ChunkMeshManager {
    /// Mesher-owned records indexed by chunk.
    records: HashMap<ChunkKey, ChunkRecord>,

    /// Chunks that were live at the end of the last reconcile.
    known: HashSet<ChunkKey>,

    /// Pending rebuilds.
    queue: RebuildQueue,

    /// Scratch buffers reused across builds.
    mesher: ChunkMesher,

    /// Configuration for rebuild scheduling.
    config: RebuildConfig,

    /// Frame counter, advanced by [`tick`](Self::tick).
    tick: u64,
}

impl ChunkMeshManager {
    /// Create a new manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(RebuildConfig::default())
    }

    /// Create a new manager with custom configuration.
    pub fn with_config(config: RebuildConfig) -> Self {
        Self {
            records: HashMap::new(),
            known: HashSet::new(),
            queue: RebuildQueue::new(),
            mesher: ChunkMesher::new(),
            config,
            tick: 0,
        }
    }

    pub fn config(&self) -> &RebuildConfig {
        &self.config
    }

    /// Replace the scheduling config. Takes effect on the next drain.
    pub fn set_config(&mut self, config: RebuildConfig) {
        self.config = config;
    }

    /// Frames ticked so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    // ========================================================================
    // Chunk Access
    // ========================================================================

    /// Current mesh of a chunk, if it has been built.
    pub fn mesh(&self, key: ChunkKey) -> Option<&MeshResource> {
        self.records.get(&key)?.mesh.as_ref()
    }

    pub fn mesh_state(&self, key: ChunkKey) -> Option<MeshState> {
        self.records.get(&key)?.state
    }

    /// Telemetry from the chunk's most recent build.
    pub fn telemetry(&self, key: ChunkKey) -> Option<ChunkMeshTelemetry> {
        self.records.get(&key)?.telemetry
    }

    pub fn queue(&self) -> &RebuildQueue {
        &self.queue
    }

    /// Iterate over chunks that currently hold a mesh.
    pub fn iter_meshes(&self) -> impl Iterator<Item = (&ChunkKey, &MeshResource)> {
        self.records
            .iter()
            .filter_map(|(key, record)| record.mesh.as_ref().map(|mesh| (key, mesh)))
    }

    /// Number of chunks seen by the last reconcile.
    pub fn known_chunk_count(&self) -> usize {
        self.known.len()
    }

    /// Drop all meshes, state and pending work.
    pub fn clear(&mut self) {
        self.records.clear();
        self.known.clear();
        self.queue.clear();
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Compare the live chunk set against the last pass and queue every
    /// chunk whose mesh is missing or stale.
    ///
    /// New chunks force their 6 neighbours to rebuild so boundary faces
    /// are regenerated; removed chunks do the same and release their mesh.
    pub fn reconcile<T: TerrainSource + ?Sized>(&mut self, terrain: &T) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut pass = ReconcilePass::new();

        let mut live = terrain.live_chunks();
        live.sort_by_key(|chunk| chunk.key);
        let current: HashSet<ChunkKey> = live.iter().map(|chunk| chunk.key).collect();

        for chunk in &live {
            let is_new = !self.known.contains(&chunk.key);
            if self.enqueue_chunk(&mut pass, chunk.key, chunk.version(), is_new) {
                stats.enqueued += 1;
            }
            if is_new {
                stats.new_chunks += 1;
                stats.enqueued += self.enqueue_neighbors(terrain, &mut pass, chunk.key);
            }
        }

        let removed: Vec<ChunkKey> = self.known.difference(&current).copied().collect();
        for key in removed {
            stats.removed_chunks += 1;
            self.release(key);
            stats.enqueued += self.enqueue_neighbors(terrain, &mut pass, key);
        }

        self.known = current;
        stats
    }

    /// Queue one chunk at `version`. Returns true if it was queued.
    fn enqueue_chunk(
        &mut self,
        pass: &mut ReconcilePass,
        key: ChunkKey,
        version: u32,
        force: bool,
    ) -> bool {
        let record = self.records.entry(key).or_default();
        let state = record.state.unwrap_or_default();

        let up_to_date = record.mesh.is_some() && record.state.is_some() && !state.needs_rebuild(version);
        if !force && up_to_date {
            return false;
        }

        let queued_version = state.next_queued_version(version);
        if record.state.is_some() && queued_version <= state.last_queued_version {
            return false;
        }
        if !pass.claim(key, queued_version) {
            return false;
        }

        self.queue.enqueue(key, queued_version);
        record.state = Some(MeshState {
            last_queued_version: queued_version,
            ..state
        });
        trace!("queued chunk {:?} at version {}", key, queued_version);
        true
    }

    /// Force-queue the live neighbours of `key`. Returns how many were queued.
    fn enqueue_neighbors<T: TerrainSource + ?Sized>(
        &mut self,
        terrain: &T,
        pass: &mut ReconcilePass,
        key: ChunkKey,
    ) -> usize {
        let mut queued = 0;
        for neighbor in key.neighbors() {
            let Some(chunk) = terrain.chunk(neighbor) else {
                continue;
            };
            if self.enqueue_chunk(pass, neighbor, chunk.version(), true) {
                queued += 1;
            }
        }
        queued
    }

    /// Forget a chunk that no longer exists.
    ///
    /// Dropping the record also drops its queued claim, so the chunk is
    /// queued afresh if it comes back. It stays in `known` until the next
    /// reconcile, which forces its neighbours if it is still gone.
    fn release(&mut self, key: ChunkKey) {
        self.queue.remove(key);
        if self.records.remove(&key).is_some_and(|record| record.mesh.is_some()) {
            debug!("released mesh for removed chunk {:?}", key);
        }
    }

    // ========================================================================
    // Rebuild Processing
    // ========================================================================

    /// Build queued chunks within the frame budget, nearest first.
    ///
    /// Chunks within `near_radius` of the focus get up to
    /// `near_rebuild_cap` builds first; the rest are taken globally
    /// nearest-first. Whatever the budget leaves is put back on the queue.
    pub fn drain<T, H>(&mut self, terrain: &T, host: &mut H) -> RebuildStats
    where
        T: TerrainSource + ?Sized,
        H: RenderHost + ?Sized,
    {
        let start_time = Instant::now();
        let mut stats = RebuildStats::default();

        if !(terrain.voxel_size() > 0.0) {
            stats.disabled = true;
            stats.queue_remaining = self.queue.len();
            return stats;
        }

        let material = match host.resolve_material() {
            Ok(material) => material,
            Err(err) => {
                warn!("chunk meshing skipped this frame: {}", err);
                stats.disabled = true;
                stats.queue_remaining = self.queue.len();
                return stats;
            }
        };

        let focus = host.focus_position().unwrap_or(Vec3::ZERO);

        // Snapshot; nothing enqueued from here on is built this frame
        let mut pending = Vec::with_capacity(self.queue.len());
        for request in self.queue.take_all() {
            match terrain.chunk(request.key) {
                Some(chunk) => pending.push(PendingChunk {
                    request,
                    distance_sq: chunk.distance_squared_to(focus),
                }),
                None => {
                    stats.chunks_missing += 1;
                    self.release(request.key);
                }
            }
        }

        let elapsed_ms = || start_time.elapsed().as_secs_f64() * 1000.0;
        let mut out_of_time = exceeded_time_budget(&self.config, 0, elapsed_ms());

        // Phase A: near chunks
        let near_sq = self.config.near_radius_sq();
        let mut near_budget = self.config.near_rebuild_cap;
        while !out_of_time && near_budget > 0 && !pending.is_empty() {
            let Some(index) = closest_pending(&pending, Some(near_sq)) else {
                break;
            };
            let chunk = pending.remove(index);
            if self.rebuild_into_stats(terrain, chunk.request.key, material, &mut stats) {
                stats.near_rebuilt += 1;
            }
            near_budget -= 1;
            out_of_time = exceeded_time_budget(&self.config, stats.chunks_rebuilt, elapsed_ms());
        }

        // Phase B: everything else, globally nearest first
        while !out_of_time && !pending.is_empty() {
            let Some(index) = closest_pending(&pending, None) else {
                break;
            };
            let chunk = pending.remove(index);
            self.rebuild_into_stats(terrain, chunk.request.key, material, &mut stats);
            out_of_time = exceeded_time_budget(&self.config, stats.chunks_rebuilt, elapsed_ms());
        }

        if !pending.is_empty() {
            stats.time_budget_exceeded = true;
            self.queue.requeue(pending.into_iter().map(|chunk| chunk.request));
        }

        stats.queue_remaining = self.queue.len();
        stats.elapsed_ms = elapsed_ms();

        if stats.time_budget_exceeded {
            info!(
                "rebuilt {} chunks in {:.2}ms, {} deferred",
                stats.chunks_rebuilt, stats.elapsed_ms, stats.queue_remaining
            );
        }
        stats
    }

    fn rebuild_into_stats<T: TerrainSource + ?Sized>(
        &mut self,
        terrain: &T,
        key: ChunkKey,
        material: MaterialHandle,
        stats: &mut RebuildStats,
    ) -> bool {
        match self.build(terrain, key, material) {
            Some(telemetry) => {
                stats.chunks_rebuilt += 1;
                stats.vertices_generated += telemetry.vertex_count;
                stats.indices_generated += telemetry.index_count;
                true
            }
            None => {
                stats.chunks_missing += 1;
                self.release(key);
                false
            }
        }
    }

    /// Mesh one chunk now, ignoring the queue and budget.
    ///
    /// Returns false if the chunk no longer exists.
    pub fn rebuild_chunk<T: TerrainSource + ?Sized>(
        &mut self,
        terrain: &T,
        key: ChunkKey,
        material: MaterialHandle,
    ) -> bool {
        self.build(terrain, key, material).is_some()
    }

    fn build<T: TerrainSource + ?Sized>(
        &mut self,
        terrain: &T,
        key: ChunkKey,
        material: MaterialHandle,
    ) -> Option<ChunkMeshTelemetry> {
        let voxel_size = terrain.voxel_size();
        if !(voxel_size > 0.0) {
            return None;
        }
        let chunk = terrain.chunk(key)?;

        let start_time = Instant::now();
        let version = chunk.version();
        let counts = self.mesher.build(terrain, &chunk, voxel_size);
        let buffers = self.mesher.buffers();

        let record = self.records.entry(key).or_default();
        let bounds = Aabb::for_chunk(chunk.voxels_per_chunk, voxel_size);
        record
            .mesh
            .get_or_insert_with(MeshResource::new)
            .upload(buffers, bounds, material);
        record.state = Some(MeshState::built(version));

        let telemetry = ChunkMeshTelemetry {
            last_build_ms: (start_time.elapsed().as_secs_f64() * 1000.0) as f32,
            vertex_count: buffers.vertex_count(),
            index_count: buffers.index_count(),
            quads_before_merge: counts.before_merge,
            quads_after_merge: counts.after_merge,
            tick_built: self.tick,
        };
        record.telemetry = Some(telemetry);

        debug!(
            "rebuilt chunk {:?} v{}: {} verts, {} -> {} quads in {:.3}ms",
            key,
            version,
            telemetry.vertex_count,
            counts.before_merge,
            counts.after_merge,
            telemetry.last_build_ms
        );
        Some(telemetry)
    }

    /// Build every queued chunk immediately (ignores budget).
    ///
    /// Useful for tests or loading screens. Returns the number built.
    pub fn rebuild_all_queued<T, H>(&mut self, terrain: &T, host: &mut H) -> usize
    where
        T: TerrainSource + ?Sized,
        H: RenderHost + ?Sized,
    {
        let material = match host.resolve_material() {
            Ok(material) => material,
            Err(err) => {
                warn!("chunk meshing skipped: {}", err);
                return 0;
            }
        };

        let mut built = 0;
        for request in self.queue.take_all() {
            if self.build(terrain, request.key, material).is_some() {
                built += 1;
            } else {
                self.release(request.key);
            }
        }
        built
    }

    /// Process one frame.
    ///
    /// Drains the work queued by the previous frame, then reconciles, so
    /// a change is built one tick after it is seen. A no-op when headless.
    pub fn tick<T, H>(&mut self, terrain: &T, host: &mut H) -> FrameStats
    where
        T: TerrainSource + ?Sized,
        H: RenderHost + ?Sized,
    {
        if self.config.headless {
            return FrameStats {
                tick: self.tick,
                total_chunks: self.known.len(),
                chunks_with_mesh: self.iter_meshes().count(),
                queue_len: self.queue.len(),
                ..Default::default()
            };
        }

        self.tick += 1;
        let rebuild = self.drain(terrain, host);
        let reconcile = self.reconcile(terrain);

        FrameStats {
            tick: self.tick,
            rebuild,
            reconcile,
            total_chunks: self.known.len(),
            chunks_with_mesh: self.iter_meshes().count(),
            queue_len: self.queue.len(),
        }
    }

    // ========================================================================
    // Debug / Inspection
    // ========================================================================

    /// Get comprehensive debug information.
    pub fn debug_info(&self) -> ChunkDebugInfo {
        let mut info = ChunkDebugInfo {
            total_chunks: self.known.len(),
            queue_size: self.queue.len(),
            ..Default::default()
        };

        for (_, mesh) in self.iter_meshes() {
            info.meshed_chunks += 1;
            info.total_vertices += mesh.vertex_count();
            info.total_indices += mesh.index_count();
            info.mesh_memory_bytes += mesh.memory_bytes();
        }
        info
    }
}

impl Default for ChunkMeshManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, UVec3};
    use crate::core::{ChunkCoord, Voxel, VolumeId};
    use crate::terrain::{TerrainWorld, VolumeConfig};
    use super::super::host::StaticHost;

    const VOL: VolumeId = VolumeId(0);

    fn key(x: i32, y: i32, z: i32) -> ChunkKey {
        ChunkKey::new(VOL, ChunkCoord::new(x, y, z))
    }

    fn world(coords: &[ChunkKey]) -> TerrainWorld {
        let mut world = TerrainWorld::new(1.0).unwrap();
        world.insert_volume(VOL, VolumeConfig::new(UVec3::splat(4)));
        for &k in coords {
            world.insert_chunk(k);
            world.fill(k, Voxel::solid(1, 0));
        }
        world
    }

    fn host() -> StaticHost {
        StaticHost::new(MaterialHandle(1))
    }

    fn unlimited() -> RebuildConfig {
        RebuildConfig {
            max_build_ms_per_frame: 1000.0,
            min_chunks_per_frame: 100,
            ..Default::default()
        }
    }

    #[test]
    fn new_manager_is_empty() {
        let manager = ChunkMeshManager::new();
        assert_eq!(manager.known_chunk_count(), 0);
        assert!(manager.queue().is_empty());
        assert_eq!(manager.tick_count(), 0);
    }

    #[test]
    fn reconcile_queues_new_chunks_once() {
        let world = world(&[key(0, 0, 0), key(5, 0, 0)]);
        let mut manager = ChunkMeshManager::new();

        let stats = manager.reconcile(&world);
        assert_eq!(stats.new_chunks, 2);
        assert_eq!(stats.enqueued, 2);
        assert_eq!(manager.queue().len(), 2);
        assert_eq!(manager.mesh_state(key(0, 0, 0)).unwrap().last_queued_version, 1);

        // Still pending, nothing new
        let stats = manager.reconcile(&world);
        assert_eq!(stats.enqueued, 0);
        assert_eq!(manager.queue().len(), 2);
    }

    #[test]
    fn drain_builds_and_records_version() {
        let k = key(0, 0, 0);
        let world = world(&[k]);
        let mut manager = ChunkMeshManager::with_config(unlimited());

        manager.reconcile(&world);
        let stats = manager.drain(&world, &mut host());

        assert_eq!(stats.chunks_rebuilt, 1);
        assert_eq!(stats.vertices_generated, 24);
        assert!(!stats.has_remaining());

        let state = manager.mesh_state(k).unwrap();
        assert_eq!(state.last_built_version, 1);
        assert_eq!(state.last_queued_version, 1);

        let mesh = manager.mesh(k).unwrap();
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.material(), Some(MaterialHandle(1)));
        assert_eq!(mesh.bounds().max(), Vec3::splat(4.0));

        let telemetry = manager.telemetry(k).unwrap();
        assert_eq!(telemetry.quads_after_merge, 6);
        assert_eq!(telemetry.quads_before_merge, 96);
    }

    #[test]
    fn built_chunks_are_not_requeued() {
        let world = world(&[key(0, 0, 0), key(1, 0, 0)]);
        let mut manager = ChunkMeshManager::with_config(unlimited());

        manager.reconcile(&world);
        manager.drain(&world, &mut host());
        assert_eq!(manager.reconcile(&world).enqueued, 0);
        assert!(manager.queue().is_empty());
    }

    #[test]
    fn new_chunk_forces_neighbors() {
        let a = key(0, 0, 0);
        let b = key(1, 0, 0);
        let mut world = world(&[a]);
        let mut manager = ChunkMeshManager::with_config(unlimited());

        manager.reconcile(&world);
        manager.drain(&world, &mut host());

        world.insert_chunk(b);
        let stats = manager.reconcile(&world);
        assert_eq!(stats.new_chunks, 1);
        assert_eq!(stats.enqueued, 2);
        assert!(manager.queue().contains(a));
        // Forced past the built version even though `a` was not edited
        assert_eq!(manager.queue().version_of(a), Some(2));
    }

    #[test]
    fn removed_chunk_releases_mesh_and_forces_neighbors() {
        let a = key(0, 0, 0);
        let b = key(0, 1, 0);
        let mut world = world(&[a, b]);
        let mut manager = ChunkMeshManager::with_config(unlimited());

        manager.reconcile(&world);
        manager.drain(&world, &mut host());
        assert!(manager.mesh(b).is_some());

        world.remove_chunk(b);
        let stats = manager.reconcile(&world);
        assert_eq!(stats.removed_chunks, 1);
        assert!(manager.mesh(b).is_none());
        assert!(manager.mesh_state(b).is_none());
        assert!(manager.queue().contains(a));
        assert!(!manager.queue().contains(b));
    }

    #[test]
    fn drain_drops_missing_chunks() {
        let a = key(0, 0, 0);
        let mut world = world(&[a]);
        let mut manager = ChunkMeshManager::new();

        manager.reconcile(&world);
        world.remove_chunk(a);

        let stats = manager.drain(&world, &mut host());
        assert_eq!(stats.chunks_missing, 1);
        assert_eq!(stats.chunks_rebuilt, 0);
        assert!(manager.queue().is_empty());
        assert!(manager.mesh_state(a).is_none());

        // Still gone: reconcile counts it as removed
        assert_eq!(manager.reconcile(&world).removed_chunks, 1);
    }

    #[test]
    fn reconcile_orders_queue_by_key() {
        let keys = [key(6, 0, 0), key(-3, 0, 0), key(0, 0, 0), key(9, 0, 0)];
        let world = world(&keys);
        let mut manager = ChunkMeshManager::new();

        manager.reconcile(&world);
        let queued: Vec<ChunkKey> = manager.queue().iter().copied().collect();
        assert_eq!(queued, vec![key(-3, 0, 0), key(0, 0, 0), key(6, 0, 0), key(9, 0, 0)]);
    }

    #[test]
    fn set_config_applies_to_next_drain() {
        let keys: Vec<ChunkKey> = (0..3).map(|i| key(i * 2, 0, 0)).collect();
        let world = world(&keys);
        let mut manager = ChunkMeshManager::with_config(RebuildConfig {
            max_build_ms_per_frame: 0.0,
            min_chunks_per_frame: 1,
            ..Default::default()
        });

        manager.reconcile(&world);
        assert_eq!(manager.drain(&world, &mut host()).chunks_rebuilt, 1);

        manager.set_config(unlimited());
        assert_eq!(manager.config(), &unlimited());
        assert_eq!(manager.drain(&world, &mut host()).chunks_rebuilt, 2);
    }

    #[test]
    fn material_failure_keeps_queue() {
        let world = world(&[key(0, 0, 0)]);
        let mut manager = ChunkMeshManager::new();
        manager.reconcile(&world);

        let stats = manager.drain(&world, &mut StaticHost::default());
        assert!(stats.disabled);
        assert_eq!(stats.chunks_rebuilt, 0);
        assert_eq!(manager.queue().len(), 1);

        let stats = manager.drain(&world, &mut host());
        assert_eq!(stats.chunks_rebuilt, 1);
    }

    #[test]
    fn zero_budget_builds_the_floor() {
        let keys: Vec<ChunkKey> = (0..5).map(|i| key(i * 2, 0, 0)).collect();
        let world = world(&keys);
        let mut manager = ChunkMeshManager::with_config(RebuildConfig {
            max_build_ms_per_frame: 0.0,
            min_chunks_per_frame: 2,
            ..Default::default()
        });

        manager.reconcile(&world);
        let stats = manager.drain(&world, &mut host());
        assert_eq!(stats.chunks_rebuilt, 2);
        assert!(stats.time_budget_exceeded);
        assert_eq!(stats.queue_remaining, 3);
        assert_eq!(manager.queue().len(), 3);
    }

    #[test]
    fn tick_has_one_frame_latency() {
        let k = key(0, 0, 0);
        let mut world = world(&[k]);
        let mut manager = ChunkMeshManager::with_config(unlimited());

        let frame = manager.tick(&world, &mut host());
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.rebuild.chunks_rebuilt, 0);
        assert_eq!(frame.reconcile.enqueued, 1);
        assert_eq!(frame.queue_len, 1);

        let frame = manager.tick(&world, &mut host());
        assert_eq!(frame.rebuild.chunks_rebuilt, 1);
        assert_eq!(frame.chunks_with_mesh, 1);
        assert_eq!(manager.telemetry(k).unwrap().tick_built, 2);

        world.set_voxel(k, IVec3::new(1, 1, 1), Voxel::EMPTY);
        assert_eq!(manager.tick(&world, &mut host()).reconcile.enqueued, 1);
        assert_eq!(manager.tick(&world, &mut host()).rebuild.chunks_rebuilt, 1);
        assert_eq!(manager.mesh_state(k).unwrap().last_built_version, 2);
    }

    #[test]
    fn headless_tick_does_nothing() {
        let world = world(&[key(0, 0, 0)]);
        let mut manager = ChunkMeshManager::with_config(RebuildConfig {
            headless: true,
            ..Default::default()
        });

        let frame = manager.tick(&world, &mut host());
        assert_eq!(frame.tick, 0);
        assert!(manager.queue().is_empty());
        assert_eq!(manager.known_chunk_count(), 0);
    }

    #[test]
    fn rebuild_chunk_reports_missing() {
        let world = world(&[key(0, 0, 0)]);
        let mut manager = ChunkMeshManager::new();
        assert!(manager.rebuild_chunk(&world, key(0, 0, 0), MaterialHandle(1)));
        assert!(!manager.rebuild_chunk(&world, key(3, 3, 3), MaterialHandle(1)));
    }

    #[test]
    fn rebuild_all_queued_ignores_budget() {
        let keys: Vec<ChunkKey> = (0..4).map(|i| key(0, 0, i * 2)).collect();
        let world = world(&keys);
        let mut manager = ChunkMeshManager::with_config(RebuildConfig {
            max_build_ms_per_frame: 0.0,
            min_chunks_per_frame: 0,
            ..Default::default()
        });

        manager.reconcile(&world);
        assert_eq!(manager.drain(&world, &mut host()).chunks_rebuilt, 0);

        // No material: nothing built, nothing lost
        assert_eq!(manager.rebuild_all_queued(&world, &mut StaticHost::default()), 0);
        assert_eq!(manager.queue().len(), 4);

        assert_eq!(manager.rebuild_all_queued(&world, &mut host()), 4);
        assert!(manager.queue().is_empty());
    }

    #[test]
    fn debug_info_counts_meshes() {
        let world = world(&[key(0, 0, 0), key(3, 0, 0)]);
        let mut manager = ChunkMeshManager::with_config(unlimited());
        manager.reconcile(&world);
        manager.drain(&world, &mut host());

        let info = manager.debug_info();
        assert_eq!(info.total_chunks, 2);
        assert_eq!(info.meshed_chunks, 2);
        assert_eq!(info.total_vertices, 48);
        assert_eq!(info.total_indices, 72);
        assert!(info.mesh_memory_bytes > 0);

        manager.clear();
        assert_eq!(manager.debug_info().meshed_chunks, 0);
    }
}
