//! Rebuild queue for chunk meshes.

use std::collections::HashMap;

use crate::core::ChunkKey;

/// A pending mesh rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebuildRequest {
    /// Chunk to rebuild.
    pub key: ChunkKey,
    /// Version the rebuild was requested for.
    pub version: u32,
}

/// Pending rebuilds, at most one per chunk.
///
/// Insertion order carries no priority; the scheduler picks by distance
/// when it drains. Re-enqueueing a chunk that is already pending only
/// raises its requested version.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    /// Chunks in insertion order.
    order: Vec<ChunkKey>,
    /// Requested version per pending chunk (also the dedup set).
    versions: HashMap<ChunkKey, u32>,
}

impl RebuildQueue {
    /// Create a new empty rebuild queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk to the queue.
    ///
    /// Returns true if the chunk was added, false if it was already pending
    /// (its version is raised to `version` if higher).
    pub fn enqueue(&mut self, key: ChunkKey, version: u32) -> bool {
        match self.versions.get_mut(&key) {
            Some(existing) => {
                *existing = (*existing).max(version);
                false
            }
            None => {
                self.versions.insert(key, version);
                self.order.push(key);
                true
            }
        }
    }

    /// Put back requests left over from a drain pass.
    pub fn requeue(&mut self, requests: impl IntoIterator<Item = RebuildRequest>) {
        for request in requests {
            self.enqueue(request.key, request.version);
        }
    }

    /// Remove every pending request, in insertion order.
    pub fn take_all(&mut self) -> Vec<RebuildRequest> {
        let versions = std::mem::take(&mut self.versions);
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|key| versions.get(&key).map(|&version| RebuildRequest { key, version }))
            .collect()
    }

    /// Remove a specific chunk from the queue.
    ///
    /// Returns true if the chunk was in the queue.
    pub fn remove(&mut self, key: ChunkKey) -> bool {
        if self.versions.remove(&key).is_some() {
            self.order.retain(|k| *k != key);
            true
        } else {
            false
        }
    }

    /// Check if a chunk is in the queue.
    pub fn contains(&self, key: ChunkKey) -> bool {
        self.versions.contains_key(&key)
    }

    /// Requested version for a pending chunk.
    pub fn version_of(&self, key: ChunkKey) -> Option<u32> {
        self.versions.get(&key).copied()
    }

    /// Number of pending rebuilds.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Clear all pending rebuilds.
    pub fn clear(&mut self) {
        self.order.clear();
        self.versions.clear();
    }

    /// Pending chunks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ChunkKey> {
        self.order.iter()
    }
}

/// Versions claimed during one reconciliation pass.
///
/// Stops the same chunk from being requested twice at the same (or a lower)
/// version within a pass, e.g. once as a new chunk and again as the
/// neighbour of another new chunk.
#[derive(Debug, Default)]
pub struct ReconcilePass {
    claimed: HashMap<ChunkKey, u32>,
}

impl ReconcilePass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key` at `version`. Returns false if this pass already claimed
    /// it at an equal or higher version.
    pub fn claim(&mut self, key: ChunkKey, version: u32) -> bool {
        match self.claimed.get(&key) {
            Some(&existing) if existing >= version => false,
            _ => {
                self.claimed.insert(key, version);
                true
            }
        }
    }

    /// Number of chunks claimed so far.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
