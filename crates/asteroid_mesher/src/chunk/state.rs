//! Per-chunk mesh versioning.

/// Build bookkeeping the mesher keeps for every chunk it has seen.
///
/// Once a chunk has been queued, `last_queued_version >= last_built_version`.
/// A chunk needs a rebuild whenever its edit version exceeds
/// `last_built_version`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshState {
    /// Edit version the current mesh was built from.
    pub last_built_version: u32,
    /// Highest version a rebuild has been requested for.
    pub last_queued_version: u32,
}

impl MeshState {
    /// State right after a build from `version` with nothing else pending.
    pub fn built(version: u32) -> Self {
        Self {
            last_built_version: version,
            last_queued_version: version,
        }
    }

    /// Check if voxel data at `edit_version` is newer than the mesh.
    pub fn needs_rebuild(&self, edit_version: u32) -> bool {
        edit_version > self.last_built_version
    }

    /// Version to request for data at `edit_version`.
    ///
    /// Never returns a version the mesh already has, so forced rebuilds of
    /// unedited chunks (version 0 or unchanged) still make progress.
    pub fn next_queued_version(&self, edit_version: u32) -> u32 {
        if edit_version > self.last_built_version {
            edit_version
        } else {
            self.last_built_version.saturating_add(1)
        }
    }
}
