//! Error types.

use thiserror::Error;

/// Errors surfaced by the mesher.
///
/// Chunks disappearing between enqueue and build are not errors; those are
/// skipped silently and show up only in [`RebuildStats`](crate::chunk::RebuildStats).
#[derive(Debug, Error)]
pub enum MesherError {
    /// The render host could not provide a material this frame.
    #[error("chunk material unavailable: {0}")]
    MaterialUnavailable(String),

    #[error("voxel size must be positive, got {0}")]
    InvalidVoxelSize(f32),

    #[error("invalid rebuild config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse rebuild config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MesherError>;
