//! Frame budget and distance ordering for draining the rebuild queue.

use super::queue::RebuildRequest;
use super::stats::RebuildConfig;

/// A request taken from the queue for this frame, with its distance to the
/// focus point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingChunk {
    pub request: RebuildRequest,
    pub distance_sq: f32,
}

/// Whether the frame should stop building after `built` chunks and
/// `elapsed_ms` of work.
///
/// The first `min_chunks_per_frame` builds are never stopped. Past that
/// floor a zero or negative budget stops immediately.
pub fn exceeded_time_budget(config: &RebuildConfig, built: usize, elapsed_ms: f64) -> bool {
    if built < config.min_chunks_per_frame {
        return false;
    }

    let budget = config.max_build_ms_per_frame as f64;
    if budget <= 0.0 {
        return true;
    }

    elapsed_ms >= budget
}

/// Index of the closest pending chunk, optionally limited to
/// `distance_sq <= max_distance_sq`.
///
/// Unbounded searches give ties to the earliest entry; bounded (near-phase)
/// searches give them to the latest.
pub fn closest_pending(pending: &[PendingChunk], max_distance_sq: Option<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (i, chunk) in pending.iter().enumerate() {
        let closer = match (best, max_distance_sq) {
            (_, Some(max)) if !(chunk.distance_sq <= max) => continue,
            (None, _) => true,
            (Some((_, best_sq)), Some(_)) => chunk.distance_sq <= best_sq,
            (Some((_, best_sq)), None) => chunk.distance_sq < best_sq,
        };
        if closer {
            best = Some((i, chunk.distance_sq));
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChunkCoord, ChunkKey, VolumeId};

    fn pending(distances: &[f32]) -> Vec<PendingChunk> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &d)| PendingChunk {
                request: RebuildRequest {
                    key: ChunkKey::new(VolumeId(0), ChunkCoord::new(i as i32, 0, 0)),
                    version: 1,
                },
                distance_sq: d,
            })
            .collect()
    }

    #[test]
    fn floor_is_never_interrupted() {
        let config = RebuildConfig {
            max_build_ms_per_frame: 0.0,
            min_chunks_per_frame: 2,
            ..Default::default()
        };
        assert!(!exceeded_time_budget(&config, 0, 1000.0));
        assert!(!exceeded_time_budget(&config, 1, 1000.0));
        assert!(exceeded_time_budget(&config, 2, 0.0));
    }

    #[test]
    fn negative_budget_stops_after_floor() {
        let config = RebuildConfig {
            max_build_ms_per_frame: -1.0,
            min_chunks_per_frame: 1,
            ..Default::default()
        };
        assert!(!exceeded_time_budget(&config, 0, 0.0));
        assert!(exceeded_time_budget(&config, 1, 0.0));
    }

    #[test]
    fn positive_budget_uses_elapsed_time() {
        let config = RebuildConfig {
            max_build_ms_per_frame: 3.0,
            min_chunks_per_frame: 0,
            ..Default::default()
        };
        assert!(!exceeded_time_budget(&config, 5, 2.9));
        assert!(exceeded_time_budget(&config, 5, 3.0));
    }

    #[test]
    fn zero_floor_and_zero_budget_builds_nothing() {
        let config = RebuildConfig {
            max_build_ms_per_frame: 0.0,
            min_chunks_per_frame: 0,
            ..Default::default()
        };
        assert!(exceeded_time_budget(&config, 0, 0.0));
    }

    #[test]
    fn closest_picks_minimum() {
        let chunks = pending(&[100.0, 25.0, 2500.0]);
        assert_eq!(closest_pending(&chunks, None), Some(1));
    }

    #[test]
    fn closest_respects_radius() {
        let chunks = pending(&[10_000.0, 2500.0]);
        assert_eq!(closest_pending(&chunks, Some(1600.0)), None);
        // Boundary is inclusive
        assert_eq!(closest_pending(&chunks, Some(2500.0)), Some(1));
    }

    #[test]
    fn unbounded_ties_go_to_first_entry() {
        let chunks = pending(&[9.0, 4.0, 4.0]);
        assert_eq!(closest_pending(&chunks, None), Some(1));
    }

    #[test]
    fn bounded_ties_go_to_last_entry() {
        let chunks = pending(&[4.0, 9.0, 4.0, 16.0]);
        assert_eq!(closest_pending(&chunks, Some(100.0)), Some(2));
        // Out-of-radius entries never win a tie
        assert_eq!(closest_pending(&chunks, Some(9.0)), Some(2));
        assert_eq!(closest_pending(&pending(&[4.0, 4.0, 25.0]), Some(4.0)), Some(1));
    }

    #[test]
    fn nan_distance_is_still_picked_when_unbounded() {
        let chunks = pending(&[f32::NAN]);
        assert_eq!(closest_pending(&chunks, None), Some(0));
        assert_eq!(closest_pending(&chunks, Some(f32::MAX)), None);
        assert_eq!(closest_pending(&[], None), None);
    }
}
