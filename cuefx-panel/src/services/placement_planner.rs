//! Collision-aware track selection
//!
//! Greedy and deterministic: walk the existing tracks in order and take the
//! first one with no clip overlapping the insertion time (with a small
//! buffer). When every track conflicts, ask the host for a new track; if
//! that fails, fall back to the last track regardless of conflict;
//! placement never fails outright just because the timeline is crowded.

use crate::host::{HostError, TimelineHost};
use crate::types::{PlacementDecision, TrackLayout};

/// Slack applied around clip boundaries when testing for overlap, seconds
pub const CLIP_BUFFER_SECONDS: f64 = 0.1;

/// First track free at `desired_time`, in track order
pub fn select_free_track(layout: &TrackLayout, desired_time: f64) -> Option<usize> {
    layout.iter().position(|clips| {
        !clips.iter().any(|clip| {
            desired_time >= clip.start - CLIP_BUFFER_SECONDS
                && desired_time <= clip.end + CLIP_BUFFER_SECONDS
        })
    })
}

/// Plans placements against the host's current track layout
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementPlanner;

impl PlacementPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Choose a track for a clip starting at `desired_time`
    pub async fn plan<H: TimelineHost>(
        &self,
        host: &H,
        desired_time: f64,
    ) -> Result<PlacementDecision, HostError> {
        let layout = host.track_layout().await?;

        if layout.is_empty() {
            // Host reported no audio tracks; insertion targets track 0 and
            // the host materializes it
            return Ok(PlacementDecision {
                track_index: 0,
                created_new_track: false,
                conflict_avoided: false,
            });
        }

        if let Some(track_index) = select_free_track(&layout, desired_time) {
            tracing::debug!(track_index, desired_time, "Free track selected");
            return Ok(PlacementDecision {
                track_index,
                created_new_track: false,
                conflict_avoided: track_index > 0,
            });
        }

        // Every track is occupied at the insertion point
        match host.create_track().await {
            Ok(()) => {
                let track_index = layout.len();
                tracing::info!(track_index, desired_time, "Created new track for placement");
                Ok(PlacementDecision {
                    track_index,
                    created_new_track: true,
                    conflict_avoided: true,
                })
            }
            Err(e) => {
                let track_index = layout.len() - 1;
                tracing::warn!(
                    error = %e,
                    track_index,
                    "Track creation unavailable, overlapping on last track"
                );
                Ok(PlacementDecision {
                    track_index,
                    created_new_track: false,
                    conflict_avoided: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClipInterval, EditContext, InsertOutcome};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeTimeline {
        layout: TrackLayout,
        can_create: bool,
        created: AtomicBool,
    }

    impl FakeTimeline {
        fn new(layout: TrackLayout, can_create: bool) -> Self {
            Self {
                layout,
                can_create,
                created: AtomicBool::new(false),
            }
        }
    }

    impl TimelineHost for FakeTimeline {
        async fn edit_context(&self) -> Result<EditContext, HostError> {
            Ok(EditContext {
                playhead_seconds: 0.0,
                selection: None,
            })
        }

        async fn track_layout(&self) -> Result<TrackLayout, HostError> {
            Ok(self.layout.clone())
        }

        async fn create_track(&self) -> Result<(), HostError> {
            if self.can_create {
                self.created.store(true, Ordering::SeqCst);
                Ok(())
            } else {
                Err(HostError::Rejected("track limit reached".to_string()))
            }
        }

        async fn insert_asset(
            &self,
            _path: &Path,
            _time_seconds: f64,
            track_index: usize,
        ) -> Result<InsertOutcome, HostError> {
            Ok(InsertOutcome {
                success: true,
                track_index: Some(track_index),
                error: None,
            })
        }
    }

    fn clip(start: f64, end: f64) -> ClipInterval {
        ClipInterval::new(start, end)
    }

    #[tokio::test]
    async fn test_first_free_track_wins() {
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![]], true);
        let decision = PlacementPlanner::new().plan(&host, 6.0).await.unwrap();
        assert_eq!(
            decision,
            PlacementDecision {
                track_index: 1,
                created_new_track: false,
                conflict_avoided: true
            }
        );
    }

    #[tokio::test]
    async fn test_track_zero_when_free() {
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![]], true);
        let decision = PlacementPlanner::new().plan(&host, 20.0).await.unwrap();
        assert_eq!(decision.track_index, 0);
        assert!(!decision.conflict_avoided);
    }

    #[tokio::test]
    async fn test_buffer_counts_as_overlap() {
        // 8.05 is within the 0.1 s buffer after the clip end
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![]], true);
        let decision = PlacementPlanner::new().plan(&host, 8.05).await.unwrap();
        assert_eq!(decision.track_index, 1);
    }

    #[tokio::test]
    async fn test_all_conflicting_creates_track() {
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![clip(4.0, 9.0)]], true);
        let decision = PlacementPlanner::new().plan(&host, 6.0).await.unwrap();
        assert_eq!(
            decision,
            PlacementDecision {
                track_index: 2,
                created_new_track: true,
                conflict_avoided: true
            }
        );
        assert!(host.created.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_creation_failure_falls_back_to_last_track() {
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![clip(4.0, 9.0)]], false);
        let decision = PlacementPlanner::new().plan(&host, 6.0).await.unwrap();
        assert_eq!(
            decision,
            PlacementDecision {
                track_index: 1,
                created_new_track: false,
                conflict_avoided: false
            }
        );
    }

    #[tokio::test]
    async fn test_empty_layout_targets_track_zero() {
        let host = FakeTimeline::new(vec![], true);
        let decision = PlacementPlanner::new().plan(&host, 0.0).await.unwrap();
        assert_eq!(decision.track_index, 0);
        assert!(!decision.created_new_track);
    }

    #[tokio::test]
    async fn test_determinism() {
        let host = FakeTimeline::new(vec![vec![clip(5.0, 8.0)], vec![]], true);
        let planner = PlacementPlanner::new();
        let a = planner.plan(&host, 6.0).await.unwrap();
        let b = planner.plan(&host, 6.0).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_select_free_track_pure() {
        let layout = vec![vec![clip(0.0, 2.0)], vec![clip(3.0, 4.0)]];
        assert_eq!(select_free_track(&layout, 1.0), Some(1));
        assert_eq!(select_free_track(&layout, 3.5), Some(0));
        assert_eq!(select_free_track(&layout, 5.0), Some(0));
        let crowded = vec![vec![clip(0.0, 10.0)], vec![clip(0.0, 10.0)]];
        assert_eq!(select_free_track(&crowded, 5.0), None);
    }
}
