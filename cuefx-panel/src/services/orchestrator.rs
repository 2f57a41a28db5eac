//! Submit pipeline state machine
//!
//! Drives one prompt submission end to end: validate, resolve timing from
//! the host's edit context, call the generation service, save the audio
//! bytes under an encoded filename, and place the clip on a free track.
//! At most one submission is in flight; duplicates are rejected outright
//! rather than queued. Every failure path releases the guard, so the next
//! submission can start immediately.
//!
//! The current phase is published through a watch channel so a UI layer can
//! render status without polling. After a failure the channel reads
//! `Failed` until the next submission or placement begins.

use crate::error::{PanelError, PanelResult};
use crate::host::{LibraryProvider, TimelineHost};
use crate::services::filename_codec::encode;
use crate::services::generation_client::{GenerationClient, SfxTransport};
use crate::services::numbering::next_variant;
use crate::services::placement_planner::PlacementPlanner;
use crate::services::scan_cache::ScanCache;
use crate::types::{GenerationRequest, InsertOutcome, PlacementDecision};
use cuefx_common::config::DURATION_RANGE_SECONDS;
use cuefx_common::time::Clock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use uuid::Uuid;

/// Duration used when the user has not set one explicitly
pub const DEFAULT_DURATION_SECONDS: f64 = 5.0;

/// Pipeline phase, published for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Idle,
    Validating,
    ResolvingTiming,
    Generating,
    Saving,
    Placing,
    Failed,
}

/// One prompt submission as entered in the panel
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub prompt: String,
    /// `None` falls back to [`DEFAULT_DURATION_SECONDS`]
    pub duration_seconds: Option<f64>,
    /// Derive duration and start time from the host's selection bounds
    pub use_selection_bounds: bool,
    pub influence: f64,
}

/// What a successful submission produced, for the caller's status line
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub filename: String,
    pub saved_path: PathBuf,
    pub placement: PlacementDecision,
    pub inserted_at_seconds: f64,
}

/// Owns the submit pipeline and its collaborators
pub struct Orchestrator<H, L, T, C> {
    host: H,
    cache: ScanCache<L, C>,
    client: GenerationClient<T>,
    planner: PlacementPlanner,
    asset_dir: PathBuf,
    phase_tx: watch::Sender<PanelPhase>,
    in_flight: AtomicBool,
}

impl<H, L, T, C> Orchestrator<H, L, T, C>
where
    H: TimelineHost,
    L: LibraryProvider,
    T: SfxTransport,
    C: Clock,
{
    pub fn new(
        host: H,
        cache: ScanCache<L, C>,
        client: GenerationClient<T>,
        asset_dir: PathBuf,
    ) -> Self {
        let (phase_tx, _) = watch::channel(PanelPhase::Idle);
        Self {
            host,
            cache,
            client,
            planner: PlacementPlanner::new(),
            asset_dir,
            phase_tx,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Watch the pipeline phase; starts at `Idle`
    pub fn subscribe_phase(&self) -> watch::Receiver<PanelPhase> {
        self.phase_tx.subscribe()
    }

    /// Scan cache shared with the lookup session
    pub fn cache(&self) -> &ScanCache<L, C> {
        &self.cache
    }

    /// Run one submission to completion.
    ///
    /// Rejected without leaving idle when the prompt is blank or another
    /// submission is still in flight.
    pub async fn submit(&self, request: SubmitRequest) -> PanelResult<SubmitReport> {
        let prompt = request.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(PanelError::Fatal("Prompt is empty".to_string()));
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PanelError::Fatal(
                "A generation is already in progress, wait for it to finish".to_string(),
            ));
        }

        let submit_id = Uuid::new_v4();
        tracing::info!(submit_id = %submit_id, prompt = %prompt, "Submission accepted");

        let result = self.run_submit(&prompt, &request).await;
        match &result {
            Ok(report) => {
                tracing::info!(
                    submit_id = %submit_id,
                    filename = %report.filename,
                    track_index = report.placement.track_index,
                    "Submission complete"
                );
            }
            Err(e) => {
                tracing::error!(submit_id = %submit_id, error = %e, "Submission failed");
            }
        }
        // Failed stays visible on the phase feed until the next submission
        // starts; the guard is released either way
        self.set_phase(match &result {
            Ok(_) => PanelPhase::Idle,
            Err(_) => PanelPhase::Failed,
        });
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_submit(
        &self,
        prompt: &str,
        request: &SubmitRequest,
    ) -> PanelResult<SubmitReport> {
        self.set_phase(PanelPhase::Validating);

        self.set_phase(PanelPhase::ResolvingTiming);
        let context = self.host.edit_context().await.map_err(PanelError::from)?;
        let explicit = request.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS);
        let (insert_at, duration) = if request.use_selection_bounds {
            match context.selection {
                Some((start, end)) if end > start => {
                    let span = end - start;
                    if span > DURATION_RANGE_SECONDS.1 {
                        return Err(PanelError::Fatal(format!(
                            "Selection spans {span:.1} s, longer than the {} s generation limit",
                            DURATION_RANGE_SECONDS.1
                        )));
                    }
                    (start, span)
                }
                // No usable bounds: behave as a plain playhead submission
                _ => (context.playhead_seconds, explicit),
            }
        } else {
            (context.playhead_seconds, explicit)
        };

        self.set_phase(PanelPhase::Generating);
        let gen_request = GenerationRequest::new(prompt, duration, request.influence);
        let audio = self.client.generate(&gen_request).await?;

        self.set_phase(PanelPhase::Saving);
        // Numbering must see every asset already on disk, including one
        // saved by the previous submit moments ago; a stale cached catalog
        // would recompute the same variant and overwrite it
        let catalog = self.cache.get(true).await;
        let variant = next_variant(prompt, &catalog);
        let filename = encode(prompt, variant);
        tokio::fs::create_dir_all(&self.asset_dir).await?;
        let saved_path = self.asset_dir.join(&filename);
        tokio::fs::write(&saved_path, &audio).await?;
        tracing::debug!(path = %saved_path.display(), bytes = audio.len(), "Asset saved");

        self.set_phase(PanelPhase::Placing);
        let placement = self
            .planner
            .plan(&self.host, insert_at)
            .await
            .map_err(PanelError::from)?;
        let outcome = self
            .host
            .insert_asset(&saved_path, insert_at, placement.track_index)
            .await
            .map_err(PanelError::from)?;
        check_insert(outcome)?;

        Ok(SubmitReport {
            filename,
            saved_path,
            placement,
            inserted_at_seconds: insert_at,
        })
    }

    /// Place an already cataloged asset at the current edit position.
    ///
    /// Triggered by a lookup confirmation; the filename comes from the
    /// session's filtered list.
    pub async fn place_existing(&self, filename: &str) -> PanelResult<PlacementDecision> {
        let result = self.run_place(filename).await;
        self.set_phase(match &result {
            Ok(_) => PanelPhase::Idle,
            Err(_) => PanelPhase::Failed,
        });
        result
    }

    async fn run_place(&self, filename: &str) -> PanelResult<PlacementDecision> {
        let catalog = self.cache.get(false).await;
        let record = catalog
            .find(filename)
            .ok_or_else(|| PanelError::NotFound(filename.to_string()))?;

        let context = self.host.edit_context().await.map_err(PanelError::from)?;
        let insert_at = context
            .selection
            .map(|(start, _)| start)
            .unwrap_or(context.playhead_seconds);

        self.set_phase(PanelPhase::Placing);
        let placement = self
            .planner
            .plan(&self.host, insert_at)
            .await
            .map_err(PanelError::from)?;
        let outcome = self
            .host
            .insert_asset(&record.location_path, insert_at, placement.track_index)
            .await
            .map_err(PanelError::from)?;
        check_insert(outcome)?;

        tracing::info!(
            filename,
            track_index = placement.track_index,
            insert_at,
            "Existing asset placed"
        );
        Ok(placement)
    }

    fn set_phase(&self, phase: PanelPhase) {
        self.phase_tx.send_replace(phase);
    }
}

fn check_insert(outcome: InsertOutcome) -> PanelResult<()> {
    if outcome.success {
        Ok(())
    } else {
        Err(PanelError::Fatal(format!(
            "Host insert failed: {}",
            outcome.error.unwrap_or_else(|| "unknown".to_string())
        )))
    }
}
