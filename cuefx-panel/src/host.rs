//! Host bridge collaborator contracts
//!
//! The panel is embedded inside a third-party timeline editor. Everything it
//! needs from the host is expressed as these two traits; the concrete
//! transport (scripting bridge, IPC) lives outside this crate. Services are
//! generic over the traits so tests can inject scripted fakes.

use crate::types::{EditContext, InsertOutcome, LibraryBinAsset, TrackLayout};
use std::path::Path;
use thiserror::Error;

/// Host bridge failures
#[derive(Debug, Error)]
pub enum HostError {
    /// The bridge itself is unreachable or timed out
    #[error("Host communication failure: {0}")]
    Communication(String),

    /// The host understood the request and refused it
    #[error("Host rejected request: {0}")]
    Rejected(String),
}

/// Access to the host's internal asset library bin
pub trait LibraryProvider {
    /// List sound assets organized in the host's library bin.
    ///
    /// Entries already carry prompt/number/timestamp metadata; the catalog
    /// builder maps them into records directly.
    fn query_bin_assets(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<LibraryBinAsset>, HostError>>;
}

/// Timeline queries and mutations
pub trait TimelineHost {
    /// Current playhead position and selection bounds
    fn edit_context(&self) -> impl std::future::Future<Output = Result<EditContext, HostError>>;

    /// Occupied clip intervals per audio track, in track order
    fn track_layout(&self) -> impl std::future::Future<Output = Result<TrackLayout, HostError>>;

    /// Append a new audio track after the existing ones
    fn create_track(&self) -> impl std::future::Future<Output = Result<(), HostError>>;

    /// Insert the asset at `time_seconds` on the given track index
    fn insert_asset(
        &self,
        path: &Path,
        time_seconds: f64,
        track_index: usize,
    ) -> impl std::future::Future<Output = Result<InsertOutcome, HostError>>;
}
