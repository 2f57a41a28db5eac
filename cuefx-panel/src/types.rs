//! Core data types for the asset library and placement engine

use cuefx_common::config::{clamp_duration_seconds, clamp_influence};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Where a cataloged asset was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOrigin {
    /// Found while walking the configured asset folders
    Filesystem,
    /// Listed by the host's internal library bin
    LibraryBin,
}

/// One discovered or newly created sound asset.
///
/// Immutable once created; records carry no identity across scans; the
/// whole catalog is rebuilt wholesale.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Filename including extension; unique key within one catalog
    pub filename: String,
    /// Prompt text, lower-cased, underscores rendered as spaces
    pub prompt_text: String,
    /// Per-prompt sequence number; 0 means no number was recovered
    pub variant_number: u32,
    /// Opaque sortable string from the filename or file metadata
    pub timestamp: String,
    /// Absolute path on disk
    pub location_path: PathBuf,
    /// Host-internal bin path, when the asset came from the library bin
    pub library_bin_path: Option<String>,
    pub origin: AssetOrigin,
}

/// Ordered asset index, most recent first.
///
/// Records live behind an `Arc` so cached catalog hits can be compared by
/// instance identity.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<Vec<AssetRecord>>,
}

impl Catalog {
    /// Wrap an already sorted record list
    pub fn new(records: Vec<AssetRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by its filename key
    pub fn find(&self, filename: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    /// True when both catalogs share the same underlying record storage
    pub fn same_instance(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

/// Library bin listing entry as supplied by the host bridge
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBinAsset {
    pub filename: String,
    pub basename: String,
    pub variant_number: u32,
    pub prompt_text: String,
    pub timestamp: String,
    pub path: PathBuf,
    pub bin_path: String,
}

/// Request body for the remote generation service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub duration_seconds: f64,
    pub influence: f64,
}

impl GenerationRequest {
    /// Build a request, clamping duration and influence into the ranges the
    /// service accepts
    pub fn new(prompt_text: impl Into<String>, duration_seconds: f64, influence: f64) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            duration_seconds: clamp_duration_seconds(duration_seconds),
            influence: clamp_influence(influence),
        }
    }
}

/// A clip occupying `[start, end]` seconds on a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipInterval {
    pub start: f64,
    pub end: f64,
}

impl ClipInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Parallel audio tracks, each a list of occupied clip intervals
pub type TrackLayout = Vec<Vec<ClipInterval>>;

/// Current edit position reported by the host
#[derive(Debug, Clone, Copy)]
pub struct EditContext {
    pub playhead_seconds: f64,
    /// In/out selection bounds, when the user has marked a range
    pub selection: Option<(f64, f64)>,
}

/// Chosen placement for a generated clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementDecision {
    pub track_index: usize,
    pub created_new_track: bool,
    /// False when the clip was forced onto an occupied track
    pub conflict_avoided: bool,
}

/// Result of the host's insert operation
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub success: bool,
    pub track_index: Option<usize>,
    pub error: Option<String>,
}
