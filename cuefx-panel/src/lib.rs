//! cuefx-panel: asset library and placement engine
//!
//! Core of a host-embedded sound effect panel: catalogs generated assets on
//! disk and in the host's library bin, recovers prompt metadata from legacy
//! filename encodings, drives a keyboard lookup mode, calls the remote
//! generation service, and places resulting clips on free timeline tracks.

pub mod error;
pub mod host;
pub mod services;
pub mod types;

pub use error::{PanelError, PanelResult};
pub use types::{
    AssetOrigin, AssetRecord, Catalog, ClipInterval, EditContext, GenerationRequest,
    InsertOutcome, LibraryBinAsset, PlacementDecision, TrackLayout,
};
