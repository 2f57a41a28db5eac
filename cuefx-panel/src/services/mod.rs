//! Service layer: catalog construction, lookup, generation, and placement

pub mod catalog_builder;
pub mod filename_codec;
pub mod generation_client;
pub mod lookup;
pub mod numbering;
pub mod orchestrator;
pub mod placement_planner;
pub mod scan_cache;
pub mod search_roots;

pub use catalog_builder::CatalogBuilder;
pub use generation_client::{GenerationClient, HttpTransport, SfxTransport};
pub use lookup::{LookupPhase, LookupSession};
pub use orchestrator::{Orchestrator, PanelPhase, SubmitReport, SubmitRequest};
pub use placement_planner::PlacementPlanner;
pub use scan_cache::ScanCache;
