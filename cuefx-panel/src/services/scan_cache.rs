//! Time-bounded catalog memoization
//!
//! A single cached slot wraps the catalog builder. A cached catalog is
//! served while younger than the TTL; a rebuild holds the slot lock for its
//! whole duration, so concurrent getters queue on the lock and then observe
//! the freshly stored catalog instead of triggering duplicate scans.
//!
//! Degradation decision lives here: when the host's library bin query fails,
//! the cache logs it and falls back to a filesystem-only catalog rather than
//! failing the lookup.

use crate::host::LibraryProvider;
use crate::services::catalog_builder::CatalogBuilder;
use crate::types::Catalog;
use cuefx_common::time::Clock;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How long a built catalog stays fresh
pub const CATALOG_TTL: Duration = Duration::from_secs(30);

struct CacheState {
    slot: Option<Slot>,
    search_roots: Vec<PathBuf>,
}

struct Slot {
    catalog: Catalog,
    built_at: Instant,
}

/// Single-slot, single-flight scan cache
pub struct ScanCache<L, C> {
    builder: CatalogBuilder,
    library: L,
    clock: C,
    state: Mutex<CacheState>,
}

impl<L: LibraryProvider, C: Clock> ScanCache<L, C> {
    pub fn new(library: L, clock: C, search_roots: Vec<PathBuf>) -> Self {
        Self {
            builder: CatalogBuilder::new(),
            library,
            clock,
            state: Mutex::new(CacheState {
                slot: None,
                search_roots,
            }),
        }
    }

    /// Return the cached catalog, rebuilding when stale, absent, or forced
    pub async fn get(&self, force: bool) -> Catalog {
        let mut state = self.state.lock().await;

        if !force {
            if let Some(slot) = &state.slot {
                let age = self.clock.now() - slot.built_at;
                if age < CATALOG_TTL {
                    tracing::debug!(age_ms = age.as_millis() as u64, "Catalog cache hit");
                    return slot.catalog.clone();
                }
            }
        }

        let catalog = self.rebuild(&state.search_roots).await;
        state.slot = Some(Slot {
            catalog: catalog.clone(),
            built_at: self.clock.now(),
        });
        catalog
    }

    /// Discard the cached catalog regardless of age
    pub async fn invalidate(&self) {
        self.state.lock().await.slot = None;
        tracing::debug!("Catalog cache invalidated");
    }

    /// Replace the watched folders and discard the cached catalog
    pub async fn set_search_roots(&self, search_roots: Vec<PathBuf>) {
        let mut state = self.state.lock().await;
        state.search_roots = search_roots;
        state.slot = None;
        tracing::debug!("Search roots changed, catalog cache invalidated");
    }

    async fn rebuild(&self, search_roots: &[PathBuf]) -> Catalog {
        match self.builder.build(search_roots, &self.library).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Library bin query failed, degrading to filesystem-only catalog"
                );
                self.builder.build_filesystem_only(search_roots)
            }
        }
    }
}
