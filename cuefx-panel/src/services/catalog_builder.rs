//! Asset catalog builder
//!
//! Walks the configured search roots, recovers metadata from filenames,
//! merges in the host's library bin listing, deduplicates, and sorts the
//! result most-recent-first. Per-entry problems (unreadable folder,
//! unparsable name) are skipped with a warning so the caller always gets a
//! best-effort catalog; only a library-bin communication failure is
//! surfaced.

use crate::host::{HostError, LibraryProvider};
use crate::services::filename_codec;
use crate::types::{AssetOrigin, AssetRecord, Catalog};
use chrono::{DateTime, Utc};
use cuefx_common::time::filename_timestamp;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// System clutter never treated as assets
const IGNORE_PATTERNS: &[&str] = &[".DS_Store", "Thumbs.db", ".git", ".svn", "node_modules"];

/// Builds catalogs from directory scans and the host library bin
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder;

impl CatalogBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the merged catalog.
    ///
    /// Fails only when the library bin query reports a communication
    /// failure; degradation to a filesystem-only catalog is the caller's
    /// decision, not this function's.
    pub async fn build<L: LibraryProvider>(
        &self,
        search_roots: &[PathBuf],
        library: &L,
    ) -> Result<Catalog, HostError> {
        let mut by_filename = HashMap::new();
        self.scan_filesystem(search_roots, &mut by_filename);

        let bin_assets = library.query_bin_assets().await?;
        for asset in bin_assets {
            // Library bin assets are curated; on a filename collision the
            // bin record replaces the filesystem one.
            by_filename.insert(
                asset.filename.clone(),
                AssetRecord {
                    filename: asset.filename,
                    prompt_text: filename_codec::normalize_prompt(&asset.prompt_text),
                    variant_number: asset.variant_number,
                    timestamp: asset.timestamp,
                    location_path: asset.path,
                    library_bin_path: Some(asset.bin_path),
                    origin: AssetOrigin::LibraryBin,
                },
            );
        }

        Ok(finish(by_filename))
    }

    /// Build from the filesystem alone, for callers degrading after a bin
    /// query failure
    pub fn build_filesystem_only(&self, search_roots: &[PathBuf]) -> Catalog {
        let mut by_filename = HashMap::new();
        self.scan_filesystem(search_roots, &mut by_filename);
        finish(by_filename)
    }

    fn scan_filesystem(
        &self,
        search_roots: &[PathBuf],
        out: &mut HashMap<String, AssetRecord>,
    ) {
        for root in search_roots {
            if !root.is_dir() {
                tracing::debug!(root = %root.display(), "Search root missing, skipping");
                continue;
            }

            let walker = WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| !is_ignored(e.file_name().to_string_lossy().as_ref()));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!(error = %e, "Error accessing entry, skipping");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(record) = self.record_for_file(entry.path()) {
                    out.entry(record.filename.clone()).or_insert(record);
                }
            }
        }
    }

    fn record_for_file(&self, path: &Path) -> Option<AssetRecord> {
        let filename = path.file_name()?.to_str()?.to_string();
        let decoded = filename_codec::decode(&filename)?;

        let timestamp = if decoded.timestamp.is_empty() {
            mtime_timestamp(path).unwrap_or_default()
        } else {
            decoded.timestamp
        };

        Some(AssetRecord {
            filename,
            prompt_text: decoded.prompt_text,
            variant_number: decoded.variant_number,
            timestamp,
            location_path: path.to_path_buf(),
            library_bin_path: None,
            origin: AssetOrigin::Filesystem,
        })
    }
}

fn is_ignored(name: &str) -> bool {
    // Exact name match only; an asset whose filename merely contains one of
    // the tokens is still a valid asset
    IGNORE_PATTERNS.iter().any(|p| name == *p)
}

/// Sortable timestamp derived from file metadata, for names that encode none
fn mtime_timestamp(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(filename_timestamp(DateTime::<Utc>::from(modified)))
}

fn finish(by_filename: HashMap<String, AssetRecord>) -> Catalog {
    let mut records: Vec<AssetRecord> = by_filename.into_values().collect();
    // Lexicographic order on the timestamp strings matches chronological
    // order for every encoding in use; most recent first.
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.filename.cmp(&b.filename)));

    tracing::debug!(records = records.len(), "Catalog built");
    Catalog::new(records)
}
