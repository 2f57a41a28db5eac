//! Search root resolution
//!
//! Callers used to each apply their own "custom folder wins" fallback; the
//! precedence now lives in one pure function consumed by the catalog
//! builder and the orchestrator's save step.

use std::path::{Path, PathBuf};

/// Conventional folders scanned when no custom folder is configured, and in
/// addition to it when one is
pub fn conventional_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(docs) = dirs::document_dir() {
        roots.push(docs.join("cuefx").join("generated"));
    }
    if let Some(data) = dirs::data_local_dir() {
        roots.push(data.join("cuefx").join("generated"));
    }
    roots
}

/// Resolve the ordered list of directories to scan.
///
/// The custom folder, when configured, comes first; conventional defaults
/// follow. Duplicates are dropped while preserving order.
pub fn resolve_search_roots(custom: Option<&Path>, conventional: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::with_capacity(conventional.len() + 1);
    if let Some(path) = custom {
        roots.push(path.to_path_buf());
    }
    for root in conventional {
        if !roots.iter().any(|r| r == root) {
            roots.push(root.clone());
        }
    }
    roots
}

/// Directory freshly generated assets are written to: the custom folder if
/// set, otherwise the first conventional root
pub fn primary_asset_dir(custom: Option<&Path>, conventional: &[PathBuf]) -> Option<PathBuf> {
    resolve_search_roots(custom, conventional).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_folder_comes_first() {
        let conventional = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        let roots = resolve_search_roots(Some(Path::new("/custom")), &conventional);
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/custom"),
                PathBuf::from("/a"),
                PathBuf::from("/b")
            ]
        );
    }

    #[test]
    fn test_no_custom_folder() {
        let conventional = vec![PathBuf::from("/a")];
        let roots = resolve_search_roots(None, &conventional);
        assert_eq!(roots, vec![PathBuf::from("/a")]);
    }

    #[test]
    fn test_duplicate_custom_folder_not_repeated() {
        let conventional = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        let roots = resolve_search_roots(Some(Path::new("/a")), &conventional);
        assert_eq!(roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_primary_asset_dir_prefers_custom() {
        let conventional = vec![PathBuf::from("/a")];
        assert_eq!(
            primary_asset_dir(Some(Path::new("/custom")), &conventional),
            Some(PathBuf::from("/custom"))
        );
        assert_eq!(
            primary_asset_dir(None, &conventional),
            Some(PathBuf::from("/a"))
        );
    }
}
