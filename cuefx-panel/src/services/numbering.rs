//! Variant number assignment
//!
//! Freshly generated assets get the next number in their prompt family.
//! Family membership is mutual substring containment rather than exact
//! equality, so minor rephrasings of "the same" sound keep one numbering
//! sequence.

use crate::services::filename_codec::{bidirectional_contains, normalize_prompt};
use crate::types::Catalog;

/// Compute the next variant number for `prompt_text` given the current
/// catalog. Returns 1 when no related record exists.
pub fn next_variant(prompt_text: &str, catalog: &Catalog) -> u32 {
    let target = normalize_prompt(prompt_text);

    let highest = catalog
        .records()
        .iter()
        .filter(|r| bidirectional_contains(&r.prompt_text, &target))
        .map(|r| r.variant_number)
        .max();

    match highest {
        None => 1,
        Some(n) => n + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetOrigin, AssetRecord};
    use std::path::PathBuf;

    fn record(prompt: &str, n: u32) -> AssetRecord {
        AssetRecord {
            filename: format!("{}_{}.mp3", prompt.replace(' ', "_"), n),
            prompt_text: prompt.to_string(),
            variant_number: n,
            timestamp: String::new(),
            location_path: PathBuf::from("/sfx"),
            library_bin_path: None,
            origin: AssetOrigin::Filesystem,
        }
    }

    #[test]
    fn test_empty_catalog_starts_at_one() {
        assert_eq!(next_variant("explosion", &Catalog::new(vec![])), 1);
    }

    #[test]
    fn test_monotonic_increment() {
        let catalog = Catalog::new(vec![record("explosion", 1), record("explosion", 2)]);
        assert_eq!(next_variant("explosion", &catalog), 3);
    }

    #[test]
    fn test_unrelated_prompts_do_not_count() {
        let catalog = Catalog::new(vec![record("thunder", 7)]);
        assert_eq!(next_variant("explosion", &catalog), 1);
    }

    #[test]
    fn test_fuzzy_family_grouping() {
        // "rain" and "rain on car roof" share one numbering sequence
        let catalog = Catalog::new(vec![record("rain on car roof", 4)]);
        assert_eq!(next_variant("rain", &catalog), 5);
        assert_eq!(next_variant("rain on car roof at night", &catalog), 5);
    }

    #[test]
    fn test_unnumbered_records_yield_one() {
        // A related record with no recovered number still marks the family
        let catalog = Catalog::new(vec![record("explosion", 0)]);
        assert_eq!(next_variant("explosion", &catalog), 1);
    }

    #[test]
    fn test_prompt_normalization_applies() {
        let catalog = Catalog::new(vec![record("dog barking", 2)]);
        assert_eq!(next_variant("  Dog_Barking ", &catalog), 3);
    }
}
