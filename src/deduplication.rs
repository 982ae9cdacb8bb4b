// 🔍 Deduplication Engine - merge categorized collections into one master list
// Key = trimmed, lowercased searchKey (else name). First occurrence wins.

use crate::record::FoodRecord;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

// ============================================================================
// MASTER CATALOG
// ============================================================================

/// Deduplicated records, sorted by derived key. Built once, read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterCatalog {
    records: Vec<FoodRecord>,

    /// Records seen across all inputs
    pub input_count: usize,

    /// Records discarded as duplicates
    pub duplicates_dropped: usize,
}

impl MasterCatalog {
    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FoodRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.iter().map(FoodRecord::derived_key).collect()
    }

    /// SHA-256 over the serialized records; equal catalogs hash equal
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in &self.records {
            // FoodRecord always serializes: plain data, string keys
            if let Ok(bytes) = serde_json::to_vec(record) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicationEngine;

impl DeduplicationEngine {
    pub fn new() -> Self {
        DeduplicationEngine
    }

    /// Concatenate the collections in the given order, drop later records
    /// whose key was already seen, then stable-sort by key.
    ///
    /// Records with an empty key are always kept.
    pub fn merge<C>(&self, collections: &[C]) -> MasterCatalog
    where
        C: AsRef<[FoodRecord]>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut kept: Vec<(String, FoodRecord)> = Vec::new();
        let mut input_count = 0;
        let mut duplicates_dropped = 0;

        for collection in collections {
            for record in collection.as_ref() {
                input_count += 1;
                let key = record.derived_key();

                if key.is_empty() {
                    kept.push((key, record.clone()));
                } else if seen.insert(key.clone()) {
                    kept.push((key, record.clone()));
                } else {
                    duplicates_dropped += 1;
                }
            }
        }

        // Vec::sort_by is stable: equal keys keep concatenation order
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        MasterCatalog {
            records: kept.into_iter().map(|(_, record)| record).collect(),
            input_count,
            duplicates_dropped,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceKind;

    fn named(name: &str) -> FoodRecord {
        FoodRecord::new(name).with_category("Other")
    }

    #[test]
    fn test_end_to_end_example() {
        let a = vec![named("Banana").with_search_key("banana")];
        let b = vec![named("BANANA").with_search_key("banana")];
        let c = vec![named("Apple")];

        let catalog = DeduplicationEngine::new().merge(&[a, b, c]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keys(), vec!["apple", "banana"]);
        assert_eq!(catalog.records()[1].name, "Banana");
        assert_eq!(catalog.input_count, 3);
        assert_eq!(catalog.duplicates_dropped, 1);
    }

    #[test]
    fn test_earlier_collection_wins() {
        let a = vec![named("Oats").with_source(SourceKind::SrLegacy)];
        let b = vec![named(" oats ").with_source(SourceKind::FnddsAdded)];

        let catalog = DeduplicationEngine::new().merge(&[a, b]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].source, Some(SourceKind::SrLegacy));
    }

    #[test]
    fn test_search_key_vs_name_collision() {
        // second record has no searchKey; its name derives the same key
        let a = vec![named("Whole milk, 3.25%").with_search_key("Milk")];
        let b = vec![named("milk")];

        let catalog = DeduplicationEngine::new().merge(&[a, b]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].name, "Whole milk, 3.25%");
    }

    #[test]
    fn test_empty_keys_always_kept() {
        let a = vec![named(""), named("  ")];
        let b = vec![named("")];

        let catalog = DeduplicationEngine::new().merge(&[a, b]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.duplicates_dropped, 0);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let a = vec![
            named("zucchini"),
            named("").with_category("first"),
            named("apple"),
            named("").with_category("second"),
        ];

        let catalog = DeduplicationEngine::new().merge(&[a]);
        let categories: Vec<&str> = catalog.records().iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["first", "second", "Other", "Other"]);
        assert_eq!(catalog.keys(), vec!["", "", "apple", "zucchini"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = vec![named("Kiwi"), named("apple").with_search_key("apple"), named("")];
        let b = vec![named("APPLE"), named("banana"), named("")];

        let engine = DeduplicationEngine::new();
        let once = engine.merge(&[a, b]);
        let twice = engine.merge(&[once.records().to_vec()]);

        assert_eq!(once.records(), twice.records());
        assert_eq!(once.fingerprint(), twice.fingerprint());
        assert_eq!(twice.duplicates_dropped, 0);
    }

    #[test]
    fn test_inputs_untouched() {
        let a = vec![named("b"), named("a")];
        let before = a.clone();
        let _ = DeduplicationEngine::new().merge(&[&a[..]]);
        assert_eq!(a, before);
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let engine = DeduplicationEngine::new();
        let one = engine.merge(&[vec![named("apple")]]);
        let two = engine.merge(&[vec![named("apple").with_category("Fruits")]]);
        assert_ne!(one.fingerprint(), two.fingerprint());
        assert_eq!(one.fingerprint().len(), 64);
    }

    #[test]
    fn test_empty_input() {
        let catalog = DeduplicationEngine::new().merge::<Vec<FoodRecord>>(&[]);
        assert!(catalog.is_empty());
    }
}
