// 📊 Catalog Summary - counts per category and per source

use crate::category_lookup::UNCATEGORIZED;
use crate::deduplication::MasterCatalog;
use crate::record::SourceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Label for records that reached the report without a category
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub generated_at: DateTime<Utc>,

    /// Records in the master list
    pub total: usize,

    /// (category, count), most common first, ties by label
    pub by_category: Vec<(String, usize)>,

    /// Records labelled "Uncategorized"
    pub uncategorized: usize,

    /// Master-list records per provenance tag
    pub by_source: BTreeMap<SourceKind, usize>,

    /// Master-list records with no provenance tag
    pub untagged: usize,

    /// Input collection sizes, before deduplication
    pub input_sizes: BTreeMap<SourceKind, usize>,

    pub duplicates_dropped: usize,

    /// SHA-256 of the master list
    pub fingerprint: String,
}

impl CatalogSummary {
    /// Tally a finished catalog. `input_sizes` are the pre-merge collection sizes.
    pub fn build(catalog: &MasterCatalog, input_sizes: &[(SourceKind, usize)]) -> Self {
        let mut category_counts: HashMap<&str, usize> = HashMap::new();
        let mut by_source = BTreeMap::new();
        let mut untagged = 0;

        for record in catalog.records() {
            let category = if record.category.is_empty() {
                UNKNOWN_CATEGORY
            } else {
                record.category.as_str()
            };
            *category_counts.entry(category).or_insert(0) += 1;

            match record.source {
                Some(source) => *by_source.entry(source).or_insert(0) += 1,
                None => untagged += 1,
            }
        }

        let mut by_category: Vec<(String, usize)> = category_counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let uncategorized = by_category
            .iter()
            .find(|(label, _)| label == UNCATEGORIZED)
            .map(|(_, count)| *count)
            .unwrap_or(0);

        let mut sizes = BTreeMap::new();
        for (source, count) in input_sizes {
            *sizes.entry(*source).or_insert(0) += count;
        }

        CatalogSummary {
            generated_at: Utc::now(),
            total: catalog.len(),
            by_category,
            uncategorized,
            by_source,
            untagged,
            input_sizes: sizes,
            duplicates_dropped: catalog.duplicates_dropped,
            fingerprint: catalog.fingerprint(),
        }
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.by_category
            .iter()
            .find(|(label, _)| label == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Multi-line, human-readable summary
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Generated at: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("Total items in master list: {}\n", self.total));
        out.push_str(&format!("Duplicates dropped: {}\n", self.duplicates_dropped));

        out.push_str("\nItems per category:\n");
        for (category, count) in &self.by_category {
            out.push_str(&format!("   {}: {}\n", category, count));
        }

        if self.uncategorized > 0 {
            out.push_str(&format!("\n⚠️  Uncategorized items: {}\n", self.uncategorized));
        } else {
            out.push_str("\n✓ All items are categorized\n");
        }

        out.push_str("\nItems by source (input → kept):\n");
        for source in SourceKind::all() {
            let input = self.input_sizes.get(&source).copied().unwrap_or(0);
            let kept = self.by_source.get(&source).copied().unwrap_or(0);
            out.push_str(&format!("   {:<22} {:>6} → {}\n", format!("{}:", source.name()), input, kept));
        }
        if self.untagged > 0 {
            out.push_str(&format!("   {:<22} {:>6}\n", "untagged:", self.untagged));
        }

        out.push_str(&format!("\nFingerprint: {}\n", self.fingerprint));
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================
