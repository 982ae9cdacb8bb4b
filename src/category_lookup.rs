// 🗂️ Category Lookup - identifier → USDA category, no text matching
// Survey-food table first, then the two-hop legacy table, then "Uncategorized"

use crate::record::FoodRecord;
use crate::sources::SurveyFood;
use serde::Deserialize;
use std::collections::HashMap;

/// Label when neither table knows the identifier
pub const UNCATEGORIZED: &str = "Uncategorized";

// ============================================================================
// CSV ROWS
// ============================================================================

/// Row of SR Legacy `food.csv` (other columns ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyFoodRow {
    #[serde(default)]
    pub fdc_id: String,
    #[serde(default)]
    pub food_category_id: String,
}

/// Row of SR Legacy `food_category.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct FoodCategoryRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// LOOKUP
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    /// fdcId → WWEIA category description (direct)
    survey_categories: HashMap<String, String>,

    /// fdcId → food_category_id (legacy, first hop)
    legacy_group_by_fdc: HashMap<String, String>,

    /// food_category_id → description (legacy, second hop)
    group_descriptions: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the three sources; blank keys or values are skipped
    pub fn build(
        survey_foods: &[SurveyFood],
        legacy_rows: &[LegacyFoodRow],
        category_rows: &[FoodCategoryRow],
    ) -> Self {
        let mut lookup = CategoryLookup::new();

        for row in category_rows {
            lookup.add_group(&row.id, &row.description);
        }
        for row in legacy_rows {
            lookup.add_legacy(&row.fdc_id, &row.food_category_id);
        }
        for food in survey_foods {
            lookup.add_survey(&food.fdc_key(), &food.category_description());
        }

        lookup
    }

    pub fn add_survey(&mut self, fdc_id: &str, description: &str) {
        insert_trimmed(&mut self.survey_categories, fdc_id, description);
    }

    pub fn add_legacy(&mut self, fdc_id: &str, group_id: &str) {
        insert_trimmed(&mut self.legacy_group_by_fdc, fdc_id, group_id);
    }

    pub fn add_group(&mut self, group_id: &str, description: &str) {
        insert_trimmed(&mut self.group_descriptions, group_id, description);
    }

    /// Category for an identifier, or None if neither table resolves it
    pub fn lookup(&self, fdc_id: &str) -> Option<&str> {
        let fdc_id = fdc_id.trim();
        if fdc_id.is_empty() {
            return None;
        }

        if let Some(description) = self.survey_categories.get(fdc_id) {
            return Some(description.as_str());
        }

        self.legacy_group_by_fdc
            .get(fdc_id)
            .and_then(|group| self.group_descriptions.get(group))
            .map(String::as_str)
    }

    /// Category for an identifier, falling back to "Uncategorized"
    pub fn assign(&self, fdc_id: &str) -> String {
        self.lookup(fdc_id).unwrap_or(UNCATEGORIZED).to_string()
    }

    /// Copy of the collection with every category stamped from its fdcId.
    /// Input records are left untouched.
    pub fn categorize(&self, records: &[FoodRecord]) -> Vec<FoodRecord> {
        records
            .iter()
            .map(|record| {
                let mut copy = record.clone();
                copy.category = self.assign(&record.fdc_key());
                copy
            })
            .collect()
    }

    /// (survey, legacy first hop, legacy groups) table sizes
    pub fn sizes(&self) -> (usize, usize, usize) {
        (
            self.survey_categories.len(),
            self.legacy_group_by_fdc.len(),
            self.group_descriptions.len(),
        )
    }
}

fn insert_trimmed(map: &mut HashMap<String, String>, key: &str, value: &str) {
    let key = key.trim();
    let value = value.trim();
    if !key.is_empty() && !value.is_empty() {
        map.insert(key.to_string(), value.to_string());
    }
}

/// Count of records carrying the fallback label
pub fn count_uncategorized(records: &[FoodRecord]) -> usize {
    records.iter().filter(|r| r.category == UNCATEGORIZED).count()
}

// ============================================================================
// TESTS
// ============================================================================
