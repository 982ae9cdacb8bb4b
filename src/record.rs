// 🥕 Food Record - one nutrition entry flowing through the pipeline
// Core fields are typed, anything else the source carried rides along in `extra`

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// SOURCE KIND (provenance)
// ============================================================================

/// Which input collection a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Whitelist matched against the SR Legacy nutrient database
    SrLegacy,
    /// Survey foods added automatically
    FnddsAdded,
    /// Survey foods added by hand
    FnddsManual,
}

impl SourceKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::SrLegacy => "SR Legacy (local)",
            SourceKind::FnddsAdded => "FNDDS auto-added",
            SourceKind::FnddsManual => "FNDDS manual",
        }
    }

    /// All sources, in merge precedence order
    pub fn all() -> [SourceKind; 3] {
        [SourceKind::SrLegacy, SourceKind::FnddsAdded, SourceKind::FnddsManual]
    }
}

// ============================================================================
// MACROS
// ============================================================================

/// Macronutrients per 100g. `None` means unknown, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Macros {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

// ============================================================================
// FOOD RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Display description, as provided by the source
    #[serde(default)]
    pub name: String,

    /// Normalized lookup key; derived from `name` when absent
    #[serde(rename = "searchKey", default, skip_serializing_if = "Option::is_none")]
    pub search_key: Option<String>,

    /// External identifier (number or string, opaque)
    #[serde(rename = "fdcId", default, skip_serializing_if = "Option::is_none")]
    pub fdc_id: Option<serde_json::Value>,

    /// Category label; empty until a classifier stamps it (null reads as empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,

    #[serde(default)]
    pub calories: Option<f64>,

    #[serde(default)]
    pub protein: Option<f64>,

    #[serde(default)]
    pub carbs: Option<f64>,

    #[serde(default)]
    pub fat: Option<f64>,

    /// Provenance tag, stamped when the collection is loaded or produced
    #[serde(rename = "provenance", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,

    /// Fields we don't model, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FoodRecord {
    /// Create a record with just a name
    pub fn new(name: impl Into<String>) -> Self {
        FoodRecord {
            name: name.into(),
            search_key: None,
            fdc_id: None,
            category: String::new(),
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
            source: None,
            extra: BTreeMap::new(),
        }
    }

    /// Builder pattern: add search key
    pub fn with_search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = Some(key.into());
        self
    }

    /// Builder pattern: add category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder pattern: add external identifier
    pub fn with_fdc_id(mut self, fdc_id: serde_json::Value) -> Self {
        self.fdc_id = Some(fdc_id);
        self
    }

    /// Builder pattern: add macros
    pub fn with_macros(mut self, macros: Macros) -> Self {
        self.calories = macros.calories;
        self.protein = macros.protein;
        self.carbs = macros.carbs;
        self.fat = macros.fat;
        self
    }

    /// Builder pattern: add provenance
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Identifier rendered as a lookup key ("" when absent).
    /// Numbers render in decimal, strings are trimmed.
    pub fn fdc_key(&self) -> String {
        match &self.fdc_id {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Dedup/sort key: trimmed, lowercased searchKey, else name
    pub fn derived_key(&self) -> String {
        let key = self
            .search_key
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .unwrap_or_default();

        if !key.is_empty() {
            return key;
        }

        self.name.trim().to_lowercase()
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stamp provenance on a whole collection
pub fn tag_source(records: &mut [FoodRecord], source: SourceKind) {
    for record in records.iter_mut() {
        record.source = Some(source);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_key_prefers_search_key() {
        let record = FoodRecord::new("Bananas, raw").with_search_key("  Banana ");
        assert_eq!(record.derived_key(), "banana");
    }

    #[test]
    fn test_derived_key_falls_back_to_name() {
        let record = FoodRecord::new("  Apple  ").with_search_key("   ");
        assert_eq!(record.derived_key(), "apple");

        let record = FoodRecord::new("");
        assert_eq!(record.derived_key(), "");
    }

    #[test]
    fn test_fdc_key_renders_numbers_and_strings() {
        assert_eq!(FoodRecord::new("a").with_fdc_id(json!(171705)).fdc_key(), "171705");
        assert_eq!(FoodRecord::new("a").with_fdc_id(json!(" 42 ")).fdc_key(), "42");
        assert_eq!(FoodRecord::new("a").fdc_key(), "");
    }

    #[test]
    fn test_deserialize_preserves_extra_fields() {
        let raw = json!({
            "name": "Milk, whole",
            "searchKey": "milk",
            "fdcId": 2705385,
            "calories": 61.0,
            "protein": null,
            "servingSize": "1 cup"
        });

        let record: FoodRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.search_key.as_deref(), Some("milk"));
        assert_eq!(record.calories, Some(61.0));
        assert_eq!(record.protein, None);
        assert_eq!(record.category, "");
        assert_eq!(record.extra.get("servingSize"), Some(&json!("1 cup")));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["servingSize"], json!("1 cup"));
        assert_eq!(back["fdcId"], json!(2705385));
    }

    #[test]
    fn test_null_category_reads_as_empty() {
        let record: FoodRecord =
            serde_json::from_value(json!({ "name": "Boba tea", "fdcId": 1, "category": null })).unwrap();
        assert_eq!(record.category, "");
        assert!(!record.is_categorized());
    }

    #[test]
    fn test_tag_source() {
        let mut records = vec![FoodRecord::new("a"), FoodRecord::new("b")];
        tag_source(&mut records, SourceKind::FnddsManual);
        assert!(records.iter().all(|r| r.source == Some(SourceKind::FnddsManual)));
    }
}
