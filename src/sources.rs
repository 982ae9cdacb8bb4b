// 📦 Raw Source Records - shapes of the USDA datasets before matching
// Only the fields the pipeline reads are modelled; everything else is ignored

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// SR LEGACY
// ============================================================================

/// One food from the SR Legacy JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyFood {
    #[serde(default)]
    pub description: String,

    #[serde(rename = "fdcId", default)]
    pub fdc_id: Option<serde_json::Value>,

    #[serde(rename = "foodNutrients", default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient: NutrientInfo,

    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutrientInfo {
    /// Nutrient number, e.g. "208" (some exports use a bare number)
    #[serde(default)]
    pub number: Option<serde_json::Value>,
}

impl NutrientInfo {
    pub fn number_str(&self) -> String {
        match &self.number {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

// ============================================================================
// FNDDS SURVEY FOODS
// ============================================================================

/// One food from the FNDDS survey export (only what the category lookup needs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyFood {
    #[serde(rename = "fdcId", default)]
    pub fdc_id: Option<serde_json::Value>,

    #[serde(rename = "wweiaFoodCategory", default)]
    pub wweia_food_category: Option<serde_json::Value>,
}

impl SurveyFood {
    pub fn fdc_key(&self) -> String {
        match &self.fdc_id {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// WWEIA category description, trimmed ("" when absent or not an object)
    pub fn category_description(&self) -> String {
        self.wweia_food_category
            .as_ref()
            .and_then(|cat| cat.get("wweiaFoodCategoryDescription"))
            .and_then(|desc| desc.as_str())
            .map(|desc| desc.trim().to_string())
            .unwrap_or_default()
    }
}

// ============================================================================
// WRAPPER UNPACKING
// ============================================================================

/// Pull the food array out of a USDA export.
///
/// Accepts `{ "<key>": [...] }`, a bare array, or an object whose first
/// array-valued field holds the foods.
pub fn unwrap_food_array(document: serde_json::Value, key: &str) -> Result<Vec<serde_json::Value>> {
    match document {
        serde_json::Value::Array(items) => Ok(items),
        serde_json::Value::Object(mut map) => {
            if let Some(serde_json::Value::Array(items)) = map.remove(key) {
                return Ok(items);
            }
            for (_, value) in map {
                if let serde_json::Value::Array(items) = value {
                    return Ok(items);
                }
            }
            bail!("No food array found (expected \"{}\")", key)
        }
        _ => bail!("Expected a JSON object or array at top level"),
    }
}

/// Deserialize every element of a food array
pub fn parse_foods<T: serde::de::DeserializeOwned>(items: Vec<serde_json::Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).with_context(|| format!("Malformed food at index {}", index))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_named_key() {
        let doc = json!({ "SRLegacyFoods": [{ "description": "Butter" }] });
        let items = unwrap_food_array(doc, "SRLegacyFoods").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_unwrap_bare_array_and_fallback() {
        let items = unwrap_food_array(json!([1, 2, 3]), "SurveyFoods").unwrap();
        assert_eq!(items.len(), 3);

        let doc = json!({ "meta": "x", "Foods": [{}, {}] });
        let items = unwrap_food_array(doc, "SurveyFoods").unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unwrap_rejects_scalars() {
        assert!(unwrap_food_array(json!("nope"), "SurveyFoods").is_err());
        assert!(unwrap_food_array(json!({ "meta": 1 }), "SurveyFoods").is_err());
    }

    #[test]
    fn test_legacy_food_parsing() {
        let doc = json!([{
            "description": "Cheese, cheddar",
            "fdcId": 173414,
            "foodNutrients": [
                { "nutrient": { "number": "208", "name": "Energy" }, "amount": 403.0 },
                { "nutrient": { "number": 203 }, "amount": 22.87 },
                { "nutrient": {} }
            ]
        }]);

        let foods: Vec<LegacyFood> = parse_foods(unwrap_food_array(doc, "SRLegacyFoods").unwrap()).unwrap();
        let food = &foods[0];
        assert_eq!(food.description, "Cheese, cheddar");
        assert_eq!(food.food_nutrients[0].nutrient.number_str(), "208");
        assert_eq!(food.food_nutrients[1].nutrient.number_str(), "203");
        assert_eq!(food.food_nutrients[2].nutrient.number_str(), "");
        assert_eq!(food.food_nutrients[2].amount, None);
    }

    #[test]
    fn test_survey_food_category() {
        let food: SurveyFood = serde_json::from_value(json!({
            "fdcId": 2705385,
            "wweiaFoodCategory": { "wweiaFoodCategoryDescription": " Milk, whole " }
        }))
        .unwrap();
        assert_eq!(food.fdc_key(), "2705385");
        assert_eq!(food.category_description(), "Milk, whole");

        let food: SurveyFood = serde_json::from_value(json!({
            "fdcId": "12",
            "wweiaFoodCategory": "not an object"
        }))
        .unwrap();
        assert_eq!(food.category_description(), "");
    }
}
