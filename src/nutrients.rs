// 🧪 Nutrient Extraction - nutrient numbers → macro fields

use crate::record::Macros;
use crate::sources::FoodNutrient;
use serde::{Deserialize, Serialize};

/// Nutrient numbers (SR Legacy numbering) for each macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientMap {
    /// Energy (kcal)
    pub calories: String,
    /// Protein
    pub protein: String,
    /// Carbohydrate, by difference
    pub carbs: String,
    /// Total lipid (fat)
    pub fat: String,
}

impl Default for NutrientMap {
    fn default() -> Self {
        NutrientMap {
            calories: "208".to_string(),
            protein: "203".to_string(),
            carbs: "205".to_string(),
            fat: "204".to_string(),
        }
    }
}

impl NutrientMap {
    /// Pull the four macros out of a nutrient list.
    /// Unknown numbers are ignored; a repeated number overwrites the earlier one.
    pub fn extract(&self, nutrients: &[FoodNutrient]) -> Macros {
        let mut macros = Macros::default();

        for entry in nutrients {
            let number = entry.nutrient.number_str();
            if number.is_empty() {
                continue;
            }

            if number == self.calories {
                macros.calories = entry.amount;
            } else if number == self.protein {
                macros.protein = entry.amount;
            } else if number == self.carbs {
                macros.carbs = entry.amount;
            } else if number == self.fat {
                macros.fat = entry.amount;
            }
        }

        macros
    }
}
