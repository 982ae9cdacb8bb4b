// 🔎 Whitelist Extraction - SR Legacy foods → categorized local food records
// One record per whitelist entry: the highest-confidence source food wins

use crate::matcher::{BestMatches, Matcher};
use crate::nutrients::NutrientMap;
use crate::observer::PipelineObserver;
use crate::record::{FoodRecord, Macros, SourceKind};
use crate::rules::RuleEngine;
use crate::sources::LegacyFood;
use std::collections::HashSet;

/// Default number of source foods between progress notifications
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Converted records between progress notifications
const CONVERT_REPORT_EVERY: usize = 25;

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// One record per matched whitelist entry, in first-matched order
    pub records: Vec<FoodRecord>,

    /// Whitelist entries nothing was kept for, in whitelist order,
    /// followed by entries that normalize to nothing
    pub missing: Vec<String>,

    /// Source foods scanned
    pub processed: usize,

    /// Matched foods dropped for lacking calories
    pub skipped_no_calories: usize,
}

pub struct Extractor<'a> {
    matcher: &'a Matcher,
    rules: &'a RuleEngine,
    nutrients: &'a NutrientMap,

    /// Source foods between progress notifications (0 = never)
    pub progress_interval: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(matcher: &'a Matcher, rules: &'a RuleEngine, nutrients: &'a NutrientMap) -> Self {
        Extractor {
            matcher,
            rules,
            nutrients,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Builder pattern: change progress interval
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn run(&self, foods: &[LegacyFood], observer: &dyn PipelineObserver) -> ExtractionOutcome {
        let mut best: BestMatches<(&LegacyFood, Macros)> = BestMatches::new();
        let mut skipped_no_calories = 0;

        for (idx, food) in foods.iter().enumerate() {
            if self.progress_interval > 0 && (idx + 1) % self.progress_interval == 0 {
                observer.progress(idx + 1, best.len());
            }

            let Some(result) = self.matcher.find(&food.description) else {
                continue;
            };

            let macros = self.nutrients.extract(&food.food_nutrients);
            if macros.calories.is_none() {
                skipped_no_calories += 1;
                continue;
            }

            best.offer(result, (food, macros));
        }

        let mut records = Vec::with_capacity(best.len());
        let mut matched_entries = HashSet::new();

        for (result, (food, macros)) in best.into_inner() {
            let category = self.rules.classify_match(&food.description, &result.entry);

            let mut record = FoodRecord::new(food.description.clone())
                .with_category(category.category)
                .with_macros(macros)
                .with_source(SourceKind::SrLegacy);
            record.fdc_id = food.fdc_id.clone();

            records.push(record);
            matched_entries.insert(result.entry);

            if records.len() % CONVERT_REPORT_EVERY == 0 {
                observer.converted(records.len(), &food.description);
            }
        }

        let mut missing: Vec<String> = self
            .matcher
            .entries()
            .iter()
            .filter(|entry| !matched_entries.contains(entry.as_str()))
            .cloned()
            .collect();

        for entry in self.matcher.dropped() {
            observer.notice(&format!("whitelist entry has no matchable text: {:?}", entry));
            missing.push(entry.clone());
        }

        ExtractionOutcome {
            records,
            missing,
            processed: foods.len(),
            skipped_no_calories,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::RecordingObserver;
    use crate::observer::NoopObserver;
    use serde_json::json;

    fn food(description: &str, fdc_id: i64, calories: Option<f64>) -> LegacyFood {
        let mut nutrients = vec![json!({ "nutrient": { "number": "203" }, "amount": 1.5 })];
        if let Some(kcal) = calories {
            nutrients.push(json!({ "nutrient": { "number": "208" }, "amount": kcal }));
        }
        serde_json::from_value(json!({
            "description": description,
            "fdcId": fdc_id,
            "foodNutrients": nutrients,
        }))
        .unwrap()
    }

    fn run(whitelist: &[&str], foods: &[LegacyFood]) -> ExtractionOutcome {
        let matcher = Matcher::new(whitelist.iter().map(|s| s.to_string()));
        let rules = RuleEngine::new();
        let nutrients = NutrientMap::default();
        Extractor::new(&matcher, &rules, &nutrients).run(foods, &NoopObserver)
    }

    #[test]
    fn test_best_candidate_per_entry() {
        let foods = vec![
            food("Apples, dried, sulfured", 1, Some(243.0)),
            food("Apple", 2, Some(52.0)),
            food("Apple juice", 3, Some(46.0)),
        ];

        let outcome = run(&["apple"], &foods);
        assert_eq!(outcome.records.len(), 1);

        let record = &outcome.records[0];
        assert_eq!(record.name, "Apple");
        assert_eq!(record.fdc_id, Some(json!(2)));
        assert_eq!(record.calories, Some(52.0));
        assert_eq!(record.protein, Some(1.5));
        assert_eq!(record.category, "Fruits");
        assert_eq!(record.source, Some(SourceKind::SrLegacy));
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let foods = vec![
            food("Banana, raw", 10, Some(89.0)),
            food("Banana, dehydrated", 11, Some(346.0)),
        ];

        let outcome = run(&["banana"], &foods);
        assert_eq!(outcome.records[0].fdc_id, Some(json!(10)));
    }

    #[test]
    fn test_missing_calories_skipped() {
        let foods = vec![food("Kale, raw", 5, None), food("Kale, cooked", 6, Some(28.0))];

        let outcome = run(&["kale", "quinoa"], &foods);
        assert_eq!(outcome.skipped_no_calories, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].fdc_id, Some(json!(6)));
        assert_eq!(outcome.missing, vec!["quinoa".to_string()]);
    }

    #[test]
    fn test_category_comes_from_whitelist_entry() {
        // description says "Chicken", entry is the pizza
        let foods = vec![food("Pizza, chicken topping", 7, Some(250.0))];
        let outcome = run(&["pizza"], &foods);
        assert_eq!(outcome.records[0].category, "Pizza");
    }

    #[test]
    fn test_output_in_first_matched_order() {
        let foods = vec![
            food("Salmon, raw", 1, Some(208.0)),
            food("Rice, white", 2, Some(130.0)),
            food("Salmon", 3, Some(200.0)),
        ];

        let outcome = run(&["rice", "salmon"], &foods);
        let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Salmon", "Rice, white"]);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_unmatchable_entries_reported_missing() {
        let foods = vec![food("Kale, raw", 5, Some(35.0))];
        let matcher = Matcher::new(vec!["--", "kale"]);
        let rules = RuleEngine::new();
        let nutrients = NutrientMap::default();
        let observer = RecordingObserver::default();

        let outcome = Extractor::new(&matcher, &rules, &nutrients).run(&foods, &observer);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.missing, vec!["--".to_string()]);
        assert!(observer.events.borrow().iter().any(|e| e.starts_with("notice") && e.contains("--")));
    }

    #[test]
    fn test_progress_notifications() {
        let foods: Vec<LegacyFood> = (0..5).map(|i| food("Tofu", i, Some(76.0))).collect();
        let matcher = Matcher::new(vec!["tofu"]);
        let rules = RuleEngine::new();
        let nutrients = NutrientMap::default();
        let observer = RecordingObserver::default();

        let outcome = Extractor::new(&matcher, &rules, &nutrients)
            .with_progress_interval(2)
            .run(&foods, &observer);

        assert_eq!(outcome.processed, 5);
        let events = observer.events.borrow();
        assert_eq!(*events, vec!["progress 2 1".to_string(), "progress 4 1".to_string()]);
    }
}
