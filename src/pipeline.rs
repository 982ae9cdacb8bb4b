// 🚚 Pipeline - wires loaders, matcher, classifiers and merger together
// Two entry points mirror the two batch jobs: extract, then categorize + merge

use crate::category_lookup::{count_uncategorized, CategoryLookup};
use crate::config::PipelineConfig;
use crate::deduplication::{DeduplicationEngine, MasterCatalog};
use crate::extract::{ExtractionOutcome, Extractor};
use crate::loader;
use crate::matcher::Matcher;
use crate::observer::PipelineObserver;
use crate::record::{FoodRecord, SourceKind};
use crate::report::CatalogSummary;
use crate::rules::RuleEngine;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

pub const LOCAL_FOODS_FILE: &str = "habitpet_local_foods.json";
pub const MISSING_MATCHES_FILE: &str = "missing_matches.txt";
pub const ADDED_CATEGORIZED_FILE: &str = "habitpet_fndds_added_foods_categorized.json";
pub const MANUAL_CATEGORIZED_FILE: &str = "habitpet_fndds_manual_additions_categorized.json";
pub const MASTER_FILE: &str = "habitpet_master_foods.json";

// ============================================================================
// IN-MEMORY STEPS
// ============================================================================

/// The two survey collections after identifier categorization
#[derive(Debug, Clone)]
pub struct CategorizedSurveyFoods {
    pub added: Vec<FoodRecord>,
    pub manual: Vec<FoodRecord>,
}

pub fn categorize_survey_foods(
    lookup: &CategoryLookup,
    added: &[FoodRecord],
    manual: &[FoodRecord],
    observer: &dyn PipelineObserver,
) -> CategorizedSurveyFoods {
    let added = lookup.categorize(added);
    observer.loaded(
        &format!("FNDDS added foods categorized ({} uncategorized)", count_uncategorized(&added)),
        added.len(),
    );

    let manual = lookup.categorize(manual);
    observer.loaded(
        &format!("FNDDS manual foods categorized ({} uncategorized)", count_uncategorized(&manual)),
        manual.len(),
    );

    CategorizedSurveyFoods { added, manual }
}

/// Merge in precedence order: local, auto-added, manual
pub fn merge_sources(
    local: &[FoodRecord],
    survey: &CategorizedSurveyFoods,
    observer: &dyn PipelineObserver,
) -> (MasterCatalog, CatalogSummary) {
    for record in local.iter().chain(&survey.added).chain(&survey.manual) {
        if !record.is_categorized() {
            observer.notice(&format!("record reached merge without a category: {:?}", record.name));
        }
    }

    let catalog = DeduplicationEngine::new().merge(&[local, &survey.added[..], &survey.manual[..]]);
    observer.loaded("unique items after deduplication", catalog.len());

    let summary = CatalogSummary::build(
        &catalog,
        &[
            (SourceKind::SrLegacy, local.len()),
            (SourceKind::FnddsAdded, survey.added.len()),
            (SourceKind::FnddsManual, survey.manual.len()),
        ],
    );

    (catalog, summary)
}

// ============================================================================
// FILE-BACKED JOBS
// ============================================================================

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T, observer: &dyn PipelineObserver) -> Result<()> {
    let bytes = loader::write_json(path, value)?;
    observer.written(path, bytes);
    Ok(())
}

fn rule_engine(config: &PipelineConfig) -> Result<RuleEngine> {
    match &config.classifier.rules_file {
        Some(path) => RuleEngine::from_file(path),
        None => Ok(RuleEngine::new()),
    }
}

/// Whitelist × SR Legacy → local foods + missing list
pub fn run_extract(config: &PipelineConfig, observer: &dyn PipelineObserver) -> Result<ExtractionOutcome> {
    let paths = &config.paths;

    observer.stage(1, 4, "Loading whitelist");
    let whitelist = loader::load_whitelist(&paths.whitelist)?;
    observer.loaded("whitelist items", whitelist.len());

    observer.stage(2, 4, "Loading SR Legacy foods");
    let foods = loader::load_sr_legacy(&paths.sr_legacy_json)?;
    observer.loaded("SR Legacy foods", foods.len());

    observer.stage(3, 4, "Matching whitelist against SR Legacy");
    let matcher = Matcher::new(whitelist).with_fuzzy_threshold(config.matcher.fuzzy_threshold);
    let rules = rule_engine(config)?;
    let outcome = Extractor::new(&matcher, &rules, &config.nutrients)
        .with_progress_interval(config.matcher.progress_interval)
        .run(&foods, observer);
    observer.loaded("matched foods", outcome.records.len());
    if outcome.skipped_no_calories > 0 {
        observer.notice(&format!(
            "{} matched foods skipped for missing calories",
            outcome.skipped_no_calories
        ));
    }

    observer.stage(4, 4, "Saving results");
    save_json(&paths.output(LOCAL_FOODS_FILE), &outcome.records, observer)?;
    loader::write_lines(&paths.output(MISSING_MATCHES_FILE), &outcome.missing)?;
    observer.loaded("missing whitelist items", outcome.missing.len());

    Ok(outcome)
}

/// Identifier categorization of the survey collections, written to disk
pub fn run_categorize(
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<CategorizedSurveyFoods> {
    let paths = &config.paths;

    observer.stage(1, 3, "Loading survey collections");
    let added = loader::load_food_records(&paths.fndds_added, SourceKind::FnddsAdded)?;
    observer.loaded("FNDDS added foods", added.len());
    let manual = loader::load_food_records(&paths.fndds_manual, SourceKind::FnddsManual)?;
    observer.loaded("FNDDS manual foods", manual.len());

    observer.stage(2, 3, "Building category lookup tables");
    let legacy_rows = loader::load_legacy_food_rows(&paths.sr_food_csv)?;
    let category_rows = loader::load_food_category_rows(&paths.sr_food_category_csv)?;
    let survey_foods = loader::load_survey_foods(&paths.fndds_json)?;
    let lookup = CategoryLookup::build(&survey_foods, &legacy_rows, &category_rows);
    let (survey, legacy, groups) = lookup.sizes();
    observer.loaded("FNDDS category mappings", survey);
    observer.loaded("SR Legacy fdcId mappings", legacy);
    observer.loaded("SR Legacy categories", groups);

    observer.stage(3, 3, "Applying USDA categories");
    let categorized = categorize_survey_foods(&lookup, &added, &manual, observer);
    save_json(&paths.output(ADDED_CATEGORIZED_FILE), &categorized.added, observer)?;
    save_json(&paths.output(MANUAL_CATEGORIZED_FILE), &categorized.manual, observer)?;

    Ok(categorized)
}

/// Categorize, then merge everything into the master list
pub fn run_merge(config: &PipelineConfig, observer: &dyn PipelineObserver) -> Result<CatalogSummary> {
    let survey = run_categorize(config, observer)?;

    observer.stage(1, 1, "Merging all foods into master list");
    let local = loader::load_food_records(&config.paths.local_foods, SourceKind::SrLegacy)?;
    observer.loaded("local foods", local.len());

    let (catalog, summary) = merge_sources(&local, &survey, observer);
    save_json(&config.paths.output(MASTER_FILE), catalog.records(), observer)?;

    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================
