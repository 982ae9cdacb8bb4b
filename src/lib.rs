// Food Catalog - Core Library
// Matching, classification and merge engine behind the food-catalog CLI

pub mod record;
pub mod similarity;     // Approximate similarity scorers
pub mod matcher;        // Whitelist matching ladder
pub mod rules;          // Keyword category rules
pub mod category_lookup; // Identifier → USDA category
pub mod sources;        // Raw USDA dataset shapes
pub mod nutrients;
pub mod extract;        // Whitelist extraction job
pub mod deduplication;  // Master list merge
pub mod report;
pub mod observer;
pub mod config;
pub mod loader;
pub mod pipeline;

// Re-export commonly used types
pub use record::{FoodRecord, Macros, SourceKind, tag_source};
pub use similarity::{
    SimilarityScorer, TokenSetRatio, PartialRatio, TokenSortRatio, NormalizedLevenshtein,
    default_scorers, extract_one,
};
pub use matcher::{
    Matcher, MatchResult, MatchTier, BestMatches,
    normalize_text, containment_score,
};
pub use rules::{
    CategoryRule, RuleEngine, ClassificationResult, DEFAULT_CATEGORY,
};
pub use category_lookup::{
    CategoryLookup, LegacyFoodRow, FoodCategoryRow, UNCATEGORIZED,
};
pub use sources::{LegacyFood, SurveyFood, FoodNutrient, NutrientInfo};
pub use nutrients::NutrientMap;
pub use extract::{Extractor, ExtractionOutcome};
pub use deduplication::{DeduplicationEngine, MasterCatalog};
pub use report::CatalogSummary;
pub use observer::{PipelineObserver, TracingObserver, NoopObserver};
pub use config::PipelineConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
