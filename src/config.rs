// ⚙️ Pipeline Configuration - TOML file, every key optional

use crate::extract::DEFAULT_PROGRESS_INTERVAL;
use crate::matcher::DEFAULT_FUZZY_THRESHOLD;
use crate::nutrients::NutrientMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up when no --config is given
pub const DEFAULT_CONFIG_PATH: &str = "food-catalog.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub matcher: MatcherConfig,
    pub classifier: ClassifierConfig,
    pub nutrients: NutrientMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// One vocabulary entry per line
    pub whitelist: PathBuf,
    /// SR Legacy JSON export
    pub sr_legacy_json: PathBuf,
    /// SR Legacy food.csv
    pub sr_food_csv: PathBuf,
    /// SR Legacy food_category.csv
    pub sr_food_category_csv: PathBuf,
    /// FNDDS survey foods JSON export
    pub fndds_json: PathBuf,
    /// Output of `extract`, input of `merge`
    pub local_foods: PathBuf,
    pub fndds_added: PathBuf,
    pub fndds_manual: PathBuf,
    /// Where outputs are written
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            whitelist: PathBuf::from("data/habitpet_whitelist.txt"),
            sr_legacy_json: PathBuf::from("data/FoodData_Central_sr_legacy_food_json.json"),
            sr_food_csv: PathBuf::from("data/sr_legacy/food.csv"),
            sr_food_category_csv: PathBuf::from("data/sr_legacy/food_category.csv"),
            fndds_json: PathBuf::from("data/fndds_survey_foods.json"),
            local_foods: PathBuf::from("out/habitpet_local_foods.json"),
            fndds_added: PathBuf::from("data/habitpet_fndds_added_foods.json"),
            fndds_manual: PathBuf::from("data/habitpet_fndds_manual_additions.json"),
            output_dir: PathBuf::from("out"),
        }
    }
}

impl PathsConfig {
    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum fuzzy score (0 - 100)
    pub fuzzy_threshold: f64,
    /// Source foods between progress lines (0 = silent)
    pub progress_interval: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// JSON rules replacing the built-in table
    pub rules_file: Option<PathBuf>,
}

impl PipelineConfig {
    /// Load from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Explicit path must exist; otherwise use the default file if present,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        Ok(Self::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_is_default() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.matcher.fuzzy_threshold, 60.0);
        assert_eq!(config.matcher.progress_interval, 10_000);
        assert_eq!(config.nutrients.calories, "208");
    }

    #[test]
    fn test_partial_sections() {
        let config = PipelineConfig::from_toml(
            r#"
            [paths]
            whitelist = "lists/whitelist.txt"
            output_dir = "build"

            [matcher]
            fuzzy_threshold = 75.0

            [classifier]
            rules_file = "rules.json"

            [nutrients]
            calories = "1008"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.whitelist, PathBuf::from("lists/whitelist.txt"));
        assert_eq!(config.paths.output("x.json"), PathBuf::from("build/x.json"));
        assert_eq!(config.paths.fndds_json, PathsConfig::default().fndds_json);
        assert_eq!(config.matcher.fuzzy_threshold, 75.0);
        assert_eq!(config.matcher.progress_interval, 10_000);
        assert_eq!(config.classifier.rules_file, Some(PathBuf::from("rules.json")));
        assert_eq!(config.nutrients.calories, "1008");
        assert_eq!(config.nutrients.fat, "204");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(PipelineConfig::from_toml("[matcher]\nfuzzy_threshold = \"high\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[matcher]\nprogress_interval = 5").unwrap();

        let config = PipelineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.matcher.progress_interval, 5);

        assert!(PipelineConfig::load(Some(Path::new("/nonexistent/food-catalog.toml"))).is_err());
    }
}
