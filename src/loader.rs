// 📂 Loaders & Writers - everything that touches the filesystem
// Core modules never see a path; they get already-parsed collections

use crate::category_lookup::{FoodCategoryRow, LegacyFoodRow};
use crate::record::{tag_source, FoodRecord, SourceKind};
use crate::sources::{parse_foods, unwrap_food_array, LegacyFood, SurveyFood};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Wrapper key of the SR Legacy export
pub const SR_LEGACY_KEY: &str = "SRLegacyFoods";

/// Wrapper key of the FNDDS export
pub const FNDDS_KEY: &str = "SurveyFoods";

// ============================================================================
// TEXT
// ============================================================================

/// Whitelist: one entry per line, trimmed and lowercased, blanks dropped
pub fn load_whitelist(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read whitelist: {:?}", path))?;

    Ok(content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

/// One line per item
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

// ============================================================================
// JSON
// ============================================================================

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path).with_context(|| format!("Failed to open JSON file: {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))
}

fn load_food_export<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let document = read_json(path)?;
    let items = unwrap_food_array(document, key).with_context(|| format!("In {:?}", path))?;
    parse_foods(items).with_context(|| format!("In {:?}", path))
}

/// SR Legacy foods (`{"SRLegacyFoods": [...]}` or a bare array)
pub fn load_sr_legacy(path: &Path) -> Result<Vec<LegacyFood>> {
    load_food_export(path, SR_LEGACY_KEY)
}

/// FNDDS survey foods (`{"SurveyFoods": [...]}` or a bare array)
pub fn load_survey_foods(path: &Path) -> Result<Vec<SurveyFood>> {
    load_food_export(path, FNDDS_KEY)
}

/// A JSON array of food records, tagged with where it came from
pub fn load_food_records(path: &Path, source: SourceKind) -> Result<Vec<FoodRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open food records: {:?}", path))?;
    let mut records: Vec<FoodRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse food records: {:?}", path))?;

    tag_source(&mut records, source);
    Ok(records)
}

/// Pretty-printed JSON (2-space indent)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<u64> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON: {:?}", path))?;
    writer.flush()?;

    let size = fs::metadata(path)?.len();
    Ok(size)
}

// ============================================================================
// CSV
// ============================================================================

fn load_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("Bad row {} in {:?}", line + 2, path))?;
        rows.push(row);
    }

    Ok(rows)
}

/// SR Legacy `food.csv` (fdc_id, food_category_id)
pub fn load_legacy_food_rows(path: &Path) -> Result<Vec<LegacyFoodRow>> {
    load_csv_rows(path)
}

/// SR Legacy `food_category.csv` (id, description)
pub fn load_food_category_rows(path: &Path) -> Result<Vec<FoodCategoryRow>> {
    load_csv_rows(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
