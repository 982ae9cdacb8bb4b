// 🎯 Whitelist Matcher - map a free-text description onto a fixed vocabulary
// Four tiers, first success wins: Exact → Affix → Substring → Fuzzy

use crate::similarity::{default_scorers, extract_one, SimilarityScorer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum score a fuzzy scorer must reach
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 60.0;

/// Confidence for an exact normalized match
pub const EXACT_CONFIDENCE: f64 = 100.0;

/// Confidence for a prefix match in either direction
pub const AFFIX_CONFIDENCE: f64 = 95.0;

/// Ceiling for substring containment
pub const SUBSTRING_CEILING: f64 = 90.0;

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Lowercase, turn anything that isn't a letter, digit or whitespace into a
/// space, then trim. Inner runs of spaces are kept as-is.
pub fn normalize_text(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.trim().to_string()
}

// ============================================================================
// MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    /// Normalized strings are equal
    Exact,
    /// One normalized string starts with the other
    Affix,
    /// One normalized string contains the other
    Substring,
    /// Best of the approximate scorers
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Vocabulary entry, as given (not normalized)
    pub entry: String,

    /// Position of the entry in the vocabulary
    pub index: usize,

    /// Confidence score (0.0 - 100.0)
    pub confidence: f64,

    /// Which tier produced this match
    pub tier: MatchTier,
}

/// Substring tier score: share of the description explained by the
/// vocabulary entry, scaled to 90 and capped there.
pub fn containment_score(entry_len: usize, description_len: usize) -> f64 {
    if description_len == 0 {
        return 0.0;
    }
    (entry_len as f64 / description_len as f64 * SUBSTRING_CEILING).min(SUBSTRING_CEILING)
}

// ============================================================================
// MATCHER
// ============================================================================

pub struct Matcher {
    /// Vocabulary as given
    entries: Vec<String>,

    /// Normalized form of each entry (same index)
    normalized: Vec<String>,

    /// Entries that normalized to nothing, as given
    dropped: Vec<String>,

    /// Fuzzy fallback strategies, evaluated in order
    scorers: Vec<Box<dyn SimilarityScorer>>,

    /// Minimum fuzzy score (default: 60.0)
    pub fuzzy_threshold: f64,
}

impl Matcher {
    /// Create a matcher with the default scorers and threshold.
    /// Entries that normalize to nothing are dropped.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = Vec::new();
        let mut normalized = Vec::new();
        let mut dropped = Vec::new();

        for entry in vocabulary {
            let entry = entry.into();
            let norm = normalize_text(&entry);
            if norm.is_empty() {
                dropped.push(entry);
                continue;
            }
            entries.push(entry);
            normalized.push(norm);
        }

        Matcher {
            entries,
            normalized,
            dropped,
            scorers: default_scorers(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Builder pattern: replace fuzzy scorers
    pub fn with_scorers(mut self, scorers: Vec<Box<dyn SimilarityScorer>>) -> Self {
        self.scorers = scorers;
        self
    }

    /// Builder pattern: change fuzzy threshold
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries that can never match (nothing left after normalization)
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the best vocabulary entry for a description, or None
    pub fn find(&self, description: &str) -> Option<MatchResult> {
        let desc = normalize_text(description);
        if desc.is_empty() || self.entries.is_empty() {
            return None;
        }

        self.check_exact(&desc)
            .or_else(|| self.check_affix(&desc))
            .or_else(|| self.check_substring(&desc))
            .or_else(|| self.check_fuzzy(&desc))
    }

    /// Tier 1: Exact match → 100
    fn check_exact(&self, desc: &str) -> Option<MatchResult> {
        let index = self.normalized.iter().position(|item| item == desc)?;
        Some(self.result(index, EXACT_CONFIDENCE, MatchTier::Exact))
    }

    /// Tier 2: Prefix either way → 95
    fn check_affix(&self, desc: &str) -> Option<MatchResult> {
        let index = self
            .normalized
            .iter()
            .position(|item| desc.starts_with(item.as_str()) || item.starts_with(desc))?;
        Some(self.result(index, AFFIX_CONFIDENCE, MatchTier::Affix))
    }

    /// Tier 3: Containment either way → scaled by how much is explained
    fn check_substring(&self, desc: &str) -> Option<MatchResult> {
        let index = self
            .normalized
            .iter()
            .position(|item| desc.contains(item.as_str()) || item.contains(desc))?;

        let item_len = self.normalized[index].chars().count();
        let desc_len = desc.chars().count();
        let score = containment_score(item_len, desc_len);

        Some(self.result(index, score, MatchTier::Substring))
    }

    /// Tier 4: Best across all scorers; earlier scorer wins ties
    fn check_fuzzy(&self, desc: &str) -> Option<MatchResult> {
        let mut best: Option<(usize, f64)> = None;

        for scorer in &self.scorers {
            let found = extract_one(desc, &self.normalized, scorer.as_ref(), self.fuzzy_threshold);
            if let Some((index, score)) = found {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((index, score));
                }
            }
        }

        best.map(|(index, score)| self.result(index, score, MatchTier::Fuzzy))
    }

    fn result(&self, index: usize, confidence: f64, tier: MatchTier) -> MatchResult {
        MatchResult {
            entry: self.entries[index].clone(),
            index,
            confidence,
            tier,
        }
    }
}

// ============================================================================
// BEST MATCH PER ENTRY
// ============================================================================

/// Keeps the highest-confidence candidate per vocabulary entry across a pass.
/// Ties go to whichever candidate arrived first.
pub struct BestMatches<T> {
    /// Candidates in first-matched order of their entries
    slots: Vec<(MatchResult, T)>,

    /// Entry index → slot position
    by_entry: HashMap<usize, usize>,
}

impl<T> BestMatches<T> {
    pub fn new() -> Self {
        BestMatches {
            slots: Vec::new(),
            by_entry: HashMap::new(),
        }
    }

    /// Offer a candidate. Returns true if it is now the best for its entry.
    pub fn offer(&mut self, result: MatchResult, candidate: T) -> bool {
        match self.by_entry.get(&result.index) {
            Some(&slot) => {
                if result.confidence > self.slots[slot].0.confidence {
                    self.slots[slot] = (result, candidate);
                    true
                } else {
                    false
                }
            }
            None => {
                self.by_entry.insert(result.index, self.slots.len());
                self.slots.push((result, candidate));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn into_inner(self) -> Vec<(MatchResult, T)> {
        self.slots
    }
}

impl<T> Default for BestMatches<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
