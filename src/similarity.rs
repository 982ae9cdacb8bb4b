// 📏 Approximate String Similarity - interchangeable scorers for fuzzy matching
// All scores are 0.0 - 100.0. The base metric is the indel ratio (LCS based).

use std::collections::{BTreeSet, HashSet};

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// SimilarityScorer - one approximate similarity strategy
///
/// The matcher only ever sees this trait, so scorers can be added or swapped
/// without touching the matching ladder.
pub trait SimilarityScorer: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Similarity between `query` and `choice` in 0.0 - 100.0
    fn score(&self, query: &str, choice: &str) -> f64;
}

/// Best choice for one scorer: (index into choices, score).
///
/// Choices scoring below `cutoff` are ignored; ties keep the earliest choice.
pub fn extract_one<S: AsRef<str>>(
    query: &str,
    choices: &[S],
    scorer: &dyn SimilarityScorer,
    cutoff: f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, choice) in choices.iter().enumerate() {
        let score = scorer.score(query, choice.as_ref());
        if score < cutoff {
            continue;
        }

        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }

        if score >= 100.0 {
            break;
        }
    }

    best
}

/// The three scorers used for fuzzy fallback, in evaluation order
pub fn default_scorers() -> Vec<Box<dyn SimilarityScorer>> {
    vec![
        Box::new(TokenSetRatio),
        Box::new(PartialRatio),
        Box::new(TokenSortRatio),
    ]
}

// ============================================================================
// BASE METRIC
// ============================================================================

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }

    row[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Indel ratio: 100 * (1 - indel_distance / (len_a + len_b))
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

// ============================================================================
// SCORERS
// ============================================================================

/// Set-based token overlap. Shared tokens count fully; a string whose tokens
/// are a subset of the other's scores 100.
pub struct TokenSetRatio;

impl SimilarityScorer for TokenSetRatio {
    fn name(&self) -> &'static str {
        "token_set_ratio"
    }

    fn score(&self, query: &str, choice: &str) -> f64 {
        let tokens_a: BTreeSet<&str> = query.split_whitespace().collect();
        let tokens_b: BTreeSet<&str> = choice.split_whitespace().collect();

        if tokens_a.is_empty() || tokens_b.is_empty() {
            return 0.0;
        }

        let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
        let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
        let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

        if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
            return 100.0;
        }

        let sect = intersection.join(" ");
        let combined_ab = format!("{} {}", sect, diff_ab.join(" "));
        let combined_ba = format!("{} {}", sect, diff_ba.join(" "));
        let combined_ab = combined_ab.trim();
        let combined_ba = combined_ba.trim();

        ratio(&sect, combined_ab)
            .max(ratio(&sect, combined_ba))
            .max(ratio(combined_ab, combined_ba))
    }
}

/// Order-insensitive token sequence ratio: sort tokens, then compare
pub struct TokenSortRatio;

impl SimilarityScorer for TokenSortRatio {
    fn name(&self) -> &'static str {
        "token_sort_ratio"
    }

    fn score(&self, query: &str, choice: &str) -> f64 {
        ratio(&sorted_tokens(query), &sorted_tokens(choice))
    }
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best ratio of the shorter string against any equally long window of the
/// longer one (windows clipped at either end are included).
pub struct PartialRatio;

impl SimilarityScorer for PartialRatio {
    fn name(&self) -> &'static str {
        "partial_ratio"
    }

    fn score(&self, query: &str, choice: &str) -> f64 {
        let a: Vec<char> = query.chars().collect();
        let b: Vec<char> = choice.chars().collect();

        if a.is_empty() && b.is_empty() {
            return 100.0;
        }
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
        let m = short.len();
        let n = long.len();
        let alphabet: HashSet<char> = short.iter().copied().collect();

        let mut best: f64 = 0.0;
        let mut consider = |window: &[char]| {
            let score = ratio_chars(short, window);
            if score > best {
                best = score;
            }
            best >= 100.0
        };

        // windows clipped at the start
        for end in 1..m {
            if alphabet.contains(&long[end - 1]) && consider(&long[..end]) {
                return 100.0;
            }
        }

        // full windows
        for start in 0..=(n - m) {
            let window = &long[start..start + m];
            let touches = alphabet.contains(&window[0]) || alphabet.contains(&window[m - 1]);
            if touches && consider(window) {
                return 100.0;
            }
        }

        // windows clipped at the end
        for start in (n - m + 1)..n {
            if alphabet.contains(&long[start]) && consider(&long[start..]) {
                return 100.0;
            }
        }

        best
    }
}

/// Normalized Levenshtein similarity (strsim), scaled to 0 - 100.
/// Not in the default set; available as a drop-in alternative.
pub struct NormalizedLevenshtein;

impl SimilarityScorer for NormalizedLevenshtein {
    fn name(&self) -> &'static str {
        "normalized_levenshtein"
    }

    fn score(&self, query: &str, choice: &str) -> f64 {
        strsim::normalized_levenshtein(query, choice) * 100.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
