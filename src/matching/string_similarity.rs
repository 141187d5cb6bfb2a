//! String similarity primitives for brand and product name matching.
//!
//! Scores are normalized Levenshtein ratios over Unicode scalar values,
//! compared case-insensitively. Substring containment gets no special
//! treatment: "Oat" inside "Oatly Barista" only scores what the edit
//! distance says it scores.

use strsim::levenshtein;

/// Acceptance boundary used by autocomplete and duplicate detection.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Trim a user-typed name and collapse internal whitespace runs.
///
/// Case is preserved. Whitespace-only input normalizes to the empty string.
///
/// ```
/// use milkrate::matching::normalize_name;
///
/// assert_eq!(normalize_name("  Alpro  Barista   Oat "), "Alpro Barista Oat");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive normalized edit-distance similarity in `[0.0, 1.0]`.
///
/// - identical strings (ignoring case) score exactly `1.0`, including two
///   empty strings
/// - otherwise, if either side is empty after trimming the score is `0.0`
/// - otherwise `(max_len - distance) / max_len`
#[must_use]
pub fn similarity_score(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower == b_lower {
        return 1.0;
    }
    if a_lower.trim().is_empty() || b_lower.trim().is_empty() {
        return 0.0;
    }

    let max_len = a_lower.chars().count().max(b_lower.chars().count());
    let distance = levenshtein(&a_lower, &b_lower);

    (max_len - distance) as f64 / max_len as f64
}

/// Whether two names are at least `threshold` similar.
#[must_use]
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity_score(a, b) >= threshold
}
