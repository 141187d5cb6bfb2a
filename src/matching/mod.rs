//! Brand and product name matching.
//!
//! Decides whether a free-text name typed by a user refers to an existing
//! brand or product, so the app can offer "did you mean X?" instead of
//! creating a duplicate.
//!
//! # Example
//!
//! ```
//! use milkrate::matching::{find_closest_match, NamedEntity, DEFAULT_SIMILARITY_THRESHOLD};
//!
//! let brands = vec![
//!     NamedEntity::new("b1", "Oatly"),
//!     NamedEntity::new("b2", "Alpro"),
//! ];
//!
//! let hit = find_closest_match("Oatlly", &brands, DEFAULT_SIMILARITY_THRESHOLD);
//! assert_eq!(hit.map(|b| b.id.as_str()), Some("b1"));
//! ```

mod config;
pub mod string_similarity;
mod traits;

pub use config::NameMatchConfig;
pub use string_similarity::{
    is_similar, normalize_name, similarity_score, DEFAULT_SIMILARITY_THRESHOLD,
};
pub use traits::{NameMatch, Named, NamedEntity};

use rayon::prelude::*;

/// Return the best-scoring candidate at or above `threshold`.
///
/// Candidates are scanned in order and only a strictly greater score
/// replaces the current best, so earlier candidates win ties. Returns `None`
/// for blank input or when nothing reaches the threshold.
pub fn find_closest_match<'a, T: Named>(
    input: &str,
    candidates: &'a [T],
    threshold: f64,
) -> Option<&'a T> {
    closest_with_score(input, candidates, threshold).map(|m| m.candidate)
}

fn closest_with_score<'a, T: Named>(
    input: &str,
    candidates: &'a [T],
    threshold: f64,
) -> Option<NameMatch<'a, T>> {
    if input.trim().is_empty() {
        return None;
    }

    let mut best: Option<NameMatch<'a, T>> = None;
    for candidate in candidates {
        let score = similarity_score(input, candidate.name());
        if score < threshold {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(NameMatch { candidate, score });
        }
    }
    best
}

/// Name matcher bound to a threshold and suggestion limit.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct NameMatcher {
    config: NameMatchConfig,
}

impl NameMatcher {
    /// Create a matcher with the given configuration
    pub const fn new(config: NameMatchConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &NameMatchConfig {
        &self.config
    }

    /// Best candidate for `input`, with its score.
    pub fn closest<'a, T: Named>(
        &self,
        input: &str,
        candidates: &'a [T],
    ) -> Option<NameMatch<'a, T>> {
        closest_with_score(input, candidates, self.config.threshold)
    }

    /// Ranked "did you mean" list.
    ///
    /// Every candidate at or above the threshold, best first. Equal scores
    /// keep their order in `candidates`. Truncated to `max_suggestions`.
    pub fn suggestions<'a, T: Named>(
        &self,
        input: &str,
        candidates: &'a [T],
    ) -> Vec<NameMatch<'a, T>> {
        if input.trim().is_empty() || self.config.max_suggestions == 0 {
            return Vec::new();
        }

        let mut matches: Vec<NameMatch<'a, T>> = candidates
            .iter()
            .map(|candidate| NameMatch {
                candidate,
                score: similarity_score(input, candidate.name()),
            })
            .filter(|m| m.score >= self.config.threshold)
            .collect();

        // Stable sort keeps list order among equal scores.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.config.max_suggestions);
        matches
    }

    /// Check whether `input` would duplicate an existing entry.
    ///
    /// An entry whose normalized name equals the normalized input (ignoring
    /// case) is returned with score `1.0` even if an earlier candidate is
    /// merely similar. Otherwise this behaves like [`find_closest_match`].
    pub fn find_duplicate<'a, T: Named>(
        &self,
        input: &str,
        candidates: &'a [T],
    ) -> Option<NameMatch<'a, T>> {
        let normalized = normalize_name(input);
        if normalized.is_empty() {
            return None;
        }

        let folded = normalized.to_lowercase();
        if let Some(candidate) = candidates
            .iter()
            .find(|c| normalize_name(c.name()).to_lowercase() == folded)
        {
            tracing::debug!(input = %normalized, "exact duplicate found");
            return Some(NameMatch {
                candidate,
                score: 1.0,
            });
        }

        self.closest(&normalized, candidates)
    }

    /// Resolve many inputs against the same candidate list in parallel.
    ///
    /// The result has one entry per input, in input order.
    pub fn match_batch<'a, S, T>(
        &self,
        inputs: &[S],
        candidates: &'a [T],
    ) -> Vec<Option<NameMatch<'a, T>>>
    where
        S: AsRef<str> + Sync,
        T: Named + Sync,
    {
        inputs
            .par_iter()
            .map(|input| self.closest(input.as_ref(), candidates))
            .collect()
    }
}
