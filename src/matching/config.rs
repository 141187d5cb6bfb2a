//! Name matching configuration.

use super::string_similarity::DEFAULT_SIMILARITY_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Configuration for name matching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NameMatchConfig {
    /// Minimum similarity for a candidate to count as a match (0.0 - 1.0)
    pub threshold: f64,
    /// Maximum number of "did you mean" suggestions returned
    pub max_suggestions: usize,
}

impl NameMatchConfig {
    /// Only near-identical spellings are treated as the same brand.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            threshold: 0.90,
            max_suggestions: 3,
        }
    }

    /// The autocomplete acceptance boundary used by the app.
    #[must_use]
    pub const fn balanced() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_suggestions: 5,
        }
    }

    /// Loose matching for cleaning up legacy brand lists.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            threshold: 0.60,
            max_suggestions: 10,
        }
    }

    /// Set a custom threshold value.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the suggestion limit.
    #[must_use]
    pub const fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "strict" => Some(Self::strict()),
            "balanced" | "default" => Some(Self::balanced()),
            "permissive" | "loose" => Some(Self::permissive()),
            _ => None,
        }
    }
}

impl Default for NameMatchConfig {
    fn default() -> Self {
        Self::balanced()
    }
}
