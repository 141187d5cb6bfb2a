//! Configuration types for milkrate.
//!
//! Provides structured configuration for matching, leaderboards, image
//! compression, rate limiting and output.

use crate::auth::RateLimitConfig;
#[cfg(feature = "compression")]
use crate::compress::CompressOptions;
use crate::leaderboard::{NullRatingPolicy, SortConfig};
use crate::matching::NameMatchConfig;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Name matching (thresholds, presets)
    pub matching: MatchingConfig,
    /// Leaderboard ordering and null-rating handling
    pub leaderboard: LeaderboardConfig,
    /// Image compression budget and encoder settings
    #[cfg(feature = "compression")]
    pub compression: CompressOptions,
    /// Per-action attempt limits
    pub rate_limits: RateLimitConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the matching preset.
    pub fn matching_preset(mut self, preset: impl Into<String>) -> Self {
        self.config.matching.preset = preset.into();
        self
    }

    /// Set the matching threshold.
    pub const fn matching_threshold(mut self, threshold: f64) -> Self {
        self.config.matching.threshold = Some(threshold);
        self
    }

    /// Set the suggestion limit.
    pub const fn max_suggestions(mut self, max: usize) -> Self {
        self.config.matching.max_suggestions = Some(max);
        self
    }

    /// Set the leaderboard sort column.
    pub fn sort_column(mut self, column: impl Into<String>) -> Self {
        self.config.leaderboard.sort_column = column.into();
        self
    }

    /// Set the leaderboard sort direction.
    pub fn sort_direction(mut self, direction: impl Into<String>) -> Self {
        self.config.leaderboard.direction = direction.into();
        self
    }

    /// Choose how missing ratings are aggregated.
    pub const fn null_rating(mut self, policy: NullRatingPolicy) -> Self {
        self.config.leaderboard.null_rating = policy;
        self
    }

    /// Set compression options.
    #[cfg(feature = "compression")]
    pub const fn compression(mut self, options: CompressOptions) -> Self {
        self.config.compression = options;
        self
    }

    /// Set rate-limit policies.
    pub const fn rate_limits(mut self, limits: RateLimitConfig) -> Self {
        self.config.rate_limits = limits;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Name matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Preset: strict, balanced, permissive
    pub preset: String,
    /// Custom threshold (0.0 - 1.0), overrides the preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Custom suggestion limit, overrides the preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_suggestions: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            preset: super::DEFAULT_MATCHING_PRESET.to_string(),
            threshold: None,
            max_suggestions: None,
        }
    }
}

impl MatchingConfig {
    /// Resolve the preset and overrides into a matcher configuration.
    ///
    /// An unknown preset name resolves to the balanced preset; validation
    /// reports it separately.
    #[must_use]
    pub fn to_name_match_config(&self) -> NameMatchConfig {
        let mut config = NameMatchConfig::from_preset(&self.preset).unwrap_or_default();
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if let Some(max) = self.max_suggestions {
            config = config.with_max_suggestions(max);
        }
        config
    }
}

/// Leaderboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Column to sort by: brand_name, product_name, avg_rating, count
    pub sort_column: String,
    /// Sort direction: asc or desc
    pub direction: String,
    /// How rows without a rating are aggregated
    pub null_rating: NullRatingPolicy,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            sort_column: super::DEFAULT_SORT_COLUMN.to_string(),
            direction: super::DEFAULT_SORT_DIRECTION.to_string(),
            null_rating: NullRatingPolicy::default(),
        }
    }
}

impl LeaderboardConfig {
    /// Parse the configured column and direction.
    #[must_use]
    pub fn sort_config(&self) -> SortConfig {
        SortConfig::parse(&self.sort_column, &self.direction)
    }
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}
