//! Range and vocabulary checks for every config section.

use super::types::{AppConfig, LeaderboardConfig, MatchingConfig, OutputConfig};
use crate::auth::{RateLimitConfig, RateLimitPolicy, MAX_WINDOW_SECS};
#[cfg(feature = "compression")]
use crate::compress::CompressOptions;
use crate::leaderboard::SortColumn;

/// One rejected setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted path, e.g. `matching.threshold`
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Config sections that can check themselves.
pub trait Validatable {
    /// Every problem found, in field order. Empty means valid.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.leaderboard.validate());
        #[cfg(feature = "compression")]
        errors.extend(self.compression.validate());
        errors.extend(self.rate_limits.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let valid_presets = ["strict", "balanced", "permissive"];
        if !valid_presets.contains(&self.preset.to_lowercase().as_str()) {
            errors.push(ConfigError::new(
                "matching.preset",
                format!(
                    "Invalid preset '{}'. Valid options: {}",
                    self.preset,
                    valid_presets.join(", ")
                ),
            ));
        }

        if let Some(threshold) = self.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                errors.push(ConfigError::new(
                    "matching.threshold",
                    format!("Threshold must be between 0.0 and 1.0, got {threshold}"),
                ));
            }
        }

        if self.max_suggestions == Some(0) {
            errors.push(ConfigError::new(
                "matching.max_suggestions",
                "Suggestion limit must be at least 1",
            ));
        }

        errors
    }
}

impl Validatable for LeaderboardConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let column = self
            .sort_column
            .parse::<SortColumn>()
            .unwrap_or_else(|never| match never {});
        if !column.is_known() {
            errors.push(ConfigError::new(
                "leaderboard.sort_column",
                format!(
                    "Unknown sort column '{}'. Valid options: {}",
                    self.sort_column,
                    SortColumn::known_names().join(", ")
                ),
            ));
        }

        if !matches!(self.direction.as_str(), "asc" | "desc") {
            errors.push(ConfigError::new(
                "leaderboard.direction",
                format!("Direction must be 'asc' or 'desc', got '{}'", self.direction),
            ));
        }

        errors
    }
}

#[cfg(feature = "compression")]
impl Validatable for CompressOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_width == 0 || self.max_height == 0 {
            errors.push(ConfigError::new(
                "compression.max_width",
                format!(
                    "Dimensions must be at least 1 pixel, got {}x{}",
                    self.max_width, self.max_height
                ),
            ));
        }

        if !(self.quality > 0.0 && self.quality <= 1.0) {
            errors.push(ConfigError::new(
                "compression.quality",
                format!("Quality must be in (0.0, 1.0], got {}", self.quality),
            ));
        }

        if self.max_size_bytes == 0 {
            errors.push(ConfigError::new(
                "compression.max_size_bytes",
                "Size budget must be at least 1 byte",
            ));
        }

        errors
    }
}

impl Validatable for RateLimitConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let policies: [(&str, RateLimitPolicy); 4] = [
            ("login", self.login),
            ("signup", self.signup),
            ("password_reset", self.password_reset),
            ("fallback", self.fallback),
        ];

        let mut errors = Vec::new();
        for (action, policy) in policies {
            if policy.max_attempts == 0 {
                errors.push(ConfigError::new(
                    format!("rate_limits.{action}.max_attempts"),
                    "Must allow at least one attempt",
                ));
            }
            if policy.window_secs == 0 {
                errors.push(ConfigError::new(
                    format!("rate_limits.{action}.window_secs"),
                    "Window must be at least one second",
                ));
            } else if policy.window_secs > MAX_WINDOW_SECS {
                errors.push(ConfigError::new(
                    format!("rate_limits.{action}.window_secs"),
                    format!("Window must not exceed {MAX_WINDOW_SECS} seconds (one year)"),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = MatchingConfig {
            threshold: Some(1.5),
            ..MatchingConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "matching.threshold");
    }

    #[test]
    fn test_invalid_preset_and_limit() {
        let config = MatchingConfig {
            preset: "fuzzy".to_string(),
            threshold: None,
            max_suggestions: Some(0),
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_unknown_sort_column() {
        let config = LeaderboardConfig {
            sort_column: "created_at".to_string(),
            direction: "sideways".to_string(),
            ..LeaderboardConfig::default()
        };
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["leaderboard.sort_column", "leaderboard.direction"]);
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compression_bounds() {
        let options = CompressOptions::default()
            .with_quality(0.0)
            .with_max_dimensions(0, 100)
            .with_max_size_bytes(0);
        assert_eq!(options.validate().len(), 3);
    }

    #[test]
    fn test_zero_rate_limit_policy() {
        let config = RateLimitConfig {
            signup: RateLimitPolicy::new(0, 0),
            ..RateLimitConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].field.starts_with("rate_limits.signup"));
    }

    #[test]
    fn test_rate_limit_window_upper_bound() {
        let config = RateLimitConfig {
            fallback: RateLimitPolicy::new(3, MAX_WINDOW_SECS + 1),
            ..RateLimitConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rate_limits.fallback.window_secs");

        let at_limit = RateLimitConfig {
            fallback: RateLimitPolicy::new(3, MAX_WINDOW_SECS),
            ..RateLimitConfig::default()
        };
        assert!(at_limit.is_valid());
    }

    #[test]
    fn test_output_file_parent_missing() {
        let config = OutputConfig {
            file: Some("/nonexistent/dir/report.json".into()),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());
    }
}
