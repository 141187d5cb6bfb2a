//! Built-in presets and the default values they start from.

use super::types::{AppConfig, MatchingConfig, OutputConfig};
use crate::reports::ReportFormat;

/// Whole-config starting points, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Balanced matching, terminal-friendly output
    Default,
    /// Only near-identical names count as duplicates
    Strict,
    /// Loose matching for cleaning up legacy brand lists
    Permissive,
    /// Machine-readable output for scripts
    Ci,
}

impl ConfigPreset {
    /// Canonical name, as accepted by [`from_name`](Self::from_name).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Permissive => "permissive",
            Self::Ci => "ci",
        }
    }

    /// Case-insensitive lookup, including a few aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "permissive" | "loose" => Some(Self::Permissive),
            "ci" | "script" => Some(Self::Ci),
            _ => None,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Permissive, Self::Ci]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Defaults with the preset's changes applied.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self {
                matching: MatchingConfig {
                    preset: "strict".to_string(),
                    ..MatchingConfig::default()
                },
                ..Self::default()
            },
            ConfigPreset::Permissive => Self {
                matching: MatchingConfig {
                    preset: "permissive".to_string(),
                    ..MatchingConfig::default()
                },
                ..Self::default()
            },
            ConfigPreset::Ci => Self {
                output: OutputConfig {
                    format: ReportFormat::Json,
                    file: None,
                    no_color: true,
                },
                ..Self::default()
            },
        }
    }
}

/// Matching preset used when none is configured.
pub const DEFAULT_MATCHING_PRESET: &str = "balanced";

/// Leaderboard column used when none is configured.
pub const DEFAULT_SORT_COLUMN: &str = "avg_rating";

/// Best-rated first.
pub const DEFAULT_SORT_DIRECTION: &str = "desc";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ConfigPreset::from_name("balanced"), Some(ConfigPreset::Default));
        assert_eq!(ConfigPreset::from_name("STRICT"), Some(ConfigPreset::Strict));
        assert_eq!(ConfigPreset::from_name("script"), Some(ConfigPreset::Ci));
        assert_eq!(ConfigPreset::from_name("nope"), None);
    }

    #[test]
    fn test_presets_round_trip_names() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }

    #[test]
    fn test_from_preset() {
        assert_eq!(AppConfig::from_preset(ConfigPreset::Default), AppConfig::default());
        assert_eq!(
            AppConfig::from_preset(ConfigPreset::Strict).matching.preset,
            "strict"
        );

        let ci = AppConfig::from_preset(ConfigPreset::Ci);
        assert_eq!(ci.output.format, ReportFormat::Json);
        assert!(ci.output.no_color);
    }
}
