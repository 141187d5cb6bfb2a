//! Configuration module for milkrate.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```
//! use milkrate::config::{AppConfig, ConfigPreset, Validatable};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//! assert!(config.is_valid());
//!
//! let config = AppConfig::builder()
//!     .matching_preset("permissive")
//!     .sort_column("count")
//!     .build();
//! assert_eq!(config.leaderboard.sort_column, "count");
//! ```
//!
//! # Configuration File
//!
//! Place a `.milkrate.yaml` file in your project root or `~/.config/milkrate/`:
//!
//! ```yaml
//! matching:
//!   preset: strict
//! leaderboard:
//!   null_rating: exclude
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_MATCHING_PRESET, DEFAULT_SORT_COLUMN, DEFAULT_SORT_DIRECTION,
};
pub use types::{AppConfig, AppConfigBuilder, LeaderboardConfig, MatchingConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.milkrate.yaml` files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| {
        crate::error::MilkrateError::config(format!("schema serialization failed: {e}"))
    })
}
