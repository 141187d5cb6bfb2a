//! Finding, reading and layering `.milkrate.yaml` files.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names looked for in each search directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".milkrate.yaml",
    ".milkrate.yml",
    "milkrate.yaml",
    "milkrate.yml",
    ".milkraterc",
];

/// Locate the config file to use.
///
/// An explicit path wins if it exists. Otherwise the first match among the
/// working directory, the enclosing git checkout, `<config dir>/milkrate`
/// and the home directory.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let search_dirs = std::env::current_dir()
        .ok()
        .into_iter()
        .chain(enclosing_git_checkout())
        .chain(dirs::config_dir().map(|dir| dir.join("milkrate")))
        .chain(dirs::home_dir());

    for dir in search_dirs {
        if let Some(found) = config_file_in(&dir) {
            return Some(found);
        }
    }
    None
}

fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn enclosing_git_checkout() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Parse one YAML config file. Blank files yield the defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&text)?)
}

/// Discovered config, or the defaults when there is none or it is unreadable.
///
/// The second element is the file actually used.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let Some(path) = discover_config_file(explicit_path) else {
        return (AppConfig::default(), None);
    };

    match load_config_file(&path) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            (config, Some(path))
        }
        Err(err) => {
            tracing::warn!("Ignoring config {}: {}", path.display(), err);
            (AppConfig::default(), None)
        }
    }
}

/// Copy `theirs` over `mine` when it differs from `default`.
fn overlay<T: PartialEq + Clone>(mine: &mut T, theirs: &T, default: &T) {
    if theirs != default {
        mine.clone_from(theirs);
    }
}

impl AppConfig {
    /// Layer `other` on top of `self`.
    ///
    /// A value in `other` that still equals its default counts as "not set",
    /// so overrides built from [`AppConfig::default`] only replace what a
    /// flag actually changed. Rate limits are replaced as a whole.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        overlay(
            &mut self.matching.preset,
            &other.matching.preset,
            &defaults.matching.preset,
        );
        overlay(&mut self.matching.threshold, &other.matching.threshold, &None);
        overlay(
            &mut self.matching.max_suggestions,
            &other.matching.max_suggestions,
            &None,
        );

        let board = &mut self.leaderboard;
        let (theirs, base) = (&other.leaderboard, &defaults.leaderboard);
        overlay(&mut board.sort_column, &theirs.sort_column, &base.sort_column);
        overlay(&mut board.direction, &theirs.direction, &base.direction);
        overlay(&mut board.null_rating, &theirs.null_rating, &base.null_rating);

        #[cfg(feature = "compression")]
        {
            let mine = &mut self.compression;
            let (theirs, base) = (&other.compression, &defaults.compression);
            overlay(&mut mine.max_width, &theirs.max_width, &base.max_width);
            overlay(&mut mine.max_height, &theirs.max_height, &base.max_height);
            overlay(&mut mine.quality, &theirs.quality, &base.quality);
            overlay(&mut mine.max_size_bytes, &theirs.max_size_bytes, &base.max_size_bytes);
            overlay(&mut mine.format, &theirs.format, &base.format);
        }

        overlay(&mut self.rate_limits, &other.rate_limits, &defaults.rate_limits);

        overlay(&mut self.output.format, &other.output.format, &ReportFormat::Auto);
        overlay(&mut self.output.file, &other.output.file, &None);
        overlay(&mut self.output.no_color, &other.output.no_color, &false);
    }

    /// [`load_or_default`] followed by [`merge`](Self::merge) with `cli_overrides`.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut merged, source) = load_or_default(config_path);
        merged.merge(cli_overrides);
        (merged, source)
    }

    /// The file layered under `base`, then `apply_flags` run on the result.
    ///
    /// Flags are applied last and unconditionally, so a flag whose value
    /// happens to equal the default still beats the file.
    #[must_use]
    pub fn from_file_with_flags(
        config_path: Option<&Path>,
        base: &Self,
        apply_flags: impl FnOnce(&mut Self),
    ) -> (Self, Option<PathBuf>) {
        let (mut config, source) = Self::from_file_with_overrides(config_path, base);
        apply_flags(&mut config);
        (config, source)
    }
}

/// The defaults rendered as YAML under a short header.
#[must_use]
pub fn generate_example_config() -> String {
    let body = serde_yaml::to_string(&AppConfig::default()).unwrap_or_default();
    format!(
        "# milkrate configuration (defaults)\n\
         # Save as .milkrate.yaml next to your data or in ~/.config/milkrate/\n\n{body}"
    )
}

/// Every option with its default value, commented for `milkrate config init`.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# milkrate Configuration File
# ============================
#
# Place it at:
#   - .milkrate.yaml in your project root
#   - ~/.config/milkrate/milkrate.yaml for global config
#
# CLI arguments always override file settings.

# Brand/product name matching
matching:
  # Preset: strict, balanced, permissive
  preset: balanced
  # Custom threshold (0.0-1.0), overrides preset
  # threshold: 0.75
  # Custom number of did-you-mean suggestions, overrides preset
  # max_suggestions: 5

# Leaderboard aggregation
leaderboard:
  # Column: brand_name, product_name, avg_rating, count
  sort_column: avg_rating
  # Direction: asc, desc
  direction: desc
  # Rows without a rating: treat_as_zero, exclude
  null_rating: treat_as_zero

# Image compression (requires the `compression` feature)
compression:
  max_width: 1920
  max_height: 1920
  # First-attempt encoder quality (0.0-1.0)
  quality: 0.8
  # Byte budget; smaller images are left untouched
  max_size_bytes: 2097152
  # Format: jpeg, png, webp
  format: jpeg

# Attempt limits per action (key prefix before ':')
rate_limits:
  login:
    max_attempts: 5
    window_secs: 900
  signup:
    max_attempts: 3
    window_secs: 3600
  password_reset:
    max_attempts: 3
    window_secs: 3600
  fallback:
    max_attempts: 5
    window_secs: 900

# Output configuration
output:
  # Format: auto, json, table
  format: auto
  # Output file path (omit for stdout)
  # file: leaderboard.json
  # Disable colored output
  no_color: false
"
    .to_string()
}
