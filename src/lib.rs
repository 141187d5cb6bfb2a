//! **Utilities behind a plant-based milk taste-testing app.**
//!
//! `milkrate` bundles the pieces of the app that are pure logic rather than
//! UI: recognizing that a newly typed brand is a misspelling of one already
//! on file, turning raw taste-test rows into a ranked leaderboard, and
//! shrinking phone photos before they are uploaded.
//!
//! ## Core Concepts & Modules
//!
//! - **[`matching`]**: Levenshtein-based name similarity and the
//!   [`NameMatcher`] used for "did you mean" prompts and duplicate checks.
//! - **[`leaderboard`]**: Groups [`TasteTestRow`]s by product, keeps a
//!   running average rating and orders the result.
//! - **[`compress`]**: Async, cancellable image downscaling and re-encoding
//!   to a byte budget. Requires the `compression` feature.
//! - **[`auth`]**: An injectable [`RateLimiter`] and explicit password
//!   recovery state.
//! - **[`config`]**: YAML configuration with discovery, validation and
//!   presets.
//! - **[`reports`]**: JSON and table renderers for match results and
//!   leaderboards.
//!
//! ## Matching a Typed Name
//!
//! ```
//! use milkrate::matching::{NameMatcher, NamedEntity};
//!
//! let brands = vec![
//!     NamedEntity::new("b1", "Oatly"),
//!     NamedEntity::new("b2", "Califia Farms"),
//! ];
//!
//! let matcher = NameMatcher::default();
//! let hit = matcher.find_duplicate("  califia   farms ", &brands).unwrap();
//! assert_eq!(hit.candidate.id, "b2");
//! assert!(hit.is_exact());
//! ```
//!
//! ## Building a Leaderboard
//!
//! ```
//! use milkrate::leaderboard::{aggregate, SortConfig, TasteTestRow};
//!
//! let rows = vec![
//!     TasteTestRow::new("p1", 6.0).with_names("Alpro", "Oat No Sugars"),
//!     TasteTestRow::new("p2", 9.0).with_names("Oatly", "Barista Edition"),
//!     TasteTestRow::new("p1", 8.0).with_names("Alpro", "Oat No Sugars"),
//! ];
//!
//! let board = aggregate(&rows, &SortConfig::parse("avg_rating", "desc"));
//! assert_eq!(board[0].brand_name, "Oatly");
//! assert_eq!(board[1].avg_rating, 7.0);
//! ```
//!
//! ## Compressing a Photo
//!
//! ```no_run
//! # #[cfg(feature = "compression")]
//! # async fn demo() -> milkrate::Result<()> {
//! use milkrate::compress::{compress_image, CompressOptions, ImageAsset};
//! use std::path::Path;
//!
//! let photo = ImageAsset::from_path(Path::new("latte.heic.jpg"))?;
//! let upload = compress_image(photo, &CompressOptions::default()).await;
//! println!("{} is {} bytes", upload.name(), upload.size());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `compression` (default): the [`compress`] module and its `image`,
//!   `tokio` and `tokio-util` dependencies.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Pixel and byte counts are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod auth;
pub mod cli;
#[cfg(feature = "compression")]
pub mod compress;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod matching;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use auth::{AuthRecoveryState, InMemoryRateLimiter, RateLimitConfig, RateLimiter};
#[cfg(feature = "compression")]
pub use compress::{compress_image, CompressOptions, ImageAsset, OutputFormat};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{ErrorContext, MilkrateError, Result};
pub use leaderboard::{aggregate, AggregatedProduct, Aggregator, SortConfig, TasteTestRow};
pub use matching::{
    find_closest_match, is_similar, similarity_score, NameMatchConfig, NameMatcher, Named,
    NamedEntity,
};
pub use reports::{ReportFormat, ReportGenerator};
