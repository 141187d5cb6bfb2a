//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler returns the process exit code; the caller exits with it.

#[cfg(feature = "compression")]
mod compress;
mod leaderboard;
mod matching;

#[cfg(feature = "compression")]
pub use compress::run_compress;
pub use leaderboard::run_leaderboard;
pub use matching::run_match;
