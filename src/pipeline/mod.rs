//! Shared plumbing for CLI command handlers.
//!
//! Loads JSON inputs, then resolves the output format and writes the
//! rendered report.

mod input;
mod output;

pub use input::{load_candidates, load_rows, parse_candidates, parse_rows};
pub use output::{should_use_color, OutputTarget};

/// Exit codes for scripting
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// At least one input name had no match above the threshold
    pub const NO_MATCH: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
