//! Report types and configuration.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: table if TTY, JSON otherwise
    #[default]
    Auto,
    /// Structured JSON output
    Json,
    /// Aligned table for the terminal
    Table,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// One candidate in a match report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCandidate {
    pub id: String,
    pub name: String,
    pub score: f64,
}

/// Resolution of a single input name against the candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReportEntry {
    /// The name as typed
    pub input: String,
    /// Best candidate at or above the threshold
    pub best: Option<MatchedCandidate>,
    /// Ranked "did you mean" list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<MatchedCandidate>,
}

impl MatchReportEntry {
    /// Whether the input resolved to a candidate.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.best.is_some()
    }
}
