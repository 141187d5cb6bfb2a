//! JSON report generator.

use super::{MatchReportEntry, ReportError, ReportFormat, ReportGenerator};
use crate::leaderboard::AggregatedProduct;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, kind: &'static str, results: T) -> Result<String, ReportError> {
        let report = JsonReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
                generated_at: Utc::now().to_rfc3339(),
                report: kind,
            },
            results,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_match_report(&self, entries: &[MatchReportEntry]) -> Result<String, ReportError> {
        self.render("match", entries)
    }

    fn generate_leaderboard_report(
        &self,
        products: &[AggregatedProduct],
    ) -> Result<String, ReportError> {
        self.render("leaderboard", products)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// ============================================================================
// JSON structures
// ============================================================================

#[derive(Serialize)]
struct JsonReport<T> {
    metadata: JsonReportMetadata,
    results: T,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    report: &'static str,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}
