//! Report generation for match and leaderboard results.
//!
//! Two output formats are available:
//! - JSON: structured data with tool metadata, for scripts
//! - Table: aligned columns for the terminal

mod json;
mod table;
mod types;

pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{MatchReportEntry, MatchedCandidate, ReportFormat};

use crate::leaderboard::AggregatedProduct;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render name-match results
    fn generate_match_report(&self, entries: &[MatchReportEntry]) -> Result<String, ReportError>;

    /// Render an ordered leaderboard
    fn generate_leaderboard_report(
        &self,
        products: &[AggregatedProduct],
    ) -> Result<String, ReportError>;

    /// Write a leaderboard report to a writer
    fn write_leaderboard_report(
        &self,
        products: &[AggregatedProduct],
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_leaderboard_report(products)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format.
///
/// `Auto` must be resolved by the caller first; it falls back to JSON here.
#[must_use]
pub fn create_reporter(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Table => {
            let reporter = TableReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
        ReportFormat::Json | ReportFormat::Auto => Box::new(JsonReporter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reporter_formats() {
        assert_eq!(create_reporter(ReportFormat::Table, false).format(), ReportFormat::Table);
        assert_eq!(create_reporter(ReportFormat::Json, true).format(), ReportFormat::Json);
        assert_eq!(create_reporter(ReportFormat::Auto, true).format(), ReportFormat::Json);
    }

    #[test]
    fn test_write_leaderboard_report() {
        let products = crate::leaderboard::aggregate(
            &[crate::leaderboard::TasteTestRow::new("p1", 7.5).with_names("Oatly", "Barista")],
            &crate::leaderboard::SortConfig::default(),
        );
        let mut buf = Vec::new();
        create_reporter(ReportFormat::Table, false)
            .write_leaderboard_report(&products, &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Oatly"));
        assert!(text.contains("7.50"));
    }
}
