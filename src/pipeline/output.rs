//! Where rendered reports go, and in which format.

use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

/// Destination of a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `None` means stdout.
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Only stdout attached to a TTY counts; files never do.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }

    /// Resolve [`ReportFormat::Auto`] for this target.
    ///
    /// People at a terminal get a table, pipes and files get JSON.
    #[must_use]
    pub fn resolve_format(&self, format: ReportFormat) -> ReportFormat {
        if format != ReportFormat::Auto {
            return format;
        }
        if self.is_terminal() {
            ReportFormat::Table
        } else {
            ReportFormat::Json
        }
    }

    /// Write `content` followed by a newline on stdout, or verbatim to the file.
    pub fn write(&self, content: &str, quiet: bool) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{content}").context("Failed to write to stdout")?;
            }
            Self::File(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                if !quiet {
                    tracing::info!("Report written to {}", path.display());
                }
            }
        }
        Ok(())
    }
}

/// Colors are on unless `--no-color` is given or `NO_COLOR` is set.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none()
}
