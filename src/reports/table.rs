//! Aligned table output for the terminal.
//!
//! Columns are sized by display width, so brand names with CJK characters or
//! emoji line up with plain ASCII rows.

use super::{MatchReportEntry, ReportError, ReportFormat, ReportGenerator};
use crate::leaderboard::AggregatedProduct;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a free-text column is allowed to grow
const MAX_COLUMN_WIDTH: usize = 32;

fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Table reporter for terminal output
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Lay out `rows` under `headers`, coloring each cell after padding.
    fn render(&self, headers: &[&str], rows: &[Vec<(String, &'static str)>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in rows {
            for (i, (cell, _)) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 2);
        let header: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| self.color(&pad(h, *w), "bold"))
            .collect();
        lines.push(header.join("  ").trim_end().to_string());
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("─".repeat(total));

        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|((cell, color), w)| self.color(&pad(cell, *w), color))
                .collect();
            lines.push(cells.join("  ").trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_match_report(&self, entries: &[MatchReportEntry]) -> Result<String, ReportError> {
        let rows: Vec<Vec<(String, &'static str)>> = entries
            .iter()
            .map(|entry| {
                let (name, score, color) = entry.best.as_ref().map_or_else(
                    || ("-".to_string(), "-".to_string(), "red"),
                    |best| (truncate(&best.name), format!("{:.2}", best.score), "green"),
                );
                let others: Vec<&str> = entry
                    .suggestions
                    .iter()
                    .filter(|s| entry.best.as_ref().map_or(true, |b| b.id != s.id))
                    .map(|s| s.name.as_str())
                    .collect();
                vec![
                    (truncate(&entry.input), ""),
                    (name, color),
                    (score, ""),
                    (others.join(", "), "dim"),
                ]
            })
            .collect();

        let mut out = self.render(&["INPUT", "MATCH", "SCORE", "ALSO CONSIDER"], &rows);
        let matched = entries.iter().filter(|e| e.is_matched()).count();
        out.push_str(&format!("\n\n{matched}/{} names matched", entries.len()));
        Ok(out)
    }

    fn generate_leaderboard_report(
        &self,
        products: &[AggregatedProduct],
    ) -> Result<String, ReportError> {
        let rows: Vec<Vec<(String, &'static str)>> = products
            .iter()
            .enumerate()
            .map(|(rank, p)| {
                vec![
                    ((rank + 1).to_string(), "dim"),
                    (truncate(&p.brand_name), ""),
                    (truncate(&p.product_name), ""),
                    (format!("{:.2}", p.avg_rating), rating_color(p.avg_rating)),
                    (p.count.to_string(), ""),
                ]
            })
            .collect();

        Ok(self.render(&["#", "BRAND", "PRODUCT", "AVG", "TESTS"], &rows))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Ratings are on a 0-10 scale.
fn rating_color(rating: f64) -> &'static str {
    if rating >= 7.0 {
        "green"
    } else if rating >= 4.0 {
        "yellow"
    } else {
        "red"
    }
}

/// Right-pad to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Cut to [`MAX_COLUMN_WIDTH`] display columns, ending with an ellipsis.
fn truncate(s: &str) -> String {
    if s.width() <= MAX_COLUMN_WIDTH {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > MAX_COLUMN_WIDTH - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{aggregate, SortConfig, TasteTestRow};
    use crate::reports::MatchedCandidate;

    #[test]
    fn test_columns_align_with_wide_chars() {
        let rows = vec![
            TasteTestRow::new("p1", 9.0).with_names("オーツ", "Barista"),
            TasteTestRow::new("p2", 3.0).with_names("Alpro", "Oat"),
        ];
        let board = aggregate(&rows, &SortConfig::default());
        let out = TableReporter::new()
            .no_color()
            .generate_leaderboard_report(&board)
            .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        // PRODUCT column starts at the same display offset on every row.
        let offsets: Vec<usize> = lines
            .iter()
            .filter(|l| !l.starts_with('─'))
            .map(|l| {
                let idx = l
                    .find("PRODUCT")
                    .or_else(|| l.find("Barista"))
                    .or_else(|| l.find("Oat"))
                    .unwrap();
                l[..idx].width()
            })
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] == w[1]), "{offsets:?}");
    }

    #[test]
    fn test_no_color_has_no_escapes() {
        let out = TableReporter::new()
            .no_color()
            .generate_leaderboard_report(&[])
            .unwrap();
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_match_report_lists_other_suggestions() {
        let candidate = |id: &str, name: &str, score: f64| MatchedCandidate {
            id: id.to_string(),
            name: name.to_string(),
            score,
        };
        let entries = vec![
            MatchReportEntry {
                input: "oatly barista".to_string(),
                best: Some(candidate("1", "Oatly Barista", 1.0)),
                suggestions: vec![
                    candidate("1", "Oatly Barista", 1.0),
                    candidate("2", "Oatly Barist", 0.92),
                ],
            },
            MatchReportEntry {
                input: "zzz".to_string(),
                best: None,
                suggestions: Vec::new(),
            },
        ];

        let out = TableReporter::new()
            .no_color()
            .generate_match_report(&entries)
            .unwrap();
        assert!(out.contains("Oatly Barist"));
        assert!(out.contains("1.00"));
        assert!(out.ends_with("1/2 names matched"));
    }

    #[test]
    fn test_truncate_by_display_width() {
        let long = "あ".repeat(40);
        let cut = truncate(&long);
        assert!(cut.width() <= MAX_COLUMN_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
