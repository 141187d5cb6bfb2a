//! Leaderboard command handler.

use crate::config::AppConfig;
use crate::leaderboard::Aggregator;
use crate::pipeline::{exit_codes, load_rows, should_use_color, OutputTarget};
use crate::reports::create_reporter;
use anyhow::{Context, Result};
use std::path::Path;

/// Aggregate taste-test rows into a ranked leaderboard and write it out.
pub fn run_leaderboard(rows_path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let rows = load_rows(rows_path)
        .with_context(|| format!("Failed to load taste tests: {}", rows_path.display()))?;

    let sort = config.leaderboard.sort_config();
    let products = Aggregator::new()
        .with_policy(config.leaderboard.null_rating)
        .aggregate(&rows, &sort);

    if !quiet {
        tracing::info!(
            "Aggregated {} rows into {} products (sorted by {} {})",
            rows.len(),
            products.len(),
            sort.column,
            sort.direction
        );
    }

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = target.resolve_format(config.output.format);
    let reporter = create_reporter(format, should_use_color(config.output.no_color));
    let report = reporter.generate_leaderboard_report(&products)?;
    target.write(&report, quiet)?;

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::NullRatingPolicy;
    use crate::reports::ReportFormat;

    #[test]
    fn test_run_leaderboard_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = dir.path().join("rows.json");
        std::fs::write(
            &rows,
            r#"[
                {"product_id": "p1", "rating": 9, "brand_name": "Oatly"},
                {"product_id": "p1"},
                {"product_id": "p2", "rating": 6, "brand_name": "Alpro"}
            ]"#,
        )
        .unwrap();
        let out = dir.path().join("board.json");

        let config = AppConfig::builder()
            .null_rating(NullRatingPolicy::Exclude)
            .output_format(ReportFormat::Json)
            .output_file(Some(out.clone()))
            .build();

        assert_eq!(run_leaderboard(&rows, &config, true).unwrap(), exit_codes::SUCCESS);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        let results = json["results"].as_array().unwrap();
        assert_eq!(results[0]["product_id"], "p1");
        assert_eq!(results[0]["avg_rating"], 9.0);
        assert_eq!(results[0]["count"], 1);
    }

    #[test]
    fn test_missing_rows_file_is_error() {
        let err = run_leaderboard(Path::new("/nonexistent.json"), &AppConfig::default(), true)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load taste tests"));
    }
}
