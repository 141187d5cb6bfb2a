//! Match command handler.
//!
//! Implements the `match` subcommand: resolve typed names against a list of
//! known brands or products.

use crate::config::AppConfig;
use crate::matching::{NameMatch, NameMatcher, NamedEntity};
use crate::pipeline::{exit_codes, load_candidates, should_use_color, OutputTarget};
use crate::reports::{create_reporter, MatchReportEntry, MatchedCandidate};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the match command, returning the desired exit code.
///
/// Exits with [`exit_codes::NO_MATCH`] when any input has no candidate at or
/// above the threshold.
pub fn run_match(
    inputs: &[String],
    candidates_path: &Path,
    config: &AppConfig,
    with_suggestions: bool,
    quiet: bool,
) -> Result<i32> {
    let candidates = load_candidates(candidates_path)
        .with_context(|| format!("Failed to load candidates: {}", candidates_path.display()))?;

    let matcher = NameMatcher::new(config.matching.to_name_match_config());
    if !quiet {
        tracing::info!(
            "Matching {} name(s) against {} candidates (threshold {:.2})",
            inputs.len(),
            candidates.len(),
            matcher.config().threshold
        );
    }

    let entries = build_entries(&matcher, inputs, &candidates, with_suggestions);
    let unmatched = entries.iter().filter(|e| !e.is_matched()).count();

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = target.resolve_format(config.output.format);
    let reporter = create_reporter(format, should_use_color(config.output.no_color));
    let report = reporter.generate_match_report(&entries)?;
    target.write(&report, quiet)?;

    Ok(if unmatched > 0 {
        exit_codes::NO_MATCH
    } else {
        exit_codes::SUCCESS
    })
}

/// Resolve every input, keeping input order.
pub(crate) fn build_entries(
    matcher: &NameMatcher,
    inputs: &[String],
    candidates: &[NamedEntity],
    with_suggestions: bool,
) -> Vec<MatchReportEntry> {
    let best = matcher.match_batch(inputs, candidates);

    inputs
        .iter()
        .zip(best)
        .map(|(input, best)| MatchReportEntry {
            input: input.clone(),
            best: best.map(to_candidate),
            suggestions: if with_suggestions {
                matcher
                    .suggestions(input, candidates)
                    .into_iter()
                    .map(to_candidate)
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn to_candidate(m: NameMatch<'_, NamedEntity>) -> MatchedCandidate {
    MatchedCandidate {
        id: m.candidate.id.clone(),
        name: m.candidate.name.clone(),
        score: m.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brands() -> Vec<NamedEntity> {
        vec![
            NamedEntity::new("b1", "Oatly"),
            NamedEntity::new("b2", "Alpro"),
            NamedEntity::new("b3", "Oatside"),
        ]
    }

    #[test]
    fn test_entries_keep_input_order() {
        let inputs = vec!["alpro".to_string(), "Nothing Like It".to_string()];
        let entries = build_entries(&NameMatcher::default(), &inputs, &brands(), false);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].best.as_ref().map(|c| c.id.as_str()), Some("b2"));
        assert_eq!(entries[0].best.as_ref().map(|c| c.score), Some(1.0));
        assert!(entries[1].best.is_none());
        assert!(entries[0].suggestions.is_empty());
    }

    #[test]
    fn test_run_match_writes_json_and_reports_miss() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidates = dir.path().join("brands.json");
        std::fs::write(&candidates, r#"["Oatly", "Alpro"]"#).unwrap();
        let out = dir.path().join("out.json");

        let config = AppConfig::builder()
            .output_format(crate::reports::ReportFormat::Json)
            .output_file(Some(out.clone()))
            .build();

        let inputs = vec!["Oatlly".to_string(), "zzz".to_string()];
        let code = run_match(&inputs, &candidates, &config, true, true).unwrap();
        assert_eq!(code, exit_codes::NO_MATCH);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json["results"][0]["best"]["name"], "Oatly");
        assert!(json["results"][1]["best"].is_null());
    }
}
