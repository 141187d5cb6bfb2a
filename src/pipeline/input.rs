//! Loading candidate lists and taste-test rows from JSON files.

use crate::error::{InputErrorKind, MilkrateError, Result};
use crate::leaderboard::TasteTestRow;
use crate::matching::NamedEntity;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// A candidate is either a bare name or a full `{ "id", "name" }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateEntry {
    Name(String),
    Entity(NamedEntity),
}

impl From<CandidateEntry> for NamedEntity {
    fn from(entry: CandidateEntry) -> Self {
        match entry {
            CandidateEntry::Name(name) => Self::new(name.clone(), name),
            CandidateEntry::Entity(entity) => entity,
        }
    }
}

/// Load the list of known brands or products to match against.
///
/// Accepts a JSON array of names or of `{ "id", "name" }` objects; bare
/// names double as their own id.
pub fn load_candidates(path: &Path) -> Result<Vec<NamedEntity>> {
    let entries: Vec<CandidateEntry> = load_json_array(path, "candidates")?;
    tracing::debug!("Loaded {} candidates from {}", entries.len(), path.display());
    Ok(entries.into_iter().map(NamedEntity::from).collect())
}

/// Load taste-test rows.
pub fn load_rows(path: &Path) -> Result<Vec<TasteTestRow>> {
    let rows: Vec<TasteTestRow> = load_json_array(path, "taste-test rows")?;
    tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse candidates from an in-memory JSON string.
pub fn parse_candidates(json: &str) -> Result<Vec<NamedEntity>> {
    let entries: Vec<CandidateEntry> = parse_json_array(json, "<inline>", "candidates")?;
    Ok(entries.into_iter().map(NamedEntity::from).collect())
}

/// Parse taste-test rows from an in-memory JSON string.
pub fn parse_rows(json: &str) -> Result<Vec<TasteTestRow>> {
    parse_json_array(json, "<inline>", "taste-test rows")
}

fn load_json_array<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path).map_err(|e| MilkrateError::io(path, e))?;
    parse_json_array(&content, &path.display().to_string(), what)
}

fn parse_json_array<T: DeserializeOwned>(
    json: &str,
    origin: &str,
    what: &'static str,
) -> Result<Vec<T>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        MilkrateError::input(origin, InputErrorKind::InvalidJson(e.to_string()))
    })?;

    if !value.is_array() {
        return Err(MilkrateError::input(origin, InputErrorKind::NotAnArray(what)));
    }

    serde_json::from_value(value)
        .map_err(|e| MilkrateError::input(origin, InputErrorKind::InvalidJson(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Named;

    #[test]
    fn test_candidates_accept_names_and_objects() {
        let candidates =
            parse_candidates(r#"["Oatly", {"id": "b2", "name": "Alpro"}]"#).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "Oatly");
        assert_eq!(candidates[1].name(), "Alpro");
    }

    #[test]
    fn test_rows_tolerate_missing_fields() {
        let rows = parse_rows(
            r#"[
                {"product_id": "p1", "rating": 8, "brand_name": "Oatly"},
                {"product_id": "p1"},
                {"rating": 3.5}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].rating, Some(8.0));
        assert_eq!(rows[1].rating, None);
        assert_eq!(rows[2].product_id, None);
    }

    #[test]
    fn test_object_is_not_an_array() {
        let err = parse_rows(r#"{"product_id": "p1"}"#).unwrap_err();
        assert!(matches!(
            err,
            MilkrateError::Input {
                source: InputErrorKind::NotAnArray(_),
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_candidates("[\"Oatly\",").unwrap_err();
        assert!(matches!(
            err,
            MilkrateError::Input {
                source: InputErrorKind::InvalidJson(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_rows(Path::new("/nonexistent/rows.json")).unwrap_err();
        assert!(matches!(err, MilkrateError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk_carries_path_context() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "42").unwrap();

        let err = load_rows(&path).unwrap_err();
        assert!(err.to_string().contains("rows.json"));
    }
}
