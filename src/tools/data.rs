//! Backup and lookup tools
//!
//! Whole-document export and import, and the calorie lookup passthrough.
//! Import over a non-empty journal is gated behind a force flag since it
//! replaces everything.

use std::path::Path;

use serde::Serialize;

use crate::journal::Journal;
use crate::lookup::{lookup_calories, CalorieEstimate};
use crate::models::parse_import;
use crate::persist::export::export_snapshot;

/// Response for export_data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub file_path: String,
    pub days: usize,
    pub presets: usize,
    pub exercise_presets: usize,
}

/// Response for import_data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: bool,
    pub message: String,
    pub days: usize,
    pub presets: usize,
}

/// Response for lookup_food_calories
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<CalorieEstimate>,
}

/// Export the whole journal to a dated backup file in `dir`
pub fn export_data(journal: &Journal, dir: &Path) -> Result<ExportResponse, String> {
    let state = journal.state();
    let path = export_snapshot(state, dir).map_err(|e| e.to_string())?;
    Ok(ExportResponse {
        file_path: path.display().to_string(),
        days: state.days.len(),
        presets: state.presets.len(),
        exercise_presets: state.exercise_presets.len(),
    })
}

/// Import a backup document, replacing the whole journal.
///
/// Validation happens before anything changes; a non-empty journal is only
/// overwritten with force=true.
pub fn import_data(journal: &mut Journal, json: &str, force: bool) -> Result<ImportResponse, String> {
    let incoming = parse_import(json).map_err(|e| e.to_string())?;

    if !journal.state().is_empty() && !force {
        return Ok(ImportResponse {
            imported: false,
            message: "The journal is not empty; importing replaces everything. Call again with force=true to confirm.".to_string(),
            days: journal.state().days.len(),
            presets: journal.state().presets.len(),
        });
    }

    let days = incoming.days.len();
    let presets = incoming.presets.len();
    journal.replace_state(incoming).map_err(|e| e.to_string())?;

    Ok(ImportResponse {
        imported: true,
        message: format!("Imported {} days and {} presets.", days, presets),
        days,
        presets,
    })
}

/// Look up a calorie estimate for a food query
pub async fn lookup_food_calories(
    http: &reqwest::Client,
    query: &str,
) -> Result<LookupResponse, String> {
    let estimate = lookup_calories(http, query).await?;
    Ok(LookupResponse {
        found: estimate.is_some(),
        estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::store::days::set_weight;
    use crate::weight::WeightUnit;

    fn test_journal() -> Journal {
        Journal::open(Box::new(MemoryStore::default())).unwrap()
    }

    #[test]
    fn test_import_into_empty_journal_needs_no_force() {
        let mut journal = test_journal();
        let response = import_data(&mut journal, r#"{"days": [], "presets": []}"#, false).unwrap();
        assert!(response.imported);
    }

    #[test]
    fn test_import_over_data_requires_force() {
        let mut journal = test_journal();
        journal
            .mutate(|s| set_weight(s, "2025-01-13", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();

        let blocked = import_data(&mut journal, r#"{"days": [], "presets": []}"#, false).unwrap();
        assert!(!blocked.imported);
        assert_eq!(journal.state().days.len(), 1);

        let replaced = import_data(&mut journal, r#"{"days": [], "presets": []}"#, true).unwrap();
        assert!(replaced.imported);
        assert!(journal.state().is_empty());
    }

    #[test]
    fn test_invalid_import_changes_nothing() {
        let mut journal = test_journal();
        journal
            .mutate(|s| set_weight(s, "2025-01-13", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();

        assert!(import_data(&mut journal, r#"{"presets": []}"#, true).is_err());
        assert_eq!(journal.state().days.len(), 1);
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let mut journal = test_journal();
        journal
            .mutate(|s| set_weight(s, "2025-01-13", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let exported = export_data(&journal, dir.path()).unwrap();
        assert_eq!(exported.days, 1);

        let json = std::fs::read_to_string(&exported.file_path).unwrap();
        let mut fresh = test_journal();
        let response = import_data(&mut fresh, &json, false).unwrap();
        assert!(response.imported);
        assert_eq!(fresh.state().days[0].weight_lb, Some(150.0));
    }
}
