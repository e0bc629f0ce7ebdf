//! App state snapshot
//!
//! The whole journal document. Persisted, exported, imported, and synced
//! atomically, never partially.

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};

use super::{DayRecord, ExercisePreset, FoodPreset};

/// The full journal state: one day store, one food preset collection, one
/// exercise preset collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub days: Vec<DayRecord>,
    #[serde(default)]
    pub presets: Vec<FoodPreset>,
    #[serde(default)]
    pub exercise_presets: Vec<ExercisePreset>,
}

impl AppState {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.presets.is_empty() && self.exercise_presets.is_empty()
    }
}

/// Parse an import document.
///
/// Requires the top-level `days` and `presets` keys; a missing
/// `exercisePresets` defaults to empty. Rejection happens before any state
/// mutation, so a bad document can never leave partial state behind.
pub fn parse_import(json: &str) -> JournalResult<AppState> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| JournalError::Import(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| JournalError::Import("expected a JSON object".to_string()))?;
    for key in ["days", "presets"] {
        if !obj.contains_key(key) {
            return Err(JournalError::Import(format!(
                "missing required key '{}'",
                key
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| JournalError::Import(e.to_string()))
}
