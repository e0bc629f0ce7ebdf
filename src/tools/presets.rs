//! Preset registry tools
//!
//! CRUD over food and exercise presets, plus applying a preset to a day.
//! Deletion is gated behind a force flag to protect against accidental
//! removal from a conversational client.

use serde::Serialize;

use crate::journal::Journal;
use crate::models::{
    DailyTotals, ExerciseEntry, ExercisePreset, ExercisePresetUpdate, FoodEntry, FoodPreset,
    FoodPresetUpdate, PresetItem,
};
use crate::store::days;
use crate::store::presets::{self, NewExercisePreset, NewFoodPreset};

/// Response for list_presets
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPresetsResponse {
    pub presets: Vec<FoodPreset>,
    pub exercise_presets: Vec<ExercisePreset>,
}

/// Response for delete_food_preset / delete_exercise_preset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePresetResponse {
    pub deleted: bool,
    pub message: String,
}

/// Response for apply_food_preset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFoodPresetResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<FoodEntry>,
    pub totals: DailyTotals,
}

/// Response for apply_exercise_preset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyExercisePresetResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<ExerciseEntry>,
    pub totals: DailyTotals,
}

/// List all presets
pub fn list_presets(journal: &Journal) -> ListPresetsResponse {
    let state = journal.state();
    ListPresetsResponse {
        presets: state.presets.clone(),
        exercise_presets: state.exercise_presets.clone(),
    }
}

/// Create a food preset
pub fn add_food_preset(
    journal: &mut Journal,
    name: &str,
    calories: i64,
    description: Option<String>,
    items: Option<Vec<PresetItem>>,
) -> Result<FoodPreset, String> {
    journal
        .mutate(|state| {
            presets::create_food_preset(
                state,
                NewFoodPreset {
                    name: name.to_string(),
                    default_calories: calories,
                    description,
                    items,
                },
            )
        })
        .map_err(|e| e.to_string())
}

/// Partially update a food preset by id
pub fn update_food_preset(
    journal: &mut Journal,
    id: &str,
    update: FoodPresetUpdate,
) -> Result<FoodPreset, String> {
    journal
        .mutate(|state| presets::update_food_preset(state, id, update))
        .map_err(|e| e.to_string())
}

/// Delete a food preset (requires force)
pub fn delete_food_preset(
    journal: &mut Journal,
    id: &str,
    force: bool,
) -> Result<DeletePresetResponse, String> {
    if !force {
        return Ok(DeletePresetResponse {
            deleted: false,
            message: "Deleting a preset cannot be undone. Call again with force=true to confirm."
                .to_string(),
        });
    }
    let removed = journal
        .mutate(|state| presets::delete_food_preset(state, id))
        .map_err(|e| e.to_string())?;
    Ok(DeletePresetResponse {
        deleted: true,
        message: format!(
            "Deleted preset '{}'. Entries logged from it are unchanged.",
            removed.name
        ),
    })
}

/// Apply a food preset to a date. An unknown preset id is reported, not an
/// error, and changes nothing.
pub fn apply_food_preset(
    journal: &mut Journal,
    preset_id: &str,
    date: &str,
) -> Result<ApplyFoodPresetResponse, String> {
    journal
        .mutate(|state| {
            let entry = presets::instantiate_food(state, preset_id, date)?;
            Ok(ApplyFoodPresetResponse {
                applied: entry.is_some(),
                entry,
                totals: days::daily_totals(state, date),
            })
        })
        .map_err(|e| e.to_string())
}

/// Create an exercise preset
pub fn add_exercise_preset(
    journal: &mut Journal,
    name: &str,
    duration_minutes: i64,
    calories_burned: i64,
    description: Option<String>,
) -> Result<ExercisePreset, String> {
    journal
        .mutate(|state| {
            presets::create_exercise_preset(
                state,
                NewExercisePreset {
                    name: name.to_string(),
                    duration_minutes,
                    calories_burned,
                    description,
                },
            )
        })
        .map_err(|e| e.to_string())
}

/// Partially update an exercise preset by id
pub fn update_exercise_preset(
    journal: &mut Journal,
    id: &str,
    update: ExercisePresetUpdate,
) -> Result<ExercisePreset, String> {
    journal
        .mutate(|state| presets::update_exercise_preset(state, id, update))
        .map_err(|e| e.to_string())
}

/// Delete an exercise preset (requires force)
pub fn delete_exercise_preset(
    journal: &mut Journal,
    id: &str,
    force: bool,
) -> Result<DeletePresetResponse, String> {
    if !force {
        return Ok(DeletePresetResponse {
            deleted: false,
            message: "Deleting a preset cannot be undone. Call again with force=true to confirm."
                .to_string(),
        });
    }
    let removed = journal
        .mutate(|state| presets::delete_exercise_preset(state, id))
        .map_err(|e| e.to_string())?;
    Ok(DeletePresetResponse {
        deleted: true,
        message: format!(
            "Deleted preset '{}'. Entries logged from it are unchanged.",
            removed.name
        ),
    })
}

/// Apply an exercise preset to a date
pub fn apply_exercise_preset(
    journal: &mut Journal,
    preset_id: &str,
    date: &str,
) -> Result<ApplyExercisePresetResponse, String> {
    journal
        .mutate(|state| {
            let entry = presets::instantiate_exercise(state, preset_id, date)?;
            Ok(ApplyExercisePresetResponse {
                applied: entry.is_some(),
                entry,
                totals: days::daily_totals(state, date),
            })
        })
        .map_err(|e| e.to_string())
}
