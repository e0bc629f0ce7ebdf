//! Preset registry
//!
//! Reusable meal and exercise templates. Presets are edited in place by id
//! and instantiated into day entries; entries keep a back-reference only,
//! so deleting a preset never cascades to entries derived from it.

use crate::error::{JournalError, JournalResult};
use crate::models::{
    new_id, AppState, ExerciseEntry, ExercisePreset, ExercisePresetUpdate, FoodEntry, FoodPreset,
    FoodPresetUpdate, PresetItem,
};

use super::days::{self, NewExercise, NewFood};

/// Fields for a new food preset
#[derive(Debug, Clone, Default)]
pub struct NewFoodPreset {
    pub name: String,
    pub default_calories: i64,
    pub description: Option<String>,
    pub items: Option<Vec<PresetItem>>,
}

/// Fields for a new exercise preset
#[derive(Debug, Clone, Default)]
pub struct NewExercisePreset {
    pub name: String,
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub description: Option<String>,
}

fn normalize_items(items: Option<Vec<PresetItem>>) -> JournalResult<Option<Vec<PresetItem>>> {
    match items {
        None => Ok(None),
        Some(items) if items.is_empty() => Ok(None),
        Some(items) => {
            for item in &items {
                if item.name.trim().is_empty() {
                    return Err(JournalError::Validation(
                        "preset item name is required".to_string(),
                    ));
                }
            }
            Ok(Some(items))
        }
    }
}

/// Create a food preset. When sub-items are supplied the total calorie
/// value is derived from them, not from the caller's number.
pub fn create_food_preset(state: &mut AppState, new: NewFoodPreset) -> JournalResult<FoodPreset> {
    if new.name.trim().is_empty() {
        return Err(JournalError::Validation(
            "preset name is required".to_string(),
        ));
    }
    if new.default_calories < 0 {
        return Err(JournalError::Validation(
            "preset calories must be non-negative".to_string(),
        ));
    }

    let mut preset = FoodPreset {
        id: new_id("preset"),
        name: new.name.trim().to_string(),
        default_calories: new.default_calories,
        description: new.description.filter(|s| !s.is_empty()),
        items: normalize_items(new.items)?,
    };
    preset.recompute_total();

    state.presets.push(preset.clone());
    Ok(preset)
}

/// Partially update a food preset by id. Only supplied fields change; id
/// and position in the collection are preserved.
///
/// Supplying an empty item list clears the sub-items; in that case a
/// simultaneously supplied manual total is honored, otherwise the previous
/// total stands.
pub fn update_food_preset(
    state: &mut AppState,
    id: &str,
    update: FoodPresetUpdate,
) -> JournalResult<FoodPreset> {
    // Validate everything up front so a rejected update changes nothing
    let items = match update.items {
        None => None,
        Some(items) => Some(normalize_items(Some(items))?),
    };
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(JournalError::Validation(
                "preset name is required".to_string(),
            ));
        }
    }
    if update.default_calories.is_some_and(|c| c < 0) {
        return Err(JournalError::Validation(
            "preset calories must be non-negative".to_string(),
        ));
    }

    let preset = state
        .presets
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| JournalError::NotFound(format!("food preset {}", id)))?;

    if let Some(name) = update.name {
        preset.name = name.trim().to_string();
    }
    if let Some(calories) = update.default_calories {
        preset.default_calories = calories;
    }
    if let Some(description) = update.description {
        preset.description = Some(description).filter(|s| !s.is_empty());
    }
    if let Some(items) = items {
        preset.items = items;
    }
    preset.recompute_total();

    Ok(preset.clone())
}

/// Delete a food preset by id. Entries instantiated from it keep their
/// copied name and calories.
pub fn delete_food_preset(state: &mut AppState, id: &str) -> JournalResult<FoodPreset> {
    let index = state
        .presets
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| JournalError::NotFound(format!("food preset {}", id)))?;
    Ok(state.presets.remove(index))
}

/// Instantiate a food preset into a day's entries. An unknown preset id is
/// a no-op, reported as `None`.
pub fn instantiate_food(
    state: &mut AppState,
    preset_id: &str,
    date: &str,
) -> JournalResult<Option<FoodEntry>> {
    let Some(preset) = state.presets.iter().find(|p| p.id == preset_id) else {
        return Ok(None);
    };
    let new = NewFood {
        name: preset.name.clone(),
        calories: preset.total_calories(),
        category: Some("Other".to_string()),
        from_preset_id: Some(preset.id.clone()),
        ..Default::default()
    };
    days::append_food(state, date, new).map(Some)
}

/// Create an exercise preset
pub fn create_exercise_preset(
    state: &mut AppState,
    new: NewExercisePreset,
) -> JournalResult<ExercisePreset> {
    if new.name.trim().is_empty() {
        return Err(JournalError::Validation(
            "preset name is required".to_string(),
        ));
    }
    if new.duration_minutes <= 0 {
        return Err(JournalError::Validation(format!(
            "duration must be positive, got {}",
            new.duration_minutes
        )));
    }
    if new.calories_burned < 0 {
        return Err(JournalError::Validation(
            "calories burned must be non-negative".to_string(),
        ));
    }

    let preset = ExercisePreset {
        id: new_id("expreset"),
        name: new.name.trim().to_string(),
        duration_minutes: new.duration_minutes,
        calories_burned: new.calories_burned,
        description: new.description.filter(|s| !s.is_empty()),
    };
    state.exercise_presets.push(preset.clone());
    Ok(preset)
}

/// Partially update an exercise preset by id
pub fn update_exercise_preset(
    state: &mut AppState,
    id: &str,
    update: ExercisePresetUpdate,
) -> JournalResult<ExercisePreset> {
    // Validate everything up front so a rejected update changes nothing
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(JournalError::Validation(
            "preset name is required".to_string(),
        ));
    }
    if let Some(duration) = update.duration_minutes {
        if duration <= 0 {
            return Err(JournalError::Validation(format!(
                "duration must be positive, got {}",
                duration
            )));
        }
    }
    if update.calories_burned.is_some_and(|c| c < 0) {
        return Err(JournalError::Validation(
            "calories burned must be non-negative".to_string(),
        ));
    }

    let preset = state
        .exercise_presets
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| JournalError::NotFound(format!("exercise preset {}", id)))?;

    if let Some(name) = update.name {
        preset.name = name.trim().to_string();
    }
    if let Some(duration) = update.duration_minutes {
        preset.duration_minutes = duration;
    }
    if let Some(burned) = update.calories_burned {
        preset.calories_burned = burned;
    }
    if let Some(description) = update.description {
        preset.description = Some(description).filter(|s| !s.is_empty());
    }

    Ok(preset.clone())
}

/// Delete an exercise preset by id
pub fn delete_exercise_preset(state: &mut AppState, id: &str) -> JournalResult<ExercisePreset> {
    let index = state
        .exercise_presets
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| JournalError::NotFound(format!("exercise preset {}", id)))?;
    Ok(state.exercise_presets.remove(index))
}

/// Instantiate an exercise preset into a day's entries; unknown ids are a
/// no-op, reported as `None`
pub fn instantiate_exercise(
    state: &mut AppState,
    preset_id: &str,
    date: &str,
) -> JournalResult<Option<ExerciseEntry>> {
    let Some(preset) = state.exercise_presets.iter().find(|p| p.id == preset_id) else {
        return Ok(None);
    };
    let new = NewExercise {
        name: preset.name.clone(),
        duration_minutes: preset.duration_minutes,
        calories_burned: preset.calories_burned,
        from_preset_id: Some(preset.id.clone()),
    };
    days::append_exercise(state, date, new).map(Some)
}
