//! Data models
//!
//! The journal document: day records, entries, presets, and the app state
//! snapshot that is persisted, exported, and synced as one unit.

mod day;
mod preset;
mod snapshot;

pub use day::{DailyTotals, DayRecord, DayType, ExerciseEntry, FoodEntry};
pub use preset::{
    ExercisePreset, ExercisePresetUpdate, FoodPreset, FoodPresetUpdate, PresetItem,
};
pub use snapshot::{parse_import, AppState};

use uuid::Uuid;

/// Generate a prefixed entity id ("food-", "ex-", "preset-", ...)
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
