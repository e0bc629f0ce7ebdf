//! Preset models
//!
//! Reusable templates that can be instantiated into a day's entries: food
//! presets ("meals", optionally with a sub-item breakdown) and exercise
//! presets.

use serde::{Deserialize, Serialize};

/// A named sub-item of a food preset, used as a provenance/detail list for
/// editing. When sub-items are present the preset's total calorie value is
/// always their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetItem {
    pub name: String,
    pub calories: i64,
}

/// A reusable meal template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreset {
    pub id: String,
    pub name: String,
    pub default_calories: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PresetItem>>,
}

impl FoodPreset {
    /// Total calorie value: the sub-item sum when sub-items exist, the
    /// stored value otherwise.
    pub fn total_calories(&self) -> i64 {
        match &self.items {
            Some(items) if !items.is_empty() => items.iter().map(|i| i.calories).sum(),
            _ => self.default_calories,
        }
    }

    /// Re-derive the stored total from sub-items. A manual total is never
    /// trusted while sub-items are present.
    pub fn recompute_total(&mut self) {
        if let Some(items) = &self.items {
            if !items.is_empty() {
                self.default_calories = items.iter().map(|i| i.calories).sum();
            }
        }
    }
}

/// Partial update for a food preset; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct FoodPresetUpdate {
    pub name: Option<String>,
    pub default_calories: Option<i64>,
    pub description: Option<String>,
    /// `Some(vec![])` clears the sub-item list
    pub items: Option<Vec<PresetItem>>,
}

/// A reusable exercise template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePreset {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub calories_burned: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for an exercise preset; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ExercisePresetUpdate {
    pub name: Option<String>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset_with_items() -> FoodPreset {
        FoodPreset {
            id: "preset-1".to_string(),
            name: "Breakfast".to_string(),
            default_calories: 999,
            description: None,
            items: Some(vec![
                PresetItem {
                    name: "a".to_string(),
                    calories: 100,
                },
                PresetItem {
                    name: "b".to_string(),
                    calories: 50,
                },
            ]),
        }
    }

    #[test]
    fn test_total_is_item_sum_when_items_present() {
        // An inconsistent manual total never wins over the item sum
        let preset = preset_with_items();
        assert_eq!(preset.total_calories(), 150);
    }

    #[test]
    fn test_recompute_overwrites_stored_total() {
        let mut preset = preset_with_items();
        preset.recompute_total();
        assert_eq!(preset.default_calories, 150);
    }

    #[test]
    fn test_total_uses_stored_value_without_items() {
        let mut preset = preset_with_items();
        preset.items = None;
        preset.default_calories = 420;
        assert_eq!(preset.total_calories(), 420);
        // recompute with no items leaves the stored value alone
        preset.recompute_total();
        assert_eq!(preset.default_calories, 420);
    }

    #[test]
    fn test_serde_field_names() {
        let preset = preset_with_items();
        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains("\"defaultCalories\""));
    }
}
