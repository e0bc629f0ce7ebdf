//! Sync payloads and merge semantics
//!
//! A payload carries any subset of the three top-level collections.
//! Merging is last-writer-wins at collection granularity: a present
//! collection replaces the stored one wholesale, an absent collection is
//! left untouched. Nothing is merged element-by-element.

use serde::{Deserialize, Serialize};

use crate::models::{AppState, DayRecord, ExercisePreset, FoodPreset};

/// A partial journal document exchanged with the remote store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Vec<FoodPreset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_presets: Option<Vec<ExercisePreset>>,
}

impl SyncPayload {
    /// Payload carrying the whole document
    pub fn full(state: &AppState) -> Self {
        Self {
            days: Some(state.days.clone()),
            presets: Some(state.presets.clone()),
            exercise_presets: Some(state.exercise_presets.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_none() && self.presets.is_none() && self.exercise_presets.is_none()
    }
}

/// Apply a payload onto a state in place.
///
/// The day store's sort order is re-established after a replacement so a
/// remote writer can never leave the store unsorted.
pub fn apply_payload(state: &mut AppState, payload: SyncPayload) {
    if let Some(days) = payload.days {
        state.days = days;
        state.days.sort_by(|a, b| a.date.cmp(&b.date));
    }
    if let Some(presets) = payload.presets {
        state.presets = presets;
    }
    if let Some(exercise_presets) = payload.exercise_presets {
        state.exercise_presets = exercise_presets;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::days::set_weight;
    use crate::store::presets::{create_food_preset, NewFoodPreset};
    use crate::weight::WeightUnit;

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        set_weight(&mut state, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        create_food_preset(
            &mut state,
            NewFoodPreset {
                name: "Usual lunch".to_string(),
                default_calories: 650,
                ..Default::default()
            },
        )
        .unwrap();
        state
    }

    #[test]
    fn test_full_payload_round_trips() {
        let source = sample_state();
        let mut target = AppState::default();
        apply_payload(&mut target, SyncPayload::full(&source));
        assert_eq!(target.days.len(), 1);
        assert_eq!(target.presets.len(), 1);
    }

    #[test]
    fn test_partial_payload_leaves_absent_collections_untouched() {
        let mut state = sample_state();
        apply_payload(
            &mut state,
            SyncPayload {
                days: Some(vec![]),
                ..Default::default()
            },
        );
        assert!(state.days.is_empty());
        // Presets were not in the payload
        assert_eq!(state.presets.len(), 1);
    }

    #[test]
    fn test_applied_days_are_resorted() {
        let mut source = AppState::default();
        set_weight(&mut source, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        set_weight(&mut source, "2025-01-10", Some(151.0), WeightUnit::Lb).unwrap();
        let mut unsorted = source.days.clone();
        unsorted.reverse();

        let mut target = AppState::default();
        apply_payload(
            &mut target,
            SyncPayload {
                days: Some(unsorted),
                ..Default::default()
            },
        );
        assert_eq!(target.days[0].date, "2025-01-10");
    }

    #[test]
    fn test_payload_serializes_camel_case_and_skips_absent() {
        let payload = SyncPayload {
            exercise_presets: Some(vec![]),
            ..Default::default()
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"exercisePresets":[]}"#);
    }
}
