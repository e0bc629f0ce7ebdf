//! Day and entry tools
//!
//! Tools for reading days, setting weight, and logging food and exercise.

use serde::Serialize;

use crate::journal::Journal;
use crate::models::{DailyTotals, DayRecord, ExerciseEntry, FoodEntry, FoodPreset};
use crate::store::days::{self, NewExercise, NewFood};
use crate::store::presets::{self, NewFoodPreset};
use crate::weight::WeightUnit;

/// Response for get_or_create_day
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrCreateDayResponse {
    pub day: DayRecord,
    pub created: bool, // true if newly created, false if already existed
}

/// Day summary for listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: String,
    pub day_of_week: String,
    pub day_type: crate::models::DayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lb: Option<f64>,
    pub food_count: usize,
    pub exercise_count: usize,
    pub totals: DailyTotals,
}

/// Response for list_days
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDaysResponse {
    pub days: Vec<DaySummary>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Response for log_food
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFoodResponse {
    pub date: String,
    pub entry: FoodEntry,
    pub totals: DailyTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_preset: Option<FoodPreset>,
}

/// Response for log_exercise
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExerciseResponse {
    pub date: String,
    pub entry: ExerciseEntry,
    pub totals: DailyTotals,
}

/// Response for remove_food / remove_exercise
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveEntryResponse {
    pub date: String,
    pub removed: String,
    pub totals: DailyTotals,
}

/// Response for day_totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotalsResponse {
    pub date: String,
    pub totals: DailyTotals,
}

fn parse_unit(unit: Option<&str>) -> Result<WeightUnit, String> {
    match unit {
        None => Ok(WeightUnit::Lb),
        Some(s) => {
            WeightUnit::from_str(s).ok_or_else(|| format!("Unknown weight unit: '{}'", s))
        }
    }
}

fn summarize(day: &DayRecord) -> DaySummary {
    DaySummary {
        date: day.date.clone(),
        day_of_week: day.day_of_week.clone(),
        day_type: day.day_type,
        weight_lb: day.weight_lb,
        food_count: day.foods.len(),
        exercise_count: day.exercises.len(),
        totals: day.totals(),
    }
}

// ============================================================================
// Day Tools
// ============================================================================

/// Get a day by date without creating it
pub fn get_day(journal: &Journal, date: &str) -> Result<Option<DayRecord>, String> {
    days::parse_date(date).map_err(|e| e.to_string())?;
    Ok(days::get(journal.state(), date).cloned())
}

/// Get or create a day by date
pub fn get_or_create_day(journal: &mut Journal, date: &str) -> Result<GetOrCreateDayResponse, String> {
    let existed = days::get(journal.state(), date).is_some();
    let day = journal
        .mutate(|state| days::get_or_create(state, date).map(|d| d.clone()))
        .map_err(|e| e.to_string())?;
    Ok(GetOrCreateDayResponse {
        day,
        created: !existed,
    })
}

/// List day summaries, newest first, with optional date range
pub fn list_days(
    journal: &Journal,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: usize,
    offset: usize,
) -> Result<ListDaysResponse, String> {
    let limit = limit.clamp(1, 200);

    let matching: Vec<&DayRecord> = journal
        .state()
        .days
        .iter()
        .filter(|d| start_date.is_none_or(|s| d.date.as_str() >= s))
        .filter(|d| end_date.is_none_or(|e| d.date.as_str() <= e))
        .collect();
    let total = matching.len();

    let days = matching
        .iter()
        .rev()
        .skip(offset)
        .take(limit)
        .map(|d| summarize(d))
        .collect();

    Ok(ListDaysResponse {
        days,
        total,
        limit,
        offset,
    })
}

/// Set or clear a day's weight
pub fn set_weight(
    journal: &mut Journal,
    date: &str,
    weight: Option<f64>,
    unit: Option<&str>,
) -> Result<DayRecord, String> {
    let unit = parse_unit(unit)?;
    journal
        .mutate(|state| days::set_weight(state, date, weight, unit).map(|d| d.clone()))
        .map_err(|e| e.to_string())
}

// ============================================================================
// Entry Tools
// ============================================================================

/// Log a food entry, optionally saving it as a reusable preset
#[allow(clippy::too_many_arguments)]
pub fn log_food(
    journal: &mut Journal,
    date: &str,
    name: &str,
    calories: i64,
    category: Option<String>,
    portion: Option<String>,
    note: Option<String>,
    save_as_preset: bool,
) -> Result<LogFoodResponse, String> {
    journal
        .mutate(|state| {
            let saved_preset = if save_as_preset {
                Some(presets::create_food_preset(
                    state,
                    NewFoodPreset {
                        name: name.trim().to_string(),
                        default_calories: calories,
                        description: portion.as_ref().map(|p| format!("Portion: {}", p)),
                        items: None,
                    },
                )?)
            } else {
                None
            };

            let entry = days::append_food(
                state,
                date,
                NewFood {
                    name: name.to_string(),
                    calories,
                    category,
                    portion,
                    note,
                    from_preset_id: saved_preset.as_ref().map(|p| p.id.clone()),
                },
            )?;

            Ok(LogFoodResponse {
                date: date.to_string(),
                entry,
                totals: days::daily_totals(state, date),
                saved_preset,
            })
        })
        .map_err(|e| e.to_string())
}

/// Remove a food entry by its position within the day
pub fn remove_food(journal: &mut Journal, date: &str, index: usize) -> Result<RemoveEntryResponse, String> {
    journal
        .mutate(|state| {
            let removed = days::remove_food_at(state, date, index)?;
            Ok(RemoveEntryResponse {
                date: date.to_string(),
                removed: removed.name,
                totals: days::daily_totals(state, date),
            })
        })
        .map_err(|e| e.to_string())
}

/// Log an exercise entry
pub fn log_exercise(
    journal: &mut Journal,
    date: &str,
    name: &str,
    duration_minutes: i64,
    calories_burned: Option<i64>,
) -> Result<LogExerciseResponse, String> {
    journal
        .mutate(|state| {
            let entry = days::append_exercise(
                state,
                date,
                NewExercise {
                    name: name.to_string(),
                    duration_minutes,
                    calories_burned: calories_burned.unwrap_or(0),
                    from_preset_id: None,
                },
            )?;
            Ok(LogExerciseResponse {
                date: date.to_string(),
                entry,
                totals: days::daily_totals(state, date),
            })
        })
        .map_err(|e| e.to_string())
}

/// Remove an exercise entry by its position within the day
pub fn remove_exercise(
    journal: &mut Journal,
    date: &str,
    index: usize,
) -> Result<RemoveEntryResponse, String> {
    journal
        .mutate(|state| {
            let removed = days::remove_exercise_at(state, date, index)?;
            Ok(RemoveEntryResponse {
                date: date.to_string(),
                removed: removed.name,
                totals: days::daily_totals(state, date),
            })
        })
        .map_err(|e| e.to_string())
}

/// Eaten/burned/net totals for a date
pub fn day_totals(journal: &Journal, date: &str) -> Result<DayTotalsResponse, String> {
    days::parse_date(date).map_err(|e| e.to_string())?;
    Ok(DayTotalsResponse {
        date: date.to_string(),
        totals: days::daily_totals(journal.state(), date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;

    fn test_journal() -> Journal {
        Journal::open(Box::new(MemoryStore::default())).unwrap()
    }

    #[test]
    fn test_get_or_create_day_reports_created_flag() {
        let mut journal = test_journal();
        let first = get_or_create_day(&mut journal, "2025-01-13").unwrap();
        assert!(first.created);
        let second = get_or_create_day(&mut journal, "2025-01-13").unwrap();
        assert!(!second.created);
    }

    #[test]
    fn test_log_food_updates_totals() {
        let mut journal = test_journal();
        let response = log_food(
            &mut journal,
            "2025-01-13",
            "Oatmeal",
            300,
            Some("Breakfast".to_string()),
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(response.totals.eaten, 300);
        assert!(response.saved_preset.is_none());
    }

    #[test]
    fn test_log_food_can_save_preset() {
        let mut journal = test_journal();
        let response = log_food(
            &mut journal,
            "2025-01-13",
            "Usual lunch",
            650,
            None,
            Some("1 plate".to_string()),
            None,
            true,
        )
        .unwrap();

        let preset = response.saved_preset.unwrap();
        assert_eq!(preset.default_calories, 650);
        assert_eq!(preset.description.as_deref(), Some("Portion: 1 plate"));
        assert_eq!(
            response.entry.from_preset_id.as_deref(),
            Some(preset.id.as_str())
        );
        assert_eq!(journal.state().presets.len(), 1);
    }

    #[test]
    fn test_list_days_is_newest_first_and_paged() {
        let mut journal = test_journal();
        for date in ["2025-01-10", "2025-01-11", "2025-01-12"] {
            get_or_create_day(&mut journal, date).unwrap();
        }

        let page = list_days(&journal, None, None, 2, 0).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.days[0].date, "2025-01-12");
        assert_eq!(page.days[1].date, "2025-01-11");

        let next = list_days(&journal, None, None, 2, 2).unwrap();
        assert_eq!(next.days.len(), 1);
        assert_eq!(next.days[0].date, "2025-01-10");
    }

    #[test]
    fn test_list_days_range_filter() {
        let mut journal = test_journal();
        for date in ["2025-01-10", "2025-01-11", "2025-01-12"] {
            get_or_create_day(&mut journal, date).unwrap();
        }
        let page = list_days(&journal, Some("2025-01-11"), Some("2025-01-11"), 50, 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.days[0].date, "2025-01-11");
    }

    #[test]
    fn test_set_weight_rejects_unknown_unit() {
        let mut journal = test_journal();
        assert!(set_weight(&mut journal, "2025-01-13", Some(10.0), Some("stone")).is_err());
        assert!(journal.state().days.is_empty());
    }

    #[test]
    fn test_remove_exercise_round_trip() {
        let mut journal = test_journal();
        log_exercise(&mut journal, "2025-01-13", "Run", 25, Some(250)).unwrap();
        let removed = remove_exercise(&mut journal, "2025-01-13", 0).unwrap();
        assert_eq!(removed.removed, "Run");
        assert_eq!(removed.totals.burned, 0);
    }
}
