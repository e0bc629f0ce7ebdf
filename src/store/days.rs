//! Day store
//!
//! A date-keyed collection of day records with at most one record per date,
//! kept sorted ascending by date string. Records are created lazily the
//! first time anything is written for a date and are never deleted.

use chrono::NaiveDate;

use crate::error::{JournalError, JournalResult};
use crate::models::{new_id, AppState, DailyTotals, DayRecord, ExerciseEntry, FoodEntry};
use crate::weight::{kg_to_lb, lb_to_kg, WeightUnit};

/// Fields for a new food entry; validated on append
#[derive(Debug, Clone, Default)]
pub struct NewFood {
    pub name: String,
    pub calories: i64,
    pub category: Option<String>,
    pub portion: Option<String>,
    pub note: Option<String>,
    pub from_preset_id: Option<String>,
}

/// Fields for a new exercise entry; validated on append
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub name: String,
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub from_preset_id: Option<String>,
}

/// Validate and parse an ISO `YYYY-MM-DD` date string.
///
/// The canonical zero-padded form is required: the store's ordering is a
/// plain lexicographic comparison, which matches chronological order only
/// for fixed-width dates.
pub fn parse_date(date: &str) -> JournalResult<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| JournalError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", date)))?;
    if parsed.format("%Y-%m-%d").to_string() != date {
        return Err(JournalError::Validation(format!(
            "date '{}' is not in canonical YYYY-MM-DD form",
            date
        )));
    }
    Ok(parsed)
}

/// Look up a day record without creating it
pub fn get<'a>(state: &'a AppState, date: &str) -> Option<&'a DayRecord> {
    state.days.iter().find(|d| d.date == date)
}

fn get_mut<'a>(state: &'a mut AppState, date: &str) -> Option<&'a mut DayRecord> {
    state.days.iter_mut().find(|d| d.date == date)
}

/// Return the record for a date, synthesizing and inserting an empty one if
/// none exists yet. Idempotent: the store never holds two records for the
/// same date.
pub fn get_or_create<'a>(state: &'a mut AppState, date: &str) -> JournalResult<&'a mut DayRecord> {
    let parsed = parse_date(date)?;

    if !state.days.iter().any(|d| d.date == date) {
        state.days.push(DayRecord::new(parsed));
        state.days.sort_by(|a, b| a.date.cmp(&b.date));
    }

    match state.days.iter_mut().find(|d| d.date == date) {
        Some(day) => Ok(day),
        None => Err(JournalError::NotFound(format!("day {}", date))),
    }
}

/// Set or clear the weight for a date.
///
/// Both unit fields are written atomically from the single input so they
/// can never represent different underlying weights (within rounding).
/// `None` clears both.
pub fn set_weight<'a>(
    state: &'a mut AppState,
    date: &str,
    value: Option<f64>,
    unit: WeightUnit,
) -> JournalResult<&'a DayRecord> {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            return Err(JournalError::Validation(format!(
                "weight must be a non-negative number, got {}",
                v
            )));
        }
    }

    let day = get_or_create(state, date)?;
    match value {
        None => {
            day.weight_lb = None;
            day.weight_kg = None;
        }
        Some(v) => match unit {
            WeightUnit::Lb => {
                day.weight_lb = Some(v);
                day.weight_kg = Some(lb_to_kg(v));
            }
            WeightUnit::Kg => {
                day.weight_kg = Some(v);
                day.weight_lb = Some(kg_to_lb(v));
            }
        },
    }
    Ok(day)
}

/// Append a food entry to a date, creating the day if needed
pub fn append_food(state: &mut AppState, date: &str, new: NewFood) -> JournalResult<FoodEntry> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(JournalError::Validation("food name is required".to_string()));
    }

    let entry = FoodEntry {
        id: new_id("food"),
        name: name.to_string(),
        calories: new.calories,
        category: new.category.filter(|s| !s.is_empty()),
        portion: new.portion.filter(|s| !s.is_empty()),
        note: new.note.filter(|s| !s.is_empty()),
        from_preset_id: new.from_preset_id,
    };

    let day = get_or_create(state, date)?;
    day.foods.push(entry.clone());
    Ok(entry)
}

/// Remove the food entry at a positional index within the day's sequence.
/// An out-of-range index is reported as an error and leaves the sequence
/// untouched.
pub fn remove_food_at(state: &mut AppState, date: &str, index: usize) -> JournalResult<FoodEntry> {
    let day = get_mut(state, date)
        .ok_or_else(|| JournalError::NotFound(format!("day {}", date)))?;
    if index >= day.foods.len() {
        return Err(JournalError::Validation(format!(
            "food index {} out of range for {} (day has {} entries)",
            index,
            date,
            day.foods.len()
        )));
    }
    Ok(day.foods.remove(index))
}

/// Append an exercise entry to a date, creating the day if needed
pub fn append_exercise(
    state: &mut AppState,
    date: &str,
    new: NewExercise,
) -> JournalResult<ExerciseEntry> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(JournalError::Validation(
            "exercise name is required".to_string(),
        ));
    }
    if new.duration_minutes <= 0 {
        return Err(JournalError::Validation(format!(
            "duration must be positive, got {}",
            new.duration_minutes
        )));
    }
    if new.calories_burned < 0 {
        return Err(JournalError::Validation(format!(
            "calories burned must be non-negative, got {}",
            new.calories_burned
        )));
    }

    let entry = ExerciseEntry {
        id: new_id("ex"),
        name: name.to_string(),
        duration_minutes: new.duration_minutes,
        calories_burned: new.calories_burned,
        from_preset_id: new.from_preset_id,
    };

    let day = get_or_create(state, date)?;
    day.exercises.push(entry.clone());
    Ok(entry)
}

/// Remove the exercise entry at a positional index; symmetric to
/// [`remove_food_at`]
pub fn remove_exercise_at(
    state: &mut AppState,
    date: &str,
    index: usize,
) -> JournalResult<ExerciseEntry> {
    let day = get_mut(state, date)
        .ok_or_else(|| JournalError::NotFound(format!("day {}", date)))?;
    if index >= day.exercises.len() {
        return Err(JournalError::Validation(format!(
            "exercise index {} out of range for {} (day has {} entries)",
            index,
            date,
            day.exercises.len()
        )));
    }
    Ok(day.exercises.remove(index))
}

/// Eaten/burned/net totals for a date; an absent or empty day is all zeros
pub fn daily_totals(state: &AppState, date: &str) -> DailyTotals {
    get(state, date).map(|d| d.totals()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayType;

    #[test]
    fn test_get_does_not_create() {
        let state = AppState::default();
        assert!(get(&state, "2025-01-13").is_none());
        assert!(state.days.is_empty());
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut state = AppState::default();
        {
            let day = get_or_create(&mut state, "2025-01-11").unwrap();
            assert_eq!(day.day_of_week, "Sat");
            assert_eq!(day.day_type, DayType::Weekend);
        }
        get_or_create(&mut state, "2025-01-11").unwrap();
        assert_eq!(state.days.len(), 1);
    }

    #[test]
    fn test_store_stays_sorted_by_date() {
        let mut state = AppState::default();
        for date in ["2025-03-05", "2024-12-31", "2025-01-02"] {
            get_or_create(&mut state, date).unwrap();
        }
        let dates: Vec<&str> = state.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-12-31", "2025-01-02", "2025-03-05"]);
    }

    #[test]
    fn test_rejects_non_canonical_dates() {
        let mut state = AppState::default();
        assert!(get_or_create(&mut state, "2025-1-9").is_err());
        assert!(get_or_create(&mut state, "not-a-date").is_err());
        assert!(state.days.is_empty());
    }

    #[test]
    fn test_set_weight_writes_both_units() {
        let mut state = AppState::default();
        set_weight(&mut state, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        let day = get(&state, "2025-01-13").unwrap();
        assert_eq!(day.weight_lb, Some(150.0));
        assert_eq!(day.weight_kg, Some(lb_to_kg(150.0)));

        set_weight(&mut state, "2025-01-13", Some(70.0), WeightUnit::Kg).unwrap();
        let day = get(&state, "2025-01-13").unwrap();
        assert_eq!(day.weight_kg, Some(70.0));
        assert_eq!(day.weight_lb, Some(kg_to_lb(70.0)));
    }

    #[test]
    fn test_clearing_weight_clears_both_fields() {
        let mut state = AppState::default();
        set_weight(&mut state, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        set_weight(&mut state, "2025-01-13", None, WeightUnit::Lb).unwrap();
        let day = get(&state, "2025-01-13").unwrap();
        assert_eq!(day.weight_lb, None);
        assert_eq!(day.weight_kg, None);
    }

    #[test]
    fn test_set_weight_rejects_negative_without_creating_day() {
        let mut state = AppState::default();
        let err = set_weight(&mut state, "2025-01-13", Some(-5.0), WeightUnit::Lb).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert!(state.days.is_empty());
    }

    #[test]
    fn test_daily_totals() {
        let mut state = AppState::default();
        assert_eq!(daily_totals(&state, "2025-01-13"), DailyTotals::default());

        for calories in [300, 450] {
            append_food(
                &mut state,
                "2025-01-13",
                NewFood {
                    name: "meal".to_string(),
                    calories,
                    ..Default::default()
                },
            )
            .unwrap();
        }
        append_exercise(
            &mut state,
            "2025-01-13",
            NewExercise {
                name: "run".to_string(),
                duration_minutes: 30,
                calories_burned: 200,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            daily_totals(&state, "2025-01-13"),
            DailyTotals {
                eaten: 750,
                burned: 200,
                net: 550
            }
        );
    }

    #[test]
    fn test_append_food_requires_name() {
        let mut state = AppState::default();
        let err = append_food(&mut state, "2025-01-13", NewFood::default()).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert!(state.days.is_empty());
    }

    #[test]
    fn test_append_exercise_requires_positive_duration() {
        let mut state = AppState::default();
        let err = append_exercise(
            &mut state,
            "2025-01-13",
            NewExercise {
                name: "run".to_string(),
                duration_minutes: 0,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn test_remove_food_out_of_range_is_reported_and_harmless() {
        let mut state = AppState::default();
        append_food(
            &mut state,
            "2025-01-13",
            NewFood {
                name: "meal".to_string(),
                calories: 100,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(remove_food_at(&mut state, "2025-01-13", 5).is_err());
        assert_eq!(get(&state, "2025-01-13").unwrap().foods.len(), 1);

        let removed = remove_food_at(&mut state, "2025-01-13", 0).unwrap();
        assert_eq!(removed.calories, 100);
        assert!(get(&state, "2025-01-13").unwrap().foods.is_empty());
    }
}
