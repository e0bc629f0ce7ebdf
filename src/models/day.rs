//! Day record model
//!
//! A day record aggregates weight, food entries, and exercise entries for
//! one calendar date. Dates are plain ISO `YYYY-MM-DD` strings with local
//! calendar semantics, never instants.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::weight::WeightUnit;

/// Weekday/weekend classification, computed once from the date at creation
/// time and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    /// Saturday and Sunday are weekend, everything else weekday
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }
}

/// A logged food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Back-reference to the preset this entry was instantiated from.
    /// Reference only: deleting the preset leaves this entry intact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_preset_id: Option<String>,
}

/// A logged exercise entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub calories_burned: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_preset_id: Option<String>,
}

/// Calorie totals for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    pub eaten: i64,
    pub burned: i64,
    pub net: i64,
}

/// A day container for weight and entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: String, // ISO date: "2025-01-09"
    pub day_of_week: String,
    pub day_type: DayType,
    #[serde(default)]
    pub weight_lb: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl DayRecord {
    /// Synthesize an empty record for a date. Day-of-week label and
    /// weekday/weekend classification come from the local calendar weekday.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            day_of_week: date.weekday().to_string(),
            day_type: DayType::from_date(date),
            weight_lb: None,
            weight_kg: None,
            foods: Vec::new(),
            exercises: Vec::new(),
        }
    }

    /// Weight in the requested display unit, if recorded
    pub fn weight_in(&self, unit: WeightUnit) -> Option<f64> {
        match unit {
            WeightUnit::Lb => self.weight_lb,
            WeightUnit::Kg => self.weight_kg,
        }
    }

    /// Sum of food calories for the day
    pub fn calories_eaten(&self) -> i64 {
        self.foods.iter().map(|f| f.calories).sum()
    }

    /// Sum of exercise calories burned for the day
    pub fn calories_burned(&self) -> i64 {
        self.exercises.iter().map(|e| e.calories_burned).sum()
    }

    /// Eaten/burned/net totals; an empty day yields all zeros
    pub fn totals(&self) -> DailyTotals {
        let eaten = self.calories_eaten();
        let burned = self.calories_burned();
        DailyTotals {
            eaten,
            burned,
            net: eaten - burned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_type_classification() {
        // 2025-01-11 is a Saturday, 2025-01-12 a Sunday, 2025-01-13 a Monday
        let sat = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let sun = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let mon = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
        assert_eq!(DayType::from_date(sat), DayType::Weekend);
        assert_eq!(DayType::from_date(sun), DayType::Weekend);
        assert_eq!(DayType::from_date(mon), DayType::Weekday);
    }

    #[test]
    fn test_new_record_labels() {
        let day = DayRecord::new(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(day.date, "2025-01-13");
        assert_eq!(day.day_of_week, "Mon");
        assert_eq!(day.day_type, DayType::Weekday);
        assert!(day.foods.is_empty());
        assert!(day.exercises.is_empty());
    }

    #[test]
    fn test_totals_empty_day_is_zero() {
        let day = DayRecord::new(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(day.totals(), DailyTotals::default());
    }

    #[test]
    fn test_serde_uses_original_field_names() {
        let json = r#"{
            "date": "2025-01-13",
            "dayOfWeek": "Mon",
            "dayType": "weekday",
            "weightLb": 150.0,
            "weightKg": 68.0,
            "foods": [{"id": "food-1", "name": "Toast", "calories": 200}],
            "exercises": [{"id": "ex-1", "name": "Walk", "durationMinutes": 30}]
        }"#;
        let day: DayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(day.weight_lb, Some(150.0));
        assert_eq!(day.foods[0].calories, 200);
        // caloriesBurned missing defaults to 0
        assert_eq!(day.exercises[0].calories_burned, 0);

        let out = serde_json::to_string(&day).unwrap();
        assert!(out.contains("\"dayOfWeek\""));
        assert!(out.contains("\"durationMinutes\""));
    }
}
