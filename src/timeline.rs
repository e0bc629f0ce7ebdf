//! Weight timeline engine
//!
//! Builds a continuous day-by-day weight series from the sparse
//! observations in the day store. Gaps between two observed dates are
//! filled with linearly interpolated points so the series has one value
//! per calendar day across the observed range.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::AppState;
use crate::store::days::parse_date;
use crate::weight::{round_tenth, WeightUnit};

/// One point in the timeline. `interpolated` distinguishes synthetic
/// gap-fill values from actual observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    pub date: String,
    pub value: f64,
    pub interpolated: bool,
}

/// The full series plus its summary statistics. `days_tracked` counts
/// actual observations only; `net_change` is last observation minus
/// first, zero when fewer than two exist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSeries {
    pub unit: WeightUnit,
    pub points: Vec<WeightPoint>,
    pub days_tracked: usize,
    pub net_change: f64,
}

/// Build the weight series for the whole journal in the requested unit.
///
/// Days without a weight and days whose date fails to parse are skipped.
/// Interpolated values are rounded to one decimal place, same as
/// converted weights everywhere else.
pub fn weight_series(state: &AppState, unit: WeightUnit) -> WeightSeries {
    let mut observed: Vec<(NaiveDate, f64)> = state
        .days
        .iter()
        .filter_map(|day| {
            let value = day.weight_in(unit)?;
            let date = parse_date(&day.date).ok()?;
            Some((date, value))
        })
        .collect();
    observed.sort_by_key(|(date, _)| *date);

    let mut points = Vec::new();
    for window in observed.windows(2) {
        let (d0, w0) = window[0];
        let (d1, w1) = window[1];

        points.push(point(d0, w0, false));

        let gap = (d1 - d0).num_days() - 1;
        if gap > 0 {
            let step = (w1 - w0) / (gap + 1) as f64;
            for i in 1..=gap {
                let date = d0 + chrono::Duration::days(i);
                points.push(point(date, round_tenth(w0 + step * i as f64), true));
            }
        }
    }
    if let Some(&(date, value)) = observed.last() {
        points.push(point(date, value, false));
    }

    let net_change = match (observed.first(), observed.last()) {
        (Some(&(_, first)), Some(&(_, last))) if observed.len() >= 2 => round_tenth(last - first),
        _ => 0.0,
    };

    WeightSeries {
        unit,
        points,
        days_tracked: observed.len(),
        net_change,
    }
}

fn point(date: NaiveDate, value: f64, interpolated: bool) -> WeightPoint {
    WeightPoint {
        date: date.format("%Y-%m-%d").to_string(),
        value,
        interpolated,
    }
}
