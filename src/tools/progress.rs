//! Progress tools
//!
//! Weight timeline queries and PNG chart generation.

use std::path::Path;

use serde::Serialize;

use crate::chart::render_weight_chart;
use crate::journal::Journal;
use crate::timeline::{weight_series, WeightSeries};
use crate::weight::WeightUnit;

const DEFAULT_CHART_WIDTH: u32 = 900;
const DEFAULT_CHART_HEIGHT: u32 = 450;

/// Response for weight_chart
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightChartResponse {
    pub file_path: String,
    pub width: u32,
    pub height: u32,
    pub points: usize,
    pub days_tracked: usize,
    pub net_change: f64,
    pub unit: String,
}

fn parse_unit(unit: Option<&str>) -> Result<WeightUnit, String> {
    match unit {
        None => Ok(WeightUnit::Lb),
        Some(s) => WeightUnit::from_str(s).ok_or_else(|| format!("Unknown weight unit: '{}'", s)),
    }
}

/// The day-by-day weight series with interpolated gap fill
pub fn weight_timeline(journal: &Journal, unit: Option<&str>) -> Result<WeightSeries, String> {
    let unit = parse_unit(unit)?;
    Ok(weight_series(journal.state(), unit))
}

/// Render the weight trend chart to a PNG file
pub fn weight_chart(
    journal: &Journal,
    unit: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
    output_path: &Path,
) -> Result<WeightChartResponse, String> {
    let unit = parse_unit(unit)?;
    let width = width.unwrap_or(DEFAULT_CHART_WIDTH).clamp(200, 4000);
    let height = height.unwrap_or(DEFAULT_CHART_HEIGHT).clamp(150, 4000);

    let series = weight_series(journal.state(), unit);
    let png = render_weight_chart(&series, width, height)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("Failed to create chart dir: {}", e))?;
    }
    std::fs::write(output_path, png).map_err(|e| format!("Failed to write chart: {}", e))?;

    Ok(WeightChartResponse {
        file_path: output_path.display().to_string(),
        width,
        height,
        points: series.points.len(),
        days_tracked: series.days_tracked,
        net_change: series.net_change,
        unit: unit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::store::days::set_weight;

    fn test_journal() -> Journal {
        Journal::open(Box::new(MemoryStore::default())).unwrap()
    }

    #[test]
    fn test_weight_chart_writes_png_file() {
        let mut journal = test_journal();
        journal
            .mutate(|s| {
                set_weight(s, "2025-01-01", Some(150.0), WeightUnit::Lb)?;
                set_weight(s, "2025-01-04", Some(156.0), WeightUnit::Lb)?;
                Ok(())
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts/weight.png");
        let response = weight_chart(&journal, None, None, None, &path).unwrap();

        assert_eq!(response.points, 4);
        assert_eq!(response.days_tracked, 2);
        assert_eq!(response.net_change, 6.0);
        assert!(path.exists());
    }

    #[test]
    fn test_weight_chart_on_empty_journal_is_an_error() {
        let journal = test_journal();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weight.png");
        assert!(weight_chart(&journal, None, None, None, &path).is_err());
    }

    #[test]
    fn test_weight_timeline_in_kg() {
        let mut journal = test_journal();
        journal
            .mutate(|s| set_weight(s, "2025-01-01", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();
        let series = weight_timeline(&journal, Some("kg")).unwrap();
        assert_eq!(series.points[0].value, 68.0);
    }
}
