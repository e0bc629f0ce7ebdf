//! Calorie lookup
//!
//! Queries the USDA FoodData Central search API for a calorie estimate.
//! This is a convenience for filling in a food entry; lookup failures are
//! reported to the caller and never touch journal state.

use serde::{Deserialize, Serialize};
use tracing::debug;

const SEARCH_URL: &str = "https://api.nal.usda.gov/fdc/v1/foods/search";

/// Overridable via env; the public demo key is heavily rate limited
fn api_key() -> String {
    std::env::var("TINYDEFICIT_FDC_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodHit>,
}

#[derive(Debug, Deserialize)]
struct FoodHit {
    description: String,
    #[serde(default, rename = "foodNutrients")]
    food_nutrients: Vec<NutrientHit>,
}

#[derive(Debug, Deserialize)]
struct NutrientHit {
    #[serde(default, rename = "nutrientName")]
    nutrient_name: String,
    #[serde(default, rename = "unitName")]
    unit_name: String,
    #[serde(default)]
    value: f64,
}

/// A calorie estimate for a free-text food query
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieEstimate {
    pub query: String,
    pub matched_description: String,
    pub calories: i64,
}

fn energy_kcal(hit: &FoodHit) -> Option<f64> {
    hit.food_nutrients
        .iter()
        .find(|n| n.nutrient_name == "Energy" && n.unit_name.eq_ignore_ascii_case("KCAL"))
        .map(|n| n.value)
}

/// Look up a calorie estimate for `query`. `Ok(None)` means the API had no
/// usable match; `Err` means the request itself failed.
pub async fn lookup_calories(
    http: &reqwest::Client,
    query: &str,
) -> Result<Option<CalorieEstimate>, String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("lookup query is required".to_string());
    }

    debug!(query = %query, "Querying FoodData Central");
    let response = http
        .get(SEARCH_URL)
        .query(&[
            ("api_key", api_key().as_str()),
            ("query", query),
            ("pageSize", "5"),
        ])
        .send()
        .await
        .map_err(|e| format!("lookup request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("lookup request failed: HTTP {}", response.status()));
    }

    let parsed: SearchResponse = response
        .json()
        .await
        .map_err(|e| format!("lookup response unreadable: {}", e))?;

    let estimate = parsed.foods.iter().find_map(|hit| {
        let kcal = energy_kcal(hit)?;
        Some(CalorieEstimate {
            query: query.to_string(),
            matched_description: hit.description.clone(),
            calories: kcal.round() as i64,
        })
    });
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_nutrient_is_selected() {
        let json = r#"{
            "foods": [{
                "description": "Banana, raw",
                "foodNutrients": [
                    {"nutrientName": "Protein", "unitName": "G", "value": 1.1},
                    {"nutrientName": "Energy", "unitName": "KCAL", "value": 89.0},
                    {"nutrientName": "Energy", "unitName": "kJ", "value": 371.0}
                ]
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(energy_kcal(&parsed.foods[0]), Some(89.0));
    }

    #[test]
    fn test_hit_without_energy_yields_none() {
        let json = r#"{
            "foods": [{
                "description": "Mystery food",
                "foodNutrients": [{"nutrientName": "Protein", "unitName": "G", "value": 1.0}]
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(energy_kcal(&parsed.foods[0]), None);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let http = reqwest::Client::new();
        assert!(lookup_calories(&http, "   ").await.is_err());
    }
}
