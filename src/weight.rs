//! Weight unit conversion
//!
//! Pound/kilogram conversion with a single rounding rule: half-up to one
//! decimal place in the target unit. Round-tripping a value may drift by up
//! to 0.1 in the rounded unit; that loss is accepted.

use serde::{Deserialize, Serialize};

/// Kilograms per pound (exact, by definition of the avoirdupois pound)
const KG_PER_LB: f64 = 0.45359237;

/// Round to one decimal place, half away from zero.
///
/// Inputs are non-negative weights, so this is half-up rounding.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert pounds to kilograms, rounded to one decimal
pub fn lb_to_kg(lb: f64) -> f64 {
    round_tenth(lb * KG_PER_LB)
}

/// Convert kilograms to pounds, rounded to one decimal
pub fn kg_to_lb(kg: f64) -> f64 {
    round_tenth(kg / KG_PER_LB)
}

/// Display unit for weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lb,
    Kg,
}

impl WeightUnit {
    /// Parse a unit string ("lb"/"lbs"/"kg", case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Some(Self::Lb),
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(Self::Kg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lb => "lb",
            Self::Kg => "kg",
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
