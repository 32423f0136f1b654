//! Unit conversion applied to variables as they are loaded.

use serde::{Deserialize, Serialize};

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f32 = 273.15;

/// Unit transformation for converting raw data values to display values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UnitTransform {
    /// No transformation
    #[default]
    None,
    /// Subtract a value (e.g., K→C: subtract 273.15)
    Subtract(f32),
    /// Linear transform: value * scale + offset
    Linear { scale: f32, offset: f32 },
}

impl UnitTransform {
    /// Apply the transformation to a value. `NaN` stays `NaN`.
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Self::None => value,
            Self::Subtract(offset) => value - offset,
            Self::Linear { scale, offset } => value * scale + offset,
        }
    }
}

/// How loaded temperature values are converted before reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPolicy {
    /// Convert to °C when the variable declares Kelvin
    #[default]
    Auto,
    /// Always subtract 273.15
    KelvinToCelsius,
    /// Keep values as stored
    None,
}

impl UnitPolicy {
    /// Resolve the transform for a variable with the given `units` attribute.
    ///
    /// Returns the transform and the units the values carry afterwards.
    pub fn resolve(&self, declared: Option<&str>) -> (UnitTransform, Option<String>) {
        let declared = declared.map(str::trim);
        match self {
            Self::None => (UnitTransform::None, declared.map(String::from)),
            Self::KelvinToCelsius => (UnitTransform::Subtract(KELVIN_OFFSET), Some("°C".to_string())),
            Self::Auto => match declared {
                Some(u) if is_kelvin(u) => {
                    (UnitTransform::Subtract(KELVIN_OFFSET), Some("°C".to_string()))
                }
                other => (UnitTransform::None, other.map(String::from)),
            },
        }
    }
}

fn is_kelvin(units: &str) -> bool {
    matches!(units, "K" | "k" | "kelvin" | "Kelvin" | "degK" | "deg_K")
}
