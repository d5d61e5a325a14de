//! Weather-condition labels.
//!
//! A condition is an opaque label taken verbatim from the accident data
//! (`"Rain, Overcast"`).  Filtering is by exact label match; there is no
//! case folding or trimming.

use std::fmt;

/// Conditions scored by default, matching the labels of the reference
/// accident dataset.
pub const DEFAULT_CONDITIONS: [&str; 6] = [
    "Clear",
    "Partially cloudy",
    "Overcast",
    "Rain",
    "Rain, Overcast",
    "Rain, Partially cloudy",
];

/// A weather-condition label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WeatherCondition(String);

impl WeatherCondition {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label exactly as it appears in the accident data.
    pub fn label(&self) -> &str {
        &self.0
    }

    /// File stem of this condition's persisted risk table.
    ///
    /// `", "` becomes `"_"` first, then every remaining `" "` becomes `"_"`:
    /// `"Rain, Partially cloudy"` → `"Rain_Partially_cloudy"`.  Producers and
    /// consumers of risk tables must agree on this mapping byte for byte.
    pub fn file_stem(&self) -> String {
        self.0.replace(", ", "_").replace(' ', "_")
    }

    /// The default condition set as owned values.
    pub fn defaults() -> Vec<WeatherCondition> {
        DEFAULT_CONDITIONS.iter().map(|c| WeatherCondition::new(*c)).collect()
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeatherCondition {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
