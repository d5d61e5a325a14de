//! Routing and risk-pipeline configuration.
//!
//! Typically loaded from a JSON file by the application crate (enable the
//! `serde` feature) and handed to the pipeline and the routing session.
//! Every field has a default, so partial files are accepted.

use std::path::PathBuf;

use crate::weather::WeatherCondition;
use crate::{CoreError, CoreResult};

/// Fallback free-flow speed for edges without a usable `maxspeed`, km/h.
pub const DEFAULT_SPEED_KPH: f64 = 50.0;

/// Default directory holding one risk table CSV per condition.
pub const DEFAULT_RISK_DIR: &str = "risk_maps";

/// How each accident record contributes to its road's accumulated weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RiskWeighting {
    /// Every record weighs 1.
    #[default]
    Count,
    /// `1 + max_visibility - visibility`: poor-visibility accidents weigh more.
    Visibility,
}

/// Header names of the accident CSV columns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccidentColumns {
    pub longitude:  String,
    pub latitude:   String,
    pub condition:  String,
    pub visibility: String,
}

impl Default for AccidentColumns {
    fn default() -> Self {
        Self {
            longitude:  "Start_Lng".to_owned(),
            latitude:   "Start_Lat".to_owned(),
            condition:  "conditions".to_owned(),
            visibility: "visibility".to_owned(),
        }
    }
}

/// Top-level configuration shared by the risk pipeline and routing sessions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Speed assumed for edges with no positive `maxspeed`, km/h.
    pub default_speed_kph: f64,

    /// Directory of persisted risk tables.
    pub risk_dir: PathBuf,

    /// Maximum BFS depth when borrowing names for unnamed edges.  `None`
    /// searches the whole connected component.
    pub bfs_max_depth: Option<usize>,

    /// Per-record weighting used by the risk pipeline.
    pub weighting: RiskWeighting,

    /// Conditions for which risk tables are produced.
    pub conditions: Vec<WeatherCondition>,

    /// Accident CSV header names.
    pub accident_columns: AccidentColumns,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_speed_kph: DEFAULT_SPEED_KPH,
            risk_dir:          PathBuf::from(DEFAULT_RISK_DIR),
            bfs_max_depth:     None,
            weighting:         RiskWeighting::default(),
            conditions:        WeatherCondition::defaults(),
            accident_columns:  AccidentColumns::default(),
        }
    }
}

impl RoutingConfig {
    /// Reject values that would make cost annotation or scoring meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.default_speed_kph.is_finite() && self.default_speed_kph > 0.0) {
            return Err(CoreError::Config(format!(
                "default_speed_kph must be a positive number, got {}",
                self.default_speed_kph
            )));
        }
        if self.conditions.is_empty() {
            return Err(CoreError::Config("conditions must not be empty".to_owned()));
        }
        let cols = &self.accident_columns;
        for (field, name) in [
            ("longitude", &cols.longitude),
            ("latitude", &cols.latitude),
            ("condition", &cols.condition),
            ("visibility", &cols.visibility),
        ] {
            if name.trim().is_empty() {
                return Err(CoreError::Config(format!("accident column `{field}` has an empty name")));
            }
        }
        Ok(())
    }
}
