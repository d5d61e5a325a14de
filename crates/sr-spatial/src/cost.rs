//! Per-edge cost attributes and the annotator that derives them.
//!
//! # Units
//!
//! | Criterion  | Attribute          | Unit                              |
//! |------------|--------------------|-----------------------------------|
//! | `Distance` | `length`           | metres                            |
//! | `Time`     | `length / speed`   | hours (×60 for display minutes)   |
//! | `Risk`     | `length × (1+risk)`| risk-inflated metres              |
//!
//! Costs live on the network, are never persisted, and are recomputed in
//! full whenever the active weather condition changes.

use std::fmt;

use log::debug;

use sr_core::{RiskTable, RoutingConfig, config::DEFAULT_SPEED_KPH};

use crate::network::RoadNetwork;

/// The edge attribute a search minimizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CostCriterion {
    Distance,
    Time,
    Risk,
}

impl CostCriterion {
    pub const ALL: [CostCriterion; 3] = [Self::Distance, Self::Time, Self::Risk];

    /// Attribute name used in logs and exported route summaries.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Distance => "cost_distance",
            Self::Time => "cost_time",
            Self::Risk => "cost_risk",
        }
    }
}

impl fmt::Display for CostCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// The three derived costs of one edge.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct EdgeCosts {
    pub distance: f64,
    pub time_h: f64,
    pub risk: f64,
}

impl EdgeCosts {
    #[inline]
    pub fn get(&self, criterion: CostCriterion) -> f64 {
        match criterion {
            CostCriterion::Distance => self.distance,
            CostCriterion::Time => self.time_h,
            CostCriterion::Risk => self.risk,
        }
    }
}

/// Writes distance, time and risk costs onto every edge of a network.
#[derive(Copy, Clone, Debug)]
pub struct CostAnnotator {
    default_speed_kph: f64,
}

impl Default for CostAnnotator {
    fn default() -> Self {
        Self { default_speed_kph: DEFAULT_SPEED_KPH }
    }
}

impl CostAnnotator {
    /// `default_speed_kph` is used for edges without a positive `maxspeed`.
    pub fn new(default_speed_kph: f64) -> Self {
        Self { default_speed_kph }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.default_speed_kph)
    }

    pub fn default_speed_kph(&self) -> f64 {
        self.default_speed_kph
    }

    /// Costs of a single edge given its base attributes and road risk score.
    pub fn edge_costs(&self, length_m: f64, max_speed_kph: Option<f64>, risk: f64) -> EdgeCosts {
        let speed = max_speed_kph
            .filter(|s| *s > 0.0)
            .unwrap_or(self.default_speed_kph);
        EdgeCosts {
            distance: length_m,
            time_h: (length_m / 1000.0) / speed,
            risk: length_m * (1.0 + risk),
        }
    }

    /// Recompute the costs of every edge for `table`'s condition, in place.
    ///
    /// Idempotent: the result depends only on the network's base attributes,
    /// `table`, and the default speed.  Takes `&mut` so no search can observe
    /// a half-annotated graph.
    pub fn annotate(&self, network: &mut RoadNetwork, table: &RiskTable) {
        let mut scored = 0usize;
        for e in network.edge_ids() {
            let i = e.index();
            let risk = table.score(network.road_name(e));
            if risk > 0.0 {
                scored += 1;
            }
            network.edge_costs[i] =
                self.edge_costs(network.edge_length_m[i], network.edge_max_speed_kph[i], risk);
        }
        network.annotated_for = Some(table.condition().clone());
        debug!(
            "annotated {} edges for {:?} ({scored} with non-zero risk)",
            network.edge_count(),
            table.condition().label()
        );
    }
}
