//! End-to-end risk table production.

use std::path::PathBuf;

use log::{info, warn};

use sr_core::{EdgeId, RiskTable, RiskWeighting, RoutingConfig, WeatherCondition};
use sr_spatial::RoadNetwork;

use crate::accident::AccidentSet;
use crate::names::{EdgeNames, fill_unnamed};
use crate::score::{RecordWeigher, accumulate};
use crate::store::RiskTableStore;
use crate::{RiskError, RiskResult};

/// Turns an accident set into one normalized [`RiskTable`] per condition.
///
/// ```text
/// records ──nearest_edge──► edges ──names + fill──► roads ──weigh──► tables
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiskPipeline {
    pub weighting: RiskWeighting,
    /// Depth cap of the unnamed-edge BFS; `None` is unbounded.
    pub bfs_max_depth: Option<usize>,
}

impl RiskPipeline {
    pub fn new(weighting: RiskWeighting, bfs_max_depth: Option<usize>) -> Self {
        Self { weighting, bfs_max_depth }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.weighting, config.bfs_max_depth)
    }

    /// Nearest directed edge of every record, `None` only for an empty
    /// network.
    pub fn match_accidents(&self, network: &RoadNetwork, accidents: &AccidentSet) -> Vec<Option<EdgeId>> {
        #[cfg(not(feature = "parallel"))]
        let matched = accidents.records.iter().map(|r| network.nearest_edge(r.position)).collect();

        #[cfg(feature = "parallel")]
        let matched = {
            use rayon::prelude::*;
            accidents.records.par_iter().map(|r| network.nearest_edge(r.position)).collect()
        };

        matched
    }

    /// Canonical names with unnamed edges filled from their neighbours.
    pub fn edge_names(&self, network: &RoadNetwork) -> RiskResult<EdgeNames> {
        let original = EdgeNames::from_network(network);
        fill_unnamed(network, &original, self.bfs_max_depth)
    }

    /// Score every condition in `conditions`, in order.
    ///
    /// Conditions with no matching accident produce an empty table (every
    /// road scores zero).
    ///
    /// # Errors
    ///
    /// [`RiskError::DataFormat`] if visibility weighting is selected but the
    /// accident source has no visibility column.
    pub fn run(
        &self,
        network: &RoadNetwork,
        accidents: &AccidentSet,
        conditions: &[WeatherCondition],
    ) -> RiskResult<Vec<RiskTable>> {
        if self.weighting == RiskWeighting::Visibility && !accidents.has_visibility {
            return Err(RiskError::DataFormat(
                "visibility weighting requires a visibility column".to_owned(),
            ));
        }

        let names = self.edge_names(network)?;
        let matched = self.match_accidents(network, accidents);
        let unmatched = matched.iter().filter(|m| m.is_none()).count();
        if unmatched > 0 {
            warn!("{unmatched} of {} accident records matched no edge", accidents.len());
        }

        let roads: Vec<Option<&str>> = matched.iter().map(|m| m.map(|e| names.get(e))).collect();
        let weigher = RecordWeigher::new(self.weighting, accidents.max_visibility());

        let score = |condition: &WeatherCondition| {
            let weights = accumulate(accidents.records.iter().zip(roads.iter().copied()), condition, &weigher);
            let table = weights.normalize(condition.clone());
            info!("{:?}: scored {} roads", condition.label(), table.len());
            table
        };

        #[cfg(not(feature = "parallel"))]
        let tables = conditions.iter().map(score).collect();

        #[cfg(feature = "parallel")]
        let tables = {
            use rayon::prelude::*;
            conditions.par_iter().map(score).collect()
        };

        Ok(tables)
    }

    /// [`run`](Self::run), then persist every table into `store`.
    pub fn run_and_save(
        &self,
        network: &RoadNetwork,
        accidents: &AccidentSet,
        conditions: &[WeatherCondition],
        store: &RiskTableStore,
    ) -> RiskResult<Vec<PathBuf>> {
        self.run(network, accidents, conditions)?
            .iter()
            .map(|table| store.save(table))
            .collect()
    }
}
