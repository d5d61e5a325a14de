//! Per-road weight accumulation and normalization for one condition.

use log::debug;
use rustc_hash::FxHashMap;

use sr_core::{RiskTable, RiskWeighting, WeatherCondition};

use crate::accident::AccidentRecord;

/// Computes the weight one accident contributes to its road.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecordWeigher {
    weighting: RiskWeighting,
    /// Largest finite visibility across the whole accident set.
    max_visibility: f64,
}

impl RecordWeigher {
    /// `max_visibility` is only consulted by [`RiskWeighting::Visibility`];
    /// `None` there makes every weight `NaN`.
    pub fn new(weighting: RiskWeighting, max_visibility: Option<f64>) -> Self {
        Self { weighting, max_visibility: max_visibility.unwrap_or(f64::NAN) }
    }

    /// `1` per record, or `1 + max_visibility - visibility`.  `NaN` when the
    /// record's visibility is unknown.
    #[inline]
    pub fn weight(&self, record: &AccidentRecord) -> f64 {
        match self.weighting {
            RiskWeighting::Count => 1.0,
            RiskWeighting::Visibility => 1.0 + self.max_visibility - record.visibility,
        }
    }
}

/// Accumulated weight per road name for one condition.
#[derive(Clone, Debug, Default)]
pub struct RoadWeights {
    weights: FxHashMap<String, f64>,
    skipped: usize,
}

impl RoadWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `road`.  `NaN` weights are dropped entirely: the road
    /// is not even recorded as observed.
    pub fn add(&mut self, road: &str, weight: f64) {
        if weight.is_nan() {
            self.skipped += 1;
            return;
        }
        *self.weights.entry(road.to_owned()).or_insert(0.0) += weight;
    }

    /// Accumulated weight of `road`, `0.0` if unobserved.
    pub fn accumulated(&self, road: &str) -> f64 {
        self.weights.get(road).copied().unwrap_or(0.0)
    }

    /// Records dropped for an undefined weight.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn road_count(&self) -> usize {
        self.weights.len()
    }

    /// Largest accumulated weight; `1.0` when nothing positive was recorded,
    /// so normalizing an empty condition divides by one.
    pub fn denominator(&self) -> f64 {
        let max = self.weights.values().copied().fold(0.0, f64::max);
        if max > 0.0 { max } else { 1.0 }
    }

    /// Divide every road's weight by the largest one.
    pub fn normalize(self, condition: WeatherCondition) -> RiskTable {
        let denom = self.denominator();
        debug!(
            "{:?}: {} roads, denominator {denom}, {} records skipped",
            condition.label(),
            self.weights.len(),
            self.skipped
        );
        RiskTable::from_scores(condition, self.weights.into_iter().map(|(road, w)| (road, w / denom)))
    }
}

/// Accumulate the records whose label is exactly `condition`.
///
/// Each record is paired with the road name it was matched to; unmatched
/// records (`None`) are ignored.
pub fn accumulate<'a, I>(records: I, condition: &WeatherCondition, weigher: &RecordWeigher) -> RoadWeights
where
    I: IntoIterator<Item = (&'a AccidentRecord, Option<&'a str>)>,
{
    let mut weights = RoadWeights::new();
    for (record, road) in records {
        if record.condition != condition.label() {
            continue;
        }
        if let Some(road) = road {
            weights.add(road, weigher.weight(record));
        }
    }
    weights
}
