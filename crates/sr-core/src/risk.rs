//! Per-road risk scores for a single weather condition.

use rustc_hash::FxHashMap;

use crate::WeatherCondition;

/// Name given to road segments that carry no name attribute.
///
/// Treated as an ordinary key by [`RiskTable`]: it is scored only if
/// accidents were matched to unnamed segments that stayed unnamed.
pub const UNNAMED_ROAD: &str = "Unnamed Road";

/// Normalized risk score in `[0, 1]` per road name, for one condition.
///
/// Roads absent from the table score `0.0`.  Built by the risk pipeline (or
/// loaded from its persisted output) and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskTable {
    condition: WeatherCondition,
    scores: FxHashMap<String, f64>,
}

impl RiskTable {
    /// A table with no scored roads; every lookup yields `0.0`.
    pub fn empty(condition: WeatherCondition) -> Self {
        Self { condition, scores: FxHashMap::default() }
    }

    /// Build a table from `(road name, score)` pairs.  A repeated name keeps
    /// its last score.
    pub fn from_scores<I, S>(condition: WeatherCondition, scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            condition,
            scores: scores.into_iter().map(|(name, s)| (name.into(), s)).collect(),
        }
    }

    pub fn condition(&self) -> &WeatherCondition {
        &self.condition
    }

    /// Risk score of `road`, `0.0` if the road is not in the table.
    #[inline]
    pub fn score(&self, road: &str) -> f64 {
        self.scores.get(road).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, road: &str) -> bool {
        self.scores.contains_key(road)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(name, &s)| (name.as_str(), s))
    }

    /// Highest score in the table, `0.0` when empty.
    pub fn max_score(&self) -> f64 {
        self.scores.values().copied().fold(0.0, f64::max)
    }

    /// Entries ordered by descending score, ties by road name.  This is the
    /// row order of persisted tables.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}
