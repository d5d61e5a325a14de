//! `sr-risk`: offline risk scoring from historical accident records.
//!
//! # Pipeline
//!
//! 1. [`accident`] loads point records (position, weather label, visibility).
//! 2. Each record is matched to its nearest directed edge
//!    ([`RoadNetwork::nearest_edge`](sr_spatial::RoadNetwork::nearest_edge)).
//! 3. [`names`] gives every edge a canonical name and lends names to unnamed
//!    edges from their nearest named neighbours.
//! 4. [`score`] accumulates per-road weights for one condition and normalizes
//!    them into a [`RiskTable`](sr_core::RiskTable).
//! 5. [`store`] persists one CSV per condition.
//!
//! [`pipeline::RiskPipeline`] runs steps 2–4 for a whole condition set.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Conditions and unnamed-edge fill-in run on Rayon.       |

pub mod accident;
pub mod error;
pub mod names;
pub mod pipeline;
pub mod score;
pub mod store;

#[cfg(test)]
mod tests;

pub use accident::{AccidentRecord, AccidentSet, load_accidents_csv, load_accidents_reader};
pub use error::{RiskError, RiskResult};
pub use names::{EdgeNames, fill_unnamed};
pub use pipeline::RiskPipeline;
pub use score::{RecordWeigher, RoadWeights};
pub use store::RiskTableStore;
