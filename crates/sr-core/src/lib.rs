//! `sr-core`: foundational types for the `saferoute` workspace.
//!
//! This crate is a dependency of every other `sr-*` crate.  It has no `sr-*`
//! dependencies and minimal external ones (`thiserror`, `rustc-hash`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`                                      |
//! | [`geo`]       | `GeoPoint`, haversine distance, planar segment distance |
//! | [`weather`]   | `WeatherCondition` and its load-bearing file stem       |
//! | [`risk`]      | `RiskTable`, `UNNAMED_ROAD` sentinel                    |
//! | [`config`]    | `RoutingConfig`, `RiskWeighting`, `AccidentColumns`     |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public types.            |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod risk;
pub mod weather;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AccidentColumns, RiskWeighting, RoutingConfig};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use risk::{RiskTable, UNNAMED_ROAD};
pub use weather::WeatherCondition;
