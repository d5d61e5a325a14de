//! `sr-spatial`: road multigraph, spatial indexing, cost annotation, routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-trees), `RoadNetworkBuilder`, `EdgeRef` |
//! | [`attrs`]   | `RoadAttrs`, name normalization, `parse_max_speed`            |
//! | [`cost`]    | `CostAnnotator`, `CostCriterion`, `EdgeCosts`                 |
//! | [`router`]  | `Router` trait, `AStarRouter`, `Route`, `Endpoint`            |
//! | [`geocode`] | `Geocoder` trait, `GazetteerGeocoder`                         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Session discipline
//!
//! [`CostAnnotator::annotate`] takes `&mut RoadNetwork` and every search takes
//! `&RoadNetwork`, so a graph cannot be re-annotated while a search borrows
//! it.  Sessions that need several weather conditions at once clone the
//! network.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod attrs;
pub mod cost;
pub mod error;
pub mod geocode;
pub mod network;
pub mod router;


pub use attrs::{RoadAttrs, parse_max_speed};
pub use cost::{CostAnnotator, CostCriterion, EdgeCosts};
pub use error::{SpatialError, SpatialResult};
pub use geocode::{GazetteerGeocoder, Geocoder};
pub use network::{EdgeRef, EdgeView, RoadNetwork, RoadNetworkBuilder};
pub use router::{AStarRouter, Endpoint, Route, Router};
