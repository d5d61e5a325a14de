//! `sr-session`: the routing session a front end talks to.
//!
//! A [`RoutingSession`] owns one road network and keeps it annotated for the
//! selected weather condition:
//!
//! ```text
//! set_weather(c) ─► RiskTableStore::load(c) ─► CostAnnotator::annotate
//! compare(o, d)  ─► Risk route ("safest") + Time route ("fastest")
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `compare` runs both searches on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sr_core::RoutingConfig;
//! use sr_risk::RiskTableStore;
//! use sr_session::RoutingSession;
//!
//! let config = RoutingConfig::default();
//! let store = RiskTableStore::from_config(&config);
//! let mut session = RoutingSession::new(network, store, config)?;
//! session.set_weather("Rain".into())?;
//! let cmp = session.compare(&origin.into(), &destination.into())?;
//! println!("safest {:.1} min, fastest {:.1} min", cmp.safest_minutes, cmp.fastest_minutes);
//! ```

pub mod error;
pub mod session;


pub use error::{SessionError, SessionResult};
pub use session::{RouteComparison, RoutingSession};
