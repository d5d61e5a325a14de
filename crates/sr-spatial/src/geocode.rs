//! Place-name resolution.
//!
//! Routing only needs a coordinate per endpoint; turning free text into one
//! is delegated to a [`Geocoder`].  Online geocoding services live outside
//! this workspace.  [`GazetteerGeocoder`] is a fixed lookup table for tests,
//! demos and offline deployments with a known set of places.

use rustc_hash::FxHashMap;

use sr_core::GeoPoint;

use crate::{SpatialError, SpatialResult};

/// Resolves a free-text place description into a coordinate.
pub trait Geocoder: Send + Sync {
    /// # Errors
    ///
    /// [`SpatialError::Geocode`] when the place cannot be resolved.
    fn geocode(&self, query: &str) -> SpatialResult<GeoPoint>;
}

/// A geocoder backed by an in-memory table of known places.
///
/// Lookups ignore ASCII case and surrounding whitespace.
#[derive(Clone, Debug, Default)]
pub struct GazetteerGeocoder {
    places: FxHashMap<String, GeoPoint>,
}

impl GazetteerGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, place: &str, pos: GeoPoint) {
        self.places.insert(Self::key(place), pos);
    }

    pub fn with_place(mut self, place: &str, pos: GeoPoint) -> Self {
        self.insert(place, pos);
        self
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn key(place: &str) -> String {
        place.trim().to_ascii_lowercase()
    }
}

impl Geocoder for GazetteerGeocoder {
    fn geocode(&self, query: &str) -> SpatialResult<GeoPoint> {
        self.places
            .get(&Self::key(query))
            .copied()
            .ok_or_else(|| SpatialError::Geocode(format!("no known place matches {query:?}")))
    }
}
