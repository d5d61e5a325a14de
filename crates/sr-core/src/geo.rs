//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Routing lower bounds compare
//! haversine distances against summed edge lengths, so single precision
//! rounding would be visible in the bound checks.

/// Mean Earth radius in metres used by every great-circle computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// `[lon, lat]` pair, the planar (x, y) layout used by the R-tree indexes.
    #[inline]
    pub fn xy(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Squared planar distance (degree space) from `self` to the segment
    /// `a`–`b`.
    ///
    /// Unprojected: longitude and latitude degrees are treated as equal
    /// units.  Good enough to rank candidate roads around a point within a
    /// city, not to measure anything.
    pub fn segment_distance_2(self, a: GeoPoint, b: GeoPoint) -> f64 {
        let [px, py] = self.xy();
        let [ax, ay] = a.xy();
        let [bx, by] = b.xy();

        let (dx, dy) = (bx - ax, by - ay);
        let len_2 = dx * dx + dy * dy;
        let t = if len_2 == 0.0 {
            0.0
        } else {
            (((px - ax) * dx + (py - ay) * dy) / len_2).clamp(0.0, 1.0)
        };

        let (cx, cy) = (ax + t * dx, ay + t * dy);
        (px - cx).powi(2) + (py - cy).powi(2)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
