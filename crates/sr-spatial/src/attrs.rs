//! Raw edge attributes as supplied by a network provider.
//!
//! Providers hand over names as a scalar, a list of candidates, or nothing,
//! and speeds as free-form tags.  Both are normalized here, once, when the
//! edge is added to a [`RoadNetworkBuilder`](crate::RoadNetworkBuilder);
//! nothing downstream re-derives them.

use sr_core::GeoPoint;

const KPH_PER_MPH: f64 = 1.609_344;

/// Attributes of one directed edge before it enters the network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoadAttrs {
    /// Physical length in metres.  Negative or non-finite values are replaced
    /// by the great-circle distance between the endpoints at build time.
    pub length_m: f64,
    /// Canonical road name; `None` for unnamed segments.
    pub name: Option<String>,
    /// Declared free-flow speed, km/h.
    pub max_speed_kph: Option<f64>,
    /// Shape of the segment; `None` means a straight line between the nodes.
    /// Fewer than two points are treated as `None` when the edge is added.
    pub geometry: Option<Vec<GeoPoint>>,
}

impl RoadAttrs {
    pub fn new(length_m: f64) -> Self {
        Self { length_m, ..Self::default() }
    }

    /// Set a scalar name.  An empty name counts as no name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = normalize_name(Some(name.into()));
        self
    }

    /// Set the name from a provider candidate list: the first candidate wins.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name = normalize_name(names.into_iter().next().map(Into::into));
        self
    }

    pub fn max_speed(mut self, kph: f64) -> Self {
        self.max_speed_kph = Some(kph);
        self
    }

    /// Set the speed from a raw provider tag; see [`parse_max_speed`].
    pub fn max_speed_tag(mut self, raw: &str) -> Self {
        self.max_speed_kph = parse_max_speed(raw);
        self
    }

    pub fn geometry(mut self, points: Vec<GeoPoint>) -> Self {
        self.geometry = if points.len() >= 2 { Some(points) } else { None };
        self
    }
}

/// Empty names are absent names.
pub(crate) fn normalize_name(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

/// Parse a raw `maxspeed` tag into km/h.
///
/// | Input                 | Result        |
/// |-----------------------|---------------|
/// | `"50"`, `"50 km/h"`   | `Some(50.0)`  |
/// | `"30 mph"`            | `Some(48.28)` |
/// | `"40;50"`, `"['40', '50']"` | first entry |
/// | `"signals"`, `""`     | `None`        |
pub fn parse_max_speed(raw: &str) -> Option<f64> {
    let first = raw
        .split([';', ','])
        .next()?
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"'));

    let (number, factor) = match first.strip_suffix("mph") {
        Some(n) => (n, KPH_PER_MPH),
        None => {
            let n = ["km/h", "kmh", "kph"]
                .iter()
                .find_map(|unit| first.strip_suffix(unit))
                .unwrap_or(first);
            (n, 1.0)
        }
    };

    let value: f64 = number.trim().parse().ok()?;
    value.is_finite().then_some(value * factor)
}
