//! Unit tests for sr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(34.05, -118.25);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.2 km
        let a = GeoPoint::new(34.0, -118.0);
        let b = GeoPoint::new(35.0, -118.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn segment_distance_perpendicular() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 2.0);
        // Point one degree north of the segment's midpoint.
        let p = GeoPoint::new(1.0, 1.0);
        assert!((p.segment_distance_2(a, b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_clamps_to_endpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let p = GeoPoint::new(0.0, 3.0);
        assert!((p.segment_distance_2(a, b) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segment() {
        let a = GeoPoint::new(1.0, 1.0);
        let p = GeoPoint::new(1.0, 2.0);
        assert!((p.segment_distance_2(a, a) - 1.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod weather {
    use crate::WeatherCondition;

    #[test]
    fn file_stem_replaces_comma_space_then_space() {
        assert_eq!(WeatherCondition::new("Clear").file_stem(), "Clear");
        assert_eq!(WeatherCondition::new("Partially cloudy").file_stem(), "Partially_cloudy");
        assert_eq!(WeatherCondition::new("Rain, Overcast").file_stem(), "Rain_Overcast");
        assert_eq!(
            WeatherCondition::new("Rain, Partially cloudy").file_stem(),
            "Rain_Partially_cloudy"
        );
        // A bare comma is left alone.
        assert_eq!(WeatherCondition::new("Snow,Rain").file_stem(), "Snow,Rain");
    }

    #[test]
    fn defaults_cover_six_conditions() {
        let all = WeatherCondition::defaults();
        assert_eq!(all.len(), 6);
        assert_eq!(all[3].label(), "Rain");
    }
}

#[cfg(test)]
mod risk {
    use crate::{RiskTable, UNNAMED_ROAD, WeatherCondition};

    fn table() -> RiskTable {
        RiskTable::from_scores(
            WeatherCondition::new("Rain"),
            [("Main St", 1.0), ("Oak Ave", 0.25), (UNNAMED_ROAD, 0.5)],
        )
    }

    #[test]
    fn absent_roads_score_zero() {
        let t = table();
        assert_eq!(t.score("Main St"), 1.0);
        assert_eq!(t.score("Elm St"), 0.0);
        assert!(!t.contains("Elm St"));
    }

    #[test]
    fn sentinel_is_an_ordinary_key() {
        assert_eq!(table().score(UNNAMED_ROAD), 0.5);
        let empty = RiskTable::empty(WeatherCondition::new("Clear"));
        assert_eq!(empty.score(UNNAMED_ROAD), 0.0);
        assert_eq!(empty.max_score(), 0.0);
    }

    #[test]
    fn ranked_descending() {
        let t = table();
        let names: Vec<_> = t.ranked().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Main St", UNNAMED_ROAD, "Oak Ave"]);
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, RiskWeighting, RoutingConfig};

    #[test]
    fn defaults_are_valid() {
        let cfg = RoutingConfig::default();
        assert_eq!(cfg.default_speed_kph, 50.0);
        assert_eq!(cfg.weighting, RiskWeighting::Count);
        assert!(cfg.bfs_max_depth.is_none());
        assert_eq!(cfg.accident_columns.longitude, "Start_Lng");
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_speed() {
        let cfg = RoutingConfig { default_speed_kph: 0.0, ..RoutingConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_empty_conditions() {
        let cfg = RoutingConfig { conditions: vec![], ..RoutingConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
