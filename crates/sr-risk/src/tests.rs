//! Unit tests for sr-risk.

#[cfg(test)]
mod helpers {
    use sr_core::{GeoPoint, NodeId};
    use sr_spatial::{RoadAttrs, RoadNetwork, RoadNetworkBuilder};

    /// West-to-east chain of two-way roads, only the first one named, plus
    /// an isolated unnamed stub far away.
    ///
    /// ```text
    ///   A ──Main St── B ──(none)── C ──(none)── D        E ──(none)── F
    /// ```
    pub fn chain() -> (RoadNetwork, [NodeId; 6]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(34.0, -118.30));
        let n_b = b.add_node(GeoPoint::new(34.0, -118.29));
        let c = b.add_node(GeoPoint::new(34.0, -118.28));
        let d = b.add_node(GeoPoint::new(34.0, -118.27));
        let e = b.add_node(GeoPoint::new(35.0, -118.00));
        let f = b.add_node(GeoPoint::new(35.0, -117.99));

        b.add_road(a, n_b, RoadAttrs::new(925.0).named("Main St")).unwrap();
        b.add_road(n_b, c, RoadAttrs::new(925.0)).unwrap();
        b.add_road(c, d, RoadAttrs::new(925.0)).unwrap();
        b.add_road(e, f, RoadAttrs::new(915.0)).unwrap();

        (b.build(), [a, n_b, c, d, e, f])
    }

    /// [`chain`] without the stub, with `Oak Ave` running north from D.
    ///
    /// ```text
    ///                                          G
    ///                                          │ Oak Ave
    ///   A ──Main St── B ──(none)── C ──(none)── D
    /// ```
    pub fn town() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(34.0, -118.30));
        let n_b = b.add_node(GeoPoint::new(34.0, -118.29));
        let c = b.add_node(GeoPoint::new(34.0, -118.28));
        let d = b.add_node(GeoPoint::new(34.0, -118.27));
        let g = b.add_node(GeoPoint::new(34.01, -118.27));

        b.add_road(a, n_b, RoadAttrs::new(925.0).named("Main St")).unwrap();
        b.add_road(n_b, c, RoadAttrs::new(925.0)).unwrap();
        b.add_road(c, d, RoadAttrs::new(925.0)).unwrap();
        b.add_road(d, g, RoadAttrs::new(1_112.0).named("Oak Ave")).unwrap();

        b.build()
    }

    /// Accidents near the middle of A–B (x2, Rain), B–C (Clear) and C–D
    /// (Rain), in [`town`] coordinates.
    pub const TOWN_ACCIDENTS: &str = "\
ID,Start_Lat,Start_Lng,conditions,visibility
1,34.0001,-118.295,Rain,10
2,33.9999,-118.296,Rain,4
3,34.0001,-118.285,Clear,10
4,34.0001,-118.275,Rain,
";
}

// ── Accident loader ───────────────────────────────────────────────────────────

#[cfg(test)]
mod accident {
    use sr_core::AccidentColumns;

    use crate::{RiskError, load_accidents_reader};

    #[test]
    fn loads_records_by_header() {
        let set = load_accidents_reader(super::helpers::TOWN_ACCIDENTS.as_bytes(), &AccidentColumns::default())
            .unwrap();
        assert_eq!(set.len(), 4);
        assert!(set.has_visibility);
        let first = &set.records[0];
        assert_eq!(first.position.lat, 34.0001);
        assert_eq!(first.position.lon, -118.295);
        assert_eq!(first.condition, "Rain");
        assert_eq!(first.visibility, 10.0);
    }

    #[test]
    fn blank_visibility_is_nan() {
        let set = load_accidents_reader(super::helpers::TOWN_ACCIDENTS.as_bytes(), &AccidentColumns::default())
            .unwrap();
        assert!(set.records[3].visibility.is_nan());
        assert_eq!(set.max_visibility(), Some(10.0));
    }

    #[test]
    fn quoted_condition_kept_verbatim() {
        let csv = "Start_Lat,Start_Lng,conditions\n34.0,-118.0,\"Rain, Overcast\"\n";
        let set = load_accidents_reader(csv.as_bytes(), &AccidentColumns::default()).unwrap();
        assert_eq!(set.records[0].condition, "Rain, Overcast");
        assert!(!set.has_visibility);
        assert!(set.records[0].visibility.is_nan());
        assert_eq!(set.max_visibility(), None);
    }

    #[test]
    fn missing_required_column_is_data_format() {
        let csv = "Start_Lat,conditions\n34.0,Rain\n";
        let err = load_accidents_reader(csv.as_bytes(), &AccidentColumns::default()).unwrap_err();
        assert!(matches!(err, RiskError::DataFormat(ref m) if m.contains("Start_Lng")));
    }

    #[test]
    fn out_of_range_coordinate_is_data_format() {
        let csv = "Start_Lat,Start_Lng,conditions\n95.0,-118.0,Rain\n";
        let err = load_accidents_reader(csv.as_bytes(), &AccidentColumns::default()).unwrap_err();
        assert!(matches!(err, RiskError::DataFormat(ref m) if m.contains("line 2")));
    }

    #[test]
    fn custom_column_names() {
        let columns = AccidentColumns {
            longitude:  "lng".to_owned(),
            latitude:   "lat".to_owned(),
            condition:  "weather".to_owned(),
            visibility: "vis".to_owned(),
        };
        let csv = "\u{feff}lat,lng,weather,vis\n34.0,-118.0,Clear,7.5\n";
        let set = load_accidents_reader(csv.as_bytes(), &columns).unwrap();
        assert_eq!(set.records[0].condition, "Clear");
        assert_eq!(set.records[0].visibility, 7.5);
    }
}

// ── Unnamed-edge fill-in ──────────────────────────────────────────────────────

#[cfg(test)]
mod names {
    use sr_core::UNNAMED_ROAD;

    use crate::{EdgeNames, fill_unnamed};

    #[test]
    fn original_names_use_sentinel() {
        let (net, [a, b, c, _, e, f]) = super::helpers::chain();
        let names = EdgeNames::from_network(&net);
        assert_eq!(names.len(), net.edge_count());
        let ab = net.edges_between(a, b).unwrap().next().unwrap();
        let bc = net.edges_between(b, c).unwrap().next().unwrap();
        let ef = net.edges_between(e, f).unwrap().next().unwrap();
        assert_eq!(names.get(ab), "Main St");
        assert_eq!(names.get(bc), UNNAMED_ROAD);
        assert_eq!(names.get(ef), UNNAMED_ROAD);
        // B–C, C–D and E–F in both directions.
        assert_eq!(names.unnamed_count(), 6);
    }

    #[test_log::test]
    fn unbounded_fill_reaches_whole_component() {
        let (net, [_, b, c, d, e, f]) = super::helpers::chain();
        let original = EdgeNames::from_network(&net);
        let filled = fill_unnamed(&net, &original, None).unwrap();

        for (u, v) in [(b, c), (c, b), (c, d), (d, c)] {
            let edge = net.edges_between(u, v).unwrap().next().unwrap();
            assert_eq!(filled.get(edge), "Main St");
        }
        // No named edge in the stub's component.
        for (u, v) in [(e, f), (f, e)] {
            let edge = net.edges_between(u, v).unwrap().next().unwrap();
            assert_eq!(filled.get(edge), UNNAMED_ROAD);
        }
        assert_eq!(filled.unnamed_count(), 2);
    }

    #[test_log::test]
    fn fill_is_single_pass() {
        // With depth 0 only the edges' own endpoints are inspected.  B–C
        // touches Main St at B; C–D would only see it through the freshly
        // filled B–C, which does not count.
        let (net, [_, b, c, d, _, _]) = super::helpers::chain();
        let original = EdgeNames::from_network(&net);
        let filled = fill_unnamed(&net, &original, Some(0)).unwrap();

        let bc = net.edges_between(b, c).unwrap().next().unwrap();
        let cd = net.edges_between(c, d).unwrap().next().unwrap();
        assert_eq!(filled.get(bc), "Main St");
        assert_eq!(filled.get(cd), UNNAMED_ROAD);
    }

    #[test]
    fn depth_limit_counts_hops() {
        let (net, [_, _, c, d, _, _]) = super::helpers::chain();
        let original = EdgeNames::from_network(&net);
        let filled = fill_unnamed(&net, &original, Some(1)).unwrap();
        let cd = net.edges_between(c, d).unwrap().next().unwrap();
        assert_eq!(filled.get(cd), "Main St");
    }

    #[test]
    fn nearest_name_wins() {
        let net = super::helpers::town();
        let original = EdgeNames::from_network(&net);
        let filled = fill_unnamed(&net, &original, None).unwrap();
        // Node order: A, B, C, D, G.
        let bc = net
            .edges_between(sr_core::NodeId(1), sr_core::NodeId(2))
            .unwrap()
            .next()
            .unwrap();
        let cd = net
            .edges_between(sr_core::NodeId(2), sr_core::NodeId(3))
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(filled.get(bc), "Main St");
        assert_eq!(filled.get(cd), "Oak Ave");
        assert_eq!(filled.unnamed_count(), 0);
    }

    #[test]
    fn named_edges_are_untouched() {
        let net = super::helpers::town();
        let original = EdgeNames::from_network(&net);
        let filled = fill_unnamed(&net, &original, None).unwrap();
        for e in net.edge_ids() {
            if original.is_named(e) {
                assert_eq!(filled.get(e), original.get(e));
            }
        }
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod score {
    use sr_core::{GeoPoint, RiskWeighting, WeatherCondition};

    use crate::score::accumulate;
    use crate::{AccidentRecord, RecordWeigher, RoadWeights};

    fn record(condition: &str, visibility: f64) -> AccidentRecord {
        AccidentRecord { position: GeoPoint::new(0.0, 0.0), condition: condition.to_owned(), visibility }
    }

    #[test]
    fn count_weighting_is_one_per_record() {
        let w = RecordWeigher::new(RiskWeighting::Count, None);
        assert_eq!(w.weight(&record("Rain", f64::NAN)), 1.0);
        assert_eq!(w.weight(&record("Rain", 3.0)), 1.0);
    }

    #[test]
    fn visibility_weighting_favours_poor_visibility() {
        let w = RecordWeigher::new(RiskWeighting::Visibility, Some(10.0));
        assert_eq!(w.weight(&record("Rain", 10.0)), 1.0);
        assert_eq!(w.weight(&record("Rain", 4.0)), 7.0);
        assert!(w.weight(&record("Rain", f64::NAN)).is_nan());
    }

    #[test]
    fn nan_weights_are_skipped() {
        let w = RecordWeigher::new(RiskWeighting::Visibility, Some(10.0));
        let mut weights = RoadWeights::new();
        for vis in [10.0, 9.0, f64::NAN] {
            weights.add("Main St", w.weight(&record("Rain", vis)));
        }
        assert_eq!(weights.accumulated("Main St"), 3.0);
        assert_eq!(weights.skipped(), 1);
    }

    #[test]
    fn road_with_only_nan_weights_is_absent() {
        let mut weights = RoadWeights::new();
        weights.add("Oak Ave", f64::NAN);
        assert_eq!(weights.road_count(), 0);
        let table = weights.normalize(WeatherCondition::new("Rain"));
        assert!(!table.contains("Oak Ave"));
    }

    #[test]
    fn normalized_scores_top_out_at_one() {
        let mut weights = RoadWeights::new();
        weights.add("Main St", 4.0);
        weights.add("Oak Ave", 1.0);
        weights.add("Oak Ave", 1.0);
        let table = weights.normalize(WeatherCondition::new("Rain"));
        assert_eq!(table.score("Main St"), 1.0);
        assert_eq!(table.score("Oak Ave"), 0.5);
        assert_eq!(table.max_score(), 1.0);
        assert!(table.iter().all(|(_, s)| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn empty_condition_gives_empty_table() {
        let weights = RoadWeights::new();
        assert_eq!(weights.denominator(), 1.0);
        let table = weights.normalize(WeatherCondition::new("Clear"));
        assert!(table.is_empty());
        assert_eq!(table.score("Main St"), 0.0);
    }

    #[test]
    fn accumulate_filters_by_exact_label() {
        let records = [record("Rain", 1.0), record("Rain, Overcast", 1.0), record("rain", 1.0)];
        let roads = [Some("Main St"), Some("Main St"), Some("Main St")];
        let w = RecordWeigher::new(RiskWeighting::Count, None);
        let weights = accumulate(records.iter().zip(roads), &WeatherCondition::new("Rain"), &w);
        assert_eq!(weights.accumulated("Main St"), 1.0);
    }

    #[test]
    fn accumulate_ignores_unmatched_records() {
        let records = [record("Rain", 1.0), record("Rain", 1.0)];
        let roads = [Some("Main St"), None];
        let w = RecordWeigher::new(RiskWeighting::Count, None);
        let weights = accumulate(records.iter().zip(roads), &WeatherCondition::new("Rain"), &w);
        assert_eq!(weights.accumulated("Main St"), 1.0);
        assert_eq!(weights.road_count(), 1);
    }
}

// ── Risk table store ──────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use sr_core::{RiskTable, RoutingConfig, WeatherCondition};

    use crate::store::read_table;
    use crate::{RiskError, RiskTableStore};

    fn table(label: &str) -> RiskTable {
        RiskTable::from_scores(
            WeatherCondition::new(label),
            [("Main St", 1.0), ("Oak Ave", 0.25), ("Unnamed Road", 0.5)],
        )
    }

    #[test]
    fn file_name_follows_condition_stem() {
        let store = RiskTableStore::new("risk_maps");
        let path = store.path_for(&WeatherCondition::new("Rain, Partially cloudy"));
        assert_eq!(path, std::path::Path::new("risk_maps").join("Rain_Partially_cloudy.csv"));
        assert_eq!(RiskTableStore::from_config(&RoutingConfig::default()), store);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RiskTableStore::new(dir.path().join("maps"));
        let original = table("Rain, Partially cloudy");

        let path = store.save(&original).unwrap();
        assert_eq!(path.file_name().unwrap(), "Rain_Partially_cloudy.csv");
        assert!(store.contains(original.condition()));

        let loaded = store.load(original.condition()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn rows_written_by_descending_score() {
        let dir = tempfile::tempdir().unwrap();
        let store = RiskTableStore::new(dir.path());
        let path = store.save(&table("Clear")).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["road_name,risk_score", "Main St,1.0", "Unnamed Road,0.5", "Oak Ave,0.25"]);
    }

    #[test]
    fn missing_file_is_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = RiskTableStore::new(dir.path());
        let err = store.load(&WeatherCondition::new("Overcast")).unwrap_err();
        assert!(matches!(err, RiskError::MissingTable { ref condition, .. } if condition.label() == "Overcast"));
    }

    #[test]
    fn out_of_range_score_rejected() {
        let csv = "road_name,risk_score\nMain St,1.5\n";
        let err = read_table(csv.as_bytes(), WeatherCondition::new("Rain")).unwrap_err();
        assert!(matches!(err, RiskError::DataFormat(_)));
    }

    #[test]
    fn unparseable_score_rejected() {
        let csv = "road_name,risk_score\nMain St,high\n";
        let err = read_table(csv.as_bytes(), WeatherCondition::new("Rain")).unwrap_err();
        assert!(matches!(err, RiskError::DataFormat(ref m) if m.contains("line 2")));
    }

    #[test]
    fn repeated_road_rejected() {
        let csv = "road_name,risk_score\nMain St,1.0\nOak Ave,0.5\nMain St,0.2\n";
        let err = read_table(csv.as_bytes(), WeatherCondition::new("Rain")).unwrap_err();
        assert!(matches!(
            err,
            RiskError::DataFormat(ref m) if m.contains("line 4") && m.contains("Main St")
        ));
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use sr_core::{AccidentColumns, RiskWeighting, RoutingConfig, WeatherCondition};
    use sr_spatial::RoadNetworkBuilder;

    use crate::{AccidentSet, RiskError, RiskPipeline, RiskTableStore, load_accidents_reader};

    fn accidents() -> AccidentSet {
        load_accidents_reader(super::helpers::TOWN_ACCIDENTS.as_bytes(), &AccidentColumns::default()).unwrap()
    }

    fn conditions() -> Vec<WeatherCondition> {
        ["Rain", "Clear", "Rain, Overcast"].into_iter().map(WeatherCondition::from).collect()
    }

    #[test]
    fn every_record_matches_its_road() {
        let net = super::helpers::town();
        let pipeline = RiskPipeline::default();
        let names = pipeline.edge_names(&net).unwrap();
        let matched = pipeline.match_accidents(&net, &accidents());
        let roads: Vec<&str> = matched.iter().map(|m| names.get(m.unwrap())).collect();
        assert_eq!(roads, ["Main St", "Main St", "Main St", "Oak Ave"]);
    }

    #[test_log::test]
    fn count_weighted_tables() {
        let net = super::helpers::town();
        let tables = RiskPipeline::default().run(&net, &accidents(), &conditions()).unwrap();
        assert_eq!(tables.len(), 3);

        let rain = &tables[0];
        assert_eq!(rain.condition().label(), "Rain");
        assert_eq!(rain.score("Main St"), 1.0);
        assert_eq!(rain.score("Oak Ave"), 0.5);

        let clear = &tables[1];
        assert_eq!(clear.score("Main St"), 1.0);
        assert!(!clear.contains("Oak Ave"));

        assert!(tables[2].is_empty());
    }

    #[test]
    fn visibility_weighted_tables() {
        // Dataset max visibility is 10.  Rain on Main St weighs 1 + 7 = 8;
        // the Oak Ave record has no visibility and is skipped.
        let net = super::helpers::town();
        let pipeline = RiskPipeline::new(RiskWeighting::Visibility, None);
        let tables = pipeline.run(&net, &accidents(), &conditions()).unwrap();
        let rain = &tables[0];
        assert_eq!(rain.score("Main St"), 1.0);
        assert!(!rain.contains("Oak Ave"));
    }

    #[test]
    fn visibility_weighting_needs_visibility_column() {
        let csv = "Start_Lat,Start_Lng,conditions\n34.0001,-118.295,Rain\n";
        let set = load_accidents_reader(csv.as_bytes(), &AccidentColumns::default()).unwrap();
        let net = super::helpers::town();
        let pipeline = RiskPipeline::new(RiskWeighting::Visibility, None);
        let err = pipeline.run(&net, &set, &conditions()).unwrap_err();
        assert!(matches!(err, RiskError::DataFormat(_)));
    }

    #[test]
    fn empty_network_matches_nothing() {
        let net = RoadNetworkBuilder::new().build();
        let tables = RiskPipeline::default().run(&net, &accidents(), &conditions()).unwrap();
        assert!(tables.iter().all(|t| t.is_empty()));
    }

    #[test_log::test]
    fn run_and_save_writes_one_file_per_condition() {
        let dir = tempfile::tempdir().unwrap();
        let config = RoutingConfig { risk_dir: dir.path().to_path_buf(), ..RoutingConfig::default() };
        let store = RiskTableStore::from_config(&config);
        let net = super::helpers::town();

        let paths = RiskPipeline::from_config(&config)
            .run_and_save(&net, &accidents(), &conditions(), &store)
            .unwrap();
        let files: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, ["Rain.csv", "Clear.csv", "Rain_Overcast.csv"]);

        let rain = store.load(&WeatherCondition::new("Rain")).unwrap();
        assert_eq!(rain.score("Oak Ave"), 0.5);
    }
}
