//! diamond: end-to-end saferoute walkthrough on a six-intersection town.
//!
//! 1. Builds a synthetic road network.
//! 2. Scores an embedded accident log into one risk table per condition and
//!    writes them to the configured risk directory.
//! 3. Opens a routing session and compares the safest and fastest route
//!    from City Hall to Union Station under each condition.
//!
//! Usage: `diamond [config.json]`.  Without a path the default
//! `RoutingConfig` is used.  Set `RUST_LOG=debug` for pipeline detail.

mod network;

use std::io::Cursor;

use anyhow::{Context, Result};
use log::{info, warn};

use sr_core::{GeoPoint, RoutingConfig};
use sr_risk::{RiskPipeline, RiskTableStore, load_accidents_reader};
use sr_session::RoutingSession;
use sr_spatial::{CostCriterion, Endpoint, GazetteerGeocoder, RoadNetwork, Route};

use network::build_network;

// ── Accident log ──────────────────────────────────────────────────────────────

// Temple St is the rain black spot.  Two rain records land on the unnamed
// ramp and are scored under whichever name the ramp borrows.
const ACCIDENTS_CSV: &str = "\
ID,Start_Lat,Start_Lng,conditions,visibility
A-1,34.0502,-118.2551,Rain,2.0
A-2,34.0499,-118.2548,Rain,3.5
A-3,34.0501,-118.2452,Rain,1.0
A-4,34.0500,-118.2449,\"Rain, Overcast\",4.0
A-5,34.0531,-118.2551,Clear,10.0
A-6,34.0529,-118.2448,Clear,10.0
A-7,34.0532,-118.2449,Clear,9.0
A-8,34.0486,-118.2513,Rain,2.5
A-9,34.0454,-118.2512,Rain,
A-10,34.0471,-118.2551,Partially cloudy,8.0
A-11,34.0469,-118.2449,Overcast,6.0
A-12,34.0530,-118.2452,\"Rain, Partially cloudy\",5.0
";

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config() -> Result<RoutingConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => RoutingConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn describe(label: &str, route: &Route, network: &RoadNetwork) -> Result<()> {
    let mut roads: Vec<&str> = route.road_names.iter().map(String::as_str).collect();
    roads.dedup();
    println!(
        "  {label:<8} {:>6.0} m  {:>5.1} min  via {}",
        route.length_m(network),
        route.travel_minutes(network),
        roads.join(" → ")
    );
    let riskiest = (0..route.edge_ids.len())
        .filter_map(|i| route.edge_risk(network, i).map(|r| (i, r)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((i, risk)) = riskiest.filter(|(_, r)| *r > 0.0) {
        println!("  {:<8} riskiest segment: {} ({risk:.2})", "", route.road_names[i]);
    }
    println!("  {:<8} {} polyline points", "", route.polyline(network)?.len());
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== diamond: saferoute walkthrough ===");
    let config = load_config()?;

    // 1. Road network.
    let (network, [west, _, _, east, _, _]) = build_network()?;
    println!("Road network: {} nodes, {} edges", network.node_count(), network.edge_count());

    // 2. Risk tables.
    let accidents = load_accidents_reader(Cursor::new(ACCIDENTS_CSV), &config.accident_columns)?;
    println!("Accident log: {} records", accidents.len());

    let store = RiskTableStore::from_config(&config);
    let paths = RiskPipeline::from_config(&config).run_and_save(&network, &accidents, &config.conditions, &store)?;
    for path in &paths {
        info!("risk table {}", path.display());
    }
    println!("Wrote {} risk tables to {}", paths.len(), store.dir().display());

    // 3. Routing session.
    let gazetteer = GazetteerGeocoder::new()
        .with_place("City Hall", network.node_pos(west)?)
        .with_place("Union Station", network.node_pos(east)?);
    let conditions = config.conditions.clone();
    let mut session = RoutingSession::new(network, store, config)?.geocoder(gazetteer);

    let origin = Endpoint::from("City Hall");
    let destination = Endpoint::from("Union Station");

    println!();
    for condition in conditions {
        if let Err(e) = session.set_weather(condition.clone()) {
            warn!("skipping {:?}: {e}", condition.label());
            continue;
        }
        let cmp = session.compare(&origin, &destination)?;
        println!("{condition}:");
        describe("safest", &cmp.safest, session.network())?;
        if cmp.same_path() {
            println!("  {:<8} same as safest", "fastest");
        } else {
            describe("fastest", &cmp.fastest, session.network())?;
            println!("  {:<8} +{:.1} min for the safer route", "", cmp.extra_minutes());
        }
    }

    // Raw coordinates work too; this one snaps to Union Station.
    let near_station = Endpoint::from(GeoPoint::new(34.0501, -118.2401));
    let shortest = session.route(&origin, &near_station, CostCriterion::Distance)?;
    println!();
    println!("Shortest:");
    describe("distance", &shortest, session.network())?;

    Ok(())
}
