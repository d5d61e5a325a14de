//! Synthetic downtown road network.
//!
//! Six intersections around a diamond of arterials, loosely placed on
//! downtown Los Angeles.  Two short connectors carry no name so the risk
//! pipeline has something to fill in.

use anyhow::Result;

use sr_core::{GeoPoint, NodeId};
use sr_spatial::{RoadAttrs, RoadNetwork, RoadNetworkBuilder};

/// Road length as a share of the straight-line distance between endpoints.
const DETOUR_FACTOR: f64 = 1.08;

/// Build the diamond network.
///
/// Returns `(network, [west, north, south, east, centre, ramp])`.
pub fn build_network() -> Result<(RoadNetwork, [NodeId; 6])> {
    let mut b = RoadNetworkBuilder::new();

    let west   = b.add_node(GeoPoint::new(34.050, -118.260));
    let north  = b.add_node(GeoPoint::new(34.056, -118.250));
    let south  = b.add_node(GeoPoint::new(34.044, -118.250));
    let east   = b.add_node(GeoPoint::new(34.050, -118.240));
    let centre = b.add_node(GeoPoint::new(34.050, -118.250));
    let ramp   = b.add_node(GeoPoint::new(34.047, -118.2525));

    let roads = [
        (west,   north,  RoadAttrs::default().named("Sunset Blvd").max_speed_tag("60")),
        (north,  east,   RoadAttrs::default().named("Sunset Blvd").max_speed_tag("60")),
        (west,   south,  RoadAttrs::default().with_names(["Figueroa St", "SR 110"]).max_speed_tag("40;50")),
        (south,  east,   RoadAttrs::default().named("Figueroa St").max_speed_tag("40")),
        (west,   centre, RoadAttrs::default().named("Temple St").max_speed_tag("25 mph")),
        (centre, east,   RoadAttrs::default().named("Temple St").max_speed_tag("25 mph")),
        (centre, ramp,   RoadAttrs::default().max_speed_tag("signals")),
        (ramp,   south,  RoadAttrs::default()),
    ];

    for (from, to, attrs) in roads {
        let length_m = b.node_pos(from)?.distance_m(b.node_pos(to)?) * DETOUR_FACTOR;
        b.add_road(from, to, RoadAttrs { length_m, ..attrs })?;
    }

    Ok((b.build(), [west, north, south, east, centre, ramp]))
}
