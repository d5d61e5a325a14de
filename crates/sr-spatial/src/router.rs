//! Routing trait and the default A* implementation.
//!
//! # Heuristic
//!
//! [`AStarRouter`] estimates remaining cost as the haversine distance from a
//! node to the destination, whatever the criterion.  That estimate is
//! admissible only for [`CostCriterion::Distance`].  Under `Risk` it is
//! still a lower bound (risk only inflates length) and under `Time` it is on
//! a different scale entirely (hours vs metres), which turns the search into
//! a distance-guided greedy best-first search.  Routes under non-distance
//! criteria are therefore good but not provably optimal.  Nodes are closed
//! once and never reopened, as in classical A*.
//!
//! # Parallel edges
//!
//! Between two nodes the traversal cost is the cheapest parallel edge under
//! the active criterion; reconstruction picks that same edge (lowest key on
//! ties).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use sr_core::{EdgeId, GeoPoint, NodeId};

use crate::cost::CostCriterion;
use crate::geocode::Geocoder;
use crate::network::{EdgeRef, RoadNetwork};
use crate::{SpatialError, SpatialResult};

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// Where a route starts or ends, before snapping to the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Coord(GeoPoint),
    /// Free-text place, resolved by a [`Geocoder`].
    Place(String),
}

impl From<GeoPoint> for Endpoint {
    fn from(p: GeoPoint) -> Self {
        Endpoint::Coord(p)
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Endpoint::Place(s.to_owned())
    }
}

impl Endpoint {
    /// Resolve to a coordinate, geocoding places.
    pub fn resolve(&self, geocoder: Option<&dyn Geocoder>) -> SpatialResult<GeoPoint> {
        match self {
            Endpoint::Coord(p) => Ok(*p),
            Endpoint::Place(query) => match geocoder {
                Some(g) => g.geocode(query),
                None => Err(SpatialError::Geocode(format!(
                    "no geocoder available to resolve {query:?}"
                ))),
            },
        }
    }

    /// Resolve and snap to the nearest node of `network`.
    pub fn snap(&self, network: &RoadNetwork, geocoder: Option<&dyn Geocoder>) -> SpatialResult<NodeId> {
        let pos = self.resolve(geocoder)?;
        network.snap_to_node(pos).ok_or(SpatialError::EmptyNetwork)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of one `(origin, destination, criterion)` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Criterion the route was optimized for.
    pub criterion: CostCriterion,
    /// Nodes from origin to destination; never repeats a node.
    pub nodes: Vec<NodeId>,
    /// Concrete edges, one per consecutive node pair.
    pub edges: Vec<EdgeRef>,
    /// Dense ids of `edges`, same order.
    pub edge_ids: Vec<EdgeId>,
    /// Road name of each edge (sentinel for unnamed edges).
    pub road_names: Vec<String>,
    /// Sum of `criterion` costs along `edges`.
    pub total_cost: f64,
}

impl Route {
    /// `true` if origin and destination snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Re-sum the route's edges under another criterion, using the network's
    /// current annotation.
    pub fn total(&self, network: &RoadNetwork, criterion: CostCriterion) -> f64 {
        self.edge_ids.iter().map(|&e| network.costs(e).get(criterion)).sum()
    }

    /// Travel time in minutes at free-flow speed.
    pub fn travel_minutes(&self, network: &RoadNetwork) -> f64 {
        self.total(network, CostCriterion::Time) * 60.0
    }

    pub fn length_m(&self, network: &RoadNetwork) -> f64 {
        self.total(network, CostCriterion::Distance)
    }

    /// Base risk score of the `i`-th edge recovered from its costs
    /// (`risk / length - 1`), clamped to `[0, 1]`.  Zero-length edges report 0.
    pub fn edge_risk(&self, network: &RoadNetwork, i: usize) -> Option<f64> {
        let costs = network.costs(*self.edge_ids.get(i)?);
        if costs.distance <= 0.0 {
            return Some(0.0);
        }
        Some((costs.risk / costs.distance - 1.0).clamp(0.0, 1.0))
    }

    /// Coordinates tracing the whole route, following edge geometry where
    /// present.  Shared joints between consecutive edges appear once.
    pub fn polyline(&self, network: &RoadNetwork) -> SpatialResult<Vec<GeoPoint>> {
        if self.edge_ids.is_empty() {
            return self.nodes.iter().map(|&n| network.node_pos(n)).collect();
        }
        let mut line: Vec<GeoPoint> = Vec::new();
        for &e in &self.edge_ids {
            let shape = network.edge_geometry(e)?;
            let skip = usize::from(line.last() == shape.first());
            line.extend_from_slice(shape.get(skip..).unwrap_or_default());
        }
        Ok(line)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so the safest and fastest routes can
/// be computed concurrently against one read-only annotated network.
pub trait Router: Send + Sync {
    /// Minimum-cost route from `from` to `to` under `criterion`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NodeNotFound`] for invalid endpoints,
    /// [`SpatialError::NoPathFound`] if `to` is unreachable from `from`.
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        criterion: CostCriterion,
    ) -> SpatialResult<Route>;

    /// Snap both endpoints to their nearest nodes, then [`route`](Self::route).
    fn route_points(
        &self,
        network: &RoadNetwork,
        origin: &Endpoint,
        destination: &Endpoint,
        criterion: CostCriterion,
        geocoder: Option<&dyn Geocoder>,
    ) -> SpatialResult<Route> {
        let from = origin.snap(network, geocoder)?;
        let to = destination.snap(network, geocoder)?;
        debug!("snapped {origin:?} to {from}, {destination:?} to {to}");
        self.route(network, from, to, criterion)
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first A* search with a haversine heuristic.  See the module docs for
/// its optimality caveats.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        criterion: CostCriterion,
    ) -> SpatialResult<Route> {
        astar(network, from, to, criterion)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  Ordered so `BinaryHeap` pops the lowest `f` first, then
/// the lowest `NodeId` for determinism.
#[derive(Copy, Clone)]
struct OpenEntry {
    f: f64,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn astar(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    criterion: CostCriterion,
) -> SpatialResult<Route> {
    network.check_node(from)?;
    let goal = network.node_pos(to)?;
    let heuristic = |n: NodeId| network.node_pos[n.index()].distance_m(goal);

    let n = network.node_count();
    // g[v] = best known cost from `from` to v.
    let mut g = vec![f64::INFINITY; n];
    // came_from[v] = predecessor on the best known path; INVALID if unreached.
    let mut came_from = vec![NodeId::INVALID; n];
    let mut closed = vec![false; n];

    g[from.index()] = 0.0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry { f: heuristic(from), node: from });

    while let Some(OpenEntry { node, .. }) = open.pop() {
        if node == to {
            return Ok(reconstruct(network, &came_from, from, to, g[to.index()], criterion));
        }
        if closed[node.index()] {
            continue;
        }
        closed[node.index()] = true;
        trace!("expand {node} g={}", g[node.index()]);

        for i in network.out_range(node) {
            let nbr = network.edge_to[i];
            if closed[nbr.index()] {
                continue;
            }
            let tentative = g[node.index()] + network.edge_costs[i].get(criterion);
            if tentative < g[nbr.index()] {
                g[nbr.index()] = tentative;
                came_from[nbr.index()] = node;
                open.push(OpenEntry { f: tentative + heuristic(nbr), node: nbr });
            }
        }
    }

    Err(SpatialError::NoPathFound { from, to })
}

/// Cheapest parallel edge from `u` to `v` under `criterion`, lowest key on
/// ties.
fn cheapest_edge(network: &RoadNetwork, u: NodeId, v: NodeId, criterion: CostCriterion) -> Option<EdgeId> {
    network
        .out_range(u)
        .filter(|&i| network.edge_to[i] == v)
        .min_by(|&a, &b| {
            network.edge_costs[a]
                .get(criterion)
                .total_cmp(&network.edge_costs[b].get(criterion))
                .then_with(|| network.edge_key[a].cmp(&network.edge_key[b]))
        })
        .map(|i| EdgeId(i as u32))
}

fn reconstruct(
    network: &RoadNetwork,
    came_from: &[NodeId],
    from: NodeId,
    to: NodeId,
    total_cost: f64,
    criterion: CostCriterion,
) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = came_from[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();

    let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
    let mut edge_ids = Vec::with_capacity(edges.capacity());
    let mut road_names = Vec::with_capacity(edges.capacity());
    for pair in nodes.windows(2) {
        // Every consecutive pair was relaxed over at least one edge.
        let Some(e) = cheapest_edge(network, pair[0], pair[1], criterion) else {
            continue;
        };
        let i = e.index();
        edges.push(EdgeRef::new(network.edge_from[i], network.edge_to[i], network.edge_key[i]));
        edge_ids.push(e);
        road_names.push(network.road_name(e).to_owned());
    }

    Route { criterion, nodes, edges, edge_ids, road_names, total_cost }
}
