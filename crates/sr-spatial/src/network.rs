//! Road multigraph representation and builder.
//!
//! # Data layout
//!
//! Edges are stored column-wise and sorted by source node, giving a
//! **Compressed Sparse Row (CSR)** view of outgoing edges:
//!
//! ```text
//! EdgeIds node_out_start[n] .. node_out_start[n+1]   // outgoing edges of n
//! ```
//!
//! A second CSR over edge ids sorted by target node answers incoming-edge
//! queries, which the name fill-in walks need to treat the graph as
//! undirected.
//!
//! # Parallel edges
//!
//! Several edges may join the same ordered pair (divided carriageways, loops).
//! Each gets a `key`, counted from 0 per ordered pair in insertion order, so
//! `(from, to, key)` names an edge the way a provider would.  [`EdgeRef`] is
//! that triple; `EdgeId` is the dense index into the columns.
//!
//! # Spatial indexes
//!
//! Two R-trees (via `rstar`) in planar `[lon, lat]` degree space: one over
//! nodes for endpoint snapping, one over edge segments for matching accident
//! positions to roads.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use log::debug;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use sr_core::{EdgeId, GeoPoint, NodeId, UNNAMED_ROAD, WeatherCondition};

use crate::attrs::{RoadAttrs, normalize_name};
use crate::cost::{CostAnnotator, EdgeCosts};
use crate::{SpatialError, SpatialResult};

// ── R-tree entries ────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// One straight piece of an edge's geometry.
#[derive(Clone)]
struct SegmentEntry {
    a: GeoPoint,
    b: GeoPoint,
    edge: EdgeId,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a.xy(), self.b.xy())
    }
}

impl PointDistance for SegmentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        GeoPoint::new(point[1], point[0]).segment_distance_2(self.a, self.b)
    }
}

// ── EdgeRef ───────────────────────────────────────────────────────────────────

/// Provider-style name of a directed edge: ordered node pair plus parallel-edge
/// key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRef {
    pub from: NodeId,
    pub to: NodeId,
    pub key: u32,
}

impl EdgeRef {
    pub fn new(from: NodeId, to: NodeId, key: u32) -> Self {
        Self { from, to, key }
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} #{}", self.from, self.to, self.key)
    }
}

/// Borrowed view of every attribute of one edge.
#[derive(Clone, Debug)]
pub struct EdgeView<'a> {
    pub id: EdgeId,
    pub edge: EdgeRef,
    pub length_m: f64,
    pub name: Option<&'a str>,
    pub max_speed_kph: Option<f64>,
    pub costs: EdgeCosts,
    pub geometry: Cow<'a, [GeoPoint]>,
}

impl EdgeView<'_> {
    /// Canonical name, the sentinel for unnamed edges.
    pub fn road_name(&self) -> &str {
        self.name.unwrap_or(UNNAMED_ROAD)
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus spatial indexes.
///
/// Column fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
#[derive(Clone)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing edges of node `n` are EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Row pointer into `in_edges`, same shape as `node_out_start`.
    node_in_start: Vec<u32>,

    /// Edge ids sorted by target node.
    in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Parallel-edge key within the `(from, to)` pair.
    pub edge_key: Vec<u32>,
    /// Length in metres.
    pub edge_length_m: Vec<f64>,
    /// Normalized road name; `None` for unnamed segments.
    pub edge_name: Vec<Option<String>>,
    /// Declared free-flow speed in km/h.
    pub edge_max_speed_kph: Vec<Option<f64>>,
    edge_geometry: Vec<Option<Vec<GeoPoint>>>,

    // ── Per-session costs ─────────────────────────────────────────────────
    pub(crate) edge_costs: Vec<EdgeCosts>,
    pub(crate) annotated_for: Option<WeatherCondition>,

    // ── Spatial indexes ───────────────────────────────────────────────────
    node_idx: RTree<NodeEntry>,
    segment_idx: RTree<SegmentEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over every `EdgeId` in the network.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<> {
        (0..self.edge_count() as u32).map(EdgeId)
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    /// Fail with [`SpatialError::NodeNotFound`] unless `node` exists.
    #[inline]
    pub fn check_node(&self, node: NodeId) -> SpatialResult<()> {
        if node.index() < self.node_count() {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(node))
        }
    }

    pub fn node_pos(&self, node: NodeId) -> SpatialResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// EdgeId range of `node`'s outgoing edges.  `node` must be valid.
    #[inline]
    pub(crate) fn out_range(&self, node: NodeId) -> Range<usize> {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    /// Outgoing edges of `node`, parallel edges included.
    pub fn out_edges(&self, node: NodeId) -> SpatialResult<impl Iterator<Item = EdgeId> + '_> {
        self.check_node(node)?;
        Ok(self.out_range(node).map(|i| EdgeId(i as u32)))
    }

    /// Incoming edges of `node`, parallel edges included.
    pub fn in_edges(&self, node: NodeId) -> SpatialResult<impl Iterator<Item = EdgeId> + '_> {
        self.check_node(node)?;
        let start = self.node_in_start[node.index()] as usize;
        let end = self.node_in_start[node.index() + 1] as usize;
        Ok(self.in_edges[start..end].iter().copied())
    }

    /// Outgoing then incoming edges of `node`: its undirected incidence.
    pub fn incident_edges(&self, node: NodeId) -> SpatialResult<impl Iterator<Item = EdgeId> + '_> {
        Ok(self.out_edges(node)?.chain(self.in_edges(node)?))
    }

    /// Every parallel edge from `from` to `to`, in key order.
    pub fn edges_between(
        &self,
        from: NodeId,
        to: NodeId,
    ) -> SpatialResult<impl Iterator<Item = EdgeId> + '_> {
        self.check_node(to)?;
        Ok(self
            .out_edges(from)?
            .filter(move |e| self.edge_to[e.index()] == to))
    }

    // ── Edge lookup ───────────────────────────────────────────────────────

    /// Resolve a `(from, to, key)` triple to its `EdgeId`.
    pub fn edge_id(&self, edge: EdgeRef) -> SpatialResult<EdgeId> {
        self.edges_between(edge.from, edge.to)?
            .find(|e| self.edge_key[e.index()] == edge.key)
            .ok_or(SpatialError::EdgeNotFound(edge))
    }

    /// The `(from, to, key)` triple of an `EdgeId`.
    pub fn edge_ref(&self, id: EdgeId) -> SpatialResult<EdgeRef> {
        self.check_edge(id)?;
        let i = id.index();
        Ok(EdgeRef::new(self.edge_from[i], self.edge_to[i], self.edge_key[i]))
    }

    #[inline]
    pub fn check_edge(&self, id: EdgeId) -> SpatialResult<()> {
        if id.index() < self.edge_count() {
            Ok(())
        } else {
            Err(SpatialError::UnknownEdgeId(id))
        }
    }

    /// All attributes of the edge named by `(from, to, key)`.
    pub fn edge(&self, edge: EdgeRef) -> SpatialResult<EdgeView<'_>> {
        let id = self.edge_id(edge)?;
        self.edge_view(id)
    }

    /// All attributes of the edge with dense index `id`.
    pub fn edge_view(&self, id: EdgeId) -> SpatialResult<EdgeView<'_>> {
        let edge = self.edge_ref(id)?;
        let i = id.index();
        Ok(EdgeView {
            id,
            edge,
            length_m: self.edge_length_m[i],
            name: self.edge_name[i].as_deref(),
            max_speed_kph: self.edge_max_speed_kph[i],
            costs: self.edge_costs[i],
            geometry: self.geometry_of(id),
        })
    }

    /// Canonical road name of `id`: the normalized name or the sentinel.
    /// `id` must be valid.
    #[inline]
    pub fn road_name(&self, id: EdgeId) -> &str {
        self.edge_name[id.index()].as_deref().unwrap_or(UNNAMED_ROAD)
    }

    /// Derived costs of `id` under the current annotation.  `id` must be valid.
    #[inline]
    pub fn costs(&self, id: EdgeId) -> EdgeCosts {
        self.edge_costs[id.index()]
    }

    /// The condition the current costs were computed for; `None` until the
    /// first [`CostAnnotator::annotate`] call.
    pub fn annotated_for(&self) -> Option<&WeatherCondition> {
        self.annotated_for.as_ref()
    }

    /// Shape of `id`: its explicit geometry, or the straight segment between
    /// its endpoints.
    pub fn edge_geometry(&self, id: EdgeId) -> SpatialResult<Cow<'_, [GeoPoint]>> {
        self.check_edge(id)?;
        Ok(self.geometry_of(id))
    }

    fn geometry_of(&self, id: EdgeId) -> Cow<'_, [GeoPoint]> {
        let i = id.index();
        match &self.edge_geometry[i] {
            Some(points) => Cow::Borrowed(points.as_slice()),
            None => Cow::Owned(vec![
                self.node_pos[self.edge_from[i].index()],
                self.node_pos[self.edge_to[i].index()],
            ]),
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`, `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.node_idx.nearest_neighbor(&pos.xy()).map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.node_idx
            .nearest_neighbor_iter(&pos.xy())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// The directed edge whose geometry passes closest to `pos`.
    ///
    /// Mirrored two-way edges share a geometry and are therefore always
    /// equally near; among equally near edges the lowest `EdgeId` wins.
    /// Returns `None` only if the network has no edges.
    pub fn nearest_edge(&self, pos: GeoPoint) -> Option<EdgeId> {
        let mut candidates = self.segment_idx.nearest_neighbor_iter_with_distance_2(&pos.xy());
        let (first, best) = candidates.next()?;
        let mut winner = first.edge;
        for (entry, d) in candidates {
            if d > best {
                break;
            }
            winner = winner.min(entry.edge);
        }
        Some(winner)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes and directed edges may be added in any order.  `build()` sorts edges
/// by source node (stable, so parallel keys stay in insertion order), builds
/// both CSR arrays, computes neutral costs, and bulk-loads the R-trees.
///
/// # Example
///
/// ```
/// use sr_core::GeoPoint;
/// use sr_spatial::{RoadAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(34.05, -118.25));
/// let c = b.add_node(GeoPoint::new(34.06, -118.24));
/// b.add_road(a, c, RoadAttrs::new(1_450.0).named("Main Street")).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
    next_key: FxHashMap<(NodeId, NodeId), u32>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    key: u32,
    attrs: RoadAttrs,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_edges: Vec::new(),
            next_key: FxHashMap::default(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            next_key: FxHashMap::default(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge and return its `(from, to, key)` name.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NodeNotFound`] if either endpoint was never added.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, mut attrs: RoadAttrs) -> SpatialResult<EdgeRef> {
        let from_pos = self.node_pos(from)?;
        let to_pos = self.node_pos(to)?;

        if !(attrs.length_m.is_finite() && attrs.length_m >= 0.0) {
            let fallback = from_pos.distance_m(to_pos);
            debug!("edge {from} -> {to}: length {} replaced by {fallback:.1} m", attrs.length_m);
            attrs.length_m = fallback;
        }
        attrs.name = normalize_name(attrs.name);
        if attrs.geometry.as_ref().is_some_and(|g| g.len() < 2) {
            attrs.geometry = None;
        }

        let slot = self.next_key.entry((from, to)).or_insert(0);
        let key = *slot;
        *slot += 1;

        self.raw_edges.push(RawEdge { from, to, key, attrs });
        Ok(EdgeRef::new(from, to, key))
    }

    /// Add edges in **both directions** for a two-way road.  The reverse edge
    /// gets the reversed geometry.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: RoadAttrs) -> SpatialResult<(EdgeRef, EdgeRef)> {
        let mut back = attrs.clone();
        if let Some(points) = back.geometry.as_mut() {
            points.reverse();
        }
        let forward = self.add_edge(a, b, attrs)?;
        let backward = self.add_edge(b, a, back)?;
        Ok((forward, backward))
    }

    /// Position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> SpatialResult<GeoPoint> {
        self.nodes
            .get(id.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(id))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sorts + O(N log N + S log S)
    /// for the R-tree bulk loads (S = geometry segments).
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        // Out-CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // In-CSR over edge ids ordered by target.
        let mut in_edges: Vec<EdgeId> = (0..edge_count as u32).map(EdgeId).collect();
        in_edges.sort_by_key(|e| raw[e.index()].to.0);
        let mut node_in_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_in_start[e.to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }

        let neutral = CostAnnotator::default();
        let mut edge_from = Vec::with_capacity(edge_count);
        let mut edge_to = Vec::with_capacity(edge_count);
        let mut edge_key = Vec::with_capacity(edge_count);
        let mut edge_length_m = Vec::with_capacity(edge_count);
        let mut edge_name = Vec::with_capacity(edge_count);
        let mut edge_max_speed_kph = Vec::with_capacity(edge_count);
        let mut edge_geometry = Vec::with_capacity(edge_count);
        let mut edge_costs = Vec::with_capacity(edge_count);
        let mut segments = Vec::with_capacity(edge_count);

        for (i, e) in raw.into_iter().enumerate() {
            let id = EdgeId(i as u32);
            let shape: Vec<GeoPoint> = match &e.attrs.geometry {
                Some(points) => points.clone(),
                None => vec![self.nodes[e.from.index()], self.nodes[e.to.index()]],
            };
            segments.extend(shape.windows(2).map(|w| SegmentEntry { a: w[0], b: w[1], edge: id }));

            edge_costs.push(neutral.edge_costs(e.attrs.length_m, e.attrs.max_speed_kph, 0.0));
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_key.push(e.key);
            edge_length_m.push(e.attrs.length_m);
            edge_name.push(e.attrs.name);
            edge_max_speed_kph.push(e.attrs.max_speed_kph);
            edge_geometry.push(e.attrs.geometry);
        }

        let node_entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: pos.xy(), id: NodeId(i as u32) })
            .collect();

        debug!(
            "built road network: {node_count} nodes, {edge_count} edges, {} segments",
            segments.len()
        );

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_key,
            edge_length_m,
            edge_name,
            edge_max_speed_kph,
            edge_geometry,
            edge_costs,
            annotated_for: None,
            node_idx: RTree::bulk_load(node_entries),
            segment_idx: RTree::bulk_load(segments),
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
