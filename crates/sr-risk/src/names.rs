//! Canonical edge names and the unnamed-edge fill-in.
//!
//! Accidents are aggregated by road *name*, so an accident matched to an
//! unnamed segment (a slip lane, a short connector) would otherwise pile up
//! under the `"Unnamed Road"` sentinel.  [`fill_unnamed`] lends each unnamed
//! edge the name of the nearest named edge in the undirected graph.
//!
//! # Single pass
//!
//! Every unnamed edge searches the *original* named set only.  A name lent to
//! one unnamed edge is never lent onward to another, so an unnamed edge whose
//! only path to a name runs through a cut-off region stays unnamed even if a
//! neighbour of it was filled.  Running the fill a second time over its own
//! output could close more gaps; that is not done here.

use std::collections::VecDeque;

use log::info;
use rustc_hash::FxHashSet;

use sr_core::{EdgeId, NodeId, UNNAMED_ROAD};
use sr_spatial::RoadNetwork;

use crate::RiskResult;

/// Canonical road name of every edge, indexed by `EdgeId`.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeNames {
    names: Vec<String>,
}

impl EdgeNames {
    /// The network's own names, sentinel for unnamed edges.
    pub fn from_network(network: &RoadNetwork) -> Self {
        Self {
            names: network.edge_ids().map(|e| network.road_name(e).to_owned()).collect(),
        }
    }

    /// Name of `edge`.  `edge` must belong to the network these names were
    /// built from.
    #[inline]
    pub fn get(&self, edge: EdgeId) -> &str {
        &self.names[edge.index()]
    }

    #[inline]
    pub fn is_named(&self, edge: EdgeId) -> bool {
        self.get(edge) != UNNAMED_ROAD
    }

    /// Edges still carrying the sentinel.
    pub fn unnamed(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_str() == UNNAMED_ROAD)
            .map(|(i, _)| EdgeId(i as u32))
    }

    pub fn unnamed_count(&self) -> usize {
        self.unnamed().count()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Lend names to every unnamed edge of `original`, returning the filled set.
///
/// For each unnamed edge a breadth-first search starts from both endpoints at
/// depth 0 and walks the undirected incidence (outgoing and incoming edges).
/// At each visited node the first incident edge named in `original` wins.
/// Nodes deeper than `max_depth` are not inspected; `None` searches the whole
/// connected component.  Edges with no named edge in reach keep the sentinel.
pub fn fill_unnamed(
    network: &RoadNetwork,
    original: &EdgeNames,
    max_depth: Option<usize>,
) -> RiskResult<EdgeNames> {
    let unnamed: Vec<EdgeId> = original.unnamed().collect();

    #[cfg(not(feature = "parallel"))]
    let lent: Vec<Option<&str>> = unnamed
        .iter()
        .map(|&e| borrow_name(network, original, e, max_depth))
        .collect::<RiskResult<_>>()?;

    #[cfg(feature = "parallel")]
    let lent: Vec<Option<&str>> = {
        use rayon::prelude::*;
        unnamed
            .par_iter()
            .map(|&e| borrow_name(network, original, e, max_depth))
            .collect::<RiskResult<_>>()?
    };

    let mut filled = original.clone();
    let mut count = 0usize;
    for (&edge, name) in unnamed.iter().zip(lent) {
        if let Some(name) = name {
            filled.names[edge.index()] = name.to_owned();
            count += 1;
        }
    }

    info!(
        "filled {count} of {} unnamed edges ({} remain unnamed)",
        unnamed.len(),
        unnamed.len() - count
    );
    Ok(filled)
}

/// BFS for the name nearest to `edge` in `original`.
fn borrow_name<'a>(
    network: &RoadNetwork,
    original: &'a EdgeNames,
    edge: EdgeId,
    max_depth: Option<usize>,
) -> RiskResult<Option<&'a str>> {
    let ends = network.edge_ref(edge)?;

    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(ends.from, 0), (ends.to, 0)]);

    while let Some((node, depth)) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        if max_depth.is_some_and(|max| depth > max) {
            continue;
        }

        if let Some(named) = network.incident_edges(node)?.find(|&e| original.is_named(e)) {
            return Ok(Some(original.get(named)));
        }

        for e in network.incident_edges(node)? {
            let (from, to) = (network.edge_from[e.index()], network.edge_to[e.index()]);
            let next = if from == node { to } else { from };
            if !visited.contains(&next) {
                queue.push_back((next, depth + 1));
            }
        }
    }

    Ok(None)
}
