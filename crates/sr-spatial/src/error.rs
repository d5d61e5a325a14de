//! Spatial-subsystem error type.

use thiserror::Error;

use sr_core::{EdgeId, NodeId};

use crate::network::EdgeRef;

/// Errors produced by `sr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found in network")]
    EdgeNotFound(EdgeRef),

    #[error("edge id {0} is out of range for this network")]
    UnknownEdgeId(EdgeId),

    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("network has no nodes to snap to")]
    EmptyNetwork,

    #[error("geocoding failed: {0}")]
    Geocode(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
