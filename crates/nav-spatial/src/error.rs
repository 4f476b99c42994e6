//! Spatial-subsystem error type.
//!
//! Only structural misuse is an error here.  "No path" is a normal
//! [`Route`](crate::Route) value and an empty spatial index answers `None`.

use thiserror::Error;

use nav_core::NodeId;

/// Errors produced by `nav-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("dense index missing or stale; call Graph::build_index after mutating the graph")]
    IndexNotBuilt,

    #[error("invalid weight {weight} on edge {from} -> {to}: must be finite and non-negative")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
