//! Graph-construction error type.

use thiserror::Error;

use chase_core::NodeId;

/// A malformed graph configuration.
///
/// Every variant is fatal at construction: no [`Graph`][crate::Graph] is
/// produced, so shortest paths are never computed over an invalid graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("invalid graph: edge {from} -> {to} references an unknown node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("invalid graph: edge references unknown node label {label}")]
    UnknownLabel { label: u32 },

    #[error("invalid graph: duplicate node label {label}")]
    DuplicateNode { label: u32 },

    #[error("invalid graph: node {node} has a non-finite position")]
    NonFinitePosition { node: NodeId },

    #[error("invalid graph: edge {from} -> {to} has invalid penalty {penalty}")]
    InvalidPenalty { from: NodeId, to: NodeId, penalty: f64 },

    #[error("invalid graph: penalty scale must be finite and > 0, got {0}")]
    InvalidPenaltyScale(f64),

    #[error("invalid graph: self-loop on node {0}")]
    SelfLoop(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;
