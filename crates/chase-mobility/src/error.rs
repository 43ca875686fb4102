use chase_core::NodeId;
use thiserror::Error;

/// A rejected move request.  The agent's state is untouched whenever one of
/// these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoveError {
    #[error("agent is already in transit to {target}")]
    InTransit { target: NodeId },

    #[error("agent is already at {0}")]
    SameNode(NodeId),

    #[error("{to} is not a neighbour of {from}")]
    NotAdjacent { from: NodeId, to: NodeId },

    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error("speed must be finite and > 0, got {0}")]
    InvalidSpeed(f64),
}

pub type MoveResult<T> = Result<T, MoveError>;
