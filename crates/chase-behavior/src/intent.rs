//! What a controller asks for, and what it reports.

use chase_core::{AgentId, NodeId};

/// A controller's decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the leg toward this node (always a neighbour of the agent's
    /// current node).
    Advance(NodeId),

    /// Nothing to do: the agent is mid-leg or already where it wants to be.
    Hold,

    /// `goal` is unreachable from the agent's node.  The agent holds and the
    /// controller tries again at its next decision point.
    Stuck { goal: NodeId },
}

/// Events a controller reports upward.  The controller never acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The steered agent came within capture radius of `quarry`.
    Captured { quarry: AgentId },
}
