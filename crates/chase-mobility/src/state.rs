//! Per-agent motion state.

use chase_core::{NodeId, Point2};

/// One segment being traversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Node the agent departed from.
    pub from: NodeId,
    /// Node the agent is heading to.
    pub to: NodeId,
    /// Exact position of `from`.
    pub start: Point2,
    /// Exact position of `to`.
    pub end: Point2,
    /// Euclidean length of the segment.  May be zero.
    pub length: f64,
    /// Fraction travelled, `0.0 ..= 1.0`.
    pub t: f64,
}

/// Two-state motion machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Motion {
    /// No target; position pinned to the current node.
    #[default]
    Idle,
    /// Moving along `Leg::from → Leg::to`.
    Transit(Leg),
}

impl Motion {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Motion::Idle)
    }

    #[inline]
    pub fn leg(&self) -> Option<&Leg> {
        match self {
            Motion::Idle         => None,
            Motion::Transit(leg) => Some(leg),
        }
    }
}

/// Read-only copy of an agent's public state.
///
/// Controllers read other agents through snapshots so that one agent can be
/// mutated while another's state is consulted, without aliasing the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub current: NodeId,
    pub target:  Option<NodeId>,
    pub pos:     Point2,
    pub heading: f64,
}
