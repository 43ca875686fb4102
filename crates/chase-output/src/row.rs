//! Plain data row types written by output backends.

use std::fmt;

/// Sentinel written for "no node" (an idle agent's target).
pub const NO_NODE: u32 = u32::MAX;

/// One agent's motion state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:         u64,
    pub agent_id:     u32,
    /// The node the agent is at, or departed from while in transit.
    pub current_node: u32,
    /// Destination of the current leg; [`NO_NODE`] while idle.
    pub target_node:  u32,
    pub x:            f64,
    pub y:            f64,
    /// Radians.
    pub heading:      f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Spawn,
    Stuck,
    Capture,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Spawn   => "spawn",
            EventKind::Stuck   => "stuck",
            EventKind::Capture => "capture",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete simulation event.
///
/// `other` depends on `kind`: the spawn node for `Spawn`, the unreachable
/// goal node for `Stuck`, the quarry's agent id for `Capture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub kind:     EventKind,
    pub agent_id: u32,
    pub other:    u32,
}
