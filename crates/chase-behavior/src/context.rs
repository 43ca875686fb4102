//! Read-only simulation state passed to every controller callback.

use chase_core::Tick;
use chase_mobility::AgentArena;
use chase_spatial::{Graph, Router};

/// A read-only view of the simulation for one tick.
///
/// Built by chase-sim and shared immutably across all controller calls in
/// the decision phase.  The graph and router are immutable for the whole
/// run; the agent arena is only borrowed until the decision phase ends.
pub struct SimContext<'a> {
    pub tick:   Tick,
    pub graph:  &'a Graph,
    pub router: &'a dyn Router,
    pub agents: &'a AgentArena,
}

impl<'a> SimContext<'a> {
    #[inline]
    pub fn new(
        tick:   Tick,
        graph:  &'a Graph,
        router: &'a dyn Router,
        agents: &'a AgentArena,
    ) -> Self {
        Self { tick, graph, router, agents }
    }
}
