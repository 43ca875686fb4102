//! The `Controller` trait, the extension point for agent decision logic.

use chase_core::AgentId;
use chase_spatial::Route;

use crate::{Intent, SimContext, Signal};

/// Per-agent decision logic.
///
/// One controller instance steers one agent and may keep state between
/// ticks (a cached route, a cursor).  It is consulted once per tick, before
/// motion is applied.
///
/// # Example
///
/// ```rust,ignore
/// struct ShuttleBetween { a: NodeId, b: NodeId }
///
/// impl Controller for ShuttleBetween {
///     fn replan(&mut self, agent: AgentId, ctx: &SimContext<'_>) -> Intent {
///         let me = &ctx.agents[agent];
///         if !me.is_idle() {
///             return Intent::Hold;
///         }
///         let goal = if me.current_node() == self.a { self.b } else { self.a };
///         match ctx.router.route(me.current_node(), goal).and_then(|r| r.next_hop()) {
///             Some(hop) => Intent::Advance(hop),
///             None      => Intent::Stuck { goal },
///         }
///     }
/// }
/// ```
pub trait Controller: Send + Sync + 'static {
    /// Decide what `agent` should do this tick.
    fn replan(&mut self, agent: AgentId, ctx: &SimContext<'_>) -> Intent;

    /// Inspect the state after motion has been applied and report events.
    ///
    /// Default: reports nothing.
    fn observe(&self, _agent: AgentId, _ctx: &SimContext<'_>) -> Option<Signal> {
        None
    }

    /// The route this controller is currently working from, for display.
    ///
    /// Default: none.
    fn route(&self) -> Option<&Route> {
        None
    }
}
