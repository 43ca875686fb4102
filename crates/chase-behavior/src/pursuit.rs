//! Pursuit: close in on another agent, re-planning at every arrival.
//!
//! # Decision per tick
//!
//! 1. Goal: the quarry's target node if it is moving, else its current node.
//!    Aiming at where the quarry is *going* keeps the pursuer from trailing
//!    one edge behind.
//! 2. If the pursuer is idle, ask the router for a fresh route from its node
//!    to the goal.  Unreachable → hold (`Intent::Stuck`).  Otherwise commit
//!    to the route's second node.
//! 3. If the pursuer is mid-leg, do nothing until it arrives.
//!
//! The whole route is recomputed on every arrival even though only its first
//! hop is used, because the goal may have moved since the last decision.

use chase_core::AgentId;
use chase_mobility::AgentSnapshot;
use chase_spatial::Route;

use crate::{Controller, Intent, SimContext, Signal};

/// Node a pursuer should aim for, given the quarry's state.
#[inline]
pub fn pursuit_goal(quarry: &AgentSnapshot) -> chase_core::NodeId {
    quarry.target.unwrap_or(quarry.current)
}

/// Steers one agent toward another.
#[derive(Debug, Clone)]
pub struct PursuitController {
    quarry:         AgentId,
    capture_radius: f64,
    last_route:     Option<Route>,
}

impl PursuitController {
    pub fn new(quarry: AgentId, capture_radius: f64) -> Self {
        Self { quarry, capture_radius, last_route: None }
    }

    pub fn quarry(&self) -> AgentId {
        self.quarry
    }

    pub fn capture_radius(&self) -> f64 {
        self.capture_radius
    }

    /// Route from the most recent decision; `None` before the first one or
    /// after the goal turned out unreachable.
    pub fn last_route(&self) -> Option<&Route> {
        self.last_route.as_ref()
    }
}

impl Controller for PursuitController {
    fn replan(&mut self, agent: AgentId, ctx: &SimContext<'_>) -> Intent {
        let (Some(me), Some(quarry)) = (ctx.agents.get(agent), ctx.agents.get(self.quarry)) else {
            return Intent::Hold;
        };
        if !me.is_idle() {
            return Intent::Hold;
        }

        let goal = pursuit_goal(&quarry.snapshot());
        match ctx.router.route(me.current_node(), goal) {
            None => {
                self.last_route = None;
                Intent::Stuck { goal }
            }
            Some(route) => {
                let hop = route.next_hop();
                self.last_route = Some(route);
                hop.map_or(Intent::Hold, Intent::Advance)
            }
        }
    }

    fn observe(&self, agent: AgentId, ctx: &SimContext<'_>) -> Option<Signal> {
        let me = ctx.agents.get(agent)?;
        let quarry = ctx.agents.get(self.quarry)?;
        let r = self.capture_radius;
        (me.pos().distance_sq(quarry.pos()) < r * r).then_some(Signal::Captured { quarry: self.quarry })
    }

    fn route(&self) -> Option<&Route> {
        self.last_route.as_ref()
    }
}
