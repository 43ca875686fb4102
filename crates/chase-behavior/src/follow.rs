//! Route following: plan once, then walk the plan.
//!
//! Unlike [`PursuitController`][crate::PursuitController], a follower
//! commits to the route computed at its first decision and advances one hop
//! per arrival.  It only plans again if the agent turns out not to be where
//! the plan says (for example after a manual move), or after the
//! destination was unreachable.

use chase_core::{AgentId, NodeId};
use chase_spatial::Route;

use crate::{Controller, Intent, SimContext};

/// Drives an agent to a fixed destination and then idles there.
#[derive(Debug, Clone)]
pub struct RouteFollower {
    destination: NodeId,
    route:       Option<Route>,
    /// Index into `route.nodes` of the node the agent should be at when idle.
    cursor:      usize,
}

impl RouteFollower {
    pub fn new(destination: NodeId) -> Self {
        Self { destination, route: None, cursor: 0 }
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// `true` once the committed route has been fully handed out.
    pub fn is_finished(&self) -> bool {
        self.route
            .as_ref()
            .is_some_and(|r| self.cursor + 1 >= r.nodes.len())
    }
}

impl Controller for RouteFollower {
    fn replan(&mut self, agent: AgentId, ctx: &SimContext<'_>) -> Intent {
        let Some(me) = ctx.agents.get(agent) else {
            return Intent::Hold;
        };
        if !me.is_idle() {
            return Intent::Hold;
        }
        let here = me.current_node();
        if here == self.destination {
            return Intent::Hold;
        }

        let on_plan = self
            .route
            .as_ref()
            .is_some_and(|r| r.nodes.get(self.cursor) == Some(&here));
        if !on_plan {
            match ctx.router.route(here, self.destination) {
                None => {
                    self.route = None;
                    return Intent::Stuck { goal: self.destination };
                }
                Some(route) => {
                    self.route = Some(route);
                    self.cursor = 0;
                }
            }
        }

        let next = self.route.as_ref().and_then(|r| r.nodes.get(self.cursor + 1).copied());
        match next {
            Some(hop) => {
                self.cursor += 1;
                Intent::Advance(hop)
            }
            None => Intent::Hold,
        }
    }

    fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }
}
