//! The mobile agent and its per-tick motion update.

use chase_core::{NodeId, Point2};
use chase_spatial::Graph;

use crate::{AgentSnapshot, Leg, Motion, MoveError, MoveResult};

/// An agent that sits on a node or travels one edge at a time.
///
/// Invariant: while [`is_idle`](Self::is_idle), `pos()` is exactly the
/// position of `current_node()`.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileAgent {
    current: NodeId,
    pos:     Point2,
    heading: f64,
    speed:   f64,
    motion:  Motion,
}

impl MobileAgent {
    /// Place a new idle agent on `start`.
    ///
    /// `speed` is in logical units per tick.
    ///
    /// # Errors
    ///
    /// [`MoveError::UnknownNode`] if `start` is not in `graph`,
    /// [`MoveError::InvalidSpeed`] unless `speed` is finite and positive.
    pub fn new(graph: &Graph, start: NodeId, speed: f64) -> MoveResult<Self> {
        let pos = graph.pos(start).ok_or(MoveError::UnknownNode(start))?;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MoveError::InvalidSpeed(speed));
        }
        Ok(Self { current: start, pos, heading: 0.0, speed, motion: Motion::Idle })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The node the agent is at, or departed from while in transit.
    #[inline]
    pub fn current_node(&self) -> NodeId {
        self.current
    }

    #[inline]
    pub fn target_node(&self) -> Option<NodeId> {
        self.motion.leg().map(|leg| leg.to)
    }

    #[inline]
    pub fn pos(&self) -> Point2 {
        self.pos
    }

    /// Heading of the most recent departure, radians.  Presentation only.
    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fraction of the current leg travelled; `0.0` while idle.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.motion.leg().map_or(0.0, |leg| leg.t)
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.motion.is_idle()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            current: self.current,
            target:  self.target_node(),
            pos:     self.pos,
            heading: self.heading,
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Start moving in a straight line toward `to` (Idle → Transit).
    ///
    /// Controllers call this with a route's next hop.  No adjacency check is
    /// made here; see [`request_move`](Self::request_move) for the checked
    /// variant offered to input layers.
    ///
    /// # Errors
    ///
    /// [`MoveError::InTransit`], [`MoveError::SameNode`] or
    /// [`MoveError::UnknownNode`]; the agent is unchanged on error.
    pub fn set_target(&mut self, graph: &Graph, to: NodeId) -> MoveResult<()> {
        if let Motion::Transit(leg) = self.motion {
            return Err(MoveError::InTransit { target: leg.to });
        }
        if to == self.current {
            return Err(MoveError::SameNode(to));
        }
        let end = graph.pos(to).ok_or(MoveError::UnknownNode(to))?;
        let start = self.pos;

        self.heading = start.heading_to(end);
        self.motion = Motion::Transit(Leg {
            from:   self.current,
            to,
            start,
            end,
            length: start.distance(end),
            t:      0.0,
        });
        Ok(())
    }

    /// Input-layer move: like [`set_target`](Self::set_target) but `to` must
    /// be a direct neighbour of the current node.
    ///
    /// # Errors
    ///
    /// [`MoveError::NotAdjacent`] in addition to the `set_target` errors.
    pub fn request_move(&mut self, graph: &Graph, to: NodeId) -> MoveResult<()> {
        if let Motion::Transit(leg) = self.motion {
            return Err(MoveError::InTransit { target: leg.to });
        }
        if !graph.contains(to) {
            return Err(MoveError::UnknownNode(to));
        }
        if to != self.current && !graph.is_adjacent(self.current, to) {
            return Err(MoveError::NotAdjacent { from: self.current, to });
        }
        self.set_target(graph, to)
    }

    /// Advance one tick.  Returns the node arrived at, if the leg finished.
    ///
    /// The per-tick increment is `speed / length`; a zero-length leg
    /// advances by 1 and therefore completes immediately.
    pub fn tick(&mut self) -> Option<NodeId> {
        let Motion::Transit(leg) = &mut self.motion else {
            return None;
        };

        leg.t += if leg.length > 0.0 { self.speed / leg.length } else { 1.0 };

        if leg.t >= 1.0 {
            let (arrived, end) = (leg.to, leg.end);
            self.pos = end;
            self.current = arrived;
            self.motion = Motion::Idle;
            Some(arrived)
        } else {
            self.pos = leg.start.lerp(leg.end, leg.t);
            None
        }
    }
}
