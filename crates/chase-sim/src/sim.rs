//! The `Sim` struct and its tick loop.

use chase_behavior::{Controller, Intent, PursuitController, SimContext, Signal};
use chase_core::{AgentId, NodeId, Point2, SimClock, Tick};
use chase_mobility::{AgentArena, MobileAgent};
use chase_spatial::{Graph, Route, ShortestPaths};

use crate::{SimConfig, SimError, SimObserver, SimResult, Spawner};

// ── Roles and events ──────────────────────────────────────────────────────────

/// What an agent is for.  Fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// The pursued agent.  At most one per run.
    Quarry,
    /// Steered by a `PursuitController` toward the quarry.
    Pursuer,
    /// Anything else; not involved in captures.
    Free,
}

/// The first capture of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub tick:    Tick,
    pub pursuer: AgentId,
    pub quarry:  AgentId,
}

/// Edge-triggered per-agent flags, so observers hear about a condition once
/// when it starts rather than on every tick it persists.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Latch {
    pub stuck:      bool,
    pub in_contact: bool,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` holds all simulation state and drives the five-phase tick loop:
///
/// 1. **Spawn**: the spawn policy may add one pursuer.
/// 2. **Decide** (optionally parallel with the `parallel` feature): every
///    controller reads a frozen [`SimContext`] and returns an [`Intent`].
/// 3. **Apply** (sequential, ascending `AgentId`): `Advance` starts a leg,
///    `Stuck` is reported, `Hold` does nothing.
/// 4. **Move**: every agent in transit advances one tick.
/// 5. **Observe**: controllers report signals such as captures.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration.
    pub config: SimConfig,

    /// Tracks the current tick.
    pub clock: SimClock,

    pub(crate) graph:       Graph,
    /// Computed once by the builder; read-only afterwards.
    pub(crate) paths:       ShortestPaths,
    pub(crate) agents:      AgentArena,
    /// Indexed by `AgentId`; `None` for manually driven agents.
    pub(crate) controllers: Vec<Option<Box<dyn Controller>>>,
    pub(crate) roles:       Vec<Role>,
    pub(crate) latches:     Vec<Latch>,
    pub(crate) quarry:      Option<AgentId>,
    pub(crate) spawner:     Option<Spawner>,
    pub(crate) capture:     Option<Capture>,
}

impl Sim {
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick until `config.end_tick()`, or until the
    /// first capture when `config.stop_on_capture` is set.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.is_finished() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position, ignoring both
    /// `end_tick` and `stop_on_capture`.
    ///
    /// Useful for tests and for presentation layers that pace frames
    /// themselves.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Advance by one tick.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let moving = self.process_tick(now, observer)?;
        observer.on_tick_end(now, moving);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.agents);
        }
        self.clock.advance();
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.clock.current_tick >= self.config.end_tick()
            || (self.config.stop_on_capture && self.capture.is_some())
    }

    // ── Input ─────────────────────────────────────────────────────────────

    /// Ask `agent` to move to the neighbouring node `to`.
    ///
    /// Accepted only while the agent is idle and `to` is adjacent to its
    /// current node; a rejected request leaves all state untouched.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownAgent`], or [`SimError::Move`] wrapping the
    /// reason the agent refused.
    pub fn request_move(&mut self, agent: AgentId, to: NodeId) -> SimResult<()> {
        let mobile = self.agents.get_mut(agent).ok_or(SimError::UnknownAgent(agent))?;
        mobile.request_move(&self.graph, to)?;
        Ok(())
    }

    // ── Read accessors ────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn paths(&self) -> &ShortestPaths {
        &self.paths
    }

    pub fn agents(&self) -> &AgentArena {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&MobileAgent> {
        self.agents.get(id)
    }

    /// Node positions indexed by `NodeId`.
    pub fn node_positions(&self) -> &[Point2] {
        &self.graph.node_pos
    }

    /// Each road once, for drawing.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.graph.edges()
    }

    pub fn agent_pos(&self, id: AgentId) -> Option<Point2> {
        self.agents.get(id).map(MobileAgent::pos)
    }

    pub fn agent_heading(&self, id: AgentId) -> Option<f64> {
        self.agents.get(id).map(MobileAgent::heading)
    }

    /// The route `id`'s controller is working from, for highlighting.
    pub fn route_of(&self, id: AgentId) -> Option<&Route> {
        self.controllers.get(id.index())?.as_deref()?.route()
    }

    /// Shortest route between two nodes from the precomputed table.
    pub fn route(&self, from: NodeId, to: NodeId) -> Option<Route> {
        self.paths.path(from, to)
    }

    pub fn role(&self, id: AgentId) -> Option<Role> {
        self.roles.get(id.index()).copied()
    }

    pub fn quarry(&self) -> Option<AgentId> {
        self.quarry
    }

    pub fn pursuers(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == Role::Pursuer)
            .map(|(i, _)| AgentId(i as u32))
    }

    pub fn spawner(&self) -> Option<&Spawner> {
        self.spawner.as_ref()
    }

    /// The first capture, once one has happened.
    pub fn capture(&self) -> Option<Capture> {
        self.capture
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        // ── Phase 1: spawn ────────────────────────────────────────────────
        let due = match self.spawner.as_mut() {
            Some(spawner) => spawner.poll(now)?,
            None => None,
        };
        if let Some(node) = due {
            self.spawn_pursuer(now, node, observer)?;
        }

        // ── Phase 2: decide ───────────────────────────────────────────────
        let intents = self.decide(now);

        // ── Phase 3: apply ────────────────────────────────────────────────
        //
        // `decide` returns intents in ascending AgentId order whether or not
        // it ran in parallel, so application order is deterministic.
        for (agent, intent) in intents {
            let latch = &mut self.latches[agent.index()];
            match intent {
                Intent::Advance(hop) => {
                    latch.stuck = false;
                    let applied = self
                        .agents
                        .get_mut(agent)
                        .map_or(Ok(()), |mobile| mobile.set_target(&self.graph, hop));
                    if let Err(e) = applied {
                        tracing::warn!(%agent, %hop, error = %e, "controller asked for an impossible move");
                    }
                }
                Intent::Hold => latch.stuck = false,
                Intent::Stuck { goal } => {
                    if !latch.stuck {
                        latch.stuck = true;
                        tracing::debug!(%now, %agent, %goal, "goal unreachable");
                        observer.on_stuck(now, agent, goal);
                    }
                }
            }
        }

        // ── Phase 4: move ─────────────────────────────────────────────────
        self.agents.tick_all();
        let moving = self.agents.iter().filter(|(_, a)| !a.is_idle()).count();

        // ── Phase 5: observe ──────────────────────────────────────────────
        self.observe(now, observer);

        Ok(moving)
    }

    /// Ask every controller for its intent against a frozen view of the
    /// world.  With the `parallel` Cargo feature the calls run on Rayon's
    /// thread pool.
    fn decide(&mut self, now: Tick) -> Vec<(AgentId, Intent)> {
        let ctx = SimContext::new(now, &self.graph, &self.paths, &self.agents);

        #[cfg(not(feature = "parallel"))]
        {
            self.controllers
                .iter_mut()
                .enumerate()
                .filter_map(|(i, slot)| {
                    let agent = AgentId(i as u32);
                    slot.as_mut().map(|c| (agent, c.replan(agent, &ctx)))
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.controllers
                .par_iter_mut()
                .enumerate()
                .filter_map(|(i, slot)| {
                    let agent = AgentId(i as u32);
                    slot.as_mut().map(|c| (agent, c.replan(agent, &ctx)))
                })
                .collect()
        }
    }

    fn observe<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        let signals: Vec<(AgentId, Option<Signal>)> = {
            let ctx = SimContext::new(now, &self.graph, &self.paths, &self.agents);
            self.controllers
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| {
                    let agent = AgentId(i as u32);
                    slot.as_ref().map(|c| (agent, c.observe(agent, &ctx)))
                })
                .collect()
        };

        for (agent, signal) in signals {
            let latch = &mut self.latches[agent.index()];
            match signal {
                Some(Signal::Captured { quarry }) => {
                    if latch.in_contact {
                        continue;
                    }
                    latch.in_contact = true;
                    tracing::info!(%now, pursuer = %agent, %quarry, "quarry captured");
                    observer.on_capture(now, agent, quarry);
                    if self.capture.is_none() {
                        self.capture = Some(Capture { tick: now, pursuer: agent, quarry });
                    }
                }
                None => latch.in_contact = false,
            }
        }
    }

    fn spawn_pursuer<O: SimObserver>(
        &mut self,
        now:      Tick,
        node:     NodeId,
        observer: &mut O,
    ) -> SimResult<()> {
        let quarry = self
            .quarry
            .ok_or_else(|| SimError::Config("cannot spawn pursuers without a quarry".into()))?;
        let mobile = MobileAgent::new(&self.graph, node, self.config.pursuer_speed)?;
        let agent = self.agents.spawn(mobile);
        self.controllers
            .push(Some(Box::new(PursuitController::new(quarry, self.config.capture_radius))));
        self.roles.push(Role::Pursuer);
        self.latches.push(Latch::default());
        tracing::debug!(%now, %agent, %node, "spawned pursuer");
        observer.on_spawn(now, agent, node);
        Ok(())
    }
}
