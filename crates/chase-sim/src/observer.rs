//! Simulation observer trait for progress reporting and data collection.

use chase_core::{AgentId, NodeId, Tick};
use chase_mobility::AgentArena;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — capture counter
///
/// ```rust,ignore
/// struct CaptureCounter(usize);
///
/// impl SimObserver for CaptureCounter {
///     fn on_capture(&mut self, _tick: Tick, _pursuer: AgentId, _quarry: AgentId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `moving` is the number of agents in transit after the motion update.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to every agent.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentArena) {}

    /// A pursuer was added by the spawn policy.
    fn on_spawn(&mut self, _tick: Tick, _agent: AgentId, _node: NodeId) {}

    /// `agent` is idle and cannot reach `goal`.  Reported once per stuck
    /// episode, not every tick.
    fn on_stuck(&mut self, _tick: Tick, _agent: AgentId, _goal: NodeId) {}

    /// `pursuer` came within capture radius of `quarry`.
    fn on_capture(&mut self, _tick: Tick, _pursuer: AgentId, _quarry: AgentId) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every callback to both observers, left first.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        self.0.on_tick_end(tick, moving);
        self.1.on_tick_end(tick, moving);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentArena) {
        self.0.on_snapshot(tick, agents);
        self.1.on_snapshot(tick, agents);
    }

    fn on_spawn(&mut self, tick: Tick, agent: AgentId, node: NodeId) {
        self.0.on_spawn(tick, agent, node);
        self.1.on_spawn(tick, agent, node);
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, goal: NodeId) {
        self.0.on_stuck(tick, agent, goal);
        self.1.on_stuck(tick, agent, goal);
    }

    fn on_capture(&mut self, tick: Tick, pursuer: AgentId, quarry: AgentId) {
        self.0.on_capture(tick, pursuer, quarry);
        self.1.on_capture(tick, pursuer, quarry);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.0.on_sim_end(final_tick);
        self.1.on_sim_end(final_tick);
    }
}

// ── TracingObserver ───────────────────────────────────────────────────────────

/// Reports run progress and events through `tracing`.
///
/// Spawns are logged at `info`; stuck pursuers, captures and a progress
/// line every `progress_interval` ticks at `debug`.  The sim loop itself
/// already reports each capture at `info`.
pub struct TracingObserver {
    progress_interval: u64,
}

impl TracingObserver {
    pub fn new(progress_interval: u64) -> Self {
        Self { progress_interval }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(600)
    }
}

impl SimObserver for TracingObserver {
    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        if self.progress_interval > 0 && tick.0.is_multiple_of(self.progress_interval) {
            tracing::debug!(%tick, moving, "tick complete");
        }
    }

    fn on_spawn(&mut self, tick: Tick, agent: AgentId, node: NodeId) {
        tracing::info!(%tick, %agent, %node, "pursuer spawned");
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, goal: NodeId) {
        tracing::debug!(%tick, %agent, %goal, "no route to goal; holding");
    }

    fn on_capture(&mut self, tick: Tick, pursuer: AgentId, quarry: AgentId) {
        tracing::debug!(%tick, %pursuer, %quarry, "capture");
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        tracing::info!(%final_tick, "simulation finished");
    }
}
