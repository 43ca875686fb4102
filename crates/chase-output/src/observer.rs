//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use chase_core::{AgentId, NodeId, Tick};
use chase_mobility::AgentArena;
use chase_sim::SimObserver;

use crate::row::{AgentSnapshotRow, EventKind, EventRow, NO_NODE};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots and events to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn event(&mut self, tick: Tick, kind: EventKind, agent: AgentId, other: u32) {
        let row = EventRow { tick: tick.0, kind, agent_id: agent.0, other };
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, agents: &AgentArena) {
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .map(|(id, agent)| {
                let snap = agent.snapshot();
                AgentSnapshotRow {
                    tick:         tick.0,
                    agent_id:     id.0,
                    current_node: snap.current.0,
                    target_node:  snap.target.map_or(NO_NODE, |n| n.0),
                    x:            snap.pos.x,
                    y:            snap.pos.y,
                    heading:      snap.heading,
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_spawn(&mut self, tick: Tick, agent: AgentId, node: NodeId) {
        self.event(tick, EventKind::Spawn, agent, node.0);
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, goal: NodeId) {
        self.event(tick, EventKind::Stuck, agent, goal.0);
    }

    fn on_capture(&mut self, tick: Tick, pursuer: AgentId, quarry: AgentId) {
        self.event(tick, EventKind::Capture, pursuer, quarry.0);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
