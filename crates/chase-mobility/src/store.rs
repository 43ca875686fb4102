//! The `AgentArena`: every agent of a run, indexed by stable `AgentId`.

use chase_core::{AgentId, NodeId};

use crate::MobileAgent;

/// Append-only agent storage.
///
/// Agents are never removed during a run, so an `AgentId` handed out by
/// [`spawn`](Self::spawn) indexes the same agent for the whole simulation.
#[derive(Debug, Clone, Default)]
pub struct AgentArena {
    agents: Vec<MobileAgent>,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent and return its id (sequential from 0).
    pub fn spawn(&mut self, agent: MobileAgent) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(agent);
        id
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&MobileAgent> {
        self.agents.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut MobileAgent> {
        self.agents.get_mut(id.index())
    }

    /// `(AgentId, &MobileAgent)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &MobileAgent)> + '_ {
        self.agents
            .iter()
            .enumerate()
            .map(|(i, a)| (AgentId(i as u32), a))
    }

    /// Advance every agent one tick, in ascending id order.
    ///
    /// Returns `(AgentId, NodeId)` for every agent that arrived this tick.
    pub fn tick_all(&mut self) -> Vec<(AgentId, NodeId)> {
        self.agents
            .iter_mut()
            .enumerate()
            .filter_map(|(i, agent)| agent.tick().map(|node| (AgentId(i as u32), node)))
            .collect()
    }
}

impl std::ops::Index<AgentId> for AgentArena {
    type Output = MobileAgent;
    fn index(&self, id: AgentId) -> &MobileAgent {
        &self.agents[id.index()]
    }
}
