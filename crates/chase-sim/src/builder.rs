//! Fluent builder for constructing a [`Sim`].

use chase_behavior::{Controller, PursuitController};
use chase_core::{AgentId, NodeId, SimRng};
use chase_mobility::{AgentArena, MobileAgent, MoveError};
use chase_spatial::{Graph, ShortestPaths};

use crate::sim::{Latch, Role};
use crate::{Sim, SimConfig, SimError, SimResult, Spawner};

/// RNG stream offset reserved for the spawner.
const SPAWN_STREAM: u64 = 1;

struct PlannedAgent {
    start:      NodeId,
    speed:      f64,
    role:       Role,
    controller: Option<Box<dyn Controller>>,
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, speeds, capture radius, spawn policy, …
/// - [`Graph`] — the immutable road graph
///
/// # Agents
///
/// | Method            | Adds                                                 |
/// |-------------------|------------------------------------------------------|
/// | `.quarry(..)`     | The pursued agent (at most one); manual by default   |
/// | `.quarry_with(..)`| The pursued agent, steered by a controller           |
/// | `.pursuer(n)`     | A `PursuitController` agent chasing the quarry       |
/// | `.agent(..)`      | Any other agent, with or without a controller        |
///
/// Agents receive `AgentId`s in the order they are added.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph)
///     .quarry_with(home, 0.2, RouteFollower::new(depot))
///     .pursuer(station)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    graph:  Graph,
    agents: Vec<PlannedAgent>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, graph: Graph) -> Self {
        Self { config, graph, agents: Vec::new() }
    }

    /// Add the pursued agent without a controller; it only moves through
    /// [`Sim::request_move`].
    pub fn quarry(mut self, start: NodeId, speed: f64) -> Self {
        self.agents.push(PlannedAgent { start, speed, role: Role::Quarry, controller: None });
        self
    }

    /// Add the pursued agent driven by `controller`.
    pub fn quarry_with(mut self, start: NodeId, speed: f64, controller: impl Controller) -> Self {
        self.agents.push(PlannedAgent {
            start,
            speed,
            role:       Role::Quarry,
            controller: Some(Box::new(controller)),
        });
        self
    }

    /// Add a pursuer at `config.pursuer_speed`.
    pub fn pursuer(mut self, start: NodeId) -> Self {
        let speed = self.config.pursuer_speed;
        self.agents.push(PlannedAgent { start, speed, role: Role::Pursuer, controller: None });
        self
    }

    /// Add a free agent.  `None` leaves it to manual moves.
    pub fn agent(
        mut self,
        start:      NodeId,
        speed:      f64,
        controller: Option<Box<dyn Controller>>,
    ) -> Self {
        self.agents.push(PlannedAgent { start, speed, role: Role::Free, controller });
        self
    }

    /// Validate inputs, run the all-pairs precompute, place every agent and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let quarries: Vec<AgentId> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.role == Role::Quarry)
            .map(|(i, _)| AgentId(i as u32))
            .collect();
        if quarries.len() > 1 {
            return Err(SimError::Config(format!("expected at most one quarry, got {}", quarries.len())));
        }
        let quarry = quarries.first().copied();

        let has_pursuers = self.agents.iter().any(|a| a.role == Role::Pursuer);
        if quarry.is_none() && (has_pursuers || self.config.spawn.is_some()) {
            return Err(SimError::Config("pursuers need a quarry to chase".into()));
        }
        let unknown_candidate = self.config.spawn.as_ref().and_then(|spawn| {
            spawn.candidates.iter().copied().find(|&n| !self.graph.contains(n))
        });
        if let Some(node) = unknown_candidate {
            return Err(MoveError::UnknownNode(node).into());
        }

        // ── Place agents ──────────────────────────────────────────────────
        let mut agents      = AgentArena::new();
        let mut roles       = Vec::with_capacity(self.agents.len());
        let mut controllers = Vec::with_capacity(self.agents.len());
        for planned in self.agents {
            agents.spawn(MobileAgent::new(&self.graph, planned.start, planned.speed)?);
            let controller: Option<Box<dyn Controller>> = match (planned.role, quarry) {
                (Role::Pursuer, Some(q)) => {
                    Some(Box::new(PursuitController::new(q, self.config.capture_radius)))
                }
                _ => planned.controller,
            };
            roles.push(planned.role);
            controllers.push(controller);
        }

        // ── Precompute routes once ────────────────────────────────────────
        let paths = ShortestPaths::compute(&self.graph);

        let clock = self.config.make_clock();
        let mut rng = SimRng::new(self.config.seed);
        let spawner = self
            .config
            .spawn
            .as_ref()
            .map(|policy| Spawner::new(policy, &clock, rng.child(SPAWN_STREAM)));

        let latches = vec![Latch::default(); controllers.len()];
        Ok(Sim {
            config: self.config,
            clock,
            graph: self.graph,
            paths,
            agents,
            controllers,
            roles,
            latches,
            quarry,
            spawner,
            capture: None,
        })
    }
}
