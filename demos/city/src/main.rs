//! city — headless pursuit demo on the 13-node reference city.
//!
//! A courier drives from the depot to the drop-off while pursuers enter the
//! city at fixed stations and chase it along shortest paths.  Trajectories
//! and events are written as CSV under `output/city`.
//!
//! ```text
//! cargo run -p city                    # built-in reference city
//! cargo run -p city -- scenario.toml   # custom graph and settings
//! RUST_LOG=debug cargo run -p city     # per-tick progress and stuck reports
//! ```
//!
//! A scenario file has a `[graph]` table (nodes and edges), an optional
//! `[sim]` table, and a `[chase]` table naming intersections by their labels:
//!
//! ```toml
//! [chase]
//! courier_start = 1
//! courier_goal  = 12
//! courier_speed = 0.2
//! stations      = [4, 9, 13]
//! spawn_every_secs = 5.0
//! max_pursuers  = 3
//! ```

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use chase_behavior::RouteFollower;
use chase_core::NodeId;
use chase_output::{CsvWriter, SimOutputObserver};
use chase_sim::{Role, SimBuilder, SimConfig, SpawnPolicy, TracingObserver};
use chase_spatial::{Graph, GraphSpec};

use network::{DEPOT, DROP_OFF, STATIONS, reference_city};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:       &str = "output/city";
const CAR_SPEED:        f64  = 0.2;
const SPAWN_EVERY_SECS: f64  = 5.0;
const MAX_PURSUERS:     usize = 3;
const SIM_SECS:         u64  = 120;

// ── Scenario file ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Scenario {
    graph: GraphSpec,
    #[serde(default)]
    sim:   SimConfig,
    #[serde(default)]
    chase: ChaseSettings,
}

/// Courier and station placement, by node label.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ChaseSettings {
    courier_start:    u32,
    courier_goal:     u32,
    courier_speed:    f64,
    stations:         Vec<u32>,
    spawn_every_secs: f64,
    max_pursuers:     Option<usize>,
}

impl Default for ChaseSettings {
    fn default() -> Self {
        Self {
            courier_start:    DEPOT,
            courier_goal:     DROP_OFF,
            courier_speed:    CAR_SPEED,
            stations:         STATIONS.to_vec(),
            spawn_every_secs: SPAWN_EVERY_SECS,
            max_pursuers:     Some(MAX_PURSUERS),
        }
    }
}

impl Scenario {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(scenario)
    }

    fn reference() -> Self {
        let defaults = SimConfig::default();
        Self {
            graph: reference_city(),
            sim:   SimConfig {
                total_ticks:     SIM_SECS * u64::from(defaults.ticks_per_sec),
                stop_on_capture: true,
                ..defaults
            },
            chase: ChaseSettings::default(),
        }
    }
}

fn resolve(graph: &Graph, label: u32) -> Result<NodeId> {
    graph
        .node_by_label(label)
        .ok_or_else(|| anyhow!("scenario names unknown intersection {label}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Load the scenario.
    let scenario = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Scenario::load(&path)?,
        None => Scenario::reference(),
    };
    let Scenario { graph: spec, sim: mut config, chase } = scenario;

    // 2. Build and validate the road graph.
    let graph = spec.build()?;
    println!("=== city — pursuit on a weighted road graph ===");
    println!(
        "Road graph: {} nodes, {} roads",
        graph.node_count(),
        graph.edges().len()
    );

    // 3. Resolve labelled intersections.
    let start = resolve(&graph, chase.courier_start)?;
    let goal = resolve(&graph, chase.courier_goal)?;
    let stations = chase
        .stations
        .iter()
        .map(|&label| resolve(&graph, label))
        .collect::<Result<Vec<_>>>()?;

    // 4. Spawn policy.
    if !stations.is_empty() {
        let mut policy = SpawnPolicy::new(chase.spawn_every_secs, stations);
        policy.max_pursuers = chase.max_pursuers;
        config.spawn = Some(policy);
    }
    println!(
        "Sim: {} ticks at {} ticks/s, capture radius {}, seed {}",
        config.total_ticks, config.ticks_per_sec, config.capture_radius, config.seed
    );
    println!();

    // 5. Build the sim; this runs the all-pairs precompute.
    let t0 = Instant::now();
    let mut sim = SimBuilder::new(config, graph)
        .quarry_with(start, chase.courier_speed, RouteFollower::new(goal))
        .build()?;
    tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "shortest paths ready");

    // 6. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = (TracingObserver::default(), SimOutputObserver::new(writer));

    // 7. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.1.take_error() {
        eprintln!("output error: {e}");
    }

    // 8. Summary.
    println!(
        "Simulation complete in {:.3} s ({} ticks, {:.1} simulated s)",
        elapsed.as_secs_f64(),
        sim.now().0,
        sim.clock.elapsed_secs()
    );
    match sim.capture() {
        Some(c) => println!("  captured at tick {} by pursuer {}", c.tick.0, c.pursuer.0),
        None => println!("  courier escaped"),
    }
    println!("  output written to {OUTPUT_DIR}/");
    println!();

    // 9. Final agent table.
    println!("{:<8} {:<9} {:<8} {:<8} {:<16}", "Agent", "Role", "Moving", "Node", "Position");
    println!("{}", "-".repeat(52));
    for (id, agent) in sim.agents().iter() {
        let role = match sim.role(id) {
            Some(Role::Quarry) => "courier",
            Some(Role::Pursuer) => "pursuer",
            Some(Role::Free) | None => "-",
        };
        let node = sim.graph().label(agent.current_node()).unwrap_or(agent.current_node().0);
        let pos = agent.pos();
        println!(
            "{:<8} {:<9} {:<8} {:<8} ({:.2}, {:.2})",
            id.0,
            role,
            if agent.is_idle() { "no" } else { "yes" },
            node,
            pos.x,
            pos.y,
        );
    }

    Ok(())
}
