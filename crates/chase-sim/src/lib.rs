//! `chase-sim` — tick loop orchestrator for the chase pursuit framework.
//!
//! # Five-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Spawn    — the spawn policy may add one pursuer at a random candidate.
//!   ② Decide   — Controller::replan for every controlled agent against a
//!                frozen SimContext (parallel with the `parallel` feature).
//!   ③ Apply    — in ascending AgentId order:
//!                  Advance(hop)  → MobileAgent::set_target
//!                  Stuck{goal}   → observer.on_stuck (once per episode)
//!                  Hold          → nothing
//!   ④ Move     — every agent in transit advances one tick.
//!   ⑤ Observe  — Controller::observe; captures go to observer.on_capture.
//! ```
//!
//! The graph and the all-pairs tables are built once by [`SimBuilder`] and
//! never change during a run.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Decide phase and Floyd–Warshall rows on Rayon's thread pool. |
//! | `serde`    | Serialize/Deserialize for `SimConfig` and `SpawnPolicy`.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use chase_behavior::RouteFollower;
//! use chase_sim::{SimBuilder, SimConfig, TracingObserver};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), graph)
//!     .quarry_with(start, 0.2, RouteFollower::new(goal))
//!     .pursuer(station)
//!     .build()?;
//! sim.run(&mut TracingObserver::default())?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod spawner;


pub use builder::SimBuilder;
pub use config::{SimConfig, SpawnPolicy};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TracingObserver};
pub use sim::{Capture, Role, Sim};
pub use spawner::Spawner;
