//! `chase-mobility` — how an agent moves along an edge.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`state`]   | `Motion` (`Idle` / `Transit`), `Leg`, `AgentSnapshot`          |
//! | [`agent`]   | `MobileAgent` — target assignment and the per-tick update      |
//! | [`store`]   | `AgentArena` — agents indexed by stable `AgentId`              |
//! | [`error`]   | `MoveError`, `MoveResult<T>`                                   |
//!
//! # Motion model
//!
//! An agent is either **idle**, pinned exactly to its current node, or **in
//! transit** along one segment toward a target node.  Each tick advances the
//! segment fraction by `speed / length`, which keeps linear speed constant
//! regardless of edge length.  A zero-length segment completes in one tick.
//! On reaching `t ≥ 1` the agent snaps to the target's exact coordinates and
//! goes idle there.
//!
//! Agents never choose where to go; a controller (chase-behavior) or the
//! input layer assigns targets, and only while the agent is idle.

pub mod agent;
pub mod error;
pub mod state;
pub mod store;


pub use agent::MobileAgent;
pub use error::{MoveError, MoveResult};
pub use state::{AgentSnapshot, Leg, Motion};
pub use store::AgentArena;
