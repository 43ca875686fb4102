//! `chase-core` — foundational types for the `chase` pursuit framework.
//!
//! This crate is a dependency of every other `chase-*` crate.  It has no
//! `chase-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`                         |
//! | [`geo`]         | `Point2`, Euclidean distance, heading, interpolation   |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng` (seeded, single-threaded)                    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point2;
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
