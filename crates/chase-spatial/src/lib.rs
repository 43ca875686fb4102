//! `chase-spatial` — the static graph and everything precomputed over it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`network`] | `Graph` (CSR + R-tree), `GraphBuilder`                          |
//! | [`apsp`]    | `ShortestPaths` — Floyd–Warshall distance + successor matrices  |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                       |
//! | [`spec`]    | `GraphSpec` — declarative graph configuration                   |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                  |
//!
//! # Lifecycle
//!
//! ```text
//! GraphBuilder / GraphSpec ──build()──▶ Graph ──ShortestPaths::compute──▶ dist + next
//!                                                                      │
//!                                        path(u, v) every tick ◀───────┘
//! ```
//!
//! Both the `Graph` and the `ShortestPaths` table are immutable once built
//! and can be shared by reference between any number of agents.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Relaxes Floyd–Warshall rows with Rayon.                   |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `GraphSpec`.         |

pub mod apsp;
pub mod error;
pub mod network;
pub mod router;
pub mod spec;

#[cfg(test)]
mod tests;

pub use apsp::ShortestPaths;
pub use error::{GraphError, GraphResult};
pub use network::{DEFAULT_PENALTY_SCALE, Graph, GraphBuilder};
pub use router::{DijkstraRouter, Route, Router};
pub use spec::{EdgeSpec, GraphSpec, NodeSpec};
