//! `chase-behavior` — deciding where an idle agent goes next.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`intent`]     | `Intent` (`Advance`, `Hold`, `Stuck`), `Signal` (`Captured`) |
//! | [`context`]    | `SimContext<'a>` — read-only tick snapshot                   |
//! | [`controller`] | `Controller` trait                                           |
//! | [`pursuit`]    | `PursuitController`, `pursuit_goal`                          |
//! | [`follow`]     | `RouteFollower` — commits to one route, hop by hop           |
//!
//! # Decide, then move
//!
//! Each tick the simulation asks every controller for an [`Intent`] *before*
//! any agent moves, then applies the intents, then advances all agents.
//! Controllers only read shared state through [`SimContext`]; the agent they
//! steer is mutated by the simulation, never by the controller itself.

pub mod context;
pub mod controller;
pub mod follow;
pub mod intent;
pub mod pursuit;


pub use context::SimContext;
pub use controller::Controller;
pub use follow::RouteFollower;
pub use intent::{Intent, Signal};
pub use pursuit::{PursuitController, pursuit_goal};
