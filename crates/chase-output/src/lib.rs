//! `chase-output` — simulation output writers for the chase framework.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                          |
//! |-----------|---------|----------------------------------------|
//! | *(none)*  | CSV     | `agent_snapshots.csv`, `events.csv`    |
//! | `sqlite`  | SQLite  | `output.db`                            |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `chase_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chase_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     tracing::error!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, EventKind, EventRow, NO_NODE};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
