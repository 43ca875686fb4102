//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_snapshots` and `events`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, EventRow, OutputResult};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 tick         INTEGER NOT NULL,
                 agent_id     INTEGER NOT NULL,
                 current_node INTEGER NOT NULL,
                 target_node  INTEGER,
                 x            REAL    NOT NULL,
                 y            REAL    NOT NULL,
                 heading      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS events (
                 tick     INTEGER NOT NULL,
                 kind     TEXT    NOT NULL,
                 agent_id INTEGER NOT NULL,
                 other    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (tick, agent_id, current_node, target_node, x, y, heading) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                // Idle agents get NULL rather than the CSV sentinel.
                let target = (row.target_node != crate::row::NO_NODE).then_some(row.target_node);
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.agent_id,
                    row.current_node,
                    target,
                    row.x,
                    row.y,
                    row.heading,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO events (tick, kind, agent_id, other) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.tick, row.kind.as_str(), row.agent_id, row.other],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
