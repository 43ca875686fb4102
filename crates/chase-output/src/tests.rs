//! Integration tests for chase-output.

#[cfg(test)]
mod helpers {
    use chase_core::{NodeId, Point2};
    use chase_sim::SimConfig;
    use chase_spatial::{Graph, GraphBuilder};
    use tempfile::TempDir;

    use crate::row::{AgentSnapshotRow, NO_NODE};

    pub fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn snap_row(agent_id: u32, tick: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            tick,
            agent_id,
            current_node: agent_id * 10,
            target_node:  NO_NODE,
            x:            1.5,
            y:            -2.25,
            heading:      0.0,
        }
    }

    pub fn config(total_ticks: u64, output_interval_ticks: u64) -> SimConfig {
        SimConfig {
            total_ticks,
            output_interval_ticks,
            capture_radius:  0.5,
            pursuer_speed:   1.0,
            stop_on_capture: false,
            ..SimConfig::default()
        }
    }

    /// Square cycle, side 10, plus an unconnected node 4.
    pub fn square_with_island() -> (Graph, [NodeId; 5]) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Point2::new(0.0, 0.0));
        let n1 = b.add_node(Point2::new(10.0, 0.0));
        let n2 = b.add_node(Point2::new(10.0, 10.0));
        let n3 = b.add_node(Point2::new(0.0, 10.0));
        let n4 = b.add_node(Point2::new(40.0, 40.0));
        b.add_road(n0, n1, 0.0);
        b.add_road(n1, n2, 0.0);
        b.add_road(n2, n3, 0.0);
        b.add_road(n3, n0, 0.0);
        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    pub fn read_csv(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::helpers::*;
    use crate::csv::{CsvWriter, EVENT_HEADER, SNAPSHOT_HEADER};
    use crate::row::{EventKind, EventRow};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("events.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SNAPSHOT_HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, EVENT_HEADER);
    }

    #[test]
    fn csv_snapshot_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let rows = read_csv(&dir.path().join("agent_snapshots.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5"); // tick
        assert_eq!(&rows[1][1], "1"); // agent_id
        assert_eq!(&rows[2][2], "20"); // current_node
        assert_eq!(&rows[0][3], u32::MAX.to_string()); // idle
        assert_eq!(&rows[0][4], "1.5000");
        assert_eq!(&rows[0][5], "-2.2500");
    }

    #[test]
    fn csv_event_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_event(&EventRow { tick: 9, kind: EventKind::Capture, agent_id: 3, other: 0 }).unwrap();
        w.finish().unwrap();

        let rows = read_csv(&dir.path().join("events.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "9");
        assert_eq!(&rows[0][1], "capture");
        assert_eq!(&rows[0][2], "3");
        assert_eq!(&rows[0][3], "0");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("does").join("not").join("exist"));
        assert!(result.is_err());
    }
}

// ── Observer bridge ───────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use chase_sim::{SimBuilder, SimConfig, SpawnPolicy};

    use super::helpers::*;
    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;

    #[test]
    fn snapshots_and_capture_written() {
        let (g, [n0, _, n2, _, _]) = square_with_island();
        let mut sim = SimBuilder::new(config(30, 5), g).quarry(n2, 1.0).pursuer(n0).build().unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 5 → ticks 0, 5, …, 25; two agents each.
        let snaps = read_csv(&dir.path().join("agent_snapshots.csv"));
        assert_eq!(snaps.len(), 12);
        assert_eq!(&snaps[0][0], "0");
        assert_eq!(&snaps[11][0], "25");
        assert_eq!(&snaps[11][1], "1");
        assert_eq!(&snaps[11][2], n2.0.to_string());

        let events = read_csv(&dir.path().join("events.csv"));
        assert_eq!(events.len(), 1);
        assert_eq!(&events[0][1], "capture");
        assert_eq!(&events[0][2], "1");
        assert_eq!(&events[0][3], "0");
    }

    #[test]
    fn spawn_and_stuck_events_written() {
        let (g, [_, _, n2, _, island]) = square_with_island();
        let cfg = SimConfig {
            ticks_per_sec: 10,
            spawn: Some(SpawnPolicy::new(1.0, vec![island]).max_pursuers(1)),
            ..config(20, 0)
        };
        let mut sim = SimBuilder::new(cfg, g).quarry(n2, 1.0).build().unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        assert!(read_csv(&dir.path().join("agent_snapshots.csv")).is_empty());
        let events = read_csv(&dir.path().join("events.csv"));
        let kinds: Vec<&str> = events.iter().map(|r| &r[1]).collect();
        assert_eq!(kinds, ["spawn", "stuck"]);
        assert_eq!(&events[0][0], "10");
        assert_eq!(&events[0][3], island.0.to_string());
        assert_eq!(&events[1][3], n2.0.to_string());
    }
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::helpers::*;
    use crate::row::{AgentSnapshotRow, EventKind, EventRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 1), snap_row(1, 1), snap_row(2, 1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM agent_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_idle_target_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let moving = AgentSnapshotRow { target_node: 7, ..snap_row(1, 0) };
        w.write_snapshots(&[snap_row(0, 0), moving]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let targets: Vec<Option<i64>> = conn
            .prepare("SELECT target_node FROM agent_snapshots ORDER BY agent_id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(targets, vec![None, Some(7)]);
    }

    #[test]
    fn sqlite_event_row() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_event(&EventRow { tick: 7, kind: EventKind::Spawn, agent_id: 4, other: 12 }).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, kind, other): (i64, String, i64) = conn
            .query_row("SELECT tick, kind, other FROM events WHERE agent_id = 4", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(tick, 7);
        assert_eq!(kind, "spawn");
        assert_eq!(other, 12);
    }
}
