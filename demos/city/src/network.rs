//! The built-in reference city.
//!
//! Thirteen intersections labelled 1–13 on a roughly 60 × 60 logical-unit
//! plane, joined by two-way roads.  Some roads carry a traffic penalty; with
//! the default scale of 100 a penalty of 200 adds 2.0 to the road's length.

use chase_spatial::{DEFAULT_PENALTY_SCALE, EdgeSpec, GraphSpec, NodeSpec};

/// `(label, x, y)` for every intersection.
const NODES: [(u32, f64, f64); 13] = [
    (1,  10.85,  5.8),
    (2,  26.7,   7.4),
    (3,  36.57,  5.0),
    (4,  46.28,  5.2),
    (5,  11.42, 23.2),
    (6,  23.7,  24.4),
    (7,  36.7,  24.4),
    (8,  51.4,  37.2),
    (9,  10.57, 41.4),
    (10, 23.57, 41.4),
    (11, 34.57, 48.4),
    (12, 49.1,  57.8),
    (13, 58.4,   6.2),
];

/// `(from, to, penalty)` for every road.
const ROADS: [(u32, u32, f64); 17] = [
    (1,  2,    0.0),
    (2,  3,    5.0),
    (3,  4,    0.0),
    (1,  5,  200.0),
    (3,  7,   77.0),
    (5,  6,   45.0),
    (6,  7,   10.0),
    (7,  8,    0.0),
    (5,  9,    0.0),
    (6,  10,   0.0),
    (7,  11,   0.0),
    (8,  12,   0.0),
    (9,  10,   0.0),
    (10, 11,   0.0),
    (11, 12,   0.0),
    (13, 4,    0.0),
    (13, 8,    0.0),
];

/// Label of the intersection the courier leaves from.
pub const DEPOT: u32 = 1;

/// Label of the courier's destination.
pub const DROP_OFF: u32 = 12;

/// Labels where pursuers enter the city.
pub const STATIONS: [u32; 3] = [4, 9, 13];

/// The reference city as an undirected [`GraphSpec`].
pub fn reference_city() -> GraphSpec {
    GraphSpec {
        directed:      false,
        penalty_scale: DEFAULT_PENALTY_SCALE,
        nodes:         NODES.iter().map(|&(id, x, y)| NodeSpec { id, x, y }).collect(),
        edges:         ROADS
            .iter()
            .map(|&(from, to, penalty)| EdgeSpec { from, to, penalty })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chase_spatial::ShortestPaths;

    use super::*;

    #[test]
    fn builds_thirteen_labelled_nodes() {
        let g = reference_city().build().unwrap();
        assert_eq!(g.node_count(), 13);
        assert_eq!(g.edge_count(), 34);
        assert!(g.is_symmetric());
        assert!(g.isolated_nodes().is_empty());
        for label in 1..=13 {
            assert!(g.node_by_label(label).is_some(), "label {label} missing");
        }
    }

    #[test]
    fn penalty_is_scaled_onto_length() {
        let g = reference_city().build().unwrap();
        let a = g.node_by_label(1).unwrap();
        let b = g.node_by_label(5).unwrap();
        let dist = g.pos(a).unwrap().distance(g.pos(b).unwrap());
        let w = g.weight(a, b).unwrap();
        assert!((w - (dist + 2.0)).abs() < 1e-9, "weight {w}, length {dist}");
        assert_eq!(g.weight(a, b), g.weight(b, a));
    }

    #[test]
    fn every_pair_is_connected() {
        let g = reference_city().build().unwrap();
        let sp = ShortestPaths::compute(&g);
        for from in g.nodes() {
            for to in g.nodes() {
                let route = sp.path(from, to).expect("connected city");
                assert_eq!(route.nodes.first(), Some(&from));
                assert_eq!(route.nodes.last(), Some(&to));
            }
        }
    }

    #[test]
    fn stations_and_depot_exist() {
        let g = reference_city().build().unwrap();
        for label in STATIONS.iter().copied().chain([DEPOT, DROP_OFF]) {
            assert!(g.node_by_label(label).is_some());
        }
    }
}
