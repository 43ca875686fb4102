//! Unit tests for chase-spatial.
//!
//! All tests use hand-crafted graphs.

#[cfg(test)]
mod helpers {
    use chase_core::{NodeId, Point2};
    use crate::{Graph, GraphBuilder};

    /// Unit square cycle, side 10, zero penalties.
    ///
    /// ```text
    ///   3:(0,10) ── 2:(10,10)
    ///      │            │
    ///   0:(0,0)  ── 1:(10,0)
    /// ```
    pub fn square() -> (Graph, [NodeId; 4]) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Point2::new(0.0, 0.0));
        let n1 = b.add_node(Point2::new(10.0, 0.0));
        let n2 = b.add_node(Point2::new(10.0, 10.0));
        let n3 = b.add_node(Point2::new(0.0, 10.0));
        b.add_road(n0, n1, 0.0);
        b.add_road(n1, n2, 0.0);
        b.add_road(n2, n3, 0.0);
        b.add_road(n3, n0, 0.0);
        (b.build().unwrap(), [n0, n1, n2, n3])
    }

    /// Five nodes where the geometrically short way is penalised:
    ///
    /// ```text
    ///   0 ──(penalty 5000)── 1 ── 2
    ///   │                         │
    ///   3 ─────────────────────── 4
    /// ```
    pub fn detour() -> (Graph, [NodeId; 5]) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Point2::new(0.0, 0.0));
        let n1 = b.add_node(Point2::new(10.0, 0.0));
        let n2 = b.add_node(Point2::new(20.0, 0.0));
        let n3 = b.add_node(Point2::new(0.0, 10.0));
        let n4 = b.add_node(Point2::new(20.0, 10.0));
        b.add_road(n0, n1, 5_000.0); // 10 + 50 = 60
        b.add_road(n1, n2, 0.0);     // 10
        b.add_road(n0, n3, 0.0);     // 10
        b.add_road(n3, n4, 0.0);     // 20
        b.add_road(n4, n2, 0.0);     // 10
        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    /// Two components: {0, 1} and {2, 3}.
    pub fn split() -> (Graph, [NodeId; 4]) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Point2::new(0.0, 0.0));
        let n1 = b.add_node(Point2::new(1.0, 0.0));
        let n2 = b.add_node(Point2::new(50.0, 0.0));
        let n3 = b.add_node(Point2::new(51.0, 0.0));
        b.add_road(n0, n1, 0.0);
        b.add_road(n2, n3, 0.0);
        (b.build().unwrap(), [n0, n1, n2, n3])
    }

    /// Deterministic pseudo-random connected graph for property checks.
    pub fn scattered(n: u32, seed: u64) -> Graph {
        let mut rng = chase_core::SimRng::new(seed);
        let mut b = GraphBuilder::new();
        let ids: Vec<NodeId> = (0..n)
            .map(|_| b.add_node(Point2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))))
            .collect();
        // Spanning chain keeps the graph connected.
        for w in ids.windows(2) {
            b.add_road(w[0], w[1], rng.gen_range(0.0..300.0));
        }
        for _ in 0..n {
            let a = ids[rng.gen_range(0..n as usize)];
            let c = ids[rng.gen_range(0..n as usize)];
            if a != c {
                b.add_road(a, c, rng.gen_range(0.0..300.0));
            }
        }
        b.build().unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use chase_core::{NodeId, Point2};
    use crate::{GraphBuilder, GraphError};

    #[test]
    fn empty_build() {
        let g = GraphBuilder::new().build().unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn penalty_adds_scaled_weight() {
        // Raw distance 5, penalty 200, scale 100 → 7.
        let mut b = GraphBuilder::new();
        let u = b.add_node(Point2::new(0.0, 0.0));
        let v = b.add_node(Point2::new(3.0, 4.0));
        b.add_road(u, v, 200.0);
        let g = b.build().unwrap();
        assert_eq!(g.weight(u, v), Some(7.0));
        assert_eq!(g.weight(v, u), Some(7.0));
    }

    #[test]
    fn custom_penalty_scale() {
        let mut b = GraphBuilder::new().penalty_scale(10.0);
        let u = b.add_node(Point2::new(0.0, 0.0));
        let v = b.add_node(Point2::new(3.0, 4.0));
        b.add_directed_edge(u, v, 20.0);
        let g = b.build().unwrap();
        assert_eq!(g.weight(u, v), Some(7.0));
        assert_eq!(g.weight(v, u), None);
    }

    #[test]
    fn weight_never_below_length() {
        let g = super::helpers::scattered(20, 3);
        for e in 0..g.edge_count() {
            let len = g.node_pos[g.edge_from[e].index()].distance(g.node_pos[g.edge_to[e].index()]);
            assert!(g.edge_weight[e] >= len);
        }
    }

    #[test]
    fn roads_are_symmetric() {
        let (g, _) = super::helpers::square();
        assert!(g.is_symmetric());
        for (u, v) in g.edges() {
            assert_eq!(g.weight(u, v), g.weight(v, u));
        }
    }

    #[test]
    fn one_way_edge_breaks_symmetry() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(0.0, 1.0));
        b.add_directed_edge(a, c, 0.0);
        let g = b.build().unwrap();
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.out_degree(c), 0);
        assert!(!g.is_symmetric());
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        b.add_road(a, NodeId(9), 0.0);
        assert_eq!(
            b.build().unwrap_err(),
            GraphError::DanglingEdge { from: a, to: NodeId(9) }
        );
    }

    #[test]
    fn negative_penalty_rejected() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(1.0, 0.0));
        b.add_road(a, c, -1.0);
        assert!(matches!(b.build(), Err(GraphError::InvalidPenalty { .. })));
    }

    #[test]
    fn nan_position_rejected() {
        let mut b = GraphBuilder::new();
        b.add_node(Point2::new(f64::NAN, 0.0));
        assert!(matches!(b.build(), Err(GraphError::NonFinitePosition { .. })));
    }

    #[test]
    fn zero_scale_rejected() {
        let b = GraphBuilder::new().penalty_scale(0.0);
        assert!(matches!(b.build(), Err(GraphError::InvalidPenaltyScale(_))));
    }

    #[test]
    fn self_loop_rejected() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        b.add_directed_edge(a, a, 0.0);
        assert_eq!(b.build().unwrap_err(), GraphError::SelfLoop(a));
    }

    #[test]
    fn duplicate_label_rejected() {
        let mut b = GraphBuilder::new();
        b.add_labeled_node(4, Point2::new(0.0, 0.0));
        b.add_labeled_node(4, Point2::new(1.0, 0.0));
        assert_eq!(b.build().unwrap_err(), GraphError::DuplicateNode { label: 4 });
    }

    #[test]
    fn isolated_node_is_a_warning_not_an_error() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(1.0, 0.0));
        let lonely = b.add_node(Point2::new(9.0, 9.0));
        b.add_road(a, c, 0.0);
        let g = b.build().unwrap();
        assert_eq!(g.isolated_nodes(), vec![lonely]);
    }

    #[test]
    fn neighbors_and_adjacency() {
        let (g, [n0, n1, n2, n3]) = super::helpers::square();
        let mut around_0: Vec<_> = g.neighbors(n0).collect();
        around_0.sort();
        assert_eq!(around_0, vec![n1, n3]);
        assert!(g.is_adjacent(n0, n1));
        assert!(!g.is_adjacent(n0, n2));
        assert!(g.edge_between(n0, n2).is_none());
    }

    #[test]
    fn edges_listed_once_per_road() {
        let (g, _) = super::helpers::square();
        assert_eq!(g.edge_count(), 8);
        let edges = g.edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|(u, v)| u < v));
    }

    #[test]
    fn labels_round_trip() {
        let mut b = GraphBuilder::new();
        let a = b.add_labeled_node(1, Point2::new(0.0, 0.0));
        let c = b.add_labeled_node(13, Point2::new(1.0, 0.0));
        let g = b.build().unwrap();
        assert_eq!(g.label(c), Some(13));
        assert_eq!(g.node_by_label(1), Some(a));
        assert_eq!(g.node_by_label(2), None);
    }

    #[test]
    fn unknown_node_has_no_edges() {
        let (g, _) = super::helpers::square();
        assert_eq!(g.out_degree(NodeId(77)), 0);
        assert_eq!(g.pos(NodeId(77)), None);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use chase_core::Point2;
    use crate::GraphBuilder;

    #[test]
    fn snap_nearest() {
        let (g, [n0, n1, n2, _]) = super::helpers::square();
        assert_eq!(g.snap_to_node(Point2::new(1.0, 1.0)), Some(n0));
        assert_eq!(g.snap_to_node(Point2::new(9.0, 2.0)), Some(n1));
        assert_eq!(g.snap_to_node(Point2::new(12.0, 11.0)), Some(n2));
    }

    #[test]
    fn k_nearest_order() {
        let (g, [n0, n1, _, _]) = super::helpers::square();
        let nearest = g.k_nearest_nodes(Point2::new(2.0, 0.0), 2);
        assert_eq!(nearest, vec![n0, n1]);
    }

    #[test]
    fn empty_graph_returns_none() {
        let g = GraphBuilder::new().build().unwrap();
        assert!(g.snap_to_node(Point2::ORIGIN).is_none());
    }
}

// ── Floyd–Warshall ────────────────────────────────────────────────────────────

#[cfg(test)]
mod apsp {
    use crate::{Router, ShortestPaths};

    const EPS: f64 = 1e-9;

    #[test]
    fn square_opposite_corner_is_twenty() {
        let (g, [n0, n1, n2, n3]) = super::helpers::square();
        let sp = ShortestPaths::compute(&g);
        assert!((sp.dist(n0, n2) - 20.0).abs() < EPS);

        let route = sp.path(n0, n2).unwrap();
        assert!(route.nodes == vec![n0, n1, n2] || route.nodes == vec![n0, n3, n2]);
        let summed: f64 = route.legs().map(|(u, v)| g.weight(u, v).unwrap()).sum();
        assert!((summed - 20.0).abs() < EPS);
    }

    #[test]
    fn diagonal_is_zero_and_self() {
        let (g, nodes) = super::helpers::square();
        let sp = ShortestPaths::compute(&g);
        for n in nodes {
            assert_eq!(sp.dist(n, n), 0.0);
            assert_eq!(sp.next_hop(n, n), Some(n));
            assert_eq!(sp.path(n, n).unwrap().nodes, vec![n]);
        }
    }

    #[test]
    fn penalty_forces_detour() {
        let (g, [n0, _, n2, n3, n4]) = super::helpers::detour();
        let sp = ShortestPaths::compute(&g);
        // Direct 0→1→2 costs 70; the detour 0→3→4→2 costs 40.
        let route = sp.path(n0, n2).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n4, n2]);
        assert!((route.total_weight - 40.0).abs() < EPS);
        assert_eq!(sp.next_hop(n0, n2), Some(n3));
    }

    #[test]
    fn disconnected_pairs_are_unreachable() {
        let (g, [n0, n1, n2, n3]) = super::helpers::split();
        let sp = ShortestPaths::compute(&g);
        assert!(sp.is_reachable(n0, n1));
        assert!(!sp.is_reachable(n0, n2));
        assert_eq!(sp.dist(n1, n3), f64::INFINITY);
        assert_eq!(sp.next_hop(n1, n3), None);
        assert!(sp.path(n0, n3).is_none());
        assert!(sp.route(n2, n1).is_none());
    }

    #[test]
    fn unreachable_iff_infinite() {
        let (g, nodes) = super::helpers::split();
        let sp = ShortestPaths::compute(&g);
        for &i in &nodes {
            for &j in &nodes {
                assert_eq!(sp.path(i, j).is_none(), sp.dist(i, j) == f64::INFINITY);
            }
        }
    }

    #[test]
    fn out_of_range_nodes_are_unreachable() {
        let (g, [n0, ..]) = super::helpers::square();
        let sp = ShortestPaths::compute(&g);
        let ghost = chase_core::NodeId(40);
        assert!(sp.path(n0, ghost).is_none());
        assert_eq!(sp.dist(ghost, n0), f64::INFINITY);
    }

    #[test]
    fn symmetric_and_triangle_inequality() {
        let g = super::helpers::scattered(24, 11);
        let sp = ShortestPaths::compute(&g);
        let nodes: Vec<_> = g.nodes().collect();
        for &i in &nodes {
            for &j in &nodes {
                assert!((sp.dist(i, j) - sp.dist(j, i)).abs() < EPS);
                for &k in &nodes {
                    assert!(sp.dist(i, j) <= sp.dist(i, k) + sp.dist(k, j) + EPS);
                }
            }
        }
    }

    #[test]
    fn reconstructed_paths_are_valid_and_optimal() {
        let g = super::helpers::scattered(24, 5);
        let sp = ShortestPaths::compute(&g);
        for i in g.nodes() {
            for j in g.nodes() {
                let route = sp.path(i, j).unwrap();
                assert_eq!(route.source(), i);
                assert_eq!(route.destination(), j);
                assert!(route.nodes.len() <= g.node_count());
                let mut summed = 0.0;
                for (u, v) in route.legs() {
                    summed += g.weight(u, v).expect("consecutive nodes must share an edge");
                }
                assert!((summed - sp.dist(i, j)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let g = super::helpers::scattered(16, 21);
        let a = ShortestPaths::compute(&g);
        let b = ShortestPaths::compute(&g);
        for i in g.nodes() {
            for j in g.nodes() {
                assert_eq!(a.next_hop(i, j), b.next_hop(i, j));
                assert_eq!(a.dist(i, j).to_bits(), b.dist(i, j).to_bits());
            }
        }
    }

    #[test]
    fn directed_graph_respects_orientation() {
        use chase_core::Point2;
        use crate::GraphBuilder;

        let mut b = GraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(4.0, 0.0));
        let d = b.add_node(Point2::new(8.0, 0.0));
        b.add_directed_edge(a, c, 0.0);
        b.add_directed_edge(c, d, 0.0);
        let g = b.build().unwrap();
        let sp = ShortestPaths::compute(&g);
        assert_eq!(sp.path(a, d).unwrap().nodes, vec![a, c, d]);
        assert!(sp.path(d, a).is_none());
    }
}

// ── Parallel kernel ───────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel {
    use crate::apsp::{relax_through_par, relax_through_seq};
    use crate::ShortestPaths;

    fn assert_identical(a: &ShortestPaths, b: &ShortestPaths, g: &crate::Graph) {
        for i in g.nodes() {
            for j in g.nodes() {
                assert_eq!(a.dist(i, j).to_bits(), b.dist(i, j).to_bits(), "dist {i} -> {j}");
                assert_eq!(a.next_hop(i, j), b.next_hop(i, j), "next {i} -> {j}");
            }
        }
    }

    #[test]
    fn row_parallel_matches_sequential() {
        for (n, seed) in [(1, 0), (12, 4), (24, 11), (40, 99)] {
            let g = super::helpers::scattered(n, seed);
            let seq = ShortestPaths::compute_with(&g, relax_through_seq);
            let par = ShortestPaths::compute_with(&g, relax_through_par);
            assert_identical(&seq, &par, &g);
        }
    }

    #[test]
    fn compute_uses_parallel_kernel_with_same_result() {
        let (g, _) = super::helpers::split();
        let seq = ShortestPaths::compute_with(&g, relax_through_seq);
        assert_identical(&seq, &ShortestPaths::compute(&g), &g);
    }
}

// ── Dijkstra cross-check ──────────────────────────────────────────────────────

#[cfg(test)]
mod dijkstra {
    use crate::{DijkstraRouter, Router, ShortestPaths};

    #[test]
    fn agrees_with_floyd_warshall() {
        let g = super::helpers::scattered(20, 8);
        let sp = ShortestPaths::compute(&g);
        let dj = DijkstraRouter::new(&g);
        for i in g.nodes() {
            for j in g.nodes() {
                let a = sp.route(i, j).unwrap();
                let b = dj.route(i, j).unwrap();
                assert!((a.total_weight - b.total_weight).abs() < 1e-6);
                assert_eq!(b.source(), i);
                assert_eq!(b.destination(), j);
            }
        }
    }

    #[test]
    fn trivial_and_unreachable() {
        let (g, [n0, _, n2, _]) = super::helpers::split();
        let dj = DijkstraRouter::new(&g);
        assert!(dj.route(n0, n0).unwrap().is_trivial());
        assert!(dj.route(n0, n2).is_none());
    }
}

// ── Route value ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use chase_core::NodeId;
    use crate::Route;

    #[test]
    fn accessors() {
        let r = Route { nodes: vec![NodeId(0), NodeId(3), NodeId(2)], total_weight: 20.0 };
        assert_eq!(r.next_hop(), Some(NodeId(3)));
        assert_eq!(r.hops(), 2);
        assert!(!r.is_trivial());
        let legs: Vec<_> = r.legs().collect();
        assert_eq!(legs, vec![(NodeId(0), NodeId(3)), (NodeId(3), NodeId(2))]);
    }

    #[test]
    fn trivial_route_has_no_next_hop() {
        let r = Route { nodes: vec![NodeId(5)], total_weight: 0.0 };
        assert!(r.is_trivial());
        assert_eq!(r.next_hop(), None);
        assert_eq!(r.hops(), 0);
    }
}

// ── GraphSpec ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spec {
    use crate::{EdgeSpec, GraphError, GraphSpec, NodeSpec, ShortestPaths};

    fn one_based_line() -> GraphSpec {
        GraphSpec {
            nodes: vec![
                NodeSpec { id: 1, x: 0.0, y: 0.0 },
                NodeSpec { id: 2, x: 3.0, y: 4.0 },
                NodeSpec { id: 3, x: 6.0, y: 8.0 },
            ],
            edges: vec![
                EdgeSpec { from: 1, to: 2, penalty: 200.0 },
                EdgeSpec { from: 2, to: 3, penalty: 0.0 },
            ],
            ..GraphSpec::default()
        }
    }

    #[test]
    fn maps_labels_to_dense_ids() {
        let g = one_based_line().build().unwrap();
        let n1 = g.node_by_label(1).unwrap();
        let n3 = g.node_by_label(3).unwrap();
        assert_eq!(n1.index(), 0);
        assert_eq!(n3.index(), 2);
        let sp = ShortestPaths::compute(&g);
        assert!((sp.dist(n1, n3) - 12.0).abs() < 1e-9);
        assert!((sp.dist(n3, n1) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn directed_spec_is_one_way() {
        let mut spec = one_based_line();
        spec.directed = true;
        let g = spec.build().unwrap();
        let sp = ShortestPaths::compute(&g);
        let (n1, n3) = (g.node_by_label(1).unwrap(), g.node_by_label(3).unwrap());
        assert!(sp.is_reachable(n1, n3));
        assert!(!sp.is_reachable(n3, n1));
    }

    #[test]
    fn unknown_label_rejected() {
        let mut spec = one_based_line();
        spec.edges.push(EdgeSpec { from: 3, to: 42, penalty: 0.0 });
        assert_eq!(spec.build().unwrap_err(), GraphError::UnknownLabel { label: 42 });
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut spec = one_based_line();
        spec.nodes.push(NodeSpec { id: 2, x: 1.0, y: 1.0 });
        assert_eq!(spec.build().unwrap_err(), GraphError::DuplicateNode { label: 2 });
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_from_toml() {
        let text = r#"
            [[nodes]]
            id = 1
            x = 0.0
            y = 0.0

            [[nodes]]
            id = 2
            x = 3.0
            y = 4.0

            [[edges]]
            from = 1
            to = 2
            penalty = 200.0
        "#;
        let spec: GraphSpec = toml::from_str(text).unwrap();
        assert!(!spec.directed);
        assert_eq!(spec.penalty_scale, crate::DEFAULT_PENALTY_SCALE);
        let g = spec.build().unwrap();
        let (a, b) = (g.node_by_label(1).unwrap(), g.node_by_label(2).unwrap());
        assert_eq!(g.weight(a, b), Some(7.0));
    }
}
