//! Routing trait, the `Route` value, and an on-demand Dijkstra router.
//!
//! # Pluggability
//!
//! Controllers ask for routes through the [`Router`] trait.  The default
//! implementation is the precomputed [`ShortestPaths`][crate::ShortestPaths]
//! table; [`DijkstraRouter`] answers the same questions from scratch per
//! query and is handy as an independent cross-check or when `N²` memory is
//! not wanted.
//!
//! # Unreachability
//!
//! `route` returns `None` when no path exists.  That is a normal answer, not
//! a failure: callers hold position and try again at their next decision.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use chase_core::{EdgeId, NodeId};

use crate::Graph;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An optimal node sequence from `nodes[0]` to `nodes[last]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes in travel order, source first, destination last.  Never empty.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along `nodes`.
    pub total_weight: f64,
}

impl Route {
    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// The node to move to first, or `None` for a trivial route.
    pub fn next_hop(&self) -> Option<NodeId> {
        self.nodes.get(1).copied()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len() - 1
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Consecutive `(from, to)` pairs along the route.
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Source of optimal routes between nodes of one graph.
///
/// Implementations must be `Send + Sync` so one router can be shared by
/// reference between every controller.
pub trait Router: Send + Sync {
    /// Optimal route `from → to`, or `None` if `to` is unreachable.
    ///
    /// `from == to` yields a trivial single-node route.
    fn route(&self, from: NodeId, to: NodeId) -> Option<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-pair Dijkstra over the CSR graph, using `edge_weight` as cost.
pub struct DijkstraRouter<'g> {
    graph: &'g Graph,
}

impl<'g> DijkstraRouter<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }
}

impl Router for DijkstraRouter<'_> {
    fn route(&self, from: NodeId, to: NodeId) -> Option<Route> {
        dijkstra(self.graph, from, to)
    }
}

fn dijkstra(graph: &Graph, from: NodeId, to: NodeId) -> Option<Route> {
    if !graph.contains(from) || !graph.contains(to) {
        return None;
    }
    if from == to {
        return Some(Route { nodes: vec![from], total_weight: 0.0 });
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    // Min-heap via Reverse; NodeId breaks cost ties deterministically.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, to, cost));
        }
        if cost > dist[node.index()] {
            continue;
        }
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_weight[edge.index()];
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(graph: &Graph, prev_edge: &[EdgeId], to: NodeId, total_weight: f64) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_weight }
}
