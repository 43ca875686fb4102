//! Graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_penalty`, `edge_weight`)
//! are sorted by source node and indexed by `EdgeId`.  An undirected road is
//! stored as two directed edges with identical weight.
//!
//! # Edge weight
//!
//! ```text
//! weight(u, v) = |pos[u] - pos[v]| + penalty(u, v) / penalty_scale
//! ```
//!
//! Penalties are non-negative, so a weight is never below the straight-line
//! length of its edge.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a logical `(x, y)` to the nearest `NodeId`,
//! for input layers that need to turn a pointer position into a node.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::warn;

use chase_core::{EdgeId, NodeId, Point2};

use crate::{GraphError, GraphResult};

/// Penalty units per unit of distance (a penalty of 200 adds 2.0 to a weight).
pub const DEFAULT_PENALTY_SCALE: f64 = 100.0;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable weighted graph in CSR format plus a spatial index.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do
/// not construct directly; use [`GraphBuilder`] or
/// [`GraphSpec`][crate::GraphSpec].
pub struct Graph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Logical position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point2>,

    /// External identifier of each node (what a scenario file or a UI calls
    /// it).  Defaults to the dense index.
    pub node_label: Vec<u32>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,

    /// Raw penalty of each edge, in penalty units.
    pub edge_penalty: Vec<f64>,

    /// Traversal weight: Euclidean length plus `penalty / penalty_scale`.
    pub edge_weight: Vec<f64>,

    /// Conversion factor from penalty units to distance units.
    pub penalty_scale: f64,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("penalty_scale", &self.penalty_scale)
            .finish_non_exhaustive()
    }
}

impl Graph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of **directed** edges (an undirected road counts twice).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Node accessors ────────────────────────────────────────────────────

    /// Position of `node`, or `None` if it is not in the graph.
    #[inline]
    pub fn pos(&self, node: NodeId) -> Option<Point2> {
        self.node_pos.get(node.index()).copied()
    }

    /// External label of `node`.
    #[inline]
    pub fn label(&self, node: NodeId) -> Option<u32> {
        self.node_label.get(node.index()).copied()
    }

    /// Reverse label lookup.  Linear scan; the graphs here are tiny.
    pub fn node_by_label(&self, label: u32) -> Option<NodeId> {
        self.node_label
            .iter()
            .position(|&l| l == label)
            .map(|i| NodeId(i as u32))
    }

    /// Iterator over every `NodeId` in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(|i| NodeId(i as u32))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range; no heap allocation.  Unknown nodes
    /// yield nothing.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = if self.contains(node) {
            (
                self.node_out_start[node.index()] as usize,
                self.node_out_start[node.index() + 1] as usize,
            )
        } else {
            (0, 0)
        };
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).count()
    }

    /// Nodes directly reachable from `node` over one edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    /// The lightest edge `from → to`, if one exists.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .min_by(|a, b| self.edge_weight[a.index()].total_cmp(&self.edge_weight[b.index()]))
    }

    #[inline]
    pub fn is_adjacent(&self, from: NodeId, to: NodeId) -> bool {
        self.out_edges(from).any(|e| self.edge_to[e.index()] == to)
    }

    /// Traversal weight of the lightest direct edge `from → to`.
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.edge_between(from, to).map(|e| self.edge_weight[e.index()])
    }

    /// Each connection once, for drawing: a road stored in both directions
    /// is reported as a single `(lower, higher)` pair; one-way edges are
    /// reported as stored.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut out = Vec::with_capacity(self.edge_count() / 2 + 1);
        for e in 0..self.edge_count() {
            let (u, v) = (self.edge_from[e], self.edge_to[e]);
            let has_reverse = self.is_adjacent(v, u);
            if (!has_reverse || u < v) && !out.contains(&(u, v)) {
                out.push((u, v));
            }
        }
        out
    }

    /// `true` if every edge `u → v` has a matching `v → u` with the same
    /// penalty, i.e. the graph can be treated as undirected.
    pub fn is_symmetric(&self) -> bool {
        (0..self.edge_count()).all(|e| {
            let (u, v) = (self.edge_from[e], self.edge_to[e]);
            self.out_edges(v).any(|r| {
                self.edge_to[r.index()] == u && self.edge_penalty[r.index()] == self.edge_penalty[e]
            })
        })
    }

    /// Nodes with no incoming and no outgoing edges.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        let mut touched = vec![false; self.node_count()];
        for e in 0..self.edge_count() {
            touched[self.edge_from[e].index()] = true;
            touched[self.edge_to[e].index()] = true;
        }
        touched
            .iter()
            .enumerate()
            .filter(|&(_, &t)| !t)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the node nearest to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Point2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Point2, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use chase_core::Point2;
/// use chase_spatial::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let u = b.add_node(Point2::new(0.0, 0.0));
/// let v = b.add_node(Point2::new(3.0, 4.0));
/// b.add_road(u, v, 200.0);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.weight(u, v), Some(7.0));
/// ```
pub struct GraphBuilder {
    nodes:         Vec<Point2>,
    labels:        Vec<u32>,
    raw_edges:     Vec<RawEdge>,
    penalty_scale: f64,
}

struct RawEdge {
    from:    NodeId,
    to:      NodeId,
    penalty: f64,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:         Vec::with_capacity(nodes),
            labels:        Vec::with_capacity(nodes),
            raw_edges:     Vec::with_capacity(edges),
            penalty_scale: DEFAULT_PENALTY_SCALE,
        }
    }

    /// Override the penalty-to-distance conversion factor.
    pub fn penalty_scale(mut self, scale: f64) -> Self {
        self.penalty_scale = scale;
        self
    }

    /// Add a node labelled with its own index and return its `NodeId`
    /// (sequential from 0).
    pub fn add_node(&mut self, pos: Point2) -> NodeId {
        let label = self.nodes.len() as u32;
        self.add_labeled_node(label, pos)
    }

    /// Add a node carrying an external label.
    pub fn add_labeled_node(&mut self, label: u32, pos: Point2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.labels.push(label);
        id
    }

    /// Add a **directed** edge `from → to` with the given penalty.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, penalty: f64) {
        self.raw_edges.push(RawEdge { from, to, penalty });
    }

    /// Add edges in **both directions** with the same penalty.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, penalty: f64) {
        self.add_directed_edge(a, b, penalty);
        self.add_directed_edge(b, a, penalty);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder.
    ///
    /// # Errors
    ///
    /// Any [`GraphError`]; the graph is never partially built.  Nodes with no
    /// edges at all are accepted but logged at `warn`.
    pub fn build(self) -> GraphResult<Graph> {
        let node_count = self.nodes.len();
        let scale = self.penalty_scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GraphError::InvalidPenaltyScale(scale));
        }

        for (i, pos) in self.nodes.iter().enumerate() {
            if !pos.is_finite() {
                return Err(GraphError::NonFinitePosition { node: NodeId(i as u32) });
            }
        }

        let mut sorted_labels = self.labels.clone();
        sorted_labels.sort_unstable();
        if let Some(w) = sorted_labels.windows(2).find(|w| w[0] == w[1]) {
            return Err(GraphError::DuplicateNode { label: w[0] });
        }

        for e in &self.raw_edges {
            if e.from.index() >= node_count || e.to.index() >= node_count {
                return Err(GraphError::DanglingEdge { from: e.from, to: e.to });
            }
            if e.from == e.to {
                return Err(GraphError::SelfLoop(e.from));
            }
            if !(e.penalty.is_finite() && e.penalty >= 0.0) {
                return Err(GraphError::InvalidPenalty {
                    from:    e.from,
                    to:      e.to,
                    penalty: e.penalty,
                });
            }
        }

        // Stable sort keeps insertion order within a node's edge slice.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:    Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:      Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_penalty: Vec<f64>    = raw.iter().map(|e| e.penalty).collect();
        let edge_weight:  Vec<f64>    = raw
            .iter()
            .map(|e| {
                let length = self.nodes[e.from.index()].distance(self.nodes[e.to.index()]);
                length + e.penalty / scale
            })
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let graph = Graph {
            node_pos: self.nodes,
            node_label: self.labels,
            node_out_start,
            edge_from,
            edge_to,
            edge_penalty,
            edge_weight,
            penalty_scale: scale,
            spatial_idx,
        };

        for node in graph.isolated_nodes() {
            warn!(
                node = node.0,
                label = graph.node_label[node.index()],
                "node has no edges and is unreachable"
            );
        }

        Ok(graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
