//! All-pairs shortest paths (Floyd–Warshall) with successor reconstruction.
//!
//! # Layout
//!
//! Both matrices are flat row-major `Vec`s of length `N²`:
//!
//! ```text
//! dist[i * N + j]  minimum total weight i → j   (+∞ if unreachable)
//! next[i * N + j]  first hop on that path        (NodeId::INVALID if unreachable)
//! ```
//!
//! # Relaxation
//!
//! For each intermediate `k`, then each `i`, then each `j`:
//!
//! ```text
//! if dist[i][k] + dist[k][j] < dist[i][j]:
//!     dist[i][j] = dist[i][k] + dist[k][j]
//!     next[i][j] = next[i][k]
//! ```
//!
//! The successor is taken from the `i → k` leg, so chaining `next[·][j]`
//! from `i` walks the whole optimal path.  The comparison is strict, so ties
//! keep the first path found for the fixed `k, i, j` order and the result is
//! deterministic.
//!
//! During round `k`, row `k` and column `k` cannot change (`dist[k][k] = 0`
//! and the comparison is strict), which is what lets the `parallel` feature
//! relax rows independently and still produce bit-identical matrices.

use tracing::debug;

use chase_core::NodeId;

use crate::{Graph, Route, Router};

/// Precomputed distance and successor matrices over one [`Graph`].
///
/// Built once with [`compute`](Self::compute) and read-only afterwards.  Cheap
/// queries: [`dist`](Self::dist) and [`next_hop`](Self::next_hop) are O(1),
/// [`path`](Self::path) is O(path length).
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    n:    usize,
    dist: Vec<f64>,
    next: Vec<NodeId>,
}

impl ShortestPaths {
    /// Run Floyd–Warshall over `graph`.  O(N³) time, O(N²) space.
    ///
    /// With the `parallel` feature each round relaxes rows on Rayon's
    /// thread pool; the matrices are identical either way.
    pub fn compute(graph: &Graph) -> Self {
        #[cfg(not(feature = "parallel"))]
        let relax = relax_through_seq;
        #[cfg(feature = "parallel")]
        let relax = relax_through_par;

        Self::compute_with(graph, relax)
    }

    /// Floyd–Warshall with an explicit relaxation kernel for round `k`.
    pub(crate) fn compute_with(graph: &Graph, relax: RelaxKernel) -> Self {
        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n * n];
        let mut next = vec![NodeId::INVALID; n * n];

        for i in 0..n {
            dist[i * n + i] = 0.0;
            next[i * n + i] = NodeId(i as u32);
        }

        // Direct edges.  Parallel edges keep the lightest.
        for e in 0..graph.edge_count() {
            let u = graph.edge_from[e].index();
            let v = graph.edge_to[e];
            let w = graph.edge_weight[e];
            if w < dist[u * n + v.index()] {
                dist[u * n + v.index()] = w;
                next[u * n + v.index()] = v;
            }
        }

        for k in 0..n {
            relax(k, n, &mut dist, &mut next);
        }

        let reachable_pairs = dist.iter().filter(|d| d.is_finite()).count();
        debug!(nodes = n, reachable_pairs, "all-pairs shortest paths computed");

        Self { n, dist, next }
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    #[inline]
    fn in_range(&self, from: NodeId, to: NodeId) -> bool {
        from.index() < self.n && to.index() < self.n
    }

    /// Minimum total weight `from → to`; `f64::INFINITY` if unreachable or
    /// if either node is outside the graph.
    #[inline]
    pub fn dist(&self, from: NodeId, to: NodeId) -> f64 {
        if !self.in_range(from, to) {
            return f64::INFINITY;
        }
        self.dist[from.index() * self.n + to.index()]
    }

    /// First node to move to when travelling optimally `from → to`.
    ///
    /// `Some(from)` when `from == to`; `None` when `to` is unreachable.
    #[inline]
    pub fn next_hop(&self, from: NodeId, to: NodeId) -> Option<NodeId> {
        if !self.in_range(from, to) {
            return None;
        }
        let hop = self.next[from.index() * self.n + to.index()];
        hop.is_valid().then_some(hop)
    }

    #[inline]
    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        self.next_hop(from, to).is_some()
    }

    /// Reconstruct the optimal node sequence `from → to` by chaining `next`.
    ///
    /// Returns `None` when `to` is unreachable, an ordinary outcome callers
    /// are expected to branch on.  `path(i, i)` is `[i]`.  The walk is capped
    /// at `N` hops, so a corrupted table can never loop forever.
    pub fn path(&self, from: NodeId, to: NodeId) -> Option<Route> {
        self.next_hop(from, to)?;

        let mut nodes = vec![from];
        let mut cur = from;
        while cur != to {
            cur = self.next_hop(cur, to)?;
            nodes.push(cur);
            if nodes.len() > self.n {
                return None;
            }
        }

        Some(Route { nodes, total_weight: self.dist(from, to) })
    }
}

impl Router for ShortestPaths {
    fn route(&self, from: NodeId, to: NodeId) -> Option<Route> {
        self.path(from, to)
    }
}

// ── Relaxation kernels ────────────────────────────────────────────────────────

/// Relax every pair through intermediate `k`: `(k, n, dist, next)`.
pub(crate) type RelaxKernel = fn(usize, usize, &mut [f64], &mut [NodeId]);

#[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
pub(crate) fn relax_through_seq(k: usize, n: usize, dist: &mut [f64], next: &mut [NodeId]) {
    for i in 0..n {
        let d_ik = dist[i * n + k];
        if d_ik == f64::INFINITY {
            continue;
        }
        let hop_ik = next[i * n + k];
        for j in 0..n {
            let through_k = d_ik + dist[k * n + j];
            if through_k < dist[i * n + j] {
                dist[i * n + j] = through_k;
                next[i * n + j] = hop_ik;
            }
        }
    }
}

#[cfg(feature = "parallel")]
pub(crate) fn relax_through_par(k: usize, n: usize, dist: &mut [f64], next: &mut [NodeId]) {
    use rayon::prelude::*;

    if n == 0 {
        return;
    }
    // Row k is invariant during round k; copy it so rows can be borrowed
    // mutably in parallel.
    let row_k: Vec<f64> = dist[k * n..(k + 1) * n].to_vec();

    dist.par_chunks_mut(n)
        .zip(next.par_chunks_mut(n))
        .for_each(|(d_row, n_row)| {
            let d_ik = d_row[k];
            if d_ik == f64::INFINITY {
                return;
            }
            let hop_ik = n_row[k];
            for j in 0..n {
                let through_k = d_ik + row_k[j];
                if through_k < d_row[j] {
                    d_row[j] = through_k;
                    n_row[j] = hop_ik;
                }
            }
        });
}
