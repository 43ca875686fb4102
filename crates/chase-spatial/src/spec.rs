//! Declarative graph configuration.
//!
//! A `GraphSpec` is how a scenario describes its graph before validation.
//! Node ids are arbitrary external integers (the reference city numbers its
//! intersections from 1); [`GraphSpec::build`] maps them to dense
//! [`NodeId`]s and keeps each external id as the node's label.
//!
//! With the `serde` feature a `GraphSpec` deserializes from any serde format,
//! e.g. TOML:
//!
//! ```toml
//! directed = false
//! penalty_scale = 100.0
//!
//! [[nodes]]
//! id = 1
//! x = 10.85
//! y = 5.8
//!
//! [[edges]]
//! from = 1
//! to = 2
//! penalty = 5.0
//! ```

use std::collections::HashMap;

use chase_core::{NodeId, Point2};

use crate::{Graph, GraphBuilder, GraphError, GraphResult, DEFAULT_PENALTY_SCALE};

/// One node of a [`GraphSpec`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    pub id: u32,
    pub x:  f64,
    pub y:  f64,
}

/// One edge of a [`GraphSpec`].  `penalty` defaults to 0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSpec {
    pub from: u32,
    pub to:   u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub penalty: f64,
}

/// Node set with positions plus edge set with optional penalties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSpec {
    /// `false` (the default) adds every edge in both directions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub directed: bool,

    #[cfg_attr(feature = "serde", serde(default = "default_penalty_scale"))]
    pub penalty_scale: f64,

    pub nodes: Vec<NodeSpec>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<EdgeSpec>,
}

#[cfg(feature = "serde")]
fn default_penalty_scale() -> f64 {
    DEFAULT_PENALTY_SCALE
}

impl Default for GraphSpec {
    fn default() -> Self {
        Self {
            directed:      false,
            penalty_scale: DEFAULT_PENALTY_SCALE,
            nodes:         Vec::new(),
            edges:         Vec::new(),
        }
    }
}

impl GraphSpec {
    /// Validate and build the graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] for a repeated node id,
    /// [`GraphError::UnknownLabel`] for an edge naming an undeclared node,
    /// plus everything [`GraphBuilder::build`] rejects.
    pub fn build(&self) -> GraphResult<Graph> {
        let mut b = GraphBuilder::with_capacity(self.nodes.len(), self.edges.len() * 2)
            .penalty_scale(self.penalty_scale);

        let mut by_label: HashMap<u32, NodeId> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let id = b.add_labeled_node(node.id, Point2::new(node.x, node.y));
            if by_label.insert(node.id, id).is_some() {
                return Err(GraphError::DuplicateNode { label: node.id });
            }
        }

        let resolve = |label: u32| {
            by_label.get(&label).copied().ok_or(GraphError::UnknownLabel { label })
        };

        for edge in &self.edges {
            let (from, to) = (resolve(edge.from)?, resolve(edge.to)?);
            if self.directed {
                b.add_directed_edge(from, to, edge.penalty);
            } else {
                b.add_road(from, to, edge.penalty);
            }
        }

        b.build()
    }
}
