use crate::types::{DisplayEdge, DisplayNode};
use atlas_model::LinkKind;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::visit::IntoEdgeReferences;
use petgraph::Direction;
use std::collections::HashMap;

/// Displayed graph for one exploration session.
///
/// Backed by a stable directed graph so collapse can remove whole subtrees
/// without invalidating the remaining indices, with an id index for fast
/// lookup. Node and edge insertion is idempotent per id / identity key.
#[derive(Debug, Clone, Default)]
pub struct DisplayGraph {
    graph: StableDiGraph<DisplayNode, LinkKind>,
    /// Node id -> index mapping for fast lookup.
    index: HashMap<String, NodeIndex>,
}

impl DisplayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same id is already displayed.
    pub fn add_node(&mut self, node: DisplayNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Add an edge between displayed nodes unless one with the same
    /// `(from, to, kind)` key exists. Returns whether an edge was added;
    /// missing endpoints are skipped silently.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: LinkKind) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        let duplicate = self
            .graph
            .edges(a)
            .any(|e| e.target() == b && *e.weight() == kind);
        if duplicate {
            return false;
        }
        self.graph.add_edge(a, b, kind);
        true
    }

    /// Remove a displayed node together with its incident edges.
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.index.remove(id) {
            Some(idx) => {
                self.graph.remove_node(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&DisplayNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Displayed nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DisplayNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// The first displayed node, the designated root of the radial layout.
    pub fn first(&self) -> Option<&DisplayNode> {
        self.nodes().next()
    }

    /// Displayed edges as owned `(from, to, kind)` records.
    pub fn edges(&self) -> impl Iterator<Item = DisplayEdge> + '_ {
        self.graph.edge_references().map(|e| DisplayEdge {
            from: self.graph[e.source()].id.clone(),
            to: self.graph[e.target()].id.clone(),
            kind: *e.weight(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the node currently has any outgoing displayed edge.
    pub fn has_outgoing(&self, id: &str) -> bool {
        self.index
            .get(id)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .unwrap_or(false)
    }

    /// Ids of the direct children (targets of outgoing displayed edges), in
    /// edge insertion order. petgraph walks adjacency newest-first, so the
    /// collected list is reversed.
    pub fn children(&self, id: &str) -> Vec<String> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].id.clone())
            .collect();
        children.reverse();
        children
    }
}
