// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Mutable topology graph with petgraph backing and referential integrity

use crate::types::{Edge, EdgeUpdate, MetricsSnapshot, Node, NodeUpdate, TopologyStore};
use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Structural violations rejected by the graph
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A node with this ID is already present
    #[error("node already exists: {0}")]
    DuplicateNode(String),
    /// An edge with this ID is already present
    #[error("edge already exists: {0}")]
    DuplicateEdge(String),
    /// No node with this ID
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// No edge with this ID
    #[error("edge not found: {0}")]
    EdgeNotFound(String),
    /// An edge referenced a node that does not exist
    #[error("edge endpoint not found: {0}")]
    MissingEndpoint(String),
}

/// The topology graph with petgraph backing for adjacency
///
/// The serializable store stays the source of truth; the petgraph mirror
/// carries store ordinals as payloads and is rebuilt after every removal.
/// No edge may ever reference a node that is not in the store: `add_edge`
/// validates endpoints and `remove_node` cascades onto incident edges.
pub struct TopologyGraph {
    /// The underlying directed graph; payloads are store ordinals
    mirror: DiGraph<usize, usize>,
    /// Map from node ID to mirror index
    node_indices: HashMap<String, NodeIndex>,
    /// The serializable store
    store: TopologyStore,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyGraph {
    /// Create a new empty topology graph
    #[must_use]
    pub fn new() -> Self {
        Self {
            mirror: DiGraph::new(),
            node_indices: HashMap::new(),
            store: TopologyStore::default(),
        }
    }

    /// Build a graph from a deserialized store
    ///
    /// Documents arrive from outside the process, so this is the sanitizing
    /// boundary: edge weights are normalized and edges referencing unknown
    /// nodes are dropped with a warning rather than trusted.
    #[must_use]
    pub fn from_store(store: TopologyStore) -> Self {
        let mut ids = std::collections::HashSet::new();
        for node in &store.nodes {
            ids.insert(node.id.clone());
        }

        let mut sanitized = TopologyStore {
            nodes: store.nodes,
            edges: Vec::with_capacity(store.edges.len()),
        };
        for mut edge in store.edges {
            if !ids.contains(&edge.source) || !ids.contains(&edge.target) {
                warn!(edge = %edge.id, "dropping edge with missing endpoint");
                continue;
            }
            edge.weight_ms = Edge::normalize_weight(edge.weight_ms);
            sanitized.edges.push(edge);
        }

        let mut graph = Self {
            mirror: DiGraph::new(),
            node_indices: HashMap::new(),
            store: sanitized,
        };
        graph.rebuild_mirror();
        graph
    }

    /// Rebuild the petgraph mirror from the store
    fn rebuild_mirror(&mut self) {
        self.mirror.clear();
        self.node_indices.clear();

        for (ord, node) in self.store.nodes.iter().enumerate() {
            let idx = self.mirror.add_node(ord);
            self.node_indices.insert(node.id.clone(), idx);
        }

        for (ord, edge) in self.store.edges.iter().enumerate() {
            if let (Some(&source_idx), Some(&target_idx)) = (
                self.node_indices.get(&edge.source),
                self.node_indices.get(&edge.target),
            ) {
                self.mirror.add_edge(source_idx, target_idx, ord);
            }
        }
    }

    /// Add a node to the graph
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateNode`] if the ID is taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node_indices.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let idx = self.mirror.add_node(self.store.nodes.len());
        self.node_indices.insert(node.id.clone(), idx);
        self.store.nodes.push(node);
        Ok(())
    }

    /// Remove a node and every edge touching it
    ///
    /// Returns the number of cascaded edge deletions.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeNotFound`] if the ID is unknown.
    pub fn remove_node(&mut self, id: &str) -> Result<usize, GraphError> {
        if !self.node_indices.contains_key(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }
        let before = self.store.edges.len();
        self.store.nodes.retain(|n| n.id != id);
        self.store.edges.retain(|e| e.source != id && e.target != id);
        let cascaded = before - self.store.edges.len();
        self.rebuild_mirror();
        Ok(cascaded)
    }

    /// Add an edge to the graph
    ///
    /// The weight is normalized on the way in.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingEndpoint`] when either endpoint is
    /// unknown, or [`GraphError::DuplicateEdge`] when the ID is taken.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<(), GraphError> {
        let source_idx = *self
            .node_indices
            .get(&edge.source)
            .ok_or_else(|| GraphError::MissingEndpoint(edge.source.clone()))?;
        let target_idx = *self
            .node_indices
            .get(&edge.target)
            .ok_or_else(|| GraphError::MissingEndpoint(edge.target.clone()))?;

        if self.store.edges.iter().any(|e| e.id == edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }

        edge.weight_ms = Edge::normalize_weight(edge.weight_ms);
        self.mirror
            .add_edge(source_idx, target_idx, self.store.edges.len());
        self.store.edges.push(edge);
        Ok(())
    }

    /// Remove an edge by ID
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if the ID is unknown.
    pub fn remove_edge(&mut self, id: &str) -> Result<(), GraphError> {
        let before = self.store.edges.len();
        self.store.edges.retain(|e| e.id != id);
        if self.store.edges.len() == before {
            return Err(GraphError::EdgeNotFound(id.to_string()));
        }
        self.rebuild_mirror();
        Ok(())
    }

    /// Apply a partial update to a node
    ///
    /// # Errors
    /// Returns [`GraphError::NodeNotFound`] if the ID is unknown.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> Result<(), GraphError> {
        let node = self
            .store
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        if let Some(label) = update.label {
            node.label = label;
        }
        if let Some(category) = update.category {
            node.category = category;
        }
        if let Some(position) = update.position {
            node.position = position;
        }
        if let Some(flag) = update.is_traffic_start {
            node.is_traffic_start = flag;
        }
        if let Some(flag) = update.is_traffic_end {
            node.is_traffic_end = flag;
        }
        if let Some(flag) = update.is_primary {
            node.is_primary = flag;
        }
        Ok(())
    }

    /// Apply a partial update to an edge
    ///
    /// A malformed weight is recovered via the default, never rejected.
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if the ID is unknown.
    pub fn update_edge(&mut self, id: &str, update: EdgeUpdate) -> Result<(), GraphError> {
        let edge = self
            .store
            .edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;
        if let Some(weight) = update.weight_ms {
            edge.weight_ms = Edge::normalize_weight(weight);
        }
        if let Some(label) = update.label {
            edge.label = if label.is_empty() { None } else { Some(label) };
        }
        Ok(())
    }

    /// Get a node by ID
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.store.nodes.iter().find(|n| n.id == id)
    }

    /// Get an edge by ID
    #[must_use]
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.store.edges.iter().find(|e| e.id == id)
    }

    /// Get all nodes in insertion order
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.store.nodes
    }

    /// Get all edges in insertion order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.store.edges
    }

    /// Get the outgoing edges of a node, in insertion order
    ///
    /// Pulled through the mirror; an unknown ID yields an empty list.
    #[must_use]
    pub fn out_edges(&self, id: &str) -> Vec<&Edge> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut ords: Vec<usize> = self.mirror.edges(idx).map(|e| *e.weight()).collect();
        // petgraph iterates newest-first; ordinal order restores insertion order
        ords.sort_unstable();
        ords.iter().map(|&ord| &self.store.edges[ord]).collect()
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.store.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.store.edges.len()
    }

    /// Check if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.nodes.is_empty()
    }

    /// Borrow the serializable store
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Consume the graph, yielding the store
    #[must_use]
    pub fn into_store(self) -> TopologyStore {
        self.store
    }

    /// Export to DOT format for Graphviz
    ///
    /// With a snapshot, nodes and edges on active routes are colored and the
    /// hover-preview route is drawn dashed.
    #[must_use]
    pub fn to_dot(&self, snapshot: Option<&MetricsSnapshot>) -> String {
        let mut dot = String::from("digraph topology {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=rounded];\n\n");

        for node in &self.store.nodes {
            let label = format!("{}\\n{}", node.label, node.category.code());
            let mut attrs = format!("label=\"{label}\"");
            if let Some(snap) = snapshot {
                if snap.preview_node_ids.contains(&node.id) {
                    attrs.push_str(", color=\"steelblue\"");
                } else if snap.active_node_ids.contains(&node.id) {
                    attrs.push_str(", color=\"orangered\"");
                }
            }
            dot.push_str(&format!("  \"{}\" [{attrs}];\n", node.id));
        }

        dot.push('\n');

        for edge in &self.store.edges {
            let label = match &edge.label {
                Some(l) => format!("{l} ({} ms)", edge.weight_ms),
                None => format!("{} ms", edge.weight_ms),
            };
            let mut attrs = format!("label=\"{label}\"");
            if let Some(snap) = snapshot {
                if snap.preview_edge_ids.contains(&edge.id) {
                    attrs.push_str(", color=\"steelblue\", style=dashed");
                } else if snap.active_edge_ids.contains(&edge.id) {
                    attrs.push_str(", color=\"orangered\", penwidth=2");
                }
            }
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [{attrs}];\n",
                edge.source, edge.target
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Export the store to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.store).context("Failed to serialize topology to JSON")
    }
}
