// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Edgeshift library - Migration bench for collapsing multi-hop topologies
//! onto the edge
//!
//! This crate provides the core functionality for modelling an infrastructure
//! topology as a weighted directed graph, routing traffic across it, and
//! quantifying what a consolidated single-hop edge architecture would save.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod editor;
pub mod graph;
pub mod metrics;
pub mod solver;
pub mod timing;
pub mod transform;

/// Core data types for the topology document and everything derived from it
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};
    use std::collections::BTreeSet;

    /// Traversal cost substituted for absent or malformed edge weights.
    pub const DEFAULT_EDGE_WEIGHT_MS: f64 = 15.0;

    // =========================================================================
    // Node Categories
    // =========================================================================

    /// Node categories, named after the renderer's icon set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Category {
        /// End users, the usual traffic entry
        Users,
        /// Firewall or security appliance
        Shield,
        /// Load balancer / fan-out tier
        Layers,
        /// Application server
        Server,
        /// Database
        Database,
        /// Cloud or edge service
        Cloud,
        /// Storage appliance
        HardDrive,
    }

    impl Category {
        /// Get the short code for this category
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Users => "users",
                Self::Shield => "shield",
                Self::Layers => "layers",
                Self::Server => "server",
                Self::Database => "database",
                Self::Cloud => "cloud",
                Self::HardDrive => "harddrive",
            }
        }

        /// Parse a category from its short code
        #[must_use]
        pub fn from_code(code: &str) -> Option<Self> {
            match code {
                "users" => Some(Self::Users),
                "shield" => Some(Self::Shield),
                "layers" => Some(Self::Layers),
                "server" => Some(Self::Server),
                "database" => Some(Self::Database),
                "cloud" => Some(Self::Cloud),
                "harddrive" => Some(Self::HardDrive),
                _ => None,
            }
        }
    }

    // =========================================================================
    // Node
    // =========================================================================

    /// Position in 2D canvas space
    #[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }

    /// Infrastructure node on the canvas
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Node {
        /// Always "Node"
        pub kind: String,
        /// Unique identifier
        pub id: String,
        /// Display label
        pub label: String,
        /// Category tag, doubles as the renderer's icon choice
        pub category: Category,
        /// Canvas position
        #[serde(default)]
        pub position: Position,
        /// Marks a traffic entry point
        #[serde(default)]
        pub is_traffic_start: bool,
        /// Marks a traffic destination
        #[serde(default)]
        pub is_traffic_end: bool,
        /// Marks the consolidated hub of the future topology
        #[serde(default)]
        pub is_primary: bool,
    }

    impl Node {
        /// Build a node with all role flags unset
        #[must_use]
        pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
            Self {
                kind: "Node".into(),
                id: id.into(),
                label: label.into(),
                category,
                position: Position::default(),
                is_traffic_start: false,
                is_traffic_end: false,
                is_primary: false,
            }
        }

        /// Generate a deterministic ID from category and label
        #[must_use]
        pub fn generate_id(category: Category, label: &str) -> String {
            let mut hasher = Sha256::new();
            hasher.update(category.code().as_bytes());
            hasher.update(label.as_bytes());
            let hash = hex::encode(hasher.finalize());
            format!("node:{}", &hash[..8])
        }
    }

    // =========================================================================
    // Edge
    // =========================================================================

    fn default_edge_weight() -> f64 {
        DEFAULT_EDGE_WEIGHT_MS
    }

    /// Directed connection between two nodes
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Edge {
        /// Always "Edge"
        pub kind: String,
        /// Content-hash ID: edge:<hash of (source, target, label)>
        pub id: String,
        /// Source node ID
        pub source: String,
        /// Target node ID
        pub target: String,
        /// Traversal cost in milliseconds
        #[serde(default = "default_edge_weight")]
        pub weight_ms: f64,
        /// Human-readable label
        pub label: Option<String>,
    }

    impl Edge {
        /// Build an edge with the default weight and no label
        #[must_use]
        pub fn new(
            id: impl Into<String>,
            source: impl Into<String>,
            target: impl Into<String>,
        ) -> Self {
            Self {
                kind: "Edge".into(),
                id: id.into(),
                source: source.into(),
                target: target.into(),
                weight_ms: DEFAULT_EDGE_WEIGHT_MS,
                label: None,
            }
        }

        /// Generate a deterministic ID for an edge
        #[must_use]
        pub fn generate_id(source: &str, target: &str, label: Option<&str>) -> String {
            let mut hasher = Sha256::new();
            hasher.update(source.as_bytes());
            hasher.update(target.as_bytes());
            if let Some(l) = label {
                hasher.update(l.as_bytes());
            }
            let hash = hex::encode(hasher.finalize());
            format!("edge:{}", &hash[..8])
        }

        /// Clamp a raw weight to the valid range
        ///
        /// Non-finite and non-positive weights fall back to
        /// [`DEFAULT_EDGE_WEIGHT_MS`]; the solver can assume every stored
        /// weight is strictly positive.
        #[must_use]
        pub fn normalize_weight(weight: f64) -> f64 {
            if weight.is_finite() && weight > 0.0 {
                weight
            } else {
                DEFAULT_EDGE_WEIGHT_MS
            }
        }
    }

    // =========================================================================
    // Display Mode
    // =========================================================================

    /// Which topology the canvas is showing
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ViewMode {
        /// The as-is multi-hop topology
        #[default]
        Legacy,
        /// The consolidated single-hop topology
        Future,
    }

    impl ViewMode {
        /// Get the short code for this mode
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Legacy => "legacy",
                Self::Future => "future",
            }
        }

        /// Parse a mode from its short code
        #[must_use]
        pub fn from_code(code: &str) -> Option<Self> {
            match code {
                "legacy" => Some(Self::Legacy),
                "future" => Some(Self::Future),
                _ => None,
            }
        }
    }

    // =========================================================================
    // Baseline
    // =========================================================================

    /// Pre-migration reference figures that improvement deltas compare against
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Baseline {
        /// Reference end-to-end latency in milliseconds
        pub latency_ms: f64,
        /// Reference hop count
        pub hops: f64,
    }

    impl Default for Baseline {
        fn default() -> Self {
            Self {
                latency_ms: 240.0,
                hops: 4.0,
            }
        }
    }

    // =========================================================================
    // Topology Store
    // =========================================================================

    /// The serializable graph snapshot
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct TopologyStore {
        /// All nodes
        #[serde(default)]
        pub nodes: Vec<Node>,
        /// All edges
        #[serde(default)]
        pub edges: Vec<Edge>,
    }

    // =========================================================================
    // Derived Results
    // =========================================================================

    /// A resolved shortest route from one traffic source
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RoutePath {
        /// Sum of edge weights along the route
        pub total_latency_ms: f64,
        /// Number of edges traversed
        pub hop_count: usize,
        /// Node IDs from source to destination, inclusive
        pub node_ids: Vec<String>,
        /// Edge IDs in traversal order
        pub edge_ids: Vec<String>,
    }

    /// Animation timing for one edge on one active route
    ///
    /// An edge shared by several concurrent routes carries one tuple per
    /// route, so the renderer can phase each route's marker independently.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EdgeTiming {
        /// Edge this tuple animates
        pub edge_id: String,
        /// Milliseconds before the marker enters this edge
        pub delay_ms: f64,
        /// Milliseconds the marker spends on this edge
        pub duration_ms: f64,
        /// Full loop period of the owning route
        pub period_ms: f64,
        /// True when the tuple belongs to the hover-preview route
        #[serde(default)]
        pub preview: bool,
    }

    /// Aggregated metrics published after every recompute
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct MetricsSnapshot {
        /// Mean route latency in milliseconds
        pub average_latency_ms: f64,
        /// Mean route hop count
        pub average_hops: f64,
        /// Rounded percentage saved against the baseline latency, floored at -99
        pub latency_delta_percent: i64,
        /// Baseline hops over average hops, one decimal
        pub hops_delta_factor: f64,
        /// Nodes lying on any active route
        pub active_node_ids: BTreeSet<String>,
        /// Edges lying on any active route
        pub active_edge_ids: BTreeSet<String>,
        /// Nodes on the hover-preview route only
        pub preview_node_ids: BTreeSet<String>,
        /// Edges on the hover-preview route only
        pub preview_edge_ids: BTreeSet<String>,
        /// Per-edge animation timing, one entry per (route, edge) pair
        pub timings: Vec<EdgeTiming>,
    }

    // =========================================================================
    // Topology Document
    // =========================================================================

    /// Summary block persisted alongside the topology
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DocMetadata {
        /// Average route latency at last save
        pub latency_ms: f64,
        /// Average route hop count at last save
        pub hops: f64,
        /// When the document was last written
        pub updated_at: DateTime<Utc>,
        /// Display mode at last save
        pub mode: ViewMode,
    }

    /// The JSON document owned by the persistence layer
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TopologyDoc {
        /// All nodes
        #[serde(default)]
        pub nodes: Vec<Node>,
        /// All edges
        #[serde(default)]
        pub edges: Vec<Edge>,
        /// Summary metadata
        pub metadata: DocMetadata,
        /// Pre-transform snapshot restored when switching back to legacy
        pub legacy_checkpoint: Option<TopologyStore>,
    }

    // =========================================================================
    // Update Payloads
    // =========================================================================

    /// Partial update for a node; unset fields are left untouched
    #[derive(Debug, Clone, Default)]
    pub struct NodeUpdate {
        /// New display label
        pub label: Option<String>,
        /// New category
        pub category: Option<Category>,
        /// New canvas position
        pub position: Option<Position>,
        /// New traffic-start flag
        pub is_traffic_start: Option<bool>,
        /// New traffic-end flag
        pub is_traffic_end: Option<bool>,
        /// New primary-hub flag
        pub is_primary: Option<bool>,
    }

    /// Partial update for an edge; unset fields are left untouched
    #[derive(Debug, Clone, Default)]
    pub struct EdgeUpdate {
        /// New traversal cost, normalized on apply
        pub weight_ms: Option<f64>,
        /// New label
        pub label: Option<String>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
