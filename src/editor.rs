// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Editing session that owns the graph and publishes metrics

use crate::graph::{GraphError, TopologyGraph};
use crate::metrics::compute_metrics;
use crate::timing::normalize_speed;
use crate::transform;
use crate::types::{
    Baseline, DocMetadata, Edge, EdgeUpdate, MetricsSnapshot, Node, NodeUpdate, TopologyDoc,
    TopologyStore, ViewMode,
};
use chrono::Utc;

/// Owner of a live editing session
///
/// Every mutation funnels through here, so each change is followed by
/// exactly one recompute and one published snapshot. Consumers only ever
/// read the latest snapshot; there is no incremental maintenance.
pub struct EditorContext {
    graph: TopologyGraph,
    mode: ViewMode,
    hovered: Option<String>,
    speed: f64,
    baseline: Baseline,
    legacy_checkpoint: Option<TopologyStore>,
    snapshot: MetricsSnapshot,
}

impl EditorContext {
    /// Start a session over an existing store
    #[must_use]
    pub fn new(store: TopologyStore, mode: ViewMode, baseline: Baseline) -> Self {
        let mut ctx = Self {
            graph: TopologyGraph::from_store(store),
            mode,
            hovered: None,
            speed: 1.0,
            baseline,
            legacy_checkpoint: None,
            snapshot: MetricsSnapshot::default(),
        };
        ctx.recompute();
        ctx
    }

    /// Start a session over the canned demo topology
    #[must_use]
    pub fn demo(baseline: Baseline) -> Self {
        Self::new(transform::demo_legacy(), ViewMode::Legacy, baseline)
    }

    /// Rebuild a session from a persisted document
    #[must_use]
    pub fn from_doc(doc: TopologyDoc, baseline: Baseline) -> Self {
        let store = TopologyStore {
            nodes: doc.nodes,
            edges: doc.edges,
        };
        let mut ctx = Self::new(store, doc.metadata.mode, baseline);
        ctx.legacy_checkpoint = doc.legacy_checkpoint;
        ctx
    }

    /// Serialize the session back into a document
    #[must_use]
    pub fn to_doc(&self) -> TopologyDoc {
        let store = self.graph.store().clone();
        TopologyDoc {
            nodes: store.nodes,
            edges: store.edges,
            metadata: DocMetadata {
                latency_ms: self.snapshot.average_latency_ms,
                hops: self.snapshot.average_hops,
                updated_at: Utc::now(),
                mode: self.mode,
            },
            legacy_checkpoint: self.legacy_checkpoint.clone(),
        }
    }

    /// Borrow the graph
    #[must_use]
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// The current display mode
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The current simulation speed
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The session baseline
    #[must_use]
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// The latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Add a node
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        self.graph.add_node(node)?;
        self.recompute();
        Ok(())
    }

    /// Remove a node, cascading onto its edges; returns the cascade count
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn remove_node(&mut self, id: &str) -> Result<usize, GraphError> {
        let cascaded = self.graph.remove_node(id)?;
        self.recompute();
        Ok(cascaded)
    }

    /// Add an edge
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.graph.add_edge(edge)?;
        self.recompute();
        Ok(())
    }

    /// Remove an edge
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn remove_edge(&mut self, id: &str) -> Result<(), GraphError> {
        self.graph.remove_edge(id)?;
        self.recompute();
        Ok(())
    }

    /// Apply a partial node update
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> Result<(), GraphError> {
        self.graph.update_node(id, update)?;
        self.recompute();
        Ok(())
    }

    /// Apply a partial edge update
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the graph.
    pub fn update_edge(&mut self, id: &str, update: EdgeUpdate) -> Result<(), GraphError> {
        self.graph.update_edge(id, update)?;
        self.recompute();
        Ok(())
    }

    /// Point the hover preview at a node, or clear it
    ///
    /// A stale ID (hovered node deleted since) is simply ignored at compute
    /// time, so this never fails.
    pub fn set_hover(&mut self, hovered: Option<String>) {
        self.hovered = hovered;
        self.recompute();
    }

    /// Change the simulation speed; invalid values run at 1x
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = normalize_speed(speed);
        self.recompute();
    }

    /// Switch display modes, transforming the topology exactly once
    ///
    /// Switching to future checkpoints the current store first; switching
    /// back restores that checkpoint, or the demo topology when none exists.
    /// Re-asserting the current mode does nothing.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            ViewMode::Future => {
                let checkpoint = self.graph.store().clone();
                let future = transform::to_future(&self.graph);
                self.legacy_checkpoint = Some(checkpoint);
                self.graph = TopologyGraph::from_store(future);
            }
            ViewMode::Legacy => {
                let restored = self
                    .legacy_checkpoint
                    .take()
                    .unwrap_or_else(transform::demo_legacy);
                self.graph = TopologyGraph::from_store(restored);
            }
        }
        self.mode = mode;
        self.recompute();
    }

    /// Recompute and publish the snapshot
    fn recompute(&mut self) {
        self.snapshot = compute_metrics(
            &self.graph,
            self.mode,
            self.hovered.as_deref(),
            &self.baseline,
            self.speed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::HUB_ID;
    use crate::types::Category;

    fn demo_ctx() -> EditorContext {
        EditorContext::demo(Baseline::default())
    }

    #[test]
    fn test_demo_session_metrics() {
        let ctx = demo_ctx();
        let snap = ctx.snapshot();

        assert_eq!(snap.average_latency_ms, 60.0);
        assert_eq!(snap.average_hops, 4.0);
        assert_eq!(snap.latency_delta_percent, 75);
        assert_eq!(snap.timings.len(), 4);
    }

    #[test]
    fn test_mutation_republishes_snapshot() {
        let mut ctx = demo_ctx();
        let before = ctx.snapshot().average_latency_ms;

        let update = EdgeUpdate {
            weight_ms: Some(45.0),
            label: None,
        };
        ctx.update_edge("e1-2", update).unwrap();

        assert_eq!(ctx.snapshot().average_latency_ms, before + 30.0);
    }

    #[test]
    fn test_future_mode_collapses_to_two_hops() {
        let mut ctx = demo_ctx();
        ctx.set_mode(ViewMode::Future);

        let snap = ctx.snapshot();
        assert_eq!(ctx.mode(), ViewMode::Future);
        assert_eq!(snap.average_latency_ms, 12.0);
        assert_eq!(snap.average_hops, 2.0);
        assert_eq!(snap.latency_delta_percent, 95);
        assert_eq!(snap.hops_delta_factor, 2.0);
        assert!(ctx.graph().get_node(HUB_ID).is_some());
    }

    #[test]
    fn test_legacy_restore_preserves_edits() {
        let mut ctx = demo_ctx();
        let mut cache = Node::new("cache-1", "Cache", Category::HardDrive);
        cache.is_traffic_end = false;
        ctx.add_node(cache).unwrap();

        ctx.set_mode(ViewMode::Future);
        assert!(ctx.graph().get_node("cache-1").is_none());

        ctx.set_mode(ViewMode::Legacy);
        assert!(ctx.graph().get_node("cache-1").is_some());
        assert_eq!(ctx.graph().edge_count(), 4);
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut ctx = demo_ctx();
        let before = ctx.graph().store().clone();

        ctx.set_mode(ViewMode::Legacy);

        assert_eq!(ctx.graph().node_count(), before.nodes.len());
        assert!(ctx.graph().get_node(HUB_ID).is_none());
    }

    #[test]
    fn test_doc_round_trip() {
        let mut ctx = demo_ctx();
        ctx.set_mode(ViewMode::Future);

        let doc = ctx.to_doc();
        assert_eq!(doc.metadata.mode, ViewMode::Future);
        assert_eq!(doc.metadata.latency_ms, 12.0);
        assert!(doc.legacy_checkpoint.is_some());

        let mut restored = EditorContext::from_doc(doc, Baseline::default());
        assert_eq!(restored.snapshot().average_latency_ms, 12.0);

        // The checkpoint survives the round trip
        restored.set_mode(ViewMode::Legacy);
        assert_eq!(restored.snapshot().average_latency_ms, 60.0);
        assert!(restored.graph().get_node("fw-1").is_some());
    }

    #[test]
    fn test_stale_hover_is_ignored() {
        let mut ctx = demo_ctx();
        ctx.set_hover(Some("lb-1".into()));
        assert!(!ctx.snapshot().preview_node_ids.is_empty());

        ctx.remove_node("lb-1").unwrap();
        assert!(ctx.snapshot().preview_node_ids.is_empty());
    }

    #[test]
    fn test_speed_signal_rescales_timings() {
        let mut ctx = demo_ctx();
        let base = ctx.snapshot().timings[0].duration_ms;

        ctx.set_speed(2.0);
        assert_eq!(ctx.snapshot().timings[0].duration_ms, base / 2.0);

        ctx.set_speed(-1.0);
        assert_eq!(ctx.speed(), 1.0);
        assert_eq!(ctx.snapshot().timings[0].duration_ms, base);
    }
}
