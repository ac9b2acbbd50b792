// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Aggregated migration metrics across every traffic source
//!
//! One full recompute per change: routes are solved for every source over a
//! single shared index, averaged with one vote per route, and compared
//! against the session baseline. The result is always defined; a topology
//! with no resolvable route falls back to fixed placeholder figures keyed by
//! the display mode.

use crate::graph::TopologyGraph;
use crate::solver::RouteIndex;
use crate::timing::derive_route_timings;
use crate::types::{Baseline, Category, MetricsSnapshot, RoutePath, ViewMode};
use std::collections::HashSet;
use tracing::debug;

/// Node IDs that originate traffic
///
/// Nodes flagged as traffic starts are authoritative; only when no node in
/// the graph carries the flag does the category fallback (every `users`
/// node) apply. Order follows the store.
#[must_use]
pub fn resolve_sources(graph: &TopologyGraph) -> Vec<&str> {
    let flagged: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|n| n.is_traffic_start)
        .map(|n| n.id.as_str())
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }
    graph
        .nodes()
        .iter()
        .filter(|n| n.category == Category::Users)
        .map(|n| n.id.as_str())
        .collect()
}

/// Node IDs that terminate traffic
///
/// Nodes flagged as traffic ends are authoritative; the fallback admits the
/// storage-like categories (`database`, `server`, `harddrive`).
#[must_use]
pub fn resolve_targets(graph: &TopologyGraph) -> HashSet<&str> {
    let flagged: HashSet<&str> = graph
        .nodes()
        .iter()
        .filter(|n| n.is_traffic_end)
        .map(|n| n.id.as_str())
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }
    graph
        .nodes()
        .iter()
        .filter(|n| {
            matches!(
                n.category,
                Category::Database | Category::Server | Category::HardDrive
            )
        })
        .map(|n| n.id.as_str())
        .collect()
}

/// Fallback (latency ms, hops) figures when no route resolves
fn placeholder(mode: ViewMode) -> (f64, f64) {
    match mode {
        ViewMode::Legacy => (240.0, 4.0),
        ViewMode::Future => (12.0, 2.0),
    }
}

/// Rounded percentage saved against the baseline latency, floored at -99
#[must_use]
pub fn latency_delta_percent(baseline: &Baseline, average_latency_ms: f64) -> i64 {
    if baseline.latency_ms <= 0.0 {
        return 0;
    }
    let raw = ((baseline.latency_ms - average_latency_ms) / baseline.latency_ms * 100.0).round();
    raw.clamp(-99.0, 100.0) as i64
}

/// Baseline hops over average hops, rounded to one decimal
#[must_use]
pub fn hops_delta_factor(baseline: &Baseline, average_hops: f64) -> f64 {
    (baseline.hops / average_hops.max(1.0) * 10.0).round() / 10.0
}

/// Compute the full metrics snapshot for the current graph state
///
/// A hovered node that exists and is not already a source contributes an ad
/// hoc preview route that votes in the averages like any committed route.
/// Sources that cannot reach any destination are silently discarded.
#[must_use]
pub fn compute_metrics(
    graph: &TopologyGraph,
    mode: ViewMode,
    hovered: Option<&str>,
    baseline: &Baseline,
    speed: f64,
) -> MetricsSnapshot {
    let index = RouteIndex::build(graph);
    let sources = resolve_sources(graph);
    let targets = resolve_targets(graph);

    let mut routes: Vec<(RoutePath, bool)> = Vec::new();
    for source in &sources {
        match index.route(source, &targets) {
            Some(route) => routes.push((route, false)),
            None => debug!(source, "traffic source cannot reach any destination"),
        }
    }
    if let Some(hover) = hovered {
        if graph.get_node(hover).is_some() && !sources.contains(&hover) {
            if let Some(route) = index.route(hover, &targets) {
                routes.push((route, true));
            }
        }
    }

    if routes.is_empty() {
        let (latency, hops) = placeholder(mode);
        debug!(mode = mode.code(), "no routes resolved, using placeholders");
        return MetricsSnapshot {
            average_latency_ms: latency,
            average_hops: hops,
            latency_delta_percent: latency_delta_percent(baseline, latency),
            hops_delta_factor: hops_delta_factor(baseline, hops),
            ..MetricsSnapshot::default()
        };
    }

    let mut snapshot = MetricsSnapshot::default();
    let mut total_latency = 0.0;
    let mut total_hops = 0_usize;
    for (route, preview) in &routes {
        total_latency += route.total_latency_ms;
        total_hops += route.hop_count;
        for node_id in &route.node_ids {
            snapshot.active_node_ids.insert(node_id.clone());
            if *preview {
                snapshot.preview_node_ids.insert(node_id.clone());
            }
        }
        for edge_id in &route.edge_ids {
            snapshot.active_edge_ids.insert(edge_id.clone());
            if *preview {
                snapshot.preview_edge_ids.insert(edge_id.clone());
            }
        }
        snapshot
            .timings
            .extend(derive_route_timings(route, graph, speed, *preview));
    }

    let count = routes.len() as f64;
    snapshot.average_latency_ms = total_latency / count;
    snapshot.average_hops = total_hops as f64 / count;
    snapshot.latency_delta_percent = latency_delta_percent(baseline, snapshot.average_latency_ms);
    snapshot.hops_delta_factor = hops_delta_factor(baseline, snapshot.average_hops);

    debug!(
        routes = routes.len(),
        avg_latency_ms = snapshot.average_latency_ms,
        avg_hops = snapshot.average_hops,
        "metrics recomputed"
    );

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    fn flagged_node(id: &str, category: Category, start: bool, end: bool) -> Node {
        let mut node = Node::new(id, id.to_uppercase(), category);
        node.is_traffic_start = start;
        node.is_traffic_end = end;
        node
    }

    fn weighted_edge(id: &str, source: &str, target: &str, weight: f64) -> Edge {
        let mut edge = Edge::new(id, source, target);
        edge.weight_ms = weight;
        edge
    }

    #[test]
    fn test_two_sources_average_latency() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("s1", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("s2", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s1", "t", 10.0)).unwrap();
        graph.add_edge(weighted_edge("e2", "s2", "t", 30.0)).unwrap();

        let snapshot =
            compute_metrics(&graph, ViewMode::Legacy, None, &Baseline::default(), 1.0);

        assert_eq!(snapshot.average_latency_ms, 20.0);
        assert_eq!(snapshot.average_hops, 1.0);
        assert_eq!(snapshot.timings.len(), 2);
    }

    #[test]
    fn test_empty_graph_uses_mode_placeholders() {
        let graph = TopologyGraph::new();
        let baseline = Baseline::default();

        let legacy = compute_metrics(&graph, ViewMode::Legacy, None, &baseline, 1.0);
        assert_eq!(legacy.average_latency_ms, 240.0);
        assert_eq!(legacy.average_hops, 4.0);
        assert_eq!(legacy.latency_delta_percent, 0);
        assert_eq!(legacy.hops_delta_factor, 1.0);
        assert!(legacy.active_node_ids.is_empty());
        assert!(legacy.timings.is_empty());

        let future = compute_metrics(&graph, ViewMode::Future, None, &baseline, 1.0);
        assert_eq!(future.average_latency_ms, 12.0);
        assert_eq!(future.average_hops, 2.0);
        assert_eq!(future.latency_delta_percent, 95);
        assert_eq!(future.hops_delta_factor, 2.0);
    }

    #[test]
    fn test_unreachable_source_is_discarded() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("s1", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("island", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s1", "t", 40.0)).unwrap();

        let snapshot =
            compute_metrics(&graph, ViewMode::Legacy, None, &Baseline::default(), 1.0);

        // Only the routable source votes
        assert_eq!(snapshot.average_latency_ms, 40.0);
        assert!(!snapshot.active_node_ids.contains("island"));
    }

    #[test]
    fn test_hover_adds_preview_route_without_touching_sources() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("s1", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("mid", Category::Layers, false, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s1", "mid", 10.0)).unwrap();
        graph.add_edge(weighted_edge("e2", "mid", "t", 20.0)).unwrap();

        let baseline = Baseline::default();
        let plain = compute_metrics(&graph, ViewMode::Legacy, None, &baseline, 1.0);
        let hovered = compute_metrics(&graph, ViewMode::Legacy, Some("mid"), &baseline, 1.0);

        // Committed route 30 ms plus preview route 20 ms, one vote each
        assert_eq!(plain.average_latency_ms, 30.0);
        assert_eq!(hovered.average_latency_ms, 25.0);
        assert_eq!(hovered.preview_node_ids.len(), 2);
        assert!(hovered.preview_edge_ids.contains("e2"));
        assert!(plain.preview_edge_ids.is_empty());
        // The shared edge carries one tuple per route
        let shared: Vec<_> = hovered
            .timings
            .iter()
            .filter(|t| t.edge_id == "e2")
            .collect();
        assert_eq!(shared.len(), 2);
        assert!(shared.iter().any(|t| t.preview));
        assert!(shared.iter().any(|t| !t.preview));
    }

    #[test]
    fn test_hover_on_source_or_ghost_changes_nothing() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("s1", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s1", "t", 10.0)).unwrap();

        let baseline = Baseline::default();
        let plain = compute_metrics(&graph, ViewMode::Legacy, None, &baseline, 1.0);
        let on_source = compute_metrics(&graph, ViewMode::Legacy, Some("s1"), &baseline, 1.0);
        let on_ghost = compute_metrics(&graph, ViewMode::Legacy, Some("ghost"), &baseline, 1.0);

        assert_eq!(plain, on_source);
        assert_eq!(plain, on_ghost);
    }

    #[test]
    fn test_flags_override_category_fallback() {
        let mut graph = TopologyGraph::new();
        // A users node without the flag loses to the flagged server
        graph
            .add_node(flagged_node("u", Category::Users, false, false))
            .unwrap();
        graph
            .add_node(flagged_node("s", Category::Server, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s", "t", 5.0)).unwrap();
        graph.add_edge(weighted_edge("e2", "u", "t", 50.0)).unwrap();

        assert_eq!(resolve_sources(&graph), vec!["s"]);

        let snapshot =
            compute_metrics(&graph, ViewMode::Legacy, None, &Baseline::default(), 1.0);
        assert_eq!(snapshot.average_latency_ms, 5.0);
    }

    #[test]
    fn test_category_fallback_when_no_flags() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("u", Category::Users, false, false))
            .unwrap();
        graph
            .add_node(flagged_node("srv", Category::Server, false, false))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "u", "srv", 25.0)).unwrap();

        assert_eq!(resolve_sources(&graph), vec!["u"]);
        assert!(resolve_targets(&graph).contains("srv"));

        let snapshot =
            compute_metrics(&graph, ViewMode::Legacy, None, &Baseline::default(), 1.0);
        assert_eq!(snapshot.average_latency_ms, 25.0);
    }

    #[test]
    fn test_delta_formulas() {
        let baseline = Baseline::default();

        assert_eq!(latency_delta_percent(&baseline, 12.0), 95);
        assert_eq!(latency_delta_percent(&baseline, 240.0), 0);
        // Regressions clamp instead of overflowing the badge
        assert_eq!(latency_delta_percent(&baseline, 100_000.0), -99);

        assert_eq!(hops_delta_factor(&baseline, 2.0), 2.0);
        assert_eq!(hops_delta_factor(&baseline, 3.0), 1.3);
        // Sub-hop averages divide by one, not by zero
        assert_eq!(hops_delta_factor(&baseline, 0.0), 4.0);
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let mut graph = TopologyGraph::new();
        graph
            .add_node(flagged_node("s1", Category::Users, true, false))
            .unwrap();
        graph
            .add_node(flagged_node("t", Category::Database, false, true))
            .unwrap();
        graph.add_edge(weighted_edge("e1", "s1", "t", 10.0)).unwrap();

        let baseline = Baseline::default();
        let first = compute_metrics(&graph, ViewMode::Legacy, None, &baseline, 1.0);
        let second = compute_metrics(&graph, ViewMode::Legacy, None, &baseline, 1.0);
        assert_eq!(first, second);
    }
}
