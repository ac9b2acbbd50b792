// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! One-shot structural transform between the legacy and future topologies

use crate::graph::TopologyGraph;
use crate::metrics::{resolve_sources, resolve_targets};
use crate::types::{Category, Edge, Node, Position, TopologyStore};
use tracing::info;

/// ID of the synthesized consolidated hub
pub const HUB_ID: &str = "edge-hub";
/// Label of the synthesized consolidated hub
pub const HUB_LABEL: &str = "Edge Hub";
/// Weight of every synthesized future edge; one client-to-origin trip costs
/// exactly two of these
pub const FUTURE_EDGE_WEIGHT_MS: f64 = 6.0;

/// Collapse the topology onto a single consolidated hub
///
/// Clients (the traffic-start rule) and origins (the traffic-end rule)
/// survive with their flags and positions intact; every interior node and
/// all original edges are discarded. Each client is wired to the hub and the
/// hub to each origin, so any client reaches any origin in exactly two hops.
/// Runs once per mode switch, never as a maintained projection.
#[must_use]
pub fn to_future(graph: &TopologyGraph) -> TopologyStore {
    let client_ids: Vec<String> = resolve_sources(graph)
        .into_iter()
        .filter(|id| *id != HUB_ID)
        .map(String::from)
        .collect();
    let origin_ids: Vec<String> = {
        let targets = resolve_targets(graph);
        // HashSet iteration is unordered; walk the store for determinism
        graph
            .nodes()
            .iter()
            .filter(|n| n.id != HUB_ID && targets.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect()
    };

    let kept: Vec<Node> = graph
        .nodes()
        .iter()
        .filter(|n| {
            client_ids.iter().any(|c| *c == n.id) || origin_ids.iter().any(|o| *o == n.id)
        })
        .cloned()
        .collect();

    let mut hub = Node::new(HUB_ID, HUB_LABEL, Category::Cloud);
    hub.position = mean_position(&kept);
    hub.is_primary = true;

    let mut store = TopologyStore::default();
    let discarded = graph.node_count() - kept.len();
    store.nodes = kept;
    store.nodes.push(hub);

    for client in &client_ids {
        let mut edge = Edge::new(Edge::generate_id(client, HUB_ID, None), client, HUB_ID);
        edge.weight_ms = FUTURE_EDGE_WEIGHT_MS;
        store.edges.push(edge);
    }
    for origin in &origin_ids {
        let mut edge = Edge::new(Edge::generate_id(HUB_ID, origin, None), HUB_ID, origin);
        edge.weight_ms = FUTURE_EDGE_WEIGHT_MS;
        store.edges.push(edge);
    }

    info!(
        clients = client_ids.len(),
        origins = origin_ids.len(),
        discarded,
        "collapsed topology onto hub"
    );

    store
}

/// The hub lands at the centre of the surviving nodes
fn mean_position(nodes: &[Node]) -> Position {
    if nodes.is_empty() {
        return Position::default();
    }
    let n = nodes.len() as f64;
    Position {
        x: nodes.iter().map(|node| node.position.x).sum::<f64>() / n,
        y: nodes.iter().map(|node| node.position.y).sum::<f64>() / n,
    }
}

/// The canned five-tier demo topology
///
/// Restored when switching back to legacy without a checkpoint, and seeded
/// by `init`. Four default-weight hops from users to database.
#[must_use]
pub fn demo_legacy() -> TopologyStore {
    let mut users = Node::new("usr-1", "Users", Category::Users);
    users.position = Position { x: 50.0, y: 150.0 };
    users.is_traffic_start = true;

    let mut firewall = Node::new("fw-1", "Firewall", Category::Shield);
    firewall.position = Position { x: 250.0, y: 150.0 };

    let mut balancer = Node::new("lb-1", "Load Balancer", Category::Layers);
    balancer.position = Position { x: 450.0, y: 150.0 };

    let mut app = Node::new("app-1", "Web App", Category::Server);
    app.position = Position { x: 650.0, y: 150.0 };

    let mut db = Node::new("db-1", "Database", Category::Database);
    db.position = Position { x: 850.0, y: 150.0 };
    db.is_traffic_end = true;

    TopologyStore {
        nodes: vec![users, firewall, balancer, app, db],
        edges: vec![
            Edge::new("e1-2", "usr-1", "fw-1"),
            Edge::new("e2-3", "fw-1", "lb-1"),
            Edge::new("e3-4", "lb-1", "app-1"),
            Edge::new("e4-5", "app-1", "db-1"),
        ],
    }
}
