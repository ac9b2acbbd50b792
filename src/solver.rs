// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Early-exit shortest-route search over the topology graph
//!
//! Dijkstra with a binary heap, stopping at the first settled node that
//! satisfies the target set. O((V + E) log V) per query; the adjacency index
//! is built once per recompute pass and shared by every query in that pass.

use crate::graph::TopologyGraph;
use crate::types::RoutePath;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// One traversable out-edge in the adjacency index
struct Hop<'g> {
    target: &'g str,
    edge_id: &'g str,
    weight_ms: f64,
}

/// Heap entry ordered by cost, then discovery sequence
///
/// The sequence tie-break plus insertion-ordered adjacency makes the choice
/// among equal-cost routes deterministic: the first route discovered wins.
struct QueueEntry<'g> {
    cost: f64,
    seq: u64,
    node: &'g str,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Adjacency index over a borrowed graph
///
/// Weights are already normalized strictly positive by the graph, so the
/// search never has to re-validate them.
pub struct RouteIndex<'g> {
    adjacency: HashMap<&'g str, Vec<Hop<'g>>>,
}

impl<'g> RouteIndex<'g> {
    /// Build the index from the graph's current adjacency
    #[must_use]
    pub fn build(graph: &'g TopologyGraph) -> Self {
        let mut adjacency = HashMap::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let hops = graph
                .out_edges(&node.id)
                .into_iter()
                .map(|edge| Hop {
                    target: edge.target.as_str(),
                    edge_id: edge.id.as_str(),
                    weight_ms: edge.weight_ms,
                })
                .collect();
            adjacency.insert(node.id.as_str(), hops);
        }
        Self { adjacency }
    }

    /// Find the cheapest route from `source` to the nearest node in `targets`
    ///
    /// Returns a zero-length route when the source is itself a target, and
    /// `None` when the source is unknown or no target is reachable.
    #[must_use]
    pub fn route(&self, source: &str, targets: &HashSet<&str>) -> Option<RoutePath> {
        if !self.adjacency.contains_key(source) {
            return None;
        }
        if targets.contains(source) {
            return Some(RoutePath {
                total_latency_ms: 0.0,
                hop_count: 0,
                node_ids: vec![source.to_string()],
                edge_ids: Vec::new(),
            });
        }

        let mut dist: HashMap<&str, f64> = HashMap::new();
        let mut prev: HashMap<&str, (&str, &str)> = HashMap::new();
        let mut heap = BinaryHeap::new();
        let mut seq = 0_u64;

        dist.insert(source, 0.0);
        heap.push(Reverse(QueueEntry {
            cost: 0.0,
            seq,
            node: source,
        }));

        while let Some(Reverse(entry)) = heap.pop() {
            // Stale entries are superseded by a cheaper relaxation
            let settled = dist.get(entry.node).copied().unwrap_or(f64::INFINITY);
            if entry.cost > settled {
                continue;
            }
            if targets.contains(entry.node) {
                return Some(reconstruct(source, entry.node, entry.cost, &prev));
            }
            let Some(hops) = self.adjacency.get(entry.node) else {
                continue;
            };
            for hop in hops {
                let next = entry.cost + hop.weight_ms;
                let better = match dist.get(hop.target) {
                    Some(&existing) => next < existing,
                    None => true,
                };
                if better {
                    dist.insert(hop.target, next);
                    prev.insert(hop.target, (entry.node, hop.edge_id));
                    seq += 1;
                    heap.push(Reverse(QueueEntry {
                        cost: next,
                        seq,
                        node: hop.target,
                    }));
                }
            }
        }

        None
    }
}

/// Walk the parent pointers back from the settled target
fn reconstruct(
    source: &str,
    target: &str,
    total: f64,
    prev: &HashMap<&str, (&str, &str)>,
) -> RoutePath {
    let mut node_ids = vec![target.to_string()];
    let mut edge_ids = Vec::new();
    let mut cursor = target;
    while cursor != source {
        let Some(&(parent, edge_id)) = prev.get(cursor) else {
            break;
        };
        node_ids.push(parent.to_string());
        edge_ids.push(edge_id.to_string());
        cursor = parent;
    }
    node_ids.reverse();
    edge_ids.reverse();
    RoutePath {
        total_latency_ms: total,
        hop_count: edge_ids.len(),
        node_ids,
        edge_ids,
    }
}
