// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Route solver and metrics pipeline benchmarks.
//!
//! Run with: cargo bench --bench edgeshift_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use edgeshift::editor::EditorContext;
use edgeshift::graph::TopologyGraph;
use edgeshift::metrics::compute_metrics;
use edgeshift::solver::RouteIndex;
use edgeshift::transform::{demo_legacy, to_future};
use edgeshift::types::{
    Baseline, Category, Edge, EdgeUpdate, Node, Position, TopologyStore, ViewMode,
};
use std::collections::HashSet;

/// Layered topology: `layers` tiers of `width` nodes each, fully wired tier
/// to tier. The first tier originates traffic, the last terminates it, so a
/// recompute solves `width` routes over `(layers - 1) * width * width` edges.
fn layered_store(layers: usize, width: usize) -> TopologyStore {
    let mut store = TopologyStore::default();
    for tier in 0..layers {
        for slot in 0..width {
            let mut node = Node::new(
                format!("n{tier}-{slot}"),
                format!("Tier {tier} Unit {slot}"),
                Category::Server,
            );
            node.position = Position {
                x: (tier as f64) * 200.0,
                y: (slot as f64) * 120.0,
            };
            node.is_traffic_start = tier == 0;
            node.is_traffic_end = tier + 1 == layers;
            store.nodes.push(node);
        }
    }
    for tier in 0..layers.saturating_sub(1) {
        for from in 0..width {
            for to in 0..width {
                let mut edge = Edge::new(
                    format!("e{tier}-{from}-{to}"),
                    format!("n{tier}-{from}"),
                    format!("n{}-{to}", tier + 1),
                );
                // Deterministic spread of weights so routes are non-trivial
                edge.weight_ms = 1.0 + ((from * 7 + to * 3) % 13) as f64;
                store.edges.push(edge);
            }
        }
    }
    store
}

fn bench_route_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_query");

    let shapes = [(4usize, 4usize), (6, 8), (10, 10)];

    for (layers, width) in shapes {
        let name = format!("{layers}x{width}");
        let graph = TopologyGraph::from_store(layered_store(layers, width));
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(
            BenchmarkId::new("index_build", &name),
            &graph,
            |b, graph| {
                b.iter(|| RouteIndex::build(black_box(graph)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("single_source", &name),
            &graph,
            |b, graph| {
                let index = RouteIndex::build(graph);
                let targets: HashSet<&str> = graph
                    .nodes()
                    .iter()
                    .filter(|n| n.is_traffic_end)
                    .map(|n| n.id.as_str())
                    .collect();
                b.iter(|| index.route(black_box("n0-0"), &targets));
            },
        );
    }

    group.finish();
}

fn bench_metrics_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_recompute");
    let baseline = Baseline::default();

    // The canned five-node demo, the common interactive case
    group.bench_function("demo", |b| {
        let graph = TopologyGraph::from_store(demo_legacy());
        b.iter(|| compute_metrics(black_box(&graph), ViewMode::Legacy, None, &baseline, 1.0));
    });

    // Hover adds one ad hoc preview route to the pass
    group.bench_function("demo_hovered", |b| {
        let graph = TopologyGraph::from_store(demo_legacy());
        b.iter(|| {
            compute_metrics(
                black_box(&graph),
                ViewMode::Legacy,
                Some("lb-1"),
                &baseline,
                1.0,
            )
        });
    });

    for (layers, width) in [(6usize, 8usize), (10, 10)] {
        let name = format!("{layers}x{width}");
        let graph = TopologyGraph::from_store(layered_store(layers, width));
        // One route per first-tier source
        group.throughput(Throughput::Elements(width as u64));

        group.bench_with_input(BenchmarkId::new("layered", &name), &graph, |b, graph| {
            b.iter(|| compute_metrics(black_box(graph), ViewMode::Legacy, None, &baseline, 1.0));
        });
    }

    group.finish();
}

fn bench_editor_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor_session");

    // The cost of one interactive edit: mutate, recompute, publish
    group.bench_function("edge_weight_update", |b| {
        let mut ctx = EditorContext::demo(Baseline::default());
        let mut weight = 15.0;
        b.iter(|| {
            weight = if weight >= 100.0 { 15.0 } else { weight + 1.0 };
            ctx.update_edge(
                "e1-2",
                EdgeUpdate {
                    weight_ms: Some(weight),
                    label: None,
                },
            )
            .unwrap();
            ctx.snapshot().average_latency_ms
        });
    });

    group.bench_function("hover_toggle", |b| {
        let mut ctx = EditorContext::demo(Baseline::default());
        b.iter(|| {
            ctx.set_hover(Some("lb-1".into()));
            ctx.set_hover(None);
            ctx.snapshot().timings.len()
        });
    });

    group.bench_function("mode_round_trip", |b| {
        let mut ctx = EditorContext::demo(Baseline::default());
        b.iter(|| {
            ctx.set_mode(ViewMode::Future);
            ctx.set_mode(ViewMode::Legacy);
            ctx.graph().node_count()
        });
    });

    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    group.bench_function("demo_to_future", |b| {
        let graph = TopologyGraph::from_store(demo_legacy());
        b.iter(|| to_future(black_box(&graph)));
    });

    for (layers, width) in [(6usize, 8usize), (10, 10)] {
        let name = format!("{layers}x{width}");
        let graph = TopologyGraph::from_store(layered_store(layers, width));

        group.bench_with_input(
            BenchmarkId::new("layered_to_future", &name),
            &graph,
            |b, graph| {
                b.iter(|| to_future(black_box(graph)));
            },
        );
    }

    group.finish();
}

fn bench_doc_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("doc_serialize");

    // Every CLI command ends with exactly this write
    group.bench_function("demo_json", |b| {
        let ctx = EditorContext::demo(Baseline::default());
        let doc = ctx.to_doc();
        b.iter(|| serde_json::to_string_pretty(black_box(&doc)).unwrap());
    });

    group.bench_function("layered_json_10x10", |b| {
        let ctx = EditorContext::new(layered_store(10, 10), ViewMode::Legacy, Baseline::default());
        let doc = ctx.to_doc();
        b.iter(|| serde_json::to_string_pretty(black_box(&doc)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_route_query,
    bench_metrics_recompute,
    bench_editor_session,
    bench_transform,
    bench_doc_serialize,
);
criterion_main!(benches);
