// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Metrics command - compute and print the migration snapshot

use crate::types::Baseline;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run the metrics command
pub fn run(
    data_dir: &Path,
    baseline: Baseline,
    speed: f64,
    hover: Option<String>,
    json: bool,
    color: bool,
) -> Result<()> {
    let mut ctx = super::load_editor(data_dir, baseline)?;
    ctx.set_speed(speed);
    if hover.is_some() {
        ctx.set_hover(hover);
    }
    let snap = ctx.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(snap)?);
        return Ok(());
    }

    println!("Mode: {}", ctx.mode().code());
    println!("Average latency: {:.1} ms", snap.average_latency_ms);
    println!("Average hops: {:.1}", snap.average_hops);

    let latency_line = format!(
        "{:+}% vs baseline {} ms",
        snap.latency_delta_percent, baseline.latency_ms
    );
    if color && snap.latency_delta_percent > 0 {
        println!("Latency delta: {}", latency_line.green());
    } else if color && snap.latency_delta_percent < 0 {
        println!("Latency delta: {}", latency_line.red());
    } else {
        println!("Latency delta: {latency_line}");
    }

    let hops_line = format!(
        "{:.1}x vs baseline {} hops",
        snap.hops_delta_factor, baseline.hops
    );
    if color && snap.hops_delta_factor > 1.0 {
        println!("Hop reduction: {}", hops_line.green());
    } else {
        println!("Hop reduction: {hops_line}");
    }

    let active_nodes: Vec<&str> = snap.active_node_ids.iter().map(String::as_str).collect();
    let active_edges: Vec<&str> = snap.active_edge_ids.iter().map(String::as_str).collect();
    println!("Active nodes: {}", active_nodes.join(", "));
    println!("Active edges: {}", active_edges.join(", "));
    if !snap.preview_node_ids.is_empty() {
        let preview: Vec<&str> = snap.preview_node_ids.iter().map(String::as_str).collect();
        println!("Preview route: {}", preview.join(", "));
    }
    println!("Timing tuples: {}", snap.timings.len());

    Ok(())
}
