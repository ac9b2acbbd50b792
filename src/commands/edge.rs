// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge management commands - wire and reweight connections between nodes

use crate::types::{Baseline, Edge, EdgeUpdate, DEFAULT_EDGE_WEIGHT_MS};
use anyhow::Result;
use std::path::Path;

/// Options shared by the edge actions
#[derive(Debug, clap::Args)]
pub struct EdgeOpts {
    /// Source node label or ID
    #[arg(long)]
    pub from: Option<String>,

    /// Target node label or ID
    #[arg(long)]
    pub to: Option<String>,

    /// Edge ID (derived from the endpoints when omitted on add)
    #[arg(long)]
    pub id: Option<String>,

    /// Traversal cost in milliseconds
    #[arg(long, allow_negative_numbers = true)]
    pub weight: Option<f64>,

    /// Human-readable label
    #[arg(long)]
    pub label: Option<String>,
}

/// Run edge command
pub fn run(data_dir: &Path, baseline: Baseline, action: &str, opts: EdgeOpts) -> Result<()> {
    match action {
        "add" | "create" => {
            let from = opts
                .from
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--from is required"))?;
            let to = opts
                .to
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--to is required"))?;
            let mut ctx = super::load_editor(data_dir, baseline)?;

            let from_id = super::resolve_node_id(ctx.graph(), &from)?;
            let to_id = super::resolve_node_id(ctx.graph(), &to)?;
            let edge_id = opts
                .id
                .clone()
                .unwrap_or_else(|| Edge::generate_id(&from_id, &to_id, opts.label.as_deref()));

            let mut edge = Edge::new(edge_id.clone(), from_id.clone(), to_id.clone());
            edge.weight_ms = opts.weight.unwrap_or(DEFAULT_EDGE_WEIGHT_MS);
            edge.label = opts.label.clone();

            ctx.add_edge(edge)?;
            super::save_editor(&ctx, data_dir)?;

            // Report the stored weight; malformed input lands on the default
            let stored = ctx
                .graph()
                .get_edge(&edge_id)
                .map_or(DEFAULT_EDGE_WEIGHT_MS, |e| e.weight_ms);
            println!("Created edge: {} -> {}", from_id, to_id);
            println!("  id: {}  weight: {} ms", edge_id, stored);
            if let Some(l) = &opts.label {
                println!("  label: {}", l);
            }
            print_metrics_line(&ctx);
        }

        "remove" | "delete" | "rm" => {
            let mut ctx = super::load_editor(data_dir, baseline)?;

            if let Some(id) = opts.id.clone() {
                ctx.remove_edge(&id)?;
                super::save_editor(&ctx, data_dir)?;
                println!("Removed edge {}", id);
                print_metrics_line(&ctx);
                return Ok(());
            }

            let from = opts
                .from
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--id or --from/--to is required"))?;
            let to = opts
                .to
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--id or --from/--to is required"))?;
            let from_id = super::resolve_node_id(ctx.graph(), &from)?;
            let to_id = super::resolve_node_id(ctx.graph(), &to)?;

            let matching: Vec<String> = ctx
                .graph()
                .edges()
                .iter()
                .filter(|e| e.source == from_id && e.target == to_id)
                .map(|e| e.id.clone())
                .collect();
            if matching.is_empty() {
                println!("No edges found from {} -> {}", from_id, to_id);
                return Ok(());
            }
            for id in &matching {
                ctx.remove_edge(id)?;
            }
            super::save_editor(&ctx, data_dir)?;

            println!(
                "Removed {} edge(s) from {} -> {}",
                matching.len(),
                from_id,
                to_id
            );
            print_metrics_line(&ctx);
        }

        "set" | "update" => {
            let id = opts
                .id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--id is required"))?;
            let mut ctx = super::load_editor(data_dir, baseline)?;

            let update = EdgeUpdate {
                weight_ms: opts.weight,
                label: opts.label.clone(),
            };
            ctx.update_edge(&id, update)?;
            super::save_editor(&ctx, data_dir)?;

            let stored = ctx
                .graph()
                .get_edge(&id)
                .map_or(DEFAULT_EDGE_WEIGHT_MS, |e| e.weight_ms);
            println!("Updated edge {}  weight: {} ms", id, stored);
            print_metrics_line(&ctx);
        }

        "list" | "ls" => {
            let ctx = super::load_editor(data_dir, baseline)?;
            if ctx.graph().edge_count() == 0 {
                println!("No edges defined. Use 'edgeshift edge add' to create one.");
                return Ok(());
            }

            println!("Edges ({}):", ctx.graph().edge_count());
            for edge in ctx.graph().edges() {
                let label = edge.label.as_deref().unwrap_or("");
                println!(
                    "  {:<14} {} -> {}  {} ms  {}",
                    edge.id, edge.source, edge.target, edge.weight_ms, label
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, set, list", other);
        }
    }

    Ok(())
}

fn print_metrics_line(ctx: &crate::editor::EditorContext) {
    let snap = ctx.snapshot();
    println!(
        "  latency: {:.1} ms over {:.1} hops ({:+}% vs baseline)",
        snap.average_latency_ms, snap.average_hops, snap.latency_delta_percent
    );
}
