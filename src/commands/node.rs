// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Node management commands - add, remove, and retag topology nodes

use crate::types::{Baseline, Category, Node, NodeUpdate, Position};
use anyhow::Result;
use std::path::Path;

/// Options shared by the node actions
#[derive(Debug, clap::Args)]
pub struct NodeOpts {
    /// Category: users, shield, layers, server, database, cloud, harddrive
    #[arg(long)]
    pub category: Option<String>,

    /// Explicit node ID (derived from the label when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Canvas X coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Canvas Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Mark (true) or unmark (false) as a traffic start
    #[arg(long)]
    pub start: Option<bool>,

    /// Mark (true) or unmark (false) as a traffic end
    #[arg(long)]
    pub end: Option<bool>,

    /// Mark (true) or unmark (false) as the primary hub
    #[arg(long)]
    pub primary: Option<bool>,

    /// New label (set action)
    #[arg(long)]
    pub label: Option<String>,
}

/// Run node command
pub fn run(
    data_dir: &Path,
    baseline: Baseline,
    action: &str,
    name: Option<String>,
    opts: NodeOpts,
) -> Result<()> {
    match action {
        "add" | "create" => {
            let label = name
                .ok_or_else(|| anyhow::anyhow!("A label is required: edgeshift node add <label>"))?;
            let mut ctx = super::load_editor(data_dir, baseline)?;

            let category = match opts.category.as_deref() {
                Some(code) => parse_category(code)?,
                None => Category::Server,
            };
            let id = opts
                .id
                .clone()
                .unwrap_or_else(|| Node::generate_id(category, &label));

            let mut node = Node::new(id.clone(), label.clone(), category);
            node.position = Position {
                x: opts.x.unwrap_or(0.0),
                y: opts.y.unwrap_or(0.0),
            };
            node.is_traffic_start = opts.start.unwrap_or(false);
            node.is_traffic_end = opts.end.unwrap_or(false);
            node.is_primary = opts.primary.unwrap_or(false);

            ctx.add_node(node)?;
            super::save_editor(&ctx, data_dir)?;

            println!("Created node: {} ({})", label, id);
            print_metrics_line(&ctx);
        }

        "remove" | "delete" | "rm" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("A node label or ID is required"))?;
            let mut ctx = super::load_editor(data_dir, baseline)?;

            let id = super::resolve_node_id(ctx.graph(), &name)?;
            let cascaded = ctx.remove_node(&id)?;
            super::save_editor(&ctx, data_dir)?;

            println!("Removed node {} and {} edge(s)", id, cascaded);
            print_metrics_line(&ctx);
        }

        "set" | "update" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("A node label or ID is required"))?;
            let mut ctx = super::load_editor(data_dir, baseline)?;

            let id = super::resolve_node_id(ctx.graph(), &name)?;
            let category = match opts.category.as_deref() {
                Some(code) => Some(parse_category(code)?),
                None => None,
            };
            // A lone --x or --y keeps the other coordinate where it is
            let position = if opts.x.is_some() || opts.y.is_some() {
                let current = ctx
                    .graph()
                    .get_node(&id)
                    .map(|n| n.position)
                    .unwrap_or_default();
                Some(Position {
                    x: opts.x.unwrap_or(current.x),
                    y: opts.y.unwrap_or(current.y),
                })
            } else {
                None
            };

            let update = NodeUpdate {
                label: opts.label.clone(),
                category,
                position,
                is_traffic_start: opts.start,
                is_traffic_end: opts.end,
                is_primary: opts.primary,
            };
            ctx.update_node(&id, update)?;
            super::save_editor(&ctx, data_dir)?;

            println!("Updated node {}", id);
            print_metrics_line(&ctx);
        }

        "list" | "ls" => {
            let ctx = super::load_editor(data_dir, baseline)?;
            if ctx.graph().is_empty() {
                println!("No nodes defined. Run 'edgeshift init' to seed the demo topology.");
                return Ok(());
            }

            println!("Nodes ({}):", ctx.graph().node_count());
            for node in ctx.graph().nodes() {
                let mut flags = Vec::new();
                if node.is_traffic_start {
                    flags.push("start");
                }
                if node.is_traffic_end {
                    flags.push("end");
                }
                if node.is_primary {
                    flags.push("primary");
                }
                println!(
                    "  {:<14} {:<20} {:<10} {}",
                    node.id,
                    node.label,
                    node.category.code(),
                    flags.join(",")
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, set, list", other);
        }
    }

    Ok(())
}

fn parse_category(code: &str) -> Result<Category> {
    Category::from_code(code).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown category: {}. Valid: users, shield, layers, server, database, cloud, harddrive",
            code
        )
    })
}

fn print_metrics_line(ctx: &crate::editor::EditorContext) {
    let snap = ctx.snapshot();
    println!(
        "  latency: {:.1} ms over {:.1} hops ({:+}% vs baseline)",
        snap.average_latency_ms, snap.average_hops, snap.latency_delta_percent
    );
}
