// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Timings command - print the per-edge animation table

use crate::types::Baseline;
use anyhow::Result;
use std::path::Path;

/// Run the timings command
pub fn run(
    data_dir: &Path,
    baseline: Baseline,
    speed: f64,
    hover: Option<String>,
    json: bool,
) -> Result<()> {
    let mut ctx = super::load_editor(data_dir, baseline)?;
    ctx.set_speed(speed);
    if hover.is_some() {
        ctx.set_hover(hover);
    }
    let snap = ctx.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snap.timings)?);
        return Ok(());
    }

    if snap.timings.is_empty() {
        println!("No active routes to animate.");
        return Ok(());
    }

    println!("Timings ({} tuples, speed {}x):", snap.timings.len(), ctx.speed());
    println!(
        "  {:<14} {:>10} {:>10} {:>10}  route",
        "edge", "delay", "duration", "period"
    );
    for t in &snap.timings {
        println!(
            "  {:<14} {:>8.0}ms {:>8.0}ms {:>8.0}ms  {}",
            t.edge_id,
            t.delay_ms,
            t.duration_ms,
            t.period_ms,
            if t.preview { "preview" } else { "committed" }
        );
    }

    Ok(())
}
