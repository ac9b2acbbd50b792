// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Mode command - run the one-shot legacy/future transform

use crate::types::{Baseline, ViewMode};
use anyhow::Result;
use std::path::Path;

/// Run the mode command
pub fn run(data_dir: &Path, baseline: Baseline, mode: &str) -> Result<()> {
    let target = ViewMode::from_code(mode)
        .ok_or_else(|| anyhow::anyhow!("Unknown mode: {}. Valid: legacy, future", mode))?;

    let mut ctx = super::load_editor(data_dir, baseline)?;
    if ctx.mode() == target {
        println!("Already in {} mode.", target.code());
        return Ok(());
    }

    ctx.set_mode(target);
    super::save_editor(&ctx, data_dir)?;

    let snap = ctx.snapshot();
    println!("Switched to {} mode.", target.code());
    println!(
        "  nodes: {}  edges: {}",
        ctx.graph().node_count(),
        ctx.graph().edge_count()
    );
    println!(
        "  latency: {:.1} ms over {:.1} hops ({:+}% vs baseline)",
        snap.average_latency_ms, snap.average_hops, snap.latency_delta_percent
    );
    Ok(())
}
