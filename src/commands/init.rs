// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Init command - seed the demo legacy topology

use crate::editor::EditorContext;
use crate::types::Baseline;
use anyhow::Result;
use std::path::Path;

/// Run the init command
pub fn run(data_dir: &Path, baseline: Baseline, force: bool) -> Result<()> {
    let path = data_dir.join(super::DOC_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "Topology already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let ctx = EditorContext::demo(baseline);
    super::save_editor(&ctx, data_dir)?;

    let snap = ctx.snapshot();
    println!("Seeded demo topology at {}", path.display());
    println!(
        "  nodes: {}  edges: {}",
        ctx.graph().node_count(),
        ctx.graph().edge_count()
    );
    println!(
        "  latency: {:.1} ms over {:.1} hops",
        snap.average_latency_ms, snap.average_hops
    );
    Ok(())
}
