// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - write the topology out in various formats

use crate::types::Baseline;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT
    Dot,
    /// Raw store JSON
    Json,
}

impl ExportFormat {
    /// Parse a format name
    ///
    /// # Errors
    /// Rejects anything other than dot/graphviz or json.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown export format: {}. Supported: dot, json", other),
        }
    }
}

/// Run the export command
pub fn run(
    data_dir: &Path,
    baseline: Baseline,
    format: &str,
    output: Option<PathBuf>,
    active: bool,
) -> Result<()> {
    let format = ExportFormat::parse(format)?;
    let ctx = super::load_editor(data_dir, baseline)?;
    if ctx.graph().is_empty() {
        eprintln!("Warning: Topology is empty. Run 'edgeshift init' first.");
    }

    let content = match format {
        // Active-route highlighting needs the metrics snapshot, plain DOT does not
        ExportFormat::Dot => ctx.graph().to_dot(active.then(|| ctx.snapshot())),
        ExportFormat::Json => ctx.graph().to_json()?,
    };

    if let Some(path) = output {
        fs::write(&path, &content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        info!(path = %path.display(), "topology exported");
        println!("Exported to {}", path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
