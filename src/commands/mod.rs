// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations and the shared document plumbing they sit on

pub mod completions;
pub mod config;
pub mod edge;
pub mod export;
pub mod init;
pub mod metrics;
pub mod mode;
pub mod node;
pub mod timings;

use crate::editor::EditorContext;
use crate::graph::TopologyGraph;
use crate::types::{Baseline, TopologyDoc};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the topology document inside the data directory
pub const DOC_FILE: &str = "topology.json";
/// Name of the configuration file
pub const CONFIG_FILE: &str = "config.toml";

/// Default location of the configuration file
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("org", "hyperpolymath", "edgeshift")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Resolve the data directory: flag beats environment beats configuration
#[must_use]
pub fn data_dir(flag: Option<PathBuf>, config: &crate::config::Config) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(dir) = std::env::var("EDGESHIFT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    config.data_dir.clone()
}

/// Load the persisted session from the data directory
pub fn load_editor(data_dir: &Path, baseline: Baseline) -> Result<EditorContext> {
    let path = data_dir.join(DOC_FILE);
    if !path.exists() {
        anyhow::bail!(
            "No topology at {}. Run 'edgeshift init' first.",
            path.display()
        );
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: TopologyDoc = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(EditorContext::from_doc(doc, baseline))
}

/// Persist the session document into the data directory
pub fn save_editor(ctx: &EditorContext, data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create directory {}", data_dir.display()))?;
    let path = data_dir.join(DOC_FILE);
    let json = serde_json::to_string_pretty(&ctx.to_doc())
        .context("Failed to serialize topology document")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Resolve a node label or ID to a full ID
///
/// Exact IDs win; otherwise labels are matched, with an error listing the
/// candidates when more than one fits.
pub fn resolve_node_id(graph: &TopologyGraph, name_or_id: &str) -> Result<String> {
    if graph.get_node(name_or_id).is_some() {
        return Ok(name_or_id.to_string());
    }

    let matches: Vec<_> = graph
        .nodes()
        .iter()
        .filter(|n| n.label == name_or_id || n.label.contains(name_or_id))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("No node found matching: {}", name_or_id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple nodes match '{}':", name_or_id);
            for n in &matches {
                eprintln!("  {} ({})", n.label, n.id);
            }
            anyhow::bail!("Ambiguous node label. Use the full ID.");
        }
    }
}
