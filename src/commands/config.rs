// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - get and set configuration keys

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const VALID_KEYS: &str = "data_dir, log_level, baseline_latency_ms, baseline_hops, speed";

/// Run the config command
pub fn run(path: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = crate::config::load(path)?;

    let Some(key) = key else {
        print!(
            "{}",
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?
        );
        return Ok(());
    };

    match value {
        None => {
            let shown = match key.as_str() {
                "data_dir" => config.data_dir.display().to_string(),
                "log_level" => config.log_level.clone(),
                "baseline_latency_ms" => config.baseline_latency_ms.to_string(),
                "baseline_hops" => config.baseline_hops.to_string(),
                "speed" => config.speed.to_string(),
                other => anyhow::bail!("Unknown key: {}. Valid: {}", other, VALID_KEYS),
            };
            println!("{shown}");
        }
        Some(raw) => {
            match key.as_str() {
                "data_dir" => config.data_dir = PathBuf::from(&raw),
                "log_level" => config.log_level = raw.clone(),
                "baseline_latency_ms" => config.baseline_latency_ms = parse_number(&key, &raw)?,
                "baseline_hops" => config.baseline_hops = parse_number(&key, &raw)?,
                "speed" => config.speed = parse_number(&key, &raw)?,
                other => anyhow::bail!("Unknown key: {}. Valid: {}", other, VALID_KEYS),
            }
            crate::config::save(&config, path)?;
            println!("Set {} = {}", key, raw);
        }
    }

    Ok(())
}

fn parse_number(key: &str, raw: &str) -> Result<f64> {
    raw.parse()
        .with_context(|| format!("Invalid number for {key}: {raw}"))
}
