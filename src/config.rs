// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management

use crate::types::Baseline;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "hyperpolymath", "edgeshift")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".edgeshift"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_baseline_latency() -> f64 {
    Baseline::default().latency_ms
}

fn default_baseline_hops() -> f64 {
    Baseline::default().hops
}

fn default_speed() -> f64 {
    1.0
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for the persistent topology document
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Baseline latency that deltas compare against, in milliseconds
    #[serde(default = "default_baseline_latency")]
    pub baseline_latency_ms: f64,
    /// Baseline hop count that deltas compare against
    #[serde(default = "default_baseline_hops")]
    pub baseline_hops: f64,
    /// Default simulation speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            baseline_latency_ms: default_baseline_latency(),
            baseline_hops: default_baseline_hops(),
            speed: default_speed(),
        }
    }
}

impl Config {
    /// The session baseline carried by this configuration
    #[must_use]
    pub fn baseline(&self) -> Baseline {
        Baseline {
            latency_ms: self.baseline_latency_ms,
            hops: self.baseline_hops,
        }
    }
}

/// Load configuration from a TOML file, or defaults when it does not exist
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write configuration back to its TOML file
pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.baseline_latency_ms, 240.0);
        assert_eq!(config.baseline_hops, 4.0);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_round_trip_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.baseline_latency_ms = 500.0;
        save(&config, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.baseline_latency_ms, 500.0);
        assert_eq!(loaded.baseline().latency_ms, 500.0);

        // Absent keys fall back to their defaults
        fs::write(&path, "speed = 2.0\n").unwrap();
        let partial = load(&path).unwrap();
        assert_eq!(partial.speed, 2.0);
        assert_eq!(partial.baseline_hops, 4.0);
    }
}
