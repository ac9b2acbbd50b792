// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Edgeshift CLI - Migration bench for collapsing multi-hop topologies onto
//! the edge

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use edgeshift::commands;
use edgeshift::config;

#[derive(Parser)]
#[command(name = "edgeshift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "EDGESHIFT_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "EDGESHIFT_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the demo legacy topology
    Init {
        /// Overwrite an existing topology
        #[arg(long)]
        force: bool,
    },

    /// Manage topology nodes
    Node {
        /// Action: add, remove, set, list
        action: String,

        /// Node label or ID
        name: Option<String>,

        #[command(flatten)]
        opts: commands::node::NodeOpts,
    },

    /// Manage topology edges
    Edge {
        /// Action: add, remove, set, list
        action: String,

        #[command(flatten)]
        opts: commands::edge::EdgeOpts,
    },

    /// Compute and print the migration metrics snapshot
    Metrics {
        /// Preview a route from this node
        #[arg(long)]
        hover: Option<String>,

        /// Simulation speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the per-edge animation timing table
    Timings {
        /// Preview a route from this node
        #[arg(long)]
        hover: Option<String>,

        /// Simulation speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Switch between the legacy and future topologies
    Mode {
        /// Target mode (legacy, future)
        mode: String,
    },

    /// Export the topology to various formats
    Export {
        /// Output format (dot, json)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        /// Highlight active routes
        #[arg(long)]
        active: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (omit to show everything)
        key: Option<String>,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Logs go to stderr so piped export output stays clean
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(commands::default_config_path);
    let config = config::load(&config_path)?;
    let baseline = config.baseline();
    let data_dir = commands::data_dir(cli.data_dir.clone(), &config);
    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Init { force } => commands::init::run(&data_dir, baseline, force),
        Commands::Node { action, name, opts } => {
            commands::node::run(&data_dir, baseline, &action, name, opts)
        }
        Commands::Edge { action, opts } => commands::edge::run(&data_dir, baseline, &action, opts),
        Commands::Metrics { hover, speed, json } => commands::metrics::run(
            &data_dir,
            baseline,
            speed.unwrap_or(config.speed),
            hover,
            json,
            color,
        ),
        Commands::Timings { hover, speed, json } => commands::timings::run(
            &data_dir,
            baseline,
            speed.unwrap_or(config.speed),
            hover,
            json,
        ),
        Commands::Mode { mode } => commands::mode::run(&data_dir, baseline, &mode),
        Commands::Export {
            format,
            output,
            active,
        } => commands::export::run(&data_dir, baseline, &format, output, active),
        Commands::Config { key, value } => commands::config::run(&config_path, key, value),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
