//! Clap derive structures for the `pinmap` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pinmap -- put workspace database rows on a map
#[derive(Debug, Parser)]
#[command(
    name = "pinmap",
    version,
    about = "Serve workspace database rows as map pins",
    long_about = "Proxies a Notion-style workspace API and a free-text geocoder,\n\
        resolves each row to coordinates, and serves the result as map markers.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PINMAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Upstream request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Geocode one free-text address
    #[command(alias = "geo")]
    Geocode(GeocodeArgs),

    /// Resolve a database's rows and print the markers as JSON
    Markers(MarkersArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct GeocodeArgs {
    /// Free-text address
    pub address: String,
}

#[derive(Debug, Args)]
pub struct MarkersArgs {
    /// Database id
    pub collection_id: String,

    /// Comma-separated fields shown in popups
    #[arg(long, short = 'f', default_value = "")]
    pub fields: String,

    /// Select field used for marker colour
    #[arg(long, short = 'c')]
    pub color: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Print the effective configuration as TOML (token redacted)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
