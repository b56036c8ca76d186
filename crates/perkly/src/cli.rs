//! Clap derive structures for the `perkly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// perkly -- rewards voucher catalog from the command line
#[derive(Debug, Parser)]
#[command(
    name = "perkly",
    version,
    about = "Browse, filter, and redeem rewards vouchers",
    long_about = "Browse a rewards voucher catalog from the command line.\n\n\
        Filter by category, sort by points, and redeem vouchers from the\n\
        built-in catalog or a JSON/TOML/YAML catalog file.",
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
    /// Catalog file to load instead of the configured catalog
    #[arg(long, short = 'f', env = "PERKLY_CATALOG_FILE", global = true)]
    pub catalog_file: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "PERKLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, and redeem vouchers
    #[command(alias = "v")]
    Vouchers(VouchersArgs),

    /// Show category filter options with voucher counts
    #[command(alias = "cat")]
    Categories,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Vouchers ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VouchersArgs {
    #[command(subcommand)]
    pub command: VouchersCommand,
}

#[derive(Debug, Subcommand)]
pub enum VouchersCommand {
    /// List vouchers, filtered by category and sorted by points
    #[command(alias = "ls")]
    List {
        /// Category to show, or "all" [default: from config]
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Points order: low-to-high or high-to-low; anything else keeps
        /// catalog order [default: from config]
        #[arg(long, short = 's')]
        sort: Option<String>,
    },

    /// Show a single voucher with every point tier
    #[command(alias = "show")]
    Get {
        /// Voucher ID
        id: String,
    },

    /// Redeem a voucher
    Redeem {
        /// Voucher ID
        id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
