//! `perkly-tui`: terminal rewards catalog.
//!
//! Built on [ratatui](https://ratatui.rs) over the shared `perkly-core`
//! catalog. One screen: category tabs, a points sort toggle and a grid of
//! voucher cards that can be redeemed with Enter.
//!
//! Logs are written to a file (default `/tmp/perkly-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! catalog reloads into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use perkly_core::{Catalog, ViewQuery};

use crate::app::App;

/// Browse and redeem reward vouchers in the terminal.
#[derive(Parser, Debug)]
#[command(name = "perkly-tui", version, about)]
struct Cli {
    /// Catalog file (JSON, TOML or YAML) instead of the configured source
    #[arg(short = 'f', long, env = "PERKLY_CATALOG_FILE")]
    catalog_file: Option<PathBuf>,

    /// Log file path (defaults to /tmp/perkly-tui.log)
    #[arg(long, default_value = "/tmp/perkly-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be written to stdout/stderr while the
/// UI owns the terminal. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("perkly_tui={log_level},perkly_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("perkly-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic during startup still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    // Config and catalog errors surface before the terminal is taken over
    let cfg = perkly_config::load_config()?;
    let placeholder = perkly_config::placeholder_logo(&cfg)?;
    let source = perkly_config::catalog_source(&cfg, cli.catalog_file.as_deref());
    info!(source = %source.describe(), "starting perkly-tui");

    let catalog = Catalog::load(source, cfg.catalog.categories.clone())?;
    let initial = ViewQuery::new(cfg.defaults.category.as_str(), cfg.defaults.sort.as_str());

    let mut app = App::new(catalog, placeholder, &initial);
    app.run().await?;

    Ok(())
}
