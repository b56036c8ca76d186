//! Command dispatch: bridges CLI args -> catalog operations -> output formatting.

pub mod categories;
pub mod config_cmd;
pub mod vouchers;

use perkly_core::Catalog;

use crate::cli::Command;
use crate::config::Config;
use crate::error::CliError;
use crate::output::Render;

/// Dispatch a catalog-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    catalog: &Catalog,
    cfg: &Config,
    render: Render,
) -> Result<(), CliError> {
    match cmd {
        Command::Vouchers(args) => vouchers::handle(catalog, args, cfg, render),
        Command::Categories => categories::handle(catalog, render),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
