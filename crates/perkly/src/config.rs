//! CLI configuration: thin wrapper around `perkly_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--output, --color, --catalog-file).

use clap::ValueEnum;

use perkly_core::Catalog;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use perkly_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Output format: flag/env first, then `defaults.output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    match global.output {
        Some(format) => Ok(format),
        None => parse_value("defaults.output", &cfg.defaults.output),
    }
}

/// Color mode: flag first, then `defaults.color`.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> Result<ColorMode, CliError> {
    match global.color {
        Some(mode) => Ok(mode),
        None => parse_value("defaults.color", &cfg.defaults.color),
    }
}

fn parse_value<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|_| {
        let expected: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value().map(|p| p.get_name().to_owned()))
            .collect();
        CliError::ConfigInvalid {
            field: field.into(),
            reason: format!("'{raw}' is not one of: {}", expected.join(", ")),
        }
    })
}

/// Build and load the catalog selected by `--catalog-file` or the config.
pub fn open_catalog(global: &GlobalOpts, cfg: &Config) -> Result<Catalog, CliError> {
    let source = perkly_config::catalog_source(cfg, global.catalog_file.as_deref());
    tracing::debug!(source = %source.describe(), "opening catalog");
    Ok(Catalog::load(source, cfg.catalog.categories.clone())?)
}
