//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use perkly_config::ConfigError;
use perkly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 6;
    pub const DATA: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Catalog ──────────────────────────────────────────────────────

    #[error("Could not load catalog from {source_name}")]
    #[diagnostic(
        code(perkly::catalog_unavailable),
        help(
            "{reason}\n\
             Check --catalog-file / catalog.path, or unset both to use the built-in catalog."
        )
    )]
    CatalogUnavailable { source_name: String, reason: String },

    #[error("Catalog from {source_name} is malformed")]
    #[diagnostic(
        code(perkly::catalog_parse),
        help(
            "{reason}\n\
             Each voucher needs id, brandName, brandLogoUrl, voucherName,\n\
             voucherValue, pointTiers and category."
        )
    )]
    CatalogParse { source_name: String, reason: String },

    #[error("Unsupported catalog file: {path}")]
    #[diagnostic(
        code(perkly::catalog_format),
        help("Catalog files must end in .json, .toml, .yaml or .yml.")
    )]
    UnsupportedCatalogFormat { path: String },

    #[error("Catalog rejected: {reason}")]
    #[diagnostic(
        code(perkly::catalog_invalid),
        help("Voucher ids must be unique and non-empty, and every voucher needs a point tier.")
    )]
    InvalidCatalog { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(perkly::not_found),
        help("Run: perkly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(perkly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration value for {field}: {reason}")]
    #[diagnostic(
        code(perkly::config_invalid),
        help("Edit the config file (perkly config path) or the PERKLY_* environment.")
    )]
    ConfigInvalid { field: String, reason: String },

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(perkly::config_exists),
        help(
            "Use --force to overwrite it.\n\
             Path: {path}"
        )
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(perkly::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigInvalid { .. } | Self::ConfigExists { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::CatalogUnavailable { .. }
            | Self::CatalogParse { .. }
            | Self::UnsupportedCatalogFormat { .. }
            | Self::InvalidCatalog { .. } => exit_code::DATA,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CatalogUnavailable {
                source_name,
                reason,
            } => CliError::CatalogUnavailable {
                source_name,
                reason,
            },

            CoreError::CatalogParse {
                source_name,
                reason,
            } => CliError::CatalogParse {
                source_name,
                reason,
            },

            CoreError::UnsupportedCatalogFormat { path } => {
                CliError::UnsupportedCatalogFormat { path }
            }

            err @ (CoreError::DuplicateVoucherId { .. }
            | CoreError::EmptyVoucherId { .. }
            | CoreError::EmptyPointTiers { .. }) => CliError::InvalidCatalog {
                reason: err.to_string(),
            },

            CoreError::VoucherNotFound { id } => CliError::NotFound {
                resource_type: "voucher".into(),
                identifier: id,
                list_command: "vouchers list".into(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid { field, reason },
            ConfigError::Serialization(e) => CliError::ConfigInvalid {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_voucher_maps_to_not_found() {
        let err = CliError::from(CoreError::VoucherNotFound { id: "42".into() });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "voucher '42' not found");
    }

    #[test]
    fn validation_failures_map_to_data() {
        let err = CliError::from(CoreError::DuplicateVoucherId { id: "1".into() });
        assert_eq!(err.exit_code(), exit_code::DATA);
        assert!(err.to_string().contains("Duplicate voucher id"));
    }

    #[test]
    fn config_validation_maps_to_config() {
        let err = CliError::from(ConfigError::Validation {
            field: "catalog.categories".into(),
            reason: "blank".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }
}
