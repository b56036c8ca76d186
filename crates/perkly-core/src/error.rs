// ── Core error types ──
//
// User-facing errors from perkly-core. View derivation has no error path;
// these cover loading a catalog and looking vouchers up in it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Catalog source errors ────────────────────────────────────────
    #[error("Catalog source {source_name} is unavailable: {reason}")]
    CatalogUnavailable { source_name: String, reason: String },

    #[error("Catalog source {source_name} could not be parsed: {reason}")]
    CatalogParse { source_name: String, reason: String },

    #[error("Unsupported catalog file format: {path} (expected .json, .toml, .yaml or .yml)")]
    UnsupportedCatalogFormat { path: String },

    // ── Catalog validation errors ────────────────────────────────────
    #[error("Duplicate voucher id in catalog: {id}")]
    DuplicateVoucherId { id: String },

    #[error("Voucher at position {index} has an empty id")]
    EmptyVoucherId { index: usize },

    #[error("Voucher {id} has no point tiers")]
    EmptyPointTiers { id: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Voucher not found: {id}")]
    VoucherNotFound { id: String },
}
