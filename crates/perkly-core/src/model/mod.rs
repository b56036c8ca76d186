// ── Rewards domain model ──
//
// Canonical types shared by every presentation layer: vouchers and their
// point tiers, the filter/sort control values, and logo fallback.

pub mod logo;
pub mod query;
pub mod voucher;
pub mod voucher_id;

// ── Re-exports ──────────────────────────────────────────────────────

pub use logo::{PLACEHOLDER_LOGO_URL, default_placeholder, resolve_logo};
pub use query::{ALL_CATEGORIES, CategoryFilter, DEFAULT_CATEGORIES, SortOrder};
pub use voucher::{PointTier, Voucher};
pub use voucher_id::VoucherId;
