// perkly-core: Rewards catalog layer shared by the CLI and TUI front ends.

pub mod catalog;
pub mod error;
pub mod model;
pub mod redeem;
pub mod source;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::Catalog;
pub use error::CoreError;
pub use redeem::{RedemptionNotice, RedemptionNotifier, TracingNotifier};
pub use source::{BuiltinCatalog, CatalogSource, FileCatalog};
pub use store::{CatalogSnapshot, CatalogStore};
pub use stream::{CatalogStream, CatalogWatchStream};
pub use view::{CategoryCount, ViewCache, ViewQuery, category_counts, derive_view};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ALL_CATEGORIES, CategoryFilter, DEFAULT_CATEGORIES, PLACEHOLDER_LOGO_URL, PointTier, SortOrder,
    Voucher, VoucherId, default_placeholder, resolve_logo,
};
