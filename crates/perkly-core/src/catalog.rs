// ── Catalog facade ──
//
// Single entry point for presentation layers: owns the store, the data
// source, the redemption notifier and the view memo. Cloning is cheap.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{Voucher, VoucherId};
use crate::redeem::{RedemptionNotice, RedemptionNotifier, TracingNotifier};
use crate::source::CatalogSource;
use crate::store::{CatalogSnapshot, CatalogStore};
use crate::stream::CatalogStream;
use crate::view::{CategoryCount, ViewCache, ViewQuery, category_counts};

/// Shared handle to a loaded voucher catalog.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    store: CatalogStore,
    source: Box<dyn CatalogSource>,
    notifier: Box<dyn RedemptionNotifier>,
    views: ViewCache,
    categories: Vec<String>,
}

impl Catalog {
    /// Build an empty catalog. Call [`reload`](Self::reload) to populate it.
    pub fn new(source: Box<dyn CatalogSource>, categories: Vec<String>) -> Self {
        Self::with_notifier(source, categories, Box::new(TracingNotifier))
    }

    pub fn with_notifier(
        source: Box<dyn CatalogSource>,
        categories: Vec<String>,
        notifier: Box<dyn RedemptionNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                store: CatalogStore::new(categories.clone()),
                source,
                notifier,
                views: ViewCache::new(),
                categories,
            }),
        }
    }

    /// Build a catalog and perform the initial load.
    pub fn load(source: Box<dyn CatalogSource>, categories: Vec<String>) -> Result<Self, CoreError> {
        let catalog = Self::new(source, categories);
        catalog.reload()?;
        Ok(catalog)
    }

    /// Re-read the source and swap in its catalog. Returns the new version.
    ///
    /// A failed load leaves the current catalog in place.
    pub fn reload(&self) -> Result<u64, CoreError> {
        let source = self.inner.source.describe();
        let vouchers = self.inner.source.load().inspect_err(|e| {
            warn!(source = %source, error = %e, "catalog load failed");
        })?;
        let count = vouchers.len();
        let version = self.inner.store.replace(vouchers)?;
        self.inner.views.invalidate();
        info!(source = %source, count, version, "catalog loaded");
        Ok(version)
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.store.snapshot()
    }

    /// Filtered and sorted vouchers for the given control selections.
    pub fn view(&self, query: &ViewQuery) -> Arc<Vec<Arc<Voucher>>> {
        let snapshot = self.snapshot();
        self.inner
            .views
            .get_or_derive(query, snapshot.version, &snapshot.vouchers)
    }

    pub fn get(&self, id: &VoucherId) -> Option<Arc<Voucher>> {
        self.inner.store.get(id)
    }

    /// Redeem a voucher by id: build the notice and hand it to the notifier.
    pub fn redeem(&self, id: &VoucherId) -> Result<RedemptionNotice, CoreError> {
        let voucher = self.get(id).ok_or_else(|| CoreError::VoucherNotFound {
            id: id.to_string(),
        })?;
        let notice = RedemptionNotice::for_voucher(&voucher);
        self.inner.notifier.notify(&notice);
        Ok(notice)
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        category_counts(&self.snapshot().vouchers, &self.inner.categories)
    }

    /// Configured category options, in display order.
    pub fn categories(&self) -> &[String] {
        &self.inner.categories
    }

    pub fn subscribe(&self) -> CatalogStream {
        self.inner.store.subscribe()
    }

    pub fn source_description(&self) -> String {
        self.inner.source.describe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::DEFAULT_CATEGORIES;
    use crate::source::BuiltinCatalog;

    fn categories() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
    }

    /// Source that serves the built-in catalog once, then fails.
    struct FlakySource {
        calls: AtomicUsize,
    }

    impl CatalogSource for FlakySource {
        fn load(&self) -> Result<Vec<Voucher>, CoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                BuiltinCatalog.load()
            } else {
                Err(CoreError::CatalogUnavailable {
                    source_name: self.describe(),
                    reason: "offline".into(),
                })
            }
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    #[test]
    fn load_populates_store() {
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories()).unwrap();
        assert_eq!(catalog.snapshot().version, 1);
        assert_eq!(catalog.snapshot().len(), 8);
        assert_eq!(catalog.source_description(), "built-in catalog");
    }

    #[test]
    fn view_is_memoized_until_reload() {
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories()).unwrap();
        let query = ViewQuery::new("Shopping", "low-to-high");

        let first = catalog.view(&query);
        assert!(Arc::ptr_eq(&first, &catalog.view(&query)));

        catalog.reload().unwrap();
        let after = catalog.view(&query);
        assert!(!Arc::ptr_eq(&first, &after));
        assert_eq!(*first, *after);
    }

    #[test]
    fn failed_reload_keeps_previous_catalog() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
        };
        let catalog = Catalog::load(Box::new(source), categories()).unwrap();
        let err = catalog.reload().unwrap_err();
        assert!(matches!(err, CoreError::CatalogUnavailable { .. }));
        assert_eq!(catalog.snapshot().version, 1);
        assert_eq!(catalog.snapshot().len(), 8);
    }

    #[test]
    fn redeem_notifies_and_returns_notice() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let catalog = Catalog::with_notifier(
            Box::new(BuiltinCatalog),
            categories(),
            Box::new(move |n: &RedemptionNotice| sink.lock().unwrap().push(n.clone())),
        );
        catalog.reload().unwrap();

        let notice = catalog.redeem(&VoucherId::from("2")).unwrap();
        assert_eq!(notice.message, "Redeem functionality for Starbucks Coffee Voucher");
        assert_eq!(*seen.lock().unwrap(), [notice]);
    }

    #[test]
    fn redeem_unknown_id_is_not_found() {
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories()).unwrap();
        let err = catalog.redeem(&VoucherId::from("404")).unwrap_err();
        assert!(matches!(err, CoreError::VoucherNotFound { ref id } if id == "404"));
    }

    #[test]
    fn category_counts_follow_option_order() {
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories()).unwrap();
        let counts: Vec<(String, usize)> = catalog
            .category_counts()
            .into_iter()
            .map(|c| (c.category, c.count))
            .collect();
        assert_eq!(
            counts,
            [
                ("Food & Beverage".to_string(), 2),
                ("Shopping".to_string(), 3),
                ("Healthcare".to_string(), 2),
                ("Entertainment".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn subscribers_observe_reloads() {
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories()).unwrap();
        let mut stream = catalog.subscribe();
        assert_eq!(stream.current().version, 1);

        catalog.reload().unwrap();
        assert_eq!(stream.changed().await.unwrap().version, 2);
    }
}
