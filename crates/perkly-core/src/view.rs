// ── View derivation ──
//
// Pure mapping from (catalog, filter, sort order) to the ordered list a
// presentation layer renders, plus a single-slot memo keyed on the query
// and the catalog version.

use std::cmp::Reverse;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tracing::debug;

use crate::model::{CategoryFilter, SortOrder, Voucher};

/// The presentation layer's current control selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ViewQuery {
    pub filter: CategoryFilter,
    pub sort: SortOrder,
}

impl ViewQuery {
    pub fn new(filter: impl Into<CategoryFilter>, sort: impl Into<SortOrder>) -> Self {
        Self {
            filter: filter.into(),
            sort: sort.into(),
        }
    }
}

/// Derive the ordered vouchers to display.
///
/// Returns a fresh vector; `catalog` is never reordered. Sorting is stable
/// on the primary tier's points, so equal-points vouchers keep their
/// catalog order. `SortOrder::Unsorted` keeps insertion order.
pub fn derive_view(catalog: &[Arc<Voucher>], query: &ViewQuery) -> Vec<Arc<Voucher>> {
    let mut result: Vec<Arc<Voucher>> = catalog
        .iter()
        .filter(|v| query.filter.matches(v))
        .cloned()
        .collect();

    match query.sort {
        SortOrder::LowToHigh => result.sort_by_key(|v| v.primary_points()),
        SortOrder::HighToLow => result.sort_by_key(|v| Reverse(v.primary_points())),
        SortOrder::Unsorted => {}
    }

    result
}

// ── Category counts ─────────────────────────────────────────────────

/// Number of vouchers in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    /// Whether the category is one of the configured filter options.
    pub listed: bool,
}

/// Count vouchers per category.
///
/// Every option appears in option order, zero counts included. Catalog
/// categories missing from `options` follow in first-seen order with
/// `listed = false`, so configuration drift is visible.
pub fn category_counts(catalog: &[Arc<Voucher>], options: &[String]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = options
        .iter()
        .map(|option| CategoryCount {
            category: option.clone(),
            count: 0,
            listed: true,
        })
        .collect();

    for voucher in catalog {
        if let Some(entry) = counts.iter_mut().find(|c| c.category == voucher.category) {
            entry.count += 1;
        } else {
            counts.push(CategoryCount {
                category: voucher.category.clone(),
                count: 1,
                listed: false,
            });
        }
    }

    counts
}

// ── Memoized derivation ─────────────────────────────────────────────

struct CachedView {
    query: ViewQuery,
    version: u64,
    vouchers: Arc<Vec<Arc<Voucher>>>,
}

/// Single-slot memo over [`derive_view`].
///
/// Holds the most recent `(query, catalog version)` result. Any change to
/// either recomputes; identical inputs return the same `Arc`.
#[derive(Default)]
pub struct ViewCache {
    slot: ArcSwapOption<CachedView>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached view for `(query, version)`, deriving it on a miss.
    pub fn get_or_derive(
        &self,
        query: &ViewQuery,
        version: u64,
        catalog: &[Arc<Voucher>],
    ) -> Arc<Vec<Arc<Voucher>>> {
        let current = self.slot.load();
        if let Some(cached) = current.as_ref() {
            if cached.version == version && cached.query == *query {
                debug!(filter = %query.filter, sort = %query.sort, version, "view cache hit");
                return Arc::clone(&cached.vouchers);
            }
        }

        let vouchers = Arc::new(derive_view(catalog, query));
        debug!(
            filter = %query.filter,
            sort = %query.sort,
            version,
            shown = vouchers.len(),
            total = catalog.len(),
            "derived catalog view"
        );
        self.slot.store(Some(Arc::new(CachedView {
            query: query.clone(),
            version,
            vouchers: Arc::clone(&vouchers),
        })));
        vouchers
    }

    /// Drop the cached view.
    pub fn invalidate(&self) {
        self.slot.store(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::{BuiltinCatalog, CatalogSource};

    fn builtin() -> Vec<Arc<Voucher>> {
        BuiltinCatalog.load().unwrap().into_iter().map(Arc::new).collect()
    }

    fn brands(view: &[Arc<Voucher>]) -> Vec<&str> {
        view.iter().map(|v| v.brand_name.as_str()).collect()
    }

    fn points(view: &[Arc<Voucher>]) -> Vec<u32> {
        view.iter().map(|v| v.primary_points()).collect()
    }

    #[test]
    fn shopping_low_to_high() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("Shopping", "low-to-high"));
        assert_eq!(brands(&view), ["Lazada", "Shopee", "Zalora"]);
        assert_eq!(points(&view), [4500, 9500, 18000]);
    }

    #[test]
    fn all_high_to_low_spans_whole_catalog() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("all", "high-to-low"));
        assert_eq!(view.len(), 8);
        assert_eq!(view.first().unwrap().brand_name, "Zalora");
        assert_eq!(view.last().unwrap().brand_name, "Starbucks");
        assert!(points(&view).windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn low_to_high_is_non_decreasing() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("all", "low-to-high"));
        assert!(points(&view).windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn unknown_category_yields_empty_view() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("Automotive", "low-to-high"));
        assert!(view.is_empty());
    }

    #[test]
    fn every_filtered_voucher_matches_category() {
        let catalog = builtin();
        for category in ["Food & Beverage", "Shopping", "Healthcare", "Entertainment"] {
            let view = derive_view(&catalog, &ViewQuery::new(category, "high-to-low"));
            assert!(!view.is_empty(), "{category} should have vouchers");
            assert!(view.iter().all(|v| v.category == category));
        }
    }

    #[test]
    fn unrecognized_sort_keeps_catalog_order() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("all", "newest-first"));
        let ids: Vec<&str> = view.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn all_filter_returns_whole_catalog_as_a_set() {
        let catalog = builtin();
        let view = derive_view(&catalog, &ViewQuery::new("all", "low-to-high"));
        let mut got: Vec<&str> = view.iter().map(|v| v.id.as_str()).collect();
        let mut want: Vec<&str> = catalog.iter().map(|v| v.id.as_str()).collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn derivation_never_mutates_catalog() {
        let catalog = builtin();
        let before: Vec<Voucher> = catalog.iter().map(|v| (**v).clone()).collect();
        for _ in 0..3 {
            derive_view(&catalog, &ViewQuery::new("all", "high-to-low"));
            derive_view(&catalog, &ViewQuery::new("Shopping", "low-to-high"));
        }
        let after: Vec<Voucher> = catalog.iter().map(|v| (**v).clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn derivation_is_idempotent() {
        let catalog = builtin();
        let query = ViewQuery::new("Healthcare", "high-to-low");
        assert_eq!(derive_view(&catalog, &query), derive_view(&catalog, &query));
    }

    #[test]
    fn equal_points_keep_catalog_order() {
        let mut catalog: Vec<Voucher> = BuiltinCatalog.load().unwrap();
        for v in &mut catalog {
            v.point_tiers[0].points = 1000;
        }
        let catalog: Vec<Arc<Voucher>> = catalog.into_iter().map(Arc::new).collect();
        for sort in ["low-to-high", "high-to-low"] {
            let view = derive_view(&catalog, &ViewQuery::new("all", sort));
            assert_eq!(view.len(), catalog.len());
            let ids: Vec<&str> = view.iter().map(|v| v.id.as_str()).collect();
            assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
        }
    }

    #[test]
    fn empty_catalog_yields_empty_view() {
        assert!(derive_view(&[], &ViewQuery::default()).is_empty());
    }

    #[test]
    fn category_counts_cover_options_and_strays() {
        let mut catalog = builtin();
        let mut stray = (*catalog[0]).clone();
        stray.id = "99".into();
        stray.category = "Travel".into();
        catalog.push(Arc::new(stray));

        let options: Vec<String> = ["Food & Beverage", "Shopping", "Automotive"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let counts = category_counts(&catalog, &options);

        let summary: Vec<(&str, usize, bool)> = counts
            .iter()
            .map(|c| (c.category.as_str(), c.count, c.listed))
            .collect();
        assert_eq!(
            summary,
            [
                ("Food & Beverage", 2, true),
                ("Shopping", 3, true),
                ("Automotive", 0, true),
                ("Healthcare", 2, false),
                ("Entertainment", 1, false),
                ("Travel", 1, false),
            ]
        );
    }

    #[test]
    fn cache_returns_same_arc_for_identical_inputs() {
        let catalog = builtin();
        let cache = ViewCache::new();
        let query = ViewQuery::new("Shopping", "low-to-high");
        let first = cache.get_or_derive(&query, 1, &catalog);
        let second = cache.get_or_derive(&query, 1, &catalog);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cache_recomputes_on_query_or_version_change() {
        let catalog = builtin();
        let cache = ViewCache::new();
        let query = ViewQuery::new("Shopping", "low-to-high");
        let first = cache.get_or_derive(&query, 1, &catalog);

        let resorted = cache.get_or_derive(&ViewQuery::new("Shopping", "high-to-low"), 1, &catalog);
        assert_eq!(brands(&resorted), ["Zalora", "Shopee", "Lazada"]);

        let bumped = cache.get_or_derive(&query, 2, &catalog);
        assert!(!Arc::ptr_eq(&first, &bumped));
        assert_eq!(*first, *bumped);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let catalog = builtin();
        let cache = ViewCache::new();
        let query = ViewQuery::default();
        let first = cache.get_or_derive(&query, 1, &catalog);
        cache.invalidate();
        let second = cache.get_or_derive(&query, 1, &catalog);
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
