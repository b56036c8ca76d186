// ── Reactive catalog storage ──
//
// Holds the authoritative voucher sequence. Reads are snapshot clones;
// every successful replace bumps the version and pushes the new snapshot
// to subscribers over a `watch` channel. The id index lives inside the
// snapshot, so a lookup never disagrees with the sequence it came from.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Voucher, VoucherId};
use crate::stream::CatalogStream;

/// Immutable view of the catalog at one version.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Bumped on every successful replace. `0` means nothing loaded yet.
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    /// Vouchers in source order.
    pub vouchers: Vec<Arc<Voucher>>,
    by_id: HashMap<VoucherId, Arc<Voucher>>,
}

impl CatalogSnapshot {
    fn empty() -> Self {
        Self {
            version: 0,
            loaded_at: Utc::now(),
            vouchers: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Look up a voucher in this snapshot.
    pub fn get(&self, id: &VoucherId) -> Option<Arc<Voucher>> {
        self.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }
}

/// Concurrent voucher catalog with O(1) id lookups.
pub struct CatalogStore {
    snapshot: watch::Sender<Arc<CatalogSnapshot>>,
    /// Category options the presentation layers offer; used only to flag
    /// vouchers that no filter option can reach.
    known_categories: Vec<String>,
}

impl CatalogStore {
    pub fn new(known_categories: Vec<String>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(CatalogSnapshot::empty()));
        Self {
            snapshot,
            known_categories,
        }
    }

    /// Validate and swap in a new catalog. Returns the new version.
    ///
    /// On error the previous catalog stays in place untouched.
    pub fn replace(&self, vouchers: Vec<Voucher>) -> Result<u64, CoreError> {
        self.validate(&vouchers)?;

        let vouchers: Vec<Arc<Voucher>> = vouchers.into_iter().map(Arc::new).collect();
        let by_id: HashMap<VoucherId, Arc<Voucher>> = vouchers
            .iter()
            .map(|v| (v.id.clone(), Arc::clone(v)))
            .collect();

        let count = vouchers.len();
        let mut version = 0;
        // `send_modify` holds the channel's write lock for the whole closure,
        // so concurrent writers get distinct, increasing versions. It also
        // updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| {
            version = snap.version + 1;
            *snap = Arc::new(CatalogSnapshot {
                version,
                loaded_at: Utc::now(),
                vouchers,
                by_id,
            });
        });

        debug!(version, count, "catalog replaced");
        Ok(version)
    }

    /// Look up a voucher by id.
    pub fn get(&self, id: &VoucherId) -> Option<Arc<Voucher>> {
        self.snapshot.borrow().get(id)
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.borrow().version
    }

    /// Subscribe to catalog reloads.
    pub fn subscribe(&self) -> CatalogStream {
        CatalogStream::new(self.snapshot.subscribe())
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn validate(&self, vouchers: &[Voucher]) -> Result<(), CoreError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(vouchers.len());

        for (index, voucher) in vouchers.iter().enumerate() {
            if voucher.id.is_empty() {
                return Err(CoreError::EmptyVoucherId { index });
            }
            if !seen.insert(voucher.id.as_str()) {
                return Err(CoreError::DuplicateVoucherId {
                    id: voucher.id.to_string(),
                });
            }
            if voucher.point_tiers.is_empty() {
                return Err(CoreError::EmptyPointTiers {
                    id: voucher.id.to_string(),
                });
            }
            if !self.known_categories.iter().any(|c| *c == voucher.category) {
                warn!(
                    id = %voucher.id,
                    category = %voucher.category,
                    "voucher category is not a filter option; only reachable via \"all\""
                );
            }
        }

        Ok(())
    }
}
