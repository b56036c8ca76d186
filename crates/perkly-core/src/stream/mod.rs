// ── Reactive catalog streams ──
//
// Subscription types for consuming catalog changes from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::CatalogSnapshot;

/// A subscription to the voucher catalog.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed`](Self::changed) or by converting to a `Stream`.
pub struct CatalogStream {
    current: Arc<CatalogSnapshot>,
    receiver: watch::Receiver<Arc<CatalogSnapshot>>,
}

impl CatalogStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<CatalogSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &Arc<CatalogSnapshot> {
        &self.current
    }

    /// Latest snapshot (may be newer than `current`).
    pub fn latest(&self) -> Arc<CatalogSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next reload, returning the new snapshot.
    /// Returns `None` once the owning catalog has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<CatalogSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The first item is the snapshot current at conversion time.
    pub fn into_stream(self) -> CatalogWatchStream {
        CatalogWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot per catalog reload.
pub struct CatalogWatchStream {
    inner: WatchStream<Arc<CatalogSnapshot>>,
}

impl Stream for CatalogWatchStream {
    type Item = Arc<CatalogSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
