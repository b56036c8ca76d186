//! Data bridge: forwards catalog reloads into the TUI action loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use perkly_core::Catalog;

use crate::action::Action;

/// Push the current snapshot, then forward every reload as
/// [`Action::CatalogUpdated`] until cancelled or the catalog is dropped.
pub async fn spawn_data_bridge(
    catalog: Catalog,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut stream = catalog.subscribe();
    // Release our handle so the stream ends when the app drops the catalog.
    drop(catalog);

    let _ = action_tx.send(Action::CatalogUpdated(stream.current().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = stream.changed() => {
                let Some(snapshot) = changed else { break };
                debug!(version = snapshot.version, "dispatching CatalogUpdated");
                if action_tx.send(Action::CatalogUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge shut down");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use perkly_core::{BuiltinCatalog, DEFAULT_CATEGORIES};

    use super::*;

    #[tokio::test]
    async fn forwards_initial_snapshot_and_reloads() {
        let categories = DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect();
        let catalog = Catalog::load(Box::new(BuiltinCatalog), categories).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let bridge = tokio::spawn(spawn_data_bridge(catalog.clone(), tx, cancel.clone()));

        let Some(Action::CatalogUpdated(first)) = rx.recv().await else {
            panic!("expected initial snapshot");
        };
        assert_eq!(first.version, 1);
        assert_eq!(first.len(), 8);

        catalog.reload().unwrap();
        let Some(Action::CatalogUpdated(second)) = rx.recv().await else {
            panic!("expected reload snapshot");
        };
        assert_eq!(second.version, 2);

        cancel.cancel();
        bridge.await.unwrap();
    }
}
