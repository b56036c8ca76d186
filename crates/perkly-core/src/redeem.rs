// ── Redemption notices ──
//
// Redeeming is a placeholder: it names the voucher and hands a notice to
// whatever notifier the presentation layer installed. No points move.

use serde::Serialize;
use tracing::info;

use crate::model::{Voucher, VoucherId};

/// The user-visible result of a redeem request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionNotice {
    pub voucher_id: VoucherId,
    pub voucher_name: String,
    pub message: String,
}

impl RedemptionNotice {
    pub fn for_voucher(voucher: &Voucher) -> Self {
        Self {
            voucher_id: voucher.id.clone(),
            voucher_name: voucher.voucher_name.clone(),
            message: format!("Redeem functionality for {}", voucher.voucher_name),
        }
    }
}

/// Sink for redemption notices. A CLI prints them, a TUI shows a toast.
pub trait RedemptionNotifier: Send + Sync {
    fn notify(&self, notice: &RedemptionNotice);
}

impl<F> RedemptionNotifier for F
where
    F: Fn(&RedemptionNotice) + Send + Sync,
{
    fn notify(&self, notice: &RedemptionNotice) {
        self(notice);
    }
}

/// Notifier that only logs. Installed when nothing else is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl RedemptionNotifier for TracingNotifier {
    fn notify(&self, notice: &RedemptionNotice) {
        info!(
            voucher_id = %notice.voucher_id,
            voucher = %notice.voucher_name,
            "{}",
            notice.message
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::source::{BuiltinCatalog, CatalogSource};

    #[test]
    fn message_names_the_voucher() {
        let catalog = BuiltinCatalog.load().unwrap();
        let shopee = catalog.iter().find(|v| v.brand_name == "Shopee").unwrap();
        let notice = RedemptionNotice::for_voucher(shopee);
        assert_eq!(notice.message, "Redeem functionality for Shopee E-Voucher");
        assert_eq!(notice.voucher_id.as_str(), "3");
    }

    #[test]
    fn closures_act_as_notifiers() {
        let seen = Mutex::new(Vec::new());
        let notifier = |n: &RedemptionNotice| seen.lock().unwrap().push(n.message.clone());

        let catalog = BuiltinCatalog.load().unwrap();
        notifier.notify(&RedemptionNotice::for_voucher(&catalog[0]));
        assert_eq!(
            *seen.lock().unwrap(),
            ["Redeem functionality for Caring Pharmacy E-Voucher"]
        );
    }
}
