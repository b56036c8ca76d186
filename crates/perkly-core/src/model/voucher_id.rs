// ── Voucher identity ──
//
// Every voucher carries a catalog-unique string id, stable for the
// lifetime of the process. Redemption and detail lookups key on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog-unique identifier of a voucher.
///
/// Opaque to consumers: the catalog source decides the format, the store
/// only guarantees it is non-empty and unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(String);

impl VoucherId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VoucherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VoucherId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for VoucherId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VoucherId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
