// ── Presentation control values ──
//
// Category filter and sort order as selected by a presentation layer.
// Both parse from free-form strings and never fail: out-of-domain input
// degrades to a permissive fallback instead of an error.

use std::fmt;
use std::str::FromStr;

use strum::{EnumIter, IntoStaticStr};

use super::voucher::Voucher;

/// Sentinel filter value selecting every category.
pub const ALL_CATEGORIES: &str = "all";

/// Category options exposed by the presentation layers unless configured
/// otherwise. Catalog categories are expected to come from this list.
pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["Food & Beverage", "Shopping", "Healthcare", "Entertainment"];

// ── CategoryFilter ──────────────────────────────────────────────────

/// Category filter: everything, or an exact category string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match. Unknown categories match nothing.
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, voucher: &Voucher) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => voucher.category == *category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(s.to_owned())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ── SortOrder ───────────────────────────────────────────────────────

/// Ordering by primary tier points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum SortOrder {
    #[default]
    #[strum(serialize = "low-to-high")]
    LowToHigh,
    #[strum(serialize = "high-to-low")]
    HighToLow,
    /// Any unrecognized order value: keep catalog insertion order.
    #[strum(serialize = "unsorted")]
    Unsorted,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human label used by option pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::LowToHigh => "Points: Low to High",
            Self::HighToLow => "Points: High to Low",
            Self::Unsorted => "Catalog order",
        }
    }

    /// Flip between the two recognized orders. `Unsorted` enters the cycle
    /// at low-to-high.
    pub fn toggled(self) -> Self {
        match self {
            Self::LowToHigh => Self::HighToLow,
            Self::HighToLow | Self::Unsorted => Self::LowToHigh,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        match s {
            "low-to-high" => Self::LowToHigh,
            "high-to-low" => Self::HighToLow,
            other => {
                tracing::warn!(value = other, "unrecognized sort order, keeping catalog order");
                Self::Unsorted
            }
        }
    }
}

impl From<String> for SortOrder {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
