// ── Voucher domain types ──

use serde::{Deserialize, Serialize};

use super::voucher_id::VoucherId;

/// One redemption cost option for a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTier {
    pub points: u32,
    pub code: String,
}

/// A redeemable reward record. Immutable once loaded into the catalog.
///
/// Field names serialize in camelCase (`brandName`, `pointTiers`, ...) so
/// catalog files share the shape of the upstream rewards feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: VoucherId,
    pub brand_name: String,
    /// May point at an unreachable image; see [`super::logo::resolve_logo`].
    pub brand_logo_url: String,
    pub voucher_name: String,
    /// Free-form display value, e.g. "RM 50" or "1 Ticket".
    pub voucher_value: String,
    /// Ordered cost options. The first entry drives sorting and display.
    pub point_tiers: Vec<PointTier>,
    pub category: String,
}

impl Voucher {
    /// The tier used for default sort and display.
    pub fn primary_tier(&self) -> Option<&PointTier> {
        self.point_tiers.first()
    }

    /// Points of the primary tier.
    ///
    /// The store rejects vouchers without tiers, so the `0` fallback only
    /// keeps the comparator total for hand-built values.
    pub fn primary_points(&self) -> u32 {
        self.primary_tier().map_or(0, |tier| tier.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voucher(tiers: Vec<PointTier>) -> Voucher {
        Voucher {
            id: VoucherId::from("1"),
            brand_name: "Brand".into(),
            brand_logo_url: "https://example.com/logo.png".into(),
            voucher_name: "Brand Voucher".into(),
            voucher_value: "RM 5".into(),
            point_tiers: tiers,
            category: "Shopping".into(),
        }
    }

    #[test]
    fn primary_points_uses_first_tier_only() {
        let v = voucher(vec![
            PointTier {
                points: 700,
                code: "A".into(),
            },
            PointTier {
                points: 100,
                code: "B".into(),
            },
        ]);
        assert_eq!(v.primary_points(), 700);
        assert_eq!(v.primary_tier().map(|t| t.code.as_str()), Some("A"));
    }

    #[test]
    fn primary_points_without_tiers_is_zero() {
        assert_eq!(voucher(Vec::new()).primary_points(), 0);
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "id": "9",
            "brandName": "Brand",
            "brandLogoUrl": "https://example.com/logo.png",
            "voucherName": "Brand Voucher",
            "voucherValue": "RM 5",
            "pointTiers": [{ "points": 250, "code": "BR5" }],
            "category": "Shopping"
        }"#;
        let v: Voucher = serde_json::from_str(json).expect("valid voucher json");
        assert_eq!(v.id.as_str(), "9");
        assert_eq!(v.primary_points(), 250);
    }
}
