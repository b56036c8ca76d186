// ── Catalog data sources ──
//
// A source supplies the full ordered voucher list or fails; there is no
// partial or paginated contract. The built-in source carries the launch
// catalog, the file source reads a JSON/TOML/YAML document from disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{PointTier, Voucher, VoucherId};

/// Supplies the initial ordered sequence of vouchers.
pub trait CatalogSource: Send + Sync {
    /// Load the full catalog.
    fn load(&self) -> Result<Vec<Voucher>, CoreError>;

    /// Short human description for logs and status lines.
    fn describe(&self) -> String;
}

// ── Built-in catalog ────────────────────────────────────────────────

/// The fixed launch catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

#[allow(clippy::too_many_arguments)]
fn builtin(
    id: &str,
    brand: &str,
    logo: &str,
    name: &str,
    value: &str,
    points: u32,
    code: &str,
    category: &str,
) -> Voucher {
    Voucher {
        id: VoucherId::from(id),
        brand_name: brand.into(),
        brand_logo_url: logo.into(),
        voucher_name: name.into(),
        voucher_value: value.into(),
        point_tiers: vec![PointTier {
            points,
            code: code.into(),
        }],
        category: category.into(),
    }
}

impl CatalogSource for BuiltinCatalog {
    fn load(&self) -> Result<Vec<Voucher>, CoreError> {
        Ok(vec![
            builtin(
                "1",
                "Caring Pharmacy",
                "https://placehold.co/100x50/34D399/FFFFFF?text=Logo",
                "Caring Pharmacy E-Voucher",
                "RM 50",
                5000,
                "CP50",
                "Healthcare",
            ),
            builtin(
                "2",
                "Starbucks",
                "https://placehold.co/100x50/00704A/FFFFFF?text=Logo",
                "Starbucks Coffee Voucher",
                "RM 10",
                1500,
                "SB10",
                "Food & Beverage",
            ),
            builtin(
                "3",
                "Shopee",
                "https://placehold.co/100x50/F53D2D/FFFFFF?text=Logo",
                "Shopee E-Voucher",
                "RM 100",
                9500,
                "SP100",
                "Shopping",
            ),
            builtin(
                "4",
                "TGV Cinemas",
                "https://placehold.co/100x50/000000/FFFFFF?text=Logo",
                "TGV Cinemas Movie Ticket",
                "1 Ticket",
                3000,
                "TGV1",
                "Entertainment",
            ),
            builtin(
                "5",
                "Zalora",
                "https://placehold.co/100x50/C67D6F/FFFFFF?text=Logo",
                "Zalora Gift Card",
                "RM 200",
                18000,
                "ZL200",
                "Shopping",
            ),
            builtin(
                "6",
                "GrabFood",
                "https://placehold.co/100x50/00B140/FFFFFF?text=Logo",
                "GrabFood Voucher",
                "RM 20",
                2500,
                "GRAB20",
                "Food & Beverage",
            ),
            builtin(
                "7",
                "Watsons",
                "https://placehold.co/100x50/003399/FFFFFF?text=Logo",
                "Watsons E-Voucher",
                "RM 30",
                3500,
                "WT30",
                "Healthcare",
            ),
            builtin(
                "8",
                "Lazada",
                "https://placehold.co/100x50/1C0F66/FFFFFF?text=Logo",
                "Lazada E-Voucher",
                "RM 50",
                4500,
                "LZD50",
                "Shopping",
            ),
        ])
    }

    fn describe(&self) -> String {
        "built-in catalog".into()
    }
}

// ── File catalog ────────────────────────────────────────────────────

/// On-disk catalog layouts: a bare list, or a document with a
/// `vouchers` key (the only form TOML can express).
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Voucher>),
    Document { vouchers: Vec<Voucher> },
}

impl CatalogDocument {
    fn into_vouchers(self) -> Vec<Voucher> {
        match self {
            Self::List(vouchers) | Self::Document { vouchers } => vouchers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Catalog read from a JSON, TOML, or YAML file, chosen by extension.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, format: FileFormat, contents: &str) -> Result<Vec<Voucher>, CoreError> {
        let parse_err = |reason: String| CoreError::CatalogParse {
            source_name: self.describe(),
            reason,
        };

        let document: CatalogDocument = match format {
            FileFormat::Json => {
                serde_json::from_str(contents).map_err(|e| parse_err(e.to_string()))?
            }
            FileFormat::Toml => toml::from_str(contents).map_err(|e| parse_err(e.to_string()))?,
            FileFormat::Yaml => {
                serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string()))?
            }
        };
        Ok(document.into_vouchers())
    }
}

impl CatalogSource for FileCatalog {
    fn load(&self) -> Result<Vec<Voucher>, CoreError> {
        let format =
            FileFormat::from_path(&self.path).ok_or_else(|| CoreError::UnsupportedCatalogFormat {
                path: self.path.display().to_string(),
            })?;

        debug!(path = %self.path.display(), ?format, "reading catalog file");
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| CoreError::CatalogUnavailable {
                source_name: self.describe(),
                reason: e.to_string(),
            })?;

        let vouchers = self.parse(format, &contents)?;
        info!(path = %self.path.display(), count = vouchers.len(), "catalog file loaded");
        Ok(vouchers)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_has_eight_unique_vouchers() {
        let vouchers = BuiltinCatalog.load().unwrap();
        assert_eq!(vouchers.len(), 8);
        let mut ids: Vec<&str> = vouchers.iter().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert!(vouchers.iter().all(|v| !v.point_tiers.is_empty()));
    }

    #[test]
    fn loads_bare_json_list() {
        let file = write_temp(
            ".json",
            r#"[{
                "id": "a1",
                "brandName": "Acme",
                "brandLogoUrl": "https://example.com/acme.png",
                "voucherName": "Acme Voucher",
                "voucherValue": "RM 5",
                "pointTiers": [{ "points": 600, "code": "AC5" }, { "points": 900, "code": "AC5X" }],
                "category": "Shopping"
            }]"#,
        );
        let vouchers = FileCatalog::new(file.path()).load().unwrap();
        assert_eq!(vouchers.len(), 1);
        assert_eq!(vouchers[0].point_tiers.len(), 2);
        assert_eq!(vouchers[0].primary_points(), 600);
    }

    #[test]
    fn loads_toml_document() {
        let file = write_temp(
            ".toml",
            r#"
[[vouchers]]
id = "t1"
brandName = "Tea House"
brandLogoUrl = "https://example.com/tea.png"
voucherName = "Tea Voucher"
voucherValue = "RM 8"
category = "Food & Beverage"

[[vouchers.pointTiers]]
points = 800
code = "TEA8"
"#,
        );
        let vouchers = FileCatalog::new(file.path()).load().unwrap();
        assert_eq!(vouchers.len(), 1);
        assert_eq!(vouchers[0].brand_name, "Tea House");
        assert_eq!(vouchers[0].primary_points(), 800);
    }

    #[test]
    fn loads_yaml_document() {
        let file = write_temp(
            ".yml",
            r"
vouchers:
  - id: y1
    brandName: Cinema
    brandLogoUrl: https://example.com/cinema.png
    voucherName: Cinema Ticket
    voucherValue: 1 Ticket
    category: Entertainment
    pointTiers:
      - points: 3000
        code: CIN1
",
        );
        let vouchers = FileCatalog::new(file.path()).load().unwrap();
        assert_eq!(vouchers[0].voucher_value, "1 Ticket");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".csv", "id,brand\n");
        let err = FileCatalog::new(file.path()).load().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedCatalogFormat { .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = FileCatalog::new("/nonexistent/perkly/catalog.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, CoreError::CatalogUnavailable { .. }));
    }

    #[test]
    fn file_source_describes_its_path() {
        let source = FileCatalog::new("/srv/perkly/catalog.yaml");
        assert_eq!(source.describe(), "file /srv/perkly/catalog.yaml");
    }

    #[test]
    fn malformed_file_fails_whole_load() {
        let file = write_temp(".json", r#"[{ "id": "1", "brandName": "Half" }]"#);
        let err = FileCatalog::new(file.path()).load().unwrap_err();
        assert!(matches!(err, CoreError::CatalogParse { .. }));
    }
}
