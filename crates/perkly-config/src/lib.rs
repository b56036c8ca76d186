//! Shared configuration for the perkly CLI and TUI.
//!
//! TOML defaults for the control selections, catalog source settings, and
//! the logo placeholder. Both binaries depend on this crate; the CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use perkly_core::{
    ALL_CATEGORIES, BuiltinCatalog, CatalogSource, DEFAULT_CATEGORIES, FileCatalog,
    PLACEHOLDER_LOGO_URL,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Initial control selections and output preferences.
    #[serde(default)]
    pub defaults: Defaults,

    /// Where the catalog comes from and how it is presented.
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Initial category filter; `"all"` shows every category.
    #[serde(default = "default_category")]
    pub category: String,

    /// Initial sort order: `"low-to-high"` or `"high-to-low"`.
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            category: default_category(),
            sort: default_sort(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_category() -> String {
    ALL_CATEGORIES.into()
}
fn default_sort() -> String {
    "low-to-high".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Catalog file (.json, .toml, .yaml). Unset means the built-in catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Category filter options, in display order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Image shown in place of a brand logo that cannot be used.
    #[serde(default = "default_placeholder_logo")]
    pub placeholder_logo: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: None,
            categories: default_categories(),
            placeholder_logo: default_placeholder_logo(),
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
}
fn default_placeholder_logo() -> String {
    PLACEHOLDER_LOGO_URL.into()
}

impl Config {
    /// Reject configurations the presentation layers cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let categories = &self.catalog.categories;
        if categories.is_empty() {
            return Err(ConfigError::Validation {
                field: "catalog.categories".into(),
                reason: "at least one category is required".into(),
            });
        }
        for (i, category) in categories.iter().enumerate() {
            if category.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: "catalog.categories".into(),
                    reason: format!("entry {i} is blank"),
                });
            }
            if category == ALL_CATEGORIES {
                return Err(ConfigError::Validation {
                    field: "catalog.categories".into(),
                    reason: format!("'{ALL_CATEGORIES}' is reserved for the all-categories filter"),
                });
            }
            if categories[..i].contains(category) {
                return Err(ConfigError::Validation {
                    field: "catalog.categories".into(),
                    reason: format!("'{category}' is listed twice"),
                });
            }
        }
        placeholder_logo(self)?;
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "perkly", "perkly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("perkly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` (missing file means defaults) + environment.
///
/// Environment keys use the `PERKLY_` prefix and `__` for nesting,
/// e.g. `PERKLY_DEFAULTS__SORT=high-to-low`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PERKLY_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Derived runtime values ──────────────────────────────────────────

/// Pick the catalog source: explicit override, then `catalog.path`, then
/// the built-in catalog.
pub fn catalog_source(cfg: &Config, override_path: Option<&Path>) -> Box<dyn CatalogSource> {
    match override_path.or(cfg.catalog.path.as_deref()) {
        Some(path) => Box::new(FileCatalog::new(path)),
        None => Box::new(BuiltinCatalog),
    }
}

/// Parse the configured logo placeholder.
pub fn placeholder_logo(cfg: &Config) -> Result<Url, ConfigError> {
    let raw = cfg.catalog.placeholder_logo.trim();
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "catalog.placeholder_logo".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "catalog.placeholder_logo".into(),
            reason: format!("expected an http(s) URL, got scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), contents).unwrap();
        dir
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.defaults.sort, "low-to-high");
        assert_eq!(cfg.catalog.categories.len(), 4);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = write_config(
            r#"
[defaults]
category = "Shopping"
sort = "high-to-low"

[catalog]
path = "/srv/rewards/catalog.yaml"
categories = ["Shopping", "Travel"]
"#,
        );
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.defaults.category, "Shopping");
        assert_eq!(cfg.defaults.sort, "high-to-low");
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.catalog.categories, ["Shopping", "Travel"]);
        assert_eq!(
            cfg.catalog.path.as_deref(),
            Some(Path::new("/srv/rewards/catalog.yaml"))
        );
        assert_eq!(cfg.catalog.placeholder_logo, PLACEHOLDER_LOGO_URL);
    }

    #[test]
    fn reserved_category_is_rejected() {
        let dir = write_config("[catalog]\ncategories = [\"all\", \"Shopping\"]\n");
        let err = load_config_from(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut cfg = Config::default();
        cfg.catalog.categories.push("Shopping".into());
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn non_http_placeholder_is_rejected() {
        let mut cfg = Config::default();
        cfg.catalog.placeholder_logo = "file:///tmp/logo.png".into();
        assert!(placeholder_logo(&cfg).is_err());

        cfg.catalog.placeholder_logo = "not a url".into();
        assert!(placeholder_logo(&cfg).is_err());
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.category = "Healthcare".into();
        cfg.catalog.path = Some(PathBuf::from("catalog.json"));
        save_config_to(&cfg, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn catalog_source_prefers_override() {
        let mut cfg = Config::default();
        assert_eq!(catalog_source(&cfg, None).describe(), "built-in catalog");

        cfg.catalog.path = Some(PathBuf::from("from-config.json"));
        assert_eq!(
            catalog_source(&cfg, None).describe(),
            "file from-config.json"
        );
        assert_eq!(
            catalog_source(&cfg, Some(Path::new("flag.toml"))).describe(),
            "file flag.toml"
        );
    }
}
