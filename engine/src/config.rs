use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use seenit_catalog::{DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS};
use seenit_types::{SelectorParseError, SourceSelector, ui::UiOptions};
use seenit_utils::DataDir;

pub const CATALOG_URL_ENV: &str = "SEENIT_CATALOG_URL";
pub const SOURCE_ENV: &str = "SEENIT_SOURCE";

#[derive(Debug, Default, Deserialize)]
pub struct SeenItConfig {
    pub app: Option<AppConfig>,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid glyph source {raw:?}: {source}")]
    Source {
        raw: String,
        source: SelectorParseError,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for tier icons and the spinner.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Freeze the loading spinner.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Catalog API root, without a trailing `/all`.
    pub base_url: Option<String>,
    /// `all`, `category:<name>` or `groups:<a>,<b>`.
    pub source: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Catalog settings after defaults and environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCatalog {
    pub base_url: String,
    pub selector: SourceSelector,
    pub timeout_secs: u64,
}

impl SeenItConfig {
    /// Load `~/.seenit/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from(&DataDir::resolve().config_path())
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app.as_ref().map_or_else(UiOptions::default, |app| UiOptions {
            ascii_only: app.ascii_only,
            high_contrast: app.high_contrast,
            reduced_motion: app.reduced_motion,
        })
    }

    /// Catalog settings with `SEENIT_CATALOG_URL` / `SEENIT_SOURCE` applied.
    pub fn resolve_catalog(&self) -> Result<ResolvedCatalog, ConfigError> {
        self.resolve_catalog_with(|key| std::env::var(key).ok())
    }

    /// Like [`Self::resolve_catalog`] with an injectable environment.
    pub fn resolve_catalog_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedCatalog, ConfigError> {
        let catalog = self.catalog.as_ref();
        let non_empty = |value: String| {
            let trimmed = value.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        };

        let base_url = env(CATALOG_URL_ENV)
            .and_then(non_empty)
            .or_else(|| catalog.and_then(|c| c.base_url.clone()).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        let selector = match env(SOURCE_ENV)
            .and_then(non_empty)
            .or_else(|| catalog.and_then(|c| c.source.clone()).and_then(non_empty))
        {
            Some(raw) => raw
                .parse::<SourceSelector>()
                .map_err(|source| ConfigError::Source { raw, source })?,
            None => SourceSelector::All,
        };

        let timeout_secs = catalog
            .and_then(|c| c.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(ResolvedCatalog {
            base_url,
            selector,
            timeout_secs,
        })
    }
}
