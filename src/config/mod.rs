//! Site configuration for pagegen
//!
//! One small TOML file carries the fixed site identity injected into SEO
//! artifacts (site name, base URL, locale, Twitter handle), the cache
//! revalidation window handed to the hosting runtime, and the default
//! gallery image list used when a product supplies none.
//!
//! # Location Priority
//!
//! 1. `--config <path>` CLI flag
//! 2. `PAGEGEN_CONFIG_PATH` environment variable
//! 3. `pagegen.toml` in the current directory
//! 4. `pagegen/pagegen.toml` under the platform config directory
//! 5. Built-in defaults (see [`crate::constants`])
//!
//! A missing file is not an error - the defaults describe a fully working
//! site - but a file that exists and fails to parse is.
//!
//! ```toml
//! site_name = "مركز صيانة مصر"
//! base_url = "https://www.sianamisr.com"
//! locale = "ar_EG"
//! twitter_site = "@sianamisr"
//! revalidate_secs = 3600
//! gallery_images = ["/images/service-1.webp", "/images/service-2.webp"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_LOCALE, DEFAULT_SITE_NAME, REVALIDATE_WINDOW};
use crate::core::PagegenError;

/// Fixed site identity and runtime knobs.
///
/// Treated as immutable once loaded; every synthesis component receives a
/// reference rather than re-reading the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site display name injected into Open Graph and schema.org records
    pub site_name: String,
    /// Base URL for canonical links, without a trailing slash
    pub base_url: String,
    /// Open Graph locale
    pub locale: String,
    /// Twitter site handle for card metadata
    pub twitter_site: String,
    /// Time-based revalidation window, in seconds, for cached rendered pages
    pub revalidate_secs: u64,
    /// Fallback gallery image references used when a product has none
    pub gallery_images: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            twitter_site: "@sianamisr".to_string(),
            revalidate_secs: REVALIDATE_WINDOW.as_secs(),
            gallery_images: vec![
                "/images/service-center-1.webp".to_string(),
                "/images/service-center-2.webp".to_string(),
                "/images/service-center-3.webp".to_string(),
            ],
        }
    }
}

impl SiteConfig {
    /// Load configuration using the documented location priority.
    ///
    /// `explicit` is the `--config` CLI value when given. Returns defaults
    /// when no file exists at the resolved location.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::default_path(),
        };

        if !path.exists() {
            // Only the implicit locations may be absent; an explicit flag
            // pointing at nothing is an operator mistake.
            if explicit.is_some() {
                return Err(PagegenError::Config {
                    file: path.display().to_string(),
                    reason: "file not found".to_string(),
                }
                .into());
            }
            return Ok(Self::default());
        }

        Self::load_from(&path).await
    }

    /// Load configuration from an exact path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw).map_err(|e| PagegenError::Config {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Resolve the implicit config location.
    ///
    /// `PAGEGEN_CONFIG_PATH` wins over `./pagegen.toml` (essential for
    /// testing), which wins over the per-user config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("PAGEGEN_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        let local = PathBuf::from("pagegen.toml");
        if local.exists() {
            return local;
        }
        dirs::config_dir().map_or(local, |dir| dir.join("pagegen").join("pagegen.toml"))
    }

    /// Canonical URL for a route path under this site.
    #[must_use]
    pub fn canonical_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
