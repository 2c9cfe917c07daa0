use log::warn;
use serde::Deserialize;
use std::fs;

/// Typed view of `shopfront.toml`. Every field has a default, so a
/// missing or partial file still yields a working configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cms: CmsConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Origin of the content API deployment.
    pub base_url: String,
    /// Path segment between the host and the collection names.
    pub api_prefix: String,
    /// Substring that marks a tunnel/preview host (see `cms::images`).
    pub tunnel_marker: String,
    /// Header sent with every request to skip tunnel interstitials.
    pub bypass_header: String,
    pub bypass_value: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub products_per_page: i64,
    /// Shown wherever an image cannot be resolved or fetched.
    pub placeholder_image: String,
    /// Directory for the local-state SQLite database.
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cms: CmsConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        CmsConfig {
            base_url: "http://localhost:1337".to_string(),
            api_prefix: "api".to_string(),
            tunnel_marker: "ngrok".to_string(),
            bypass_header: "ngrok-skip-browser-warning".to_string(),
            bypass_value: "true".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            name: "MobileTech".to_string(),
            products_per_page: 6,
            placeholder_image: "https://via.placeholder.com/400x300?text=No+Image".to_string(),
            data_dir: "site/db".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Config {
        Self::load_from("shopfront.toml")
    }

    /// Read a config file, falling back to defaults when it is missing or
    /// malformed. A bad file is worth a warning, never a crash.
    pub fn load_from(path: &str) -> Config {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Config::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path, e);
                Config::default()
            }
        }
    }
}
