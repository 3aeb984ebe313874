//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::auth::{Credentials, DEFAULT_BEARER_TOKEN};
use crate::error::{Error, Result};
use crate::fs::naming::TimestampZone;
use crate::fs::paths::{default_cache_file, default_download_dir};
use crate::media::ExtractOptions;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Session credentials for the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Raw `Cookie` header copied from the browser.
    #[serde(default)]
    pub cookie: Option<String>,

    /// CSRF token; read from the `ct0` cookie when absent.
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Bearer token of the web client.
    #[serde(default = "default_bearer_token")]
    pub bearer_token: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory downloads are written to.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Platform host the detail endpoint is called on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Whether multiple images are bundled into one archive.
    #[serde(default = "default_true")]
    pub bundle_images: bool,

    /// Seconds an archive handle stays alive after submission.
    #[serde(default = "default_release_delay")]
    pub archive_release_delay_seconds: u64,

    #[serde(default)]
    pub timestamp_zone: TimestampZone,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            host: default_host(),
            bundle_images: true,
            archive_release_delay_seconds: default_release_delay(),
            timestamp_zone: TimestampZone::default(),
            show_downloads: true,
        }
    }
}

/// Session cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the session cache is persisted between invocations.
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
}

fn default_bearer_token() -> String {
    DEFAULT_BEARER_TOKEN.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_host() -> String {
    "x.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_release_delay() -> u64 {
    60
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            cookie: None,
            csrf_token: None,
            bearer_token: default_bearer_token(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file gives defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(default_download_dir)
    }

    /// Get the effective session cache location.
    pub fn cache_file(&self) -> PathBuf {
        self.session
            .cache_file
            .clone()
            .unwrap_or_else(default_cache_file)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            zone: self.options.timestamp_zone,
        }
    }

    pub fn archive_release_delay(&self) -> Duration {
        Duration::from_secs(self.options.archive_release_delay_seconds)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            cookie: self.account.cookie.clone(),
            csrf_token: self.account.csrf_token.clone(),
            bearer_token: self.account.bearer_token.clone(),
        }
    }
}
