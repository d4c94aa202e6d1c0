//! # Client Configuration
//!
//! Configuration management for the back-office client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BACKOFFICE_API_URL=https://api.loja.com.br                         │
//! │     BACKOFFICE_API_TIMEOUT_SECS=10                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice/backoffice.toml (Linux)                       │
//! │     ~/Library/Application Support/br.com.backoffice/backoffice.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080, API v1, 30 s timeout                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # backoffice.toml
//! [api]
//! base_url = "http://localhost:8080"
//! version = "v1"
//! timeout_secs = 30
//!
//! [auth]
//! token_key = "authToken"
//!
//! [ui]
//! toast_duration_ms = 4000
//! toast_sweep_interval_ms = 1000
//! search_debounce_ms = 300
//!
//! [cache]
//! subcategory_freshness_secs = 30
//!
//! [health]
//! enabled = true
//! interval_secs = 60
//! probe_timeout_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use backoffice_core::{DEFAULT_TOAST_DURATION_MS, SEARCH_DEBOUNCE_MS, SUBCATEGORY_FRESHNESS_SECS};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the catalog API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Server root, without the `/api/<version>` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version segment (`v1` → `/api/v1`).
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            version: default_api_version(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

/// Where the session token is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Key under which the token is stored.
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Explicit token file; defaults to the platform data directory.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_token_key() -> String {
    "authToken".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            token_key: default_token_key(),
            token_file: None,
        }
    }
}

// =============================================================================
// UI Settings
// =============================================================================

/// Timing of operator-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Default toast lifetime.
    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,

    /// How often the toast sweeper runs.
    #[serde(default = "default_sweep_interval")]
    pub toast_sweep_interval_ms: u64,

    /// Quiet period before a search query settles.
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

fn default_toast_duration() -> u64 {
    DEFAULT_TOAST_DURATION_MS
}

fn default_sweep_interval() -> u64 {
    1000
}

fn default_search_debounce() -> u64 {
    SEARCH_DEBOUNCE_MS
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            toast_duration_ms: default_toast_duration(),
            toast_sweep_interval_ms: default_sweep_interval(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Freshness windows per store.
///
/// `None` means every non-forced fetch goes to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub category_freshness_secs: Option<u64>,

    #[serde(default)]
    pub product_freshness_secs: Option<u64>,

    #[serde(default = "default_subcategory_freshness")]
    pub subcategory_freshness_secs: Option<u64>,
}

fn default_subcategory_freshness() -> Option<u64> {
    Some(SUBCATEGORY_FRESHNESS_SECS)
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            category_freshness_secs: None,
            product_freshness_secs: None,
            subcategory_freshness_secs: default_subcategory_freshness(),
        }
    }
}

// =============================================================================
// Health Settings
// =============================================================================

/// Background API health probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_health_interval")]
    pub interval_secs: u64,

    /// Per-probe timeout, shorter than the API request timeout.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_health_interval() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    5
}

impl Default for HealthSettings {
    fn default() -> Self {
        HealthSettings {
            enabled: true,
            interval_secs: default_health_interval(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub health: HealthSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (backoffice.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        let version = self.api.version.trim();
        if version.is_empty() || version.contains('/') {
            return Err(ClientError::InvalidConfig(format!(
                "api.version must be a single path segment, got: '{}'",
                self.api.version
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.auth.token_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig("auth.token_key must not be empty".into()));
        }

        if self.ui.toast_sweep_interval_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "ui.toast_sweep_interval_ms must be greater than 0".into(),
            ));
        }

        if self.health.interval_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "health.interval_secs must be greater than 0".into(),
            ));
        }

        if self.health.probe_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "health.probe_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BACKOFFICE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(version) = std::env::var("BACKOFFICE_API_VERSION") {
            self.api.version = version;
        }

        if let Ok(timeout) = std::env::var("BACKOFFICE_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.api.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric BACKOFFICE_API_TIMEOUT_SECS"),
            }
        }

        if let Ok(duration) = std::env::var("BACKOFFICE_TOAST_DURATION_MS") {
            if let Ok(d) = duration.parse::<u64>() {
                self.ui.toast_duration_ms = d;
            }
        }

        if let Ok(interval) = std::env::var("BACKOFFICE_HEALTH_INTERVAL_SECS") {
            if let Ok(i) = interval.parse::<u64>() {
                debug!(interval_secs = i, "Overriding health interval from environment");
                self.health.interval_secs = i;
            }
        }

        if let Ok(window) = std::env::var("BACKOFFICE_SUBCATEGORY_CACHE_SECS") {
            match window.parse::<u64>() {
                Ok(0) => self.cache.subcategory_freshness_secs = None,
                Ok(w) => self.cache.subcategory_freshness_secs = Some(w),
                Err(_) => warn!(value = %window, "Ignoring non-numeric BACKOFFICE_SUBCATEGORY_CACHE_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br.com", "backoffice", "backoffice")
            .map(|dirs| dirs.config_dir().join("backoffice.toml"))
    }

    /// Returns the default token file path.
    pub fn default_token_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br.com", "backoffice", "backoffice")
            .map(|dirs| dirs.data_dir().join("session.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Server root without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Builds `<base>/api/<version><endpoint>`.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_client::config::ClientConfig;
    ///
    /// let config = ClientConfig::default();
    /// assert_eq!(
    ///     config.api_url("/categorias"),
    ///     "http://localhost:8080/api/v1/categorias"
    /// );
    /// ```
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}{}",
            self.base_url(),
            self.api.version.trim(),
            endpoint
        )
    }

    /// `<base>/health` (outside the versioned API).
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.toast_duration_ms)
    }

    pub fn toast_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.ui.toast_sweep_interval_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.ui.search_debounce_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health.interval_secs)
    }

    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.health.probe_timeout_secs)
    }

    pub fn category_freshness(&self) -> Option<Duration> {
        self.cache.category_freshness_secs.map(Duration::from_secs)
    }

    pub fn product_freshness(&self) -> Option<Duration> {
        self.cache.product_freshness_secs.map(Duration::from_secs)
    }

    pub fn subcategory_freshness(&self) -> Option<Duration> {
        self.cache.subcategory_freshness_secs.map(Duration::from_secs)
    }
}
