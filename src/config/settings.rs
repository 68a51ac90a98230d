//! Configuration settings for signaldesk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix for layered overrides (`SIGNALDESK__BACKEND__MAX_RETRIES=5`).
const ENV_PREFIX: &str = "SIGNALDESK";
/// Backend base URL, shared with the deployment environment.
const ENV_BACKEND_URL: &str = "API_BASE_URL";
/// Bearer credential for the backend admin API.
const ENV_API_KEY: &str = "ADMIN_API_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Proxy server configuration.
    pub server: ServerConfig,
    /// Remote backend configuration.
    pub backend: BackendConfig,
    /// Per-resource proxy policies.
    pub resources: ResourcesConfig,
    /// Dashboard data loading.
    pub feed: FeedConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file and process environment.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let vars: config::Map<String, String> = std::env::vars().collect();
        Self::load_with_env(path, vars)
    }

    /// Load configuration from file, layering the given environment on top.
    ///
    /// Layers, lowest first: built-in defaults, the TOML file (optional),
    /// `SIGNALDESK__SECTION__KEY` variables, then `API_BASE_URL` and
    /// `ADMIN_API_KEY`.
    pub fn load_with_env(
        path: Option<PathBuf>,
        vars: config::Map<String, String>,
    ) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(super::default_config_path);

        let layered = config::Config::builder()
            .add_source(
                config::File::new(&config_path.to_string_lossy(), config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .build()?;

        let mut config: Self = layered.try_deserialize()?;
        config.apply_env_overrides(&vars);
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, vars: &config::Map<String, String>) {
        if let Some(url) = vars.get(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        if let Some(key) = vars.get(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.backend.api_key = Some(key.trim().to_string());
        }
    }

    /// Reject settings the runtime cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.feed.page_size == 0 {
            return Err(crate::Error::config("feed.page_size must be at least 1"));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(crate::Error::config("backend.base_url must not be empty"));
        }
        reqwest::Url::parse(&self.backend.base_url)
            .map_err(|e| crate::Error::config(format!("backend.base_url: {e}")))?;
        reqwest::Url::parse(&self.feed.api_url)
            .map_err(|e| crate::Error::config(format!("feed.api_url: {e}")))?;
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<&Path>) -> crate::Result<()> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(super::default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML. The API key is never written out.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))
    }
}

/// Proxy server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the proxy listens on.
    pub bind_addr: String,
    /// Allow any origin to call the proxy.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            cors_permissive: true,
        }
    }
}

/// Remote backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL, including any `/api` prefix.
    pub base_url: String,
    /// Bearer credential for authenticated resources.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum attempts per request, including the first.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; doubles per attempt.
    pub backoff_base_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl BackendConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base backoff delay as a duration.
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

/// How the proxy treats one backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicy {
    /// Answer with the mock payload instead of an error envelope.
    pub degrade_to_mock_on_failure: bool,
    /// Attach the bearer credential; fail if none is configured.
    pub requires_auth: bool,
}

impl ResourcePolicy {
    /// Policy that surfaces errors and needs no credential.
    pub const fn strict() -> Self {
        Self {
            degrade_to_mock_on_failure: false,
            requires_auth: false,
        }
    }

    /// Policy that falls back to mock data and needs no credential.
    pub const fn degrading() -> Self {
        Self {
            degrade_to_mock_on_failure: true,
            requires_auth: false,
        }
    }

    /// Policy that surfaces errors and sends the bearer credential.
    pub const fn authenticated() -> Self {
        Self {
            degrade_to_mock_on_failure: false,
            requires_auth: true,
        }
    }
}

/// Per-resource proxy policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub posts: ResourcePolicy,
    pub queued_trades: ResourcePolicy,
    pub executed_trades: ResourcePolicy,
    pub queued_trades_by_post: ResourcePolicy,
    pub executed_trades_by_post: ResourcePolicy,
    pub author: ResourcePolicy,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            posts: ResourcePolicy::strict(),
            queued_trades: ResourcePolicy::degrading(),
            executed_trades: ResourcePolicy::degrading(),
            queued_trades_by_post: ResourcePolicy::authenticated(),
            executed_trades_by_post: ResourcePolicy::authenticated(),
            author: ResourcePolicy::authenticated(),
        }
    }
}

/// Dashboard data loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the proxy API the dashboard reads from.
    pub api_url: String,
    /// Posts per page.
    pub page_size: usize,
    /// Snapshot cache lifetime in seconds (0 disables the cache).
    pub cache_ttl_secs: u64,
    /// Post status requested from the backend.
    pub status_filter: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000/api".to_string(),
            page_size: 20,
            cache_ttl_secs: 300,
            status_filter: "completed".to_string(),
        }
    }
}

impl FeedConfig {
    /// Snapshot cache lifetime, if caching is enabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Show the key hint line at the bottom.
    pub show_help_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            show_help_bar: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Refresh data from page 0.
    pub refresh: String,
    /// Load the next page of posts.
    pub load_more: String,
    /// Switch to the post feed.
    pub feed: String,
    /// Switch to the trades view.
    pub trades: String,
    /// Jump to the first row.
    pub top: String,
    /// Jump to the last row.
    pub bottom: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            refresh: "r".to_string(),
            load_more: "m".to_string(),
            feed: "1".to_string(),
            trades: "2".to_string(),
            top: "g".to_string(),
            bottom: "Shift+g".to_string(),
        }
    }
}
