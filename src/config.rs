//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub dev_server: DevServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storefront backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the cookie holding the CSRF token
    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,

    /// Header the CSRF token is sent in
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    /// Initial cookie string (`name=value; name2=value2`)
    #[serde(default)]
    pub cookie: Option<String>,

    /// Request timeout in milliseconds. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_csrf_header() -> String {
    "X-CSRFToken".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            csrf_cookie: default_csrf_cookie(),
            csrf_header: default_csrf_header(),
            cookie: None,
            request_timeout_ms: None,
        }
    }
}

/// Page behaviour timings and limits
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_search_min_chars")]
    pub search_min_chars: usize,

    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_ms: u64,

    #[serde(default = "default_page_alert_ttl")]
    pub page_alert_ttl_ms: u64,

    #[serde(default = "default_max_stock")]
    pub default_max_stock: u32,

    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

fn default_search_debounce() -> u64 {
    300
}

fn default_search_min_chars() -> usize {
    2
}

fn default_notification_ttl() -> u64 {
    3000
}

fn default_page_alert_ttl() -> u64 {
    5000
}

fn default_max_stock() -> u32 {
    99
}

fn default_placeholder_image() -> String {
    "/static/images/placeholder.jpg".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce(),
            search_min_chars: default_search_min_chars(),
            notification_ttl_ms: default_notification_ttl(),
            page_alert_ttl_ms: default_page_alert_ttl(),
            default_max_stock: default_max_stock(),
            placeholder_image: default_placeholder_image(),
        }
    }
}

impl UiConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn page_alert_ttl(&self) -> Duration {
        Duration::from_millis(self.page_alert_ttl_ms)
    }
}

/// Development backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_dev_host")]
    pub host: String,

    #[serde(default = "default_dev_port")]
    pub port: u16,
}

fn default_dev_host() -> String {
    "127.0.0.1".to_string()
}

fn default_dev_port() -> u16 {
    8000
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_dev_host(),
            port: default_dev_port(),
        }
    }
}

impl DevServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level when set.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("vibemart={}", self.level)));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry.with(tracing_subscriber::fmt::layer().json()).try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("tracing already initialised: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("vibemart").join("config.toml")),
            Some(PathBuf::from("/etc/vibemart/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VIBEMART_BASE_URL") {
            self.backend.base_url = url;
        }
        if let Ok(name) = std::env::var("VIBEMART_CSRF_COOKIE") {
            self.backend.csrf_cookie = name;
        }

        if let Ok(ms) = std::env::var("VIBEMART_SEARCH_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse() {
                self.ui.search_debounce_ms = ms;
            }
        }

        if let Ok(host) = std::env::var("VIBEMART_DEV_HOST") {
            self.dev_server.host = host;
        }
        if let Ok(port) = std::env::var("VIBEMART_DEV_PORT") {
            if let Ok(p) = port.parse() {
                self.dev_server.port = p;
            }
        }

        if let Ok(level) = std::env::var("VIBEMART_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VIBEMART_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# VibeMart Client Configuration
#
# Environment variables override these settings:
# - VIBEMART_BASE_URL
# - VIBEMART_CSRF_COOKIE
# - VIBEMART_SEARCH_DEBOUNCE_MS
# - VIBEMART_DEV_HOST
# - VIBEMART_DEV_PORT
# - VIBEMART_LOG_LEVEL
# - VIBEMART_LOG_FORMAT

[backend]
# Storefront server URL
base_url = "http://localhost:8000"

# Cookie holding the CSRF token, and the header it is echoed in
csrf_cookie = "csrftoken"
csrf_header = "X-CSRFToken"

# Initial cookies, as a browser would send them
# cookie = "csrftoken=abc123; sessionid=xyz"

# Request timeout (ms). Leave unset for no timeout.
# request_timeout_ms = 10000

[ui]
# Quiet period before a search query is sent (ms)
search_debounce_ms = 300

# Shorter queries hide the results panel instead of searching
search_min_chars = 2

# Lifetime of runtime notifications (ms)
notification_ttl_ms = 3000

# Lifetime of alerts rendered with the page (ms)
page_alert_ttl_ms = 5000

# Stepper upper bound when a line item carries none
default_max_stock = 99

# Image used for search results without a product image
placeholder_image = "/static/images/placeholder.jpg"

[dev_server]
host = "127.0.0.1"
port = 8000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.csrf_cookie, "csrftoken");
        assert_eq!(config.backend.csrf_header, "X-CSRFToken");
        assert_eq!(config.ui.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.ui.search_min_chars, 2);
        assert_eq!(config.ui.notification_ttl(), Duration::from_secs(3));
        assert_eq!(config.ui.page_alert_ttl(), Duration::from_secs(5));
        assert_eq!(config.ui.default_max_stock, 99);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert_eq!(config.dev_server.addr(), "127.0.0.1:8000");
        assert!(config.backend.cookie.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui]\nsearch_debounce_ms = 150").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ui.search_debounce_ms, 150);
        assert_eq!(config.ui.notification_ttl_ms, 3000);
        assert_eq!(config.backend.csrf_cookie, "csrftoken");
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui\nbroken").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/vibemart.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
