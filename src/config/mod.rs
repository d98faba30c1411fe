//! Configuration management for flagfetch.
//!
//! Configuration is read from `~/.config/flagfetch/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! The loaded value is treated as immutable for the lifetime of the fetcher.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URI: &str = "https://sdk.launchdarkly.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_POLL_INTERVAL: &str = "1s";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key sent in the `Authorization` header
    pub sdk_key: String,

    /// Base URL every resource path is appended to
    pub base_uri: String,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Maximum number of cached responses; 0 disables caching (default: 100)
    pub cache_capacity: usize,

    /// Interval between polls, e.g. "1s", "500ms", "30s" (default: "1s")
    pub poll_interval: String,

    /// User agent override
    pub user_agent: Option<String>,

    pub tls: TlsSettings,

    pub proxy: Option<ProxySettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sdk_key: String::new(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL.to_string(),
            user_agent: None,
            tls: TlsSettings::default(),
            proxy: None,
        }
    }
}

/// TLS parameters handed through to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// Extra PEM bundle trusted in addition to the system roots
    pub ca_cert_path: Option<PathBuf>,

    /// Skip certificate verification entirely
    pub insecure_skip_verify: bool,
}

/// Outbound proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ProxySettings {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path: `~/.config/flagfetch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("flagfetch").join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# flagfetch configuration

# Key sent as the Authorization header
sdk_key = ""

# Base URL of the flag service
base_uri = "https://sdk.launchdarkly.com"

# Per-request timeout in seconds
timeout_secs = 10

# Number of responses remembered for conditional requests (0 disables)
cache_capacity = 100

# Interval between polls ("500ms", "1s", "30s", "5m")
poll_interval = "1s"

# user_agent = "my-service/1.0"

[tls]
# Extra PEM bundle to trust
# ca_cert_path = "/etc/ssl/certs/internal-ca.pem"
insecure_skip_verify = false

# [proxy]
# url = "http://proxy.internal:3128"
# username = "user"
# password = "secret"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
