//! Configuration module
//!
//! Loads system configuration from a JSON file, with per-field defaults.
//! The provider API key is resolved from the environment first.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::services::quote_service::API_KEY_ENV;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker thread count (0 means number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

/// Quote provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Provider API key (empty means not configured; the environment
    /// variable takes precedence)
    #[serde(default)]
    pub api_key: String,
    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Dashboard API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Access key for the dashboard itself (empty disables authentication,
    /// for local use)
    #[serde(default)]
    pub access_key: String,
}

/// Log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Quote provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Dashboard API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Log configuration
    #[serde(default)]
    pub log: LogConfig,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://www.alphavantage.co".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            api: ApiConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, preferring a file, falling back to defaults.
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("loaded configuration from {}", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("failed to load configuration file {}: {}", path, e);
                    }
                }
            }
        }

        log::info!("using default configuration");
        Self::default()
    }

    /// Server bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the provider API key: environment variable first, config
    /// file second, `None` when both are absent. Read once at startup.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Some(key);
            }
        }

        if self.provider.api_key.trim().is_empty() {
            None
        } else {
            Some(self.provider.api_key.trim().to_string())
        }
    }
}
