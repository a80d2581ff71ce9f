use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Capital used when ranking yield pools
    #[serde(default = "default_capital")]
    pub capital: f64,
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_secs: u64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_prefs_path")]
    pub prefs_path: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

fn default_base_url() -> String { "https://lechat-backend-preview.repl.co".to_string() }
fn default_timeout() -> u64 { 10 }
fn default_interval() -> u64 { 30 }
fn default_capital() -> f64 { 10_000.0 }
fn default_notification_ttl() -> u64 { 4 }
fn default_log_capacity() -> usize { 20 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_prefs_path() -> String { "./data/prefs.json".to_string() }
fn default_report_dir() -> String { "./data/reports".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            capital: default_capital(),
            notification_ttl_secs: default_notification_ttl(),
            log_capacity: default_log_capacity(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefs_path: default_prefs_path(),
            report_dir: default_report_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            tracing::warn!("{} not found, using defaults", path.display());
            Config::default()
        };

        if let Ok(base) = std::env::var("ROYAL_API_BASE") {
            if !base.trim().is_empty() {
                config.api.base_url = base;
            }
        }

        Ok(config)
    }
}
