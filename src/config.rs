// ⚙️ Engine Configuration
// Environment first (.env supported), JSON file as an alternative.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite database holding the reference tables
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// tracing filter directive (e.g. "info", "atse_pricing=debug")
    #[serde(default = "default_log")]
    pub log: String,

    /// Listen address for the HTTP server
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    /// Collect per-rule diagnostics on every validation
    #[serde(default)]
    pub diagnostic: bool,

    /// ICER active: BSR conversions always use the direct rate
    #[serde(default = "default_icer")]
    pub icer_active: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("atse.db")
}

fn default_log() -> String {
    "info".to_string()
}

fn default_server_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_icer() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            db_path: default_db_path(),
            log: default_log(),
            server_addr: default_server_addr(),
            diagnostic: false,
            icer_active: default_icer(),
        }
    }
}

impl EngineConfig {
    /// Build from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = EngineConfig::default();

        EngineConfig {
            db_path: env::var("ATSE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log: env::var("ATSE_LOG").unwrap_or(defaults.log),
            server_addr: env::var("ATSE_SERVER_ADDR").unwrap_or(defaults.server_addr),
            diagnostic: env::var("ATSE_DIAGNOSTIC")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.diagnostic),
            icer_active: env::var("ATSE_ICER_ACTIVE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.icer_active),
        }
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
