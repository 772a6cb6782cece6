//! Configuration structures
//!
//! Loaded by `timesync_infra::config` from environment variables or a
//! JSON/TOML file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CLOCKIFY_DEFAULT_BASE_URL, DEFAULT_MAX_PARALLEL_PROVIDERS};

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub clockify: ClockifyConfig,
    /// Provider credentials keyed by setting name (`clockify.api_key`, ...).
    ///
    /// Read through a settings source at call time, so edits made by a
    /// reloaded source are picked up without rebuilding providers.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl DatabaseConfig {
    pub const DEFAULT_POOL_SIZE: u32 = 4;

    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), pool_size: Self::DEFAULT_POOL_SIZE }
    }
}

impl Config {
    /// Defaults for everything but the database location.
    pub fn with_database(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig::new(path),
            server: ServerConfig::default(),
            sync: SyncConfig::default(),
            clockify: ClockifyConfig::default(),
            settings: BTreeMap::new(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr() }
    }
}

/// Provider sync behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Degrade to simulated delivery when provider credentials are missing.
    ///
    /// When disabled, a provider without credentials fails the batch with a
    /// configuration error instead.
    #[serde(default = "default_true")]
    pub simulate_when_unconfigured: bool,
    /// Upper bound on concurrently running provider syncs in a fan-out.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { simulate_when_unconfigured: true, max_parallel: DEFAULT_MAX_PARALLEL_PROVIDERS }
    }
}

/// Clockify endpoint settings (credentials live in [`Config::settings`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockifyConfig {
    #[serde(default = "default_clockify_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClockifyConfig {
    fn default() -> Self {
        Self { base_url: default_clockify_base_url(), timeout_secs: default_timeout_secs() }
    }
}

fn default_pool_size() -> u32 {
    DatabaseConfig::DEFAULT_POOL_SIZE
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_parallel() -> usize {
    DEFAULT_MAX_PARALLEL_PROVIDERS
}

fn default_clockify_base_url() -> String {
    CLOCKIFY_DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
