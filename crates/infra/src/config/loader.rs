//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TIMESYNC_DB_PATH` is missing or a value is invalid, falls back to a file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TIMESYNC_DB_PATH`: Database file path (required)
//! - `TIMESYNC_DB_POOL_SIZE`: Connection pool size
//! - `TIMESYNC_SERVER_ADDR`: HTTP bind address
//! - `TIMESYNC_SIMULATE_WHEN_UNCONFIGURED`: Simulate delivery without credentials (true/false)
//! - `TIMESYNC_MAX_PARALLEL`: Concurrent provider syncs in a fan-out
//! - `TIMESYNC_CLOCKIFY_BASE_URL`: Clockify API base URL
//! - `TIMESYNC_CLOCKIFY_TIMEOUT_SECS`: Clockify request timeout
//!
//! Provider credentials are not part of [`Config`]; they are read at call
//! time through [`crate::settings`].
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./timesync.json` or `./timesync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use timesync_domain::{
    ClockifyConfig, Config, DatabaseConfig, Result, ServerConfig, SyncConfig, TimeSyncError,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "timesync.json", "timesync.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TimeSyncError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `TIMESYNC_DB_PATH` is required; every other value has a default.
///
/// # Errors
/// Returns `TimeSyncError::Config` if the database path is missing or a
/// numeric value does not parse.
pub fn load_from_env() -> Result<Config> {
    let database = DatabaseConfig {
        path: env_var("TIMESYNC_DB_PATH")?,
        pool_size: env_parse("TIMESYNC_DB_POOL_SIZE")?.unwrap_or(DatabaseConfig::DEFAULT_POOL_SIZE),
    };

    let mut server = ServerConfig::default();
    if let Some(addr) = env_opt("TIMESYNC_SERVER_ADDR") {
        server.bind_addr = addr;
    }

    let mut sync = SyncConfig::default();
    sync.simulate_when_unconfigured =
        env_bool("TIMESYNC_SIMULATE_WHEN_UNCONFIGURED", sync.simulate_when_unconfigured);
    if let Some(max_parallel) = env_parse::<usize>("TIMESYNC_MAX_PARALLEL")? {
        sync.max_parallel = max_parallel.max(1);
    }

    let mut clockify = ClockifyConfig::default();
    if let Some(base_url) = env_opt("TIMESYNC_CLOCKIFY_BASE_URL") {
        clockify.base_url = base_url;
    }
    if let Some(timeout) = env_parse("TIMESYNC_CLOCKIFY_TIMEOUT_SECS")? {
        clockify.timeout_secs = timeout;
    }

    Ok(Config { database, server, sync, clockify, settings: Default::default() })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TimeSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TimeSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            TimeSyncError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TimeSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TimeSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TimeSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TimeSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing configuration file among the search paths
///
/// Searches the working directory, its parent, and the executable's
/// directory, returning the first file that exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    let exe_dir = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TimeSyncError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable; blank counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TimeSyncError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Returns `default` when the variable is unset.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
