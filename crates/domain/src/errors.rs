//! Error types used throughout the application

use thiserror::Error;

/// Main error type for TimeSync
#[derive(Error, Debug)]
pub enum TimeSyncError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Failures raised by the provider sync subsystem.
///
/// Validation and resolution errors abort the requested operation before any
/// provider is invoked. `SyncFailure` keeps the provider's original error as
/// its source for diagnostics.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Time entry sync provider '{requested}' is not supported. Available providers: {}",
        .available.join(", ")
    )]
    UnsupportedProvider { requested: String, available: Vec<String> },

    #[error("Failed to create sync service for provider '{provider}': {detail}")]
    ResolutionFailure { provider: String, detail: String },

    #[error("Failed to sync entries to provider '{provider}': {source}")]
    SyncFailure {
        provider: String,
        #[source]
        source: Box<TimeSyncError>,
    },
}

impl SyncError {
    /// Stable label used in logs and API error bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::ResolutionFailure { .. } => "resolution_failure",
            Self::SyncFailure { .. } => "sync_failure",
        }
    }
}

impl TimeSyncError {
    /// Stable label used in logs and API error bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
            Self::Sync(err) => err.label(),
        }
    }
}

/// Result type alias for TimeSync operations
pub type Result<T> = std::result::Result<T, TimeSyncError>;
