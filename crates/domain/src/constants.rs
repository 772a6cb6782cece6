//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Provider identities
pub const CLOCKIFY_PROVIDER: &str = "Clockify";
pub const TOGGL_PROVIDER: &str = "Toggl";

// Setting keys read by providers at call time
pub const CLOCKIFY_API_KEY_SETTING: &str = "clockify.api_key";
pub const CLOCKIFY_WORKSPACE_SETTING: &str = "clockify.workspace_id";

// Clockify wire protocol
pub const CLOCKIFY_DEFAULT_BASE_URL: &str = "https://api.clockify.me/api/v1";
pub const CLOCKIFY_API_KEY_HEADER: &str = "X-Api-Key";
/// UTC timestamp format expected by Clockify (second precision, `Z` suffix).
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// Simulated delivery delays
pub const CLOCKIFY_SIMULATED_DELAY_MS: u64 = 200;
pub const TOGGL_SIMULATED_DELAY_MS: u64 = 100;

// Sync orchestration
pub const DEFAULT_MAX_PARALLEL_PROVIDERS: usize = 8;
pub const PENDING_SYNC_WINDOW_DAYS: i64 = 7;

// Entity limits
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EXTERNAL_ID_LENGTH: usize = 50;
