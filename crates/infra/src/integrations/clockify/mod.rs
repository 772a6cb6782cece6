//! Clockify integration
//!
//! Implements the `SyncProvider` port against the Clockify REST API
//! (`POST /workspaces/{workspaceId}/time-entries`, `X-Api-Key` auth).

pub mod provider;
pub mod types;

pub use provider::ClockifySyncProvider;
pub use types::{ClockifyTimeEntryRequest, ClockifyTimeEntryResponse};
