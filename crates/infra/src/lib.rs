//! # TimeSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite repositories and the transactional unit of work
//! - The retrying HTTP client
//! - Configuration loading and settings sources
//! - Sync provider adapters (Clockify, simulated Toggl)
//!
//! ## Architecture
//! - Implements traits defined in `timesync-core`
//! - Contains all "impure" code (I/O, network, environment)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod settings;

pub use database::*;
pub use errors::{InfraError, IntoDomainError};
pub use http::*;
pub use integrations::{default_registrations, ClockifySyncProvider, SimulatedSyncProvider};
pub use settings::{EnvSettings, LayeredSettings, StaticSettings};
