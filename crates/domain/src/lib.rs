//! # TimeSync Domain
//!
//! Business domain types and models for TimeSync.
//!
//! This crate contains:
//! - Persisted entities and their creation payloads
//! - Sync transport records and call results
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other TimeSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
