//! # TimeSync API
//!
//! HTTP transport and composition root.
//!
//! This crate contains:
//! - axum handlers (transport to service bridge)
//! - Application context (dependency wiring)
//! - The `timesync` binary entry point
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Handlers stay thin; rules live in `timesync-core`

pub mod commands;
pub mod context;
pub mod error;
pub mod router;
pub mod utils;

pub use context::AppContext;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::build_router;
