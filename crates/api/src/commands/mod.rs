//! HTTP handlers - transport to service bridge

pub mod export;
pub mod health;
pub mod projects;
pub mod sync;
pub mod tracking;
pub mod users;
