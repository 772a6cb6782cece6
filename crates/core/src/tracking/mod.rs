//! Time entry recording

pub mod ports;
pub mod service;

pub use ports::{TimeEntryRepository, UnitOfWork, UnitOfWorkFactory};
pub use service::TimeEntryService;
