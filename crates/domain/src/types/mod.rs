//! Domain types

pub mod entities;
pub mod report;
pub mod sync;

pub use entities::*;
pub use report::*;
pub use sync::*;
