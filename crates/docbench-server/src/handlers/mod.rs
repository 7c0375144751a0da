//! Request handlers.

pub mod page;
pub mod records;
pub mod stats;
