//! Command implementations

pub mod bootstrap;
pub mod list;
pub mod order;
pub mod version;
