//! # titan-core
//!
//! Core library for the Titan extension pipeline providing:
//! - Extension descriptor types (titan.json)
//! - Package dependency metadata (package.json)
//! - Native type alias table
//! - Bootstrap configuration and the logging side channel

pub mod config;
pub mod error;
pub mod log;
pub mod types;

pub use config::BootstrapConfig;
pub use error::{Error, Result};
pub use log::{LogSink, Reporter, TracingSink};
