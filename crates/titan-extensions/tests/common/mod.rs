//! Common test utilities for titan-extensions
//!
//! This module provides shared test infrastructure including:
//! - Project tree builders writing manifests into temporary directories
//! - Mock binding services, module loaders, hosts and log sinks
//! - Assertion helpers for load order and namespace contents

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod builders;
pub mod mocks;

pub use assertions::*;
pub use builders::*;
pub use mocks::*;
