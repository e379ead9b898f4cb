//! Type definitions for extension descriptors and native bindings

mod extension_types;
mod native_types;
mod package_types;

pub use extension_types::*;
pub use native_types::*;
pub use package_types::*;
