//! Extension pipeline for Titan
//!
//! This crate handles:
//! - Extension discovery (local project and node_modules tree)
//! - Load ordering from package dependencies
//! - Native binding and serialization hooks
//! - Entry module execution
//! - The shared namespace and its host exposure

pub mod activation;
pub mod bootstrap;
pub mod dependency;
pub mod host;
pub mod loader;
pub mod manifest;
pub mod namespace;
pub mod native;
pub mod scanner;
pub mod serialization;

pub use activation::ActivationEngine;
pub use bootstrap::{bootstrap, is_active, list_discovered, Bootstrapper};
pub use dependency::{order_extensions, BrokenEdge, DependencyGraph, SortOutcome};
pub use host::{active, global, GlobalHost, HostEnvironment};
pub use loader::{CommandModuleLoader, ModuleContext, ModuleLoader};
pub use manifest::ManifestStore;
pub use namespace::{Bag, Binding, Callable, Namespace, SharedNamespace, Slot};
pub use native::{LibloadingService, LibraryHandle, NativeBindingService};
pub use scanner::{discover, ExtensionScanner};
pub use serialization::{JsonSerialization, SerializationService};
