//! Build and layout facts reported by `titan version`

use serde::Serialize;
use titan_core::types::{MANIFEST_FILE, PACKAGE_FILE};
use titan_extensions::host::HOST_BINDINGS;
use titan_extensions::loader::DEFAULT_INTERPRETER;
use titan_extensions::scanner::PACKAGE_STORE_DIR;

/// What this build looks for and where it publishes
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: String,
    pub manifest: String,
    pub package_metadata: String,
    pub package_store: String,
    pub interpreter: String,
    pub globals: Vec<String>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            manifest: MANIFEST_FILE.to_string(),
            package_metadata: PACKAGE_FILE.to_string(),
            package_store: PACKAGE_STORE_DIR.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            globals: HOST_BINDINGS.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Layout facts as label/value pairs
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("manifest", self.manifest.clone()),
            ("dependencies", self.package_metadata.clone()),
            ("package store", self.package_store.clone()),
            ("interpreter", self.interpreter.clone()),
            ("globals", self.globals.join(", ")),
        ]
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "titan {}", self.version)
    }
}
