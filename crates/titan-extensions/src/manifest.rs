//! Extension manifest loading
//!
//! Every candidate directory may carry a `titan.json` at its root. A missing
//! manifest simply means the directory is not an extension; a malformed one
//! is reported as a warning and otherwise treated the same way.

use std::path::Path;
use titan_core::types::{ExtensionDescriptor, PackageMetadata, MANIFEST_FILE, PACKAGE_FILE};
use titan_core::{Error, Reporter, Result};
use tracing::debug;

/// Reads extension descriptors from directories
pub struct ManifestStore;

impl ManifestStore {
    /// Read the descriptor in `dir`, if any.
    ///
    /// Returns `None` without logging when no manifest exists, and `None`
    /// with a warning when the manifest cannot be used.
    pub fn read(dir: &Path, reporter: &Reporter) -> Option<ExtensionDescriptor> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return None;
        }

        match Self::parse(&manifest_path) {
            Ok(descriptor) => {
                reporter.debug(format!(
                    "Loaded manifest for '{}' from {}",
                    descriptor.name,
                    manifest_path.display()
                ));
                Some(descriptor)
            }
            Err(e) => {
                reporter.warn(format!("Skipping extension at {}: {}", dir.display(), e));
                None
            }
        }
    }

    /// Parse and validate a manifest file
    pub fn parse(manifest_path: &Path) -> Result<ExtensionDescriptor> {
        let content = std::fs::read_to_string(manifest_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::manifest_not_found(manifest_path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        Self::parse_str(&content).map_err(|e| {
            Error::invalid_manifest(manifest_path.display().to_string(), e.to_string())
        })
    }

    /// Parse and validate manifest content.
    ///
    /// Functions and hooks keep the order they are declared in.
    pub fn parse_str(content: &str) -> Result<ExtensionDescriptor> {
        let descriptor: ExtensionDescriptor = serde_json::from_str(content)?;
        if descriptor.name.trim().is_empty() {
            return Err(Error::missing_field("name"));
        }
        Ok(descriptor)
    }
}

/// Read package.json from `dir`.
///
/// Missing or malformed files yield empty metadata: dependency information
/// only influences ordering, never whether an extension loads.
pub fn read_package_metadata(dir: &Path) -> PackageMetadata {
    let package_path = dir.join(PACKAGE_FILE);
    let Ok(content) = std::fs::read_to_string(&package_path) else {
        return PackageMetadata::default();
    };

    match serde_json::from_str(&content) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Ignoring unreadable {:?}: {}", package_path, e);
            PackageMetadata::default()
        }
    }
}
