//! package.json dependency metadata

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Package metadata file consulted for dependency ordering
pub const PACKAGE_FILE: &str = "package.json";

/// The subset of package.json used to order extensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: IndexMap<String, serde_json::Value>,

    /// Peer dependencies
    #[serde(default)]
    pub peer_dependencies: IndexMap<String, serde_json::Value>,

    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, serde_json::Value>,
}

impl PackageMetadata {
    /// Runtime, peer, and development dependency names merged in that order.
    ///
    /// A name declared in several sections appears once, at its first position.
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for section in [
            &self.dependencies,
            &self.peer_dependencies,
            &self.dev_dependencies,
        ] {
            for name in section.keys() {
                names.insert(name.as_str());
            }
        }
        names.into_iter().map(str::to_string).collect()
    }
}
