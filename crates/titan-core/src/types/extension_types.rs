//! Extension descriptor types matching the titan.json manifest

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest file name looked up at the root of every candidate directory
pub const MANIFEST_FILE: &str = "titan.json";

/// Entry module used when a manifest does not declare one
pub const DEFAULT_ENTRY_MODULE: &str = "index.js";

/// Extension descriptor parsed from titan.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    /// Unique extension name; blank when absent, rejected by manifest validation
    #[serde(default)]
    pub name: String,

    /// Initialization module, relative to the extension directory
    #[serde(default)]
    pub entry_module: Option<String>,

    /// Native library binding
    #[serde(default)]
    pub native_binding: Option<NativeBindingSpec>,
}

impl ExtensionDescriptor {
    /// Create a descriptor with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_module: None,
            native_binding: None,
        }
    }

    /// Declared entry module or the conventional default
    pub fn entry_module_or_default(&self) -> &str {
        self.entry_module.as_deref().unwrap_or(DEFAULT_ENTRY_MODULE)
    }
}

/// Native library binding declared by an extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeBindingSpec {
    /// Library path; relative paths resolve against the extension directory
    pub location: String,

    /// Exported name -> native function declaration, in declaration order
    #[serde(default)]
    pub functions: IndexMap<String, FunctionSpec>,

    /// Serialization hook flags (`serialize`, `deserialize`)
    #[serde(default)]
    pub hooks: IndexMap<String, bool>,
}

/// A single native function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Symbol exported by the native library
    pub symbol: String,

    /// Logical parameter type names
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Logical result type name
    #[serde(default = "default_result_type")]
    pub result: String,
}

fn default_result_type() -> String {
    "void".to_string()
}

/// Serialization hooks that bind straight to the serialization service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationHook {
    Serialize,
    Deserialize,
}

impl SerializationHook {
    /// Parse a hook name from the manifest
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "serialize" => Some(Self::Serialize),
            "deserialize" => Some(Self::Deserialize),
            _ => None,
        }
    }

    /// Name the hook is bound under in the namespace
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
        }
    }
}

impl std::fmt::Display for SerializationHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extension found during discovery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredExtension {
    /// Parsed manifest
    pub descriptor: ExtensionDescriptor,

    /// Absolute extension directory
    pub path: PathBuf,

    /// True only for the extension rooted at the scan directory
    pub is_local: bool,
}

impl DiscoveredExtension {
    pub fn new(descriptor: ExtensionDescriptor, path: impl Into<PathBuf>, is_local: bool) -> Self {
        Self {
            descriptor,
            path: path.into(),
            is_local,
        }
    }

    /// Extension name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Extension directory
    pub fn dir(&self) -> &Path {
        &self.path
    }

    /// Resolve a manifest-relative path against the extension directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let candidate = Path::new(relative);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.path.join(candidate)
        }
    }

    /// Absolute path of the entry module
    pub fn entry_module_path(&self) -> PathBuf {
        self.resolve(self.descriptor.entry_module_or_default())
    }
}
