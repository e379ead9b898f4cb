//! Project tree builders
//!
//! A [`TestProject`] owns a temporary directory laid out like an installed
//! project: an optional local manifest at the root and packages under
//! `node_modules`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary project tree
pub struct TestProject {
    dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel` inside the project
    pub fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(rel)
        }
    }

    /// Write a local manifest with just a name
    pub fn local(&self, name: &str) -> &Self {
        self.manifest("", json!({ "name": name }))
    }

    /// Write `node_modules/<package>/titan.json` with just a name
    pub fn package(&self, package: &str, name: &str) -> &Self {
        self.manifest(&format!("node_modules/{}", package), json!({ "name": name }))
    }

    /// Write a manifest document at `rel`
    pub fn manifest(&self, rel: &str, manifest: Value) -> &Self {
        self.file(
            &join(rel, "titan.json"),
            &serde_json::to_string_pretty(&manifest).expect("Failed to encode manifest"),
        )
    }

    /// Write manifest text at `rel` exactly as given
    pub fn manifest_text(&self, rel: &str, manifest: &str) -> &Self {
        self.file(&join(rel, "titan.json"), manifest)
    }

    /// Write a package.json at `rel` listing runtime dependencies
    pub fn depends(&self, rel: &str, deps: &[&str]) -> &Self {
        let deps: serde_json::Map<String, Value> = deps
            .iter()
            .map(|d| (d.to_string(), json!("*")))
            .collect();
        self.package_json(rel, json!({ "dependencies": deps }))
    }

    /// Write a package.json document at `rel`
    pub fn package_json(&self, rel: &str, package: Value) -> &Self {
        self.file(
            &join(rel, "package.json"),
            &serde_json::to_string_pretty(&package).expect("Failed to encode package.json"),
        )
    }

    /// Write an arbitrary file, creating parent directories
    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write file");
        self
    }

    /// Create an empty directory
    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).expect("Failed to create dir");
        self
    }
}

fn join(rel: &str, file: &str) -> String {
    if rel.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", rel.trim_end_matches('/'), file)
    }
}

/// Manifest text declaring a native binding.
///
/// `functions` and `hooks` are raw JSON objects so their key order reaches
/// the file untouched.
pub fn native_manifest(name: &str, location: &str, functions: &str, hooks: &str) -> String {
    format!(
        r#"{{
    "name": {},
    "nativeBinding": {{
        "location": {},
        "functions": {},
        "hooks": {}
    }}
}}"#,
        json!(name),
        json!(location),
        functions,
        hooks
    )
}
