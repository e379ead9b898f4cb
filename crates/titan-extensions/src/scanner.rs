//! Extension discovery
//!
//! Discovery starts at a project directory. The project itself is the local
//! extension when it carries a manifest; everything else comes from the
//! `node_modules` tree beneath it, including nested installs:
//!
//! ```text
//! project/                   <- local extension (titan.json)
//! └── node_modules/
//!     ├── .bin/              <- skipped
//!     ├── @scope/            <- not a candidate, children are
//!     │   └── tools/
//!     ├── core/              <- candidate
//!     └── ui/
//!         └── node_modules/  <- nested tree, scanned after all of core, ui, ...
//!             └── widgets/
//! ```
//!
//! The first extension registered under a name wins. The local extension is
//! registered before the tree is walked, so it always beats a dependency of
//! the same name, and a store's own packages beat copies nested inside any
//! of them.
//!
//! Discovery reports only through its [`Reporter`]; a silent reporter makes
//! it emit nothing.

use crate::manifest::ManifestStore;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use titan_core::types::DiscoveredExtension;
use titan_core::Reporter;

/// Directory holding installed dependency packages
pub const PACKAGE_STORE_DIR: &str = "node_modules";

/// Executable shim directory inside a package store
const BIN_DIR: &str = ".bin";

/// Leading character of scope directories (`@scope/package`)
const SCOPE_PREFIX: char = '@';

/// Walks a project tree collecting extensions
pub struct ExtensionScanner {
    reporter: Reporter,
}

/// Discovery state for a single run
#[derive(Default)]
struct ScanState {
    found: IndexMap<String, DiscoveredExtension>,
    visited_stores: HashSet<PathBuf>,
}

impl ScanState {
    fn register(&mut self, extension: DiscoveredExtension, reporter: &Reporter) {
        if let Some(existing) = self.found.get(extension.name()) {
            reporter.debug(format!(
                "Ignoring duplicate extension '{}' at {} (already found at {})",
                extension.name(),
                extension.path.display(),
                existing.path.display()
            ));
            return;
        }
        self.found.insert(extension.name().to_string(), extension);
    }
}

impl ExtensionScanner {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Discover extensions under `root`, in discovery order
    pub fn discover(&self, root: &Path) -> Vec<DiscoveredExtension> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        self.reporter
            .debug(format!("Discovering extensions under {}", root.display()));

        let mut state = ScanState::default();

        if let Some(descriptor) = ManifestStore::read(&root, &self.reporter) {
            self.reporter
                .debug(format!("Found local extension '{}'", descriptor.name));
            state.register(
                DiscoveredExtension::new(descriptor, root.clone(), true),
                &self.reporter,
            );
        }

        self.walk_store(&root.join(PACKAGE_STORE_DIR), &mut state);

        self.reporter
            .debug(format!("Discovered {} extension(s)", state.found.len()));
        state.found.into_values().collect()
    }

    /// Scan one package store directory.
    ///
    /// Every candidate of the store is registered before any nested store is
    /// entered, so a package installed here beats copies nested below it.
    fn walk_store(&self, store: &Path, state: &mut ScanState) {
        if !store.is_dir() {
            return;
        }

        // Symlinked installs can point back up the tree
        let real = match store.canonicalize() {
            Ok(real) => real,
            Err(e) => {
                self.reporter
                    .debug(format!("Cannot resolve {}: {}", store.display(), e));
                return;
            }
        };
        if !state.visited_stores.insert(real) {
            self.reporter
                .debug(format!("Already scanned {}, skipping", store.display()));
            return;
        }

        let candidates = self.candidates(store);

        for dir in &candidates {
            if let Some(descriptor) = ManifestStore::read(dir, &self.reporter) {
                self.reporter.debug(format!(
                    "Found extension '{}' at {}",
                    descriptor.name,
                    dir.display()
                ));
                let extension = DiscoveredExtension::new(descriptor, dir.clone(), false);
                state.register(extension, &self.reporter);
            }
        }

        for dir in &candidates {
            self.walk_store(&dir.join(PACKAGE_STORE_DIR), state);
        }
    }

    /// Package directories of a store in name order, scope children inlined
    fn candidates(&self, store: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        for entry in self.sorted_entries(store) {
            let Some(name) = entry_name(&entry) else {
                continue;
            };
            if is_hidden(&name) || name == BIN_DIR {
                continue;
            }

            if name.starts_with(SCOPE_PREFIX) {
                candidates.extend(
                    self.sorted_entries(&entry)
                        .into_iter()
                        .filter(|scoped| entry_name(scoped).is_some_and(|n| !is_hidden(&n))),
                );
                continue;
            }

            candidates.push(entry);
        }

        candidates.retain(|dir| dir.is_dir());
        candidates
    }

    /// Directory entries sorted by file name; unreadable directories yield nothing
    fn sorted_entries(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.reporter
                    .debug(format!("Cannot read {}: {}", dir.display(), e));
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();
        paths
    }
}

/// Discover extensions under `root` with the given reporter
pub fn discover(root: &Path, reporter: &Reporter) -> Vec<DiscoveredExtension> {
    ExtensionScanner::new(reporter.clone()).discover(root)
}

fn entry_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
