//! Discovery integration tests
//!
//! Tests extension discovery including:
//! - Local extension precedence
//! - Deduplication across nested package stores
//! - Scoped packages and skipped directories
//! - Malformed manifests

mod common;

use common::*;
use serde_json::json;
use titan_core::Reporter;
use titan_extensions::{discover, list_discovered};

#[cfg(test)]
mod discovery_tests {
    use super::*;

    #[test]
    fn test_local_extension_beats_dependency_of_same_name() {
        let project = TestProject::new();
        project.local("x").package("x", "x");

        let found = list_discovered(project.root());

        assert_eq!(found.len(), 1);
        assert!(found[0].is_local);
        assert_eq!(found[0].path, project.root());
    }

    #[test]
    fn test_top_level_dependency_beats_nested_copy() {
        let project = TestProject::new();
        project
            .package("dup", "dup")
            .manifest("node_modules/zeta", json!({ "name": "zeta" }))
            .manifest("node_modules/zeta/node_modules/dup", json!({ "name": "dup" }));

        let found = list_discovered(project.root());

        assert_names(&found, &["dup", "zeta"]);
        assert_eq!(found[0].path, project.path("node_modules/dup"));
    }

    #[test]
    fn test_top_level_dependency_beats_copy_under_earlier_sibling() {
        let project = TestProject::new();
        project
            .package("alpha", "alpha")
            .manifest("node_modules/alpha/node_modules/dup", json!({ "name": "dup" }))
            .package("dup", "dup");

        let found = list_discovered(project.root());

        assert_names(&found, &["alpha", "dup"]);
        assert_eq!(found[1].path, project.path("node_modules/dup"));
    }

    #[test]
    fn test_nested_package_discovered_after_store_siblings() {
        let project = TestProject::new();
        project
            .package("ui", "ui")
            .manifest("node_modules/ui/node_modules/widgets", json!({ "name": "widgets" }))
            .package("zed", "zed");

        let found = list_discovered(project.root());
        assert_names(&found, &["ui", "zed", "widgets"]);
        assert!(found.iter().all(|e| !e.is_local));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_nested_store_does_not_stop_discovery() {
        use std::fs::{self, Permissions};
        use std::os::unix::fs::PermissionsExt;

        let project = TestProject::new();
        project
            .package("core", "core")
            .package("locked", "locked")
            .package("locked/node_modules/inner", "inner")
            .package("zed", "zed");
        let nested = project.path("node_modules/locked/node_modules");
        fs::set_permissions(&nested, Permissions::from_mode(0o000)).unwrap();

        let found = list_discovered(project.root());
        fs::set_permissions(&nested, Permissions::from_mode(0o755)).unwrap();

        // Privileged users can still read the locked store
        let found = names(&found);
        assert_eq!(&found[..3], &["core", "locked", "zed"]);
        assert!(found.len() == 3 || found[3] == "inner");
    }

    #[test]
    fn test_nested_store_scanned_under_plain_package() {
        let project = TestProject::new();
        project
            .package_json("node_modules/lodash", json!({ "name": "lodash" }))
            .manifest("node_modules/lodash/node_modules/hidden-gem", json!({ "name": "gem" }));

        assert_names(&list_discovered(project.root()), &["gem"]);
    }

    #[test]
    fn test_scoped_packages() {
        let project = TestProject::new();
        project
            .manifest("node_modules/@titan/db", json!({ "name": "db" }))
            .manifest("node_modules/@titan/.cache", json!({ "name": "cache" }))
            .package("plain", "plain");

        assert_names(&list_discovered(project.root()), &["db", "plain"]);
    }

    #[test]
    fn test_hidden_and_bin_directories_skipped() {
        let project = TestProject::new();
        project
            .manifest("node_modules/.bin", json!({ "name": "bin" }))
            .manifest("node_modules/.pnpm", json!({ "name": "pnpm" }))
            .package("real", "real");

        assert_names(&list_discovered(project.root()), &["real"]);
    }

    #[test]
    fn test_malformed_manifest_warns_and_is_skipped() {
        let project = TestProject::new();
        project
            .file("node_modules/broken/titan.json", "{ not json")
            .manifest("node_modules/nameless", json!({ "entryModule": "x.js" }))
            .package("ok", "ok");

        let sink = CaptureSink::new();
        let reporter = Reporter::new(sink.clone(), false);
        let found = discover(project.root(), &reporter);

        assert_names(&found, &["ok"]);
        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(sink.warned("broken"));
        assert!(sink.warned("nameless"));
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_discovery_details_only_when_verbose() {
        let project = TestProject::new();
        project
            .local("app")
            .package("core", "core")
            .package("ui/node_modules/core", "core");

        let quiet = CaptureSink::new();
        discover(project.root(), &Reporter::new(quiet.clone(), false));
        assert!(quiet.lines().is_empty());

        let verbose = CaptureSink::new();
        discover(project.root(), &Reporter::new(verbose.clone(), true));
        let debug = verbose.at(tracing::Level::DEBUG);
        assert!(debug.iter().any(|l| l.contains("Found local extension 'app'")));
        assert!(debug.iter().any(|l| l.contains("Ignoring duplicate extension 'core'")));
        assert!(verbose.warnings().is_empty());
    }

    #[test]
    fn test_list_discovered_is_silent() {
        let project = TestProject::new();
        project.file("titan.json", "[]");

        assert!(list_discovered(project.root()).is_empty());
    }

    #[test]
    fn test_empty_project() {
        let project = TestProject::new();
        assert!(list_discovered(project.root()).is_empty());
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let project = TestProject::new();
        for name in ["delta", "alpha", "charlie", "bravo"] {
            project.package(name, name);
        }
        project.local("app");

        let first = names(&list_discovered(project.root()));
        let second = names(&list_discovered(project.root()));

        assert_eq!(first, vec!["app", "alpha", "bravo", "charlie", "delta"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_manifest_name_not_directory_name() {
        let project = TestProject::new();
        project.package("titan-core-pkg", "core");

        let found = list_discovered(project.root());
        assert_names(&found, &["core"]);
        assert_eq!(found[0].path, project.path("node_modules/titan-core-pkg"));
    }
}
