//! Assertion helpers

#![allow(dead_code)]

use titan_core::types::DiscoveredExtension;
use titan_extensions::SharedNamespace;

/// Names of extensions, in order
pub fn names(extensions: &[DiscoveredExtension]) -> Vec<String> {
    extensions.iter().map(|e| e.name().to_string()).collect()
}

/// Assert `extensions` are exactly `expected`, in order
pub fn assert_names(extensions: &[DiscoveredExtension], expected: &[&str]) {
    assert_eq!(names(extensions), expected, "unexpected extension order");
}

/// Assert `before` appears earlier than `after`
pub fn assert_before(extensions: &[DiscoveredExtension], before: &str, after: &str) {
    let order = names(extensions);
    let pos = |name: &str| {
        order
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("'{}' missing from {:?}", name, order))
    };
    assert!(
        pos(before) < pos(after),
        "expected '{}' before '{}' in {:?}",
        before,
        after,
        order
    );
}

/// Assert the namespace holds exactly the fixed entries plus `extensions`
pub fn assert_namespace_entries(namespace: &SharedNamespace, extensions: &[&str]) {
    let ns = namespace.read();
    let mut expected = vec!["log", "native"];
    expected.extend_from_slice(extensions);
    assert_eq!(ns.names().collect::<Vec<_>>(), expected);
}
