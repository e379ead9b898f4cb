//! Load ordering using topological sort with DFS
//!
//! Dependencies come from each extension's package.json. Only names that
//! resolve to a discovered extension form edges; everything else is an
//! ordinary package and is ignored. Cycles never fail the sort: the edge
//! that re-enters a node still being visited is dropped and recorded.

use crate::manifest::read_package_metadata;
use serde::Serialize;
use std::collections::HashMap;
use titan_core::types::DiscoveredExtension;

/// Dependency edge dropped to break a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenEdge {
    /// Extension whose dependency was skipped
    pub from: String,
    /// Extension that was already being visited
    pub to: String,
}

/// Result of ordering a discovered set
#[derive(Debug, Clone, Default)]
pub struct SortOutcome {
    /// Extensions in load order
    pub order: Vec<DiscoveredExtension>,
    /// Edges dropped to break cycles, in encounter order
    pub cycles: Vec<BrokenEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Dependency relation among extensions
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph from each extension's package metadata
    pub fn from_extensions(extensions: &[DiscoveredExtension]) -> Self {
        let dependencies = extensions
            .iter()
            .map(|ext| {
                (
                    ext.name().to_string(),
                    read_package_metadata(ext.dir()).dependency_names(),
                )
            })
            .collect();
        Self { dependencies }
    }

    /// Build the graph from explicit dependency lists
    pub fn with_dependencies<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<D>)>,
        N: Into<String>,
        D: Into<String>,
    {
        let dependencies = entries
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();
        Self { dependencies }
    }

    /// Declared dependency names of an extension
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.dependencies
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Order `discovered` so dependencies load first and the local extension loads last
    pub fn order(&self, discovered: &[DiscoveredExtension]) -> SortOutcome {
        // Edges into the local extension are ignored so it can never be pulled forward
        let lookup: HashMap<&str, &DiscoveredExtension> = discovered
            .iter()
            .filter(|ext| !ext.is_local)
            .map(|ext| (ext.name(), ext))
            .collect();

        let mut sorter = Sorter {
            graph: self,
            lookup: &lookup,
            states: HashMap::new(),
            outcome: SortOutcome::default(),
        };

        let roots = discovered
            .iter()
            .filter(|ext| !ext.is_local)
            .chain(discovered.iter().filter(|ext| ext.is_local));

        for ext in roots {
            sorter.visit(ext);
        }

        sorter.outcome
    }
}

struct Sorter<'a> {
    graph: &'a DependencyGraph,
    lookup: &'a HashMap<&'a str, &'a DiscoveredExtension>,
    states: HashMap<String, VisitState>,
    outcome: SortOutcome,
}

impl Sorter<'_> {
    /// Visit an extension node using DFS
    fn visit(&mut self, ext: &DiscoveredExtension) {
        let name = ext.name();
        if self.states.contains_key(name) {
            return;
        }

        self.states.insert(name.to_string(), VisitState::Visiting);

        let graph = self.graph;
        let lookup = self.lookup;

        // Visit dependencies first
        for dep in graph.dependencies_of(name) {
            let Some(&dep_ext) = lookup.get(dep.as_str()) else {
                continue;
            };
            match self.states.get(dep.as_str()) {
                Some(VisitState::Visiting) => {
                    self.outcome.cycles.push(BrokenEdge {
                        from: name.to_string(),
                        to: dep.clone(),
                    });
                }
                Some(VisitState::Visited) => {}
                None => self.visit(dep_ext),
            }
        }

        self.states.insert(name.to_string(), VisitState::Visited);
        self.outcome.order.push(ext.clone());
    }
}

/// Order discovered extensions using their package metadata
pub fn order_extensions(discovered: &[DiscoveredExtension]) -> Vec<DiscoveredExtension> {
    DependencyGraph::from_extensions(discovered)
        .order(discovered)
        .order
}
