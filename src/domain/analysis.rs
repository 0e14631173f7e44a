//! Batch dependency analysis
//!
//! Runs the whole pipeline for one batch of forms: build the dependency
//! graph, classify references as internal or external to the batch, compute
//! the deployment order, and search for cycles when the order is incomplete.
//! The result is a plain value: an unsatisfiable ordering is data
//! (`circular_dependencies` non-empty), never an error, so callers decide
//! how to present it.
//!
//! The analysis is a pure function of the batch: no I/O, no shared state,
//! byte-identical output for identical input.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::document::FormNode;
use super::graph::DependencyGraph;

/// Result of analyzing one batch of forms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyAnalysis {
    /// Every form's referenced identifiers, internal and external mixed
    pub dependencies: DependencyGraph,

    /// Forms in dependency-safe creation order; excludes cycle members
    pub deployment_order: Vec<String>,

    /// Referenced identifiers present in this batch
    pub internal_dependencies: BTreeSet<String>,

    /// Referenced identifiers that must already exist in the target
    pub external_dependencies: BTreeSet<String>,

    /// Cycles found among the forms the sorter could not place; each cycle
    /// repeats its first identifier as the last element
    pub circular_dependencies: Vec<Vec<String>>,
}

impl DependencyAnalysis {
    /// Analyzes a batch of forms keyed by identifier
    pub fn of(batch: &BTreeMap<String, FormNode>) -> Self {
        Self::from_graph(DependencyGraph::build(batch))
    }

    /// Analyzes a pre-built dependency graph
    pub fn from_graph(dependencies: DependencyGraph) -> Self {
        let (internal_dependencies, external_dependencies) = classify(&dependencies);

        let (deployment_order, unplaced) = dependencies.topological_order();
        let circular_dependencies = if unplaced.is_empty() {
            Vec::new()
        } else {
            dependencies.find_cycles(&unplaced)
        };

        Self {
            dependencies,
            deployment_order,
            internal_dependencies,
            external_dependencies,
            circular_dependencies,
        }
    }

    /// Returns true if every form could be placed in the deployment order
    pub fn is_deployable(&self) -> bool {
        self.circular_dependencies.is_empty()
    }

    /// Internal dependencies of one form, in sorted order
    pub fn internal_dependencies_of(&self, id: &str) -> Vec<&str> {
        self.dependencies
            .dependencies_of(id)
            .into_iter()
            .flatten()
            .filter(|dep| self.dependencies.contains(dep))
            .map(String::as_str)
            .collect()
    }

    /// Renders the human-readable analysis report
    pub fn render_report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Deployment order ({} forms):",
            self.deployment_order.len()
        ));
        if self.deployment_order.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (position, id) in self.deployment_order.iter().enumerate() {
            let deps = self.internal_dependencies_of(id);
            if deps.is_empty() {
                lines.push(format!("  {}. {}", position + 1, id));
            } else {
                lines.push(format!(
                    "  {}. {} (after: {})",
                    position + 1,
                    id,
                    deps.join(", ")
                ));
            }
        }

        if !self.external_dependencies.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "External dependencies ({}):",
                self.external_dependencies.len()
            ));
            for id in &self.external_dependencies {
                lines.push(format!("  - {}", id));
            }
        }

        if !self.circular_dependencies.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "Circular dependencies ({}):",
                self.circular_dependencies.len()
            ));
            for cycle in &self.circular_dependencies {
                lines.push(format!("  {}", cycle.join(" -> ")));
            }
        }

        lines.join("\n")
    }
}

/// Splits all referenced identifiers by batch membership
///
/// Internal = referenced and present in the batch; external = referenced
/// but absent. Whether an external form actually exists in a target
/// environment is a caller concern, checked against an environment
/// manifest downstream.
fn classify(graph: &DependencyGraph) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut internal = BTreeSet::new();
    let mut external = BTreeSet::new();

    for (_, deps) in graph.iter() {
        for dep in deps {
            if graph.contains(dep) {
                internal.insert(dep.clone());
            } else {
                external.insert(dep.clone());
            }
        }
    }

    (internal, external)
}
