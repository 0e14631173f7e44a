//! Dependency graph over a batch of forms
//!
//! Maps every form in a batch to the set of form identifiers it references.
//! Provides the deterministic topological ordering used for deployment and
//! the cycle search used for diagnostics when no full ordering exists.
//!
//! Ordering must be a pure function of graph content, so every container in
//! this module is sorted (`BTreeMap`/`BTreeSet`): ties between forms that
//! could deploy in either order are broken lexicographically, never by hash
//! or insertion order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::document::FormNode;
use super::extract::extract_references;

/// Adjacency mapping: form identifier -> identifiers it depends on
///
/// Every form in the batch has an entry, possibly empty. Edge targets may
/// name forms outside the batch (external dependencies); those edges are
/// kept in the mapping but ignored for ordering purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Builds the graph for a batch by extracting references from each form
    pub fn build(batch: &BTreeMap<String, FormNode>) -> Self {
        let edges = batch
            .iter()
            .map(|(id, form)| (id.clone(), extract_references(form)))
            .collect();
        Self { edges }
    }

    /// Builds a graph directly from edge sets (tests and tooling)
    pub fn from_edges<I, D, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let edges = edges
            .into_iter()
            .map(|(id, deps)| {
                (
                    id.into(),
                    deps.into_iter().map(Into::into).collect::<BTreeSet<_>>(),
                )
            })
            .collect();
        Self { edges }
    }

    /// Returns the identifiers in the batch, in sorted order
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Returns the dependencies of one form (identifiers not in the batch
    /// have no entry and are treated as having none)
    pub fn dependencies_of(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(id)
    }

    /// Returns true if the identifier is part of the batch
    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Iterates over `(form, dependencies)` entries in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.edges.iter()
    }

    /// Number of forms in the batch
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Dependencies of `id` that are themselves in the batch
    fn internal_dependencies_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(id)
            .into_iter()
            .flatten()
            .filter(|dep| self.edges.contains_key(*dep))
            .map(String::as_str)
    }

    /// Computes the deployment order via Kahn's algorithm
    ///
    /// Only internal edges count: a dependency on a form outside the batch
    /// never blocks ordering. The ready set is kept sorted and the smallest
    /// identifier is always taken first, so the order is reproducible for a
    /// given graph. Returns the order and the set of forms that could not
    /// be placed because their in-degree never reached zero, which is
    /// non-empty exactly when the internal graph has a cycle.
    pub fn topological_order(&self) -> (Vec<String>, BTreeSet<String>) {
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for id in self.edges.keys() {
            in_degree.insert(id, 0);
        }
        for id in self.edges.keys() {
            for dep in self.internal_dependencies_of(id) {
                *in_degree.entry(id).or_insert(0) += 1;
                dependents.entry(dep).or_default().push(id);
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut order = Vec::with_capacity(self.edges.len());
        while let Some(next) = ready.pop_first() {
            order.push(next.to_string());
            for &dependent in dependents.get(next).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        let placed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        let unplaced = self
            .edges
            .keys()
            .filter(|id| !placed.contains(id.as_str()))
            .cloned()
            .collect();

        (order, unplaced)
    }

    /// Searches the unplaced forms for dependency cycles
    ///
    /// Depth-first over internal edges restricted to `scope` (the forms the
    /// sorter could not place), branching in lexicographic order. Revisiting
    /// a form on the active path records the path slice from its first
    /// occurrence through the revisit as one cycle, first element repeated
    /// as last. One witnessing cycle per entanglement reachable from each
    /// start, not an exhaustive enumeration of elementary cycles.
    pub fn find_cycles(&self, scope: &BTreeSet<String>) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = BTreeSet::new();
        let mut path = Vec::new();

        for start in scope {
            if !visited.contains(start.as_str()) {
                self.cycle_dfs(start, scope, &mut path, &mut visited, &mut cycles);
            }
        }

        cycles
    }

    fn cycle_dfs<'a>(
        &'a self,
        node: &'a str,
        scope: &'a BTreeSet<String>,
        path: &mut Vec<&'a str>,
        visited: &mut BTreeSet<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if let Some(pos) = path.iter().position(|&on_path| on_path == node) {
            let mut cycle: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
            cycle.push(node.to_string());
            if !cycles.contains(&cycle) {
                cycles.push(cycle);
            }
            return;
        }
        if visited.contains(node) {
            return;
        }

        path.push(node);
        for dep in self.edges.get(node).into_iter().flatten() {
            if scope.contains(dep) {
                self.cycle_dfs(dep, scope, path, visited, cycles);
            }
        }
        path.pop();
        visited.insert(node);
    }
}
