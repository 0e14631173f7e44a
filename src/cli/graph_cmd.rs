//! Graph command: Graphviz dot export of the dependency graph

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::DiGraph;

use super::output::Output;
use crate::domain::DependencyGraph;
use crate::storage::Project;

/// Renders the bundle's dependency graph as dot, to stdout or a file
pub fn run(output: &Output, file: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let bundle = project.load_bundle()?;
    let graph = DependencyGraph::build(bundle.forms());

    let dot = render_dot(&graph);

    match file {
        Some(path) => {
            fs::write(path, &dot)
                .with_context(|| format!("Failed to write graph: {}", path.display()))?;
            output.success(&format!("Wrote dependency graph to {}", path.display()));
        }
        None => print!("{}", dot),
    }

    Ok(())
}

/// Builds a petgraph view of the dependency graph and renders it
///
/// External dependencies appear as nodes too; they are what the edges point
/// at, and leaving them out would silently drop edges from the picture.
fn render_dot(graph: &DependencyGraph) -> String {
    let mut dot_graph: DiGraph<String, ()> = DiGraph::new();
    let mut indices = BTreeMap::new();

    for (id, deps) in graph.iter() {
        indices
            .entry(id.clone())
            .or_insert_with(|| dot_graph.add_node(id.clone()));
        for dep in deps {
            indices
                .entry(dep.clone())
                .or_insert_with(|| dot_graph.add_node(dep.clone()));
        }
    }

    for (id, deps) in graph.iter() {
        for dep in deps {
            dot_graph.add_edge(indices[id], indices[dep], ());
        }
    }

    format!("{:?}", Dot::with_config(&dot_graph, &[DotConfig::EdgeNoLabel]))
}
