//! Domain models for formship
//!
//! Contains the form document model and the dependency analysis engine,
//! without any I/O concerns.

mod analysis;
mod document;
mod extract;
mod graph;

pub use analysis::DependencyAnalysis;
pub use document::{FormNode, PropertyValue};
pub use extract::extract_references;
pub use graph::DependencyGraph;
