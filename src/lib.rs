//! formship - dependency-aware deployment ordering for form definitions
//!
//! Forms reference each other (embedded sub-forms, selection-list data
//! sources, pre-population bindings). formship loads a directory of form
//! definitions, computes a deterministic order in which they can be created
//! so every dependency exists before its dependents, flags references that
//! must already exist in the target environment, and reports dependency
//! cycles that make ordering impossible.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{DependencyAnalysis, DependencyGraph, FormNode};
