//! Check command: pre-flight validation for a deployment
//!
//! Fails (non-zero exit) when the batch has circular dependencies, or when
//! a target is given and some external dependency is absent from it.
//! Without a target, externals are unverifiable and only reported.

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::DependencyAnalysis;
use crate::storage::Project;

/// Runs pre-flight validation
pub fn run(output: &Output, target: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let bundle = project.load_bundle()?;
    output.verbose_ctx("check", &format!("Loaded {} forms", bundle.len()));

    let analysis = DependencyAnalysis::of(bundle.forms());
    let environment = project.load_environment(target)?;
    let (_, missing) = environment.verify(&analysis.external_dependencies);

    let cycles = &analysis.circular_dependencies;
    let missing_blocks = target.is_some() && !missing.is_empty();

    if output.is_json() {
        output.data(&serde_json::json!({
            "ok": cycles.is_empty() && !missing_blocks,
            "forms": bundle.len(),
            "circular_dependencies": cycles,
            "missing_dependencies": missing,
        }));
    } else {
        for cycle in cycles {
            output.line(&format!("Circular dependency: {}", cycle.join(" -> ")));
        }
        if missing_blocks {
            for id in &missing {
                output.line(&format!("Missing from target: {}", id));
            }
        }
    }

    if !cycles.is_empty() || missing_blocks {
        bail!(
            "Pre-flight check failed: {} circular dependencies, {} missing dependencies",
            cycles.len(),
            if missing_blocks { missing.len() } else { 0 }
        );
    }

    output.line(&format!(
        "{} forms ready to deploy ({} internal, {} external dependencies)",
        bundle.len(),
        analysis.internal_dependencies.len(),
        analysis.external_dependencies.len()
    ));

    Ok(())
}
