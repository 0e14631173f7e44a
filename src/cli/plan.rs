//! Plan command: analyze the bundle and report the deployment order

use anyhow::Result;

use super::output::Output;
use crate::domain::DependencyAnalysis;
use crate::storage::Project;

/// Runs the dependency analysis and prints the plan
pub fn run(output: &Output, target: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    output.verbose_ctx(
        "plan",
        &format!("Opened project at: {}", project.root().display()),
    );

    let bundle = project.load_bundle()?;
    output.verbose_ctx("plan", &format!("Loaded {} forms", bundle.len()));

    let analysis = DependencyAnalysis::of(bundle.forms());
    let environment = project.load_environment(target)?;
    let (verified, missing) = environment.verify(&analysis.external_dependencies);

    if output.is_json() {
        let target_info = target.map(|name| {
            serde_json::json!({
                "name": name,
                "verified": verified,
                "missing": missing,
            })
        });
        output.data(&serde_json::json!({
            "analysis": analysis,
            "target": target_info,
        }));
        return Ok(());
    }

    output.line(&analysis.render_report());

    if let Some(name) = target {
        output.line(&format!("Target '{}':", name));
        for id in &verified {
            output.line(&format!("  present: {}", id));
        }
        for id in &missing {
            output.line(&format!("  MISSING: {}", id));
        }
        if analysis.external_dependencies.is_empty() {
            output.line("  (no external dependencies)");
        }
    } else if !analysis.external_dependencies.is_empty() {
        output.line("No target specified; external dependencies are unverified.");
    }

    Ok(())
}
