//! Manifest command: write the deployment manifest

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::DependencyAnalysis;
use crate::storage::{DeployManifest, Project};

/// Builds and writes the deployment manifest for the bundle
pub fn run(output: &Output, file: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let bundle = project.load_bundle()?;

    let analysis = DependencyAnalysis::of(bundle.forms());
    let manifest = DeployManifest::from_analysis(&analysis, &bundle)?;

    let path = file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project.manifest_path());
    manifest.write(&path)?;

    output.verbose_ctx(
        "manifest",
        &format!("{} forms, {} required externals", manifest.forms.len(), manifest.requires.len()),
    );
    output.success(&format!(
        "Wrote deployment manifest for {} forms to {}",
        manifest.forms.len(),
        path.display()
    ));

    Ok(())
}
