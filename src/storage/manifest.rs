//! Deployment manifest
//!
//! The manifest is what a deployment executor consumes: the forms of a
//! batch in deployment order, each with a content digest of its source
//! document and its internal dependencies. formship refuses to produce a
//! manifest while the batch has dependency cycles, since there is no safe
//! order to record.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DependencyAnalysis;
use crate::storage::FormBundle;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Batch has {0} circular dependencies; no deployment order exists")]
    CircularDependencies(usize),

    #[error("Deployment order names '{0}' but the bundle has no such form")]
    UnknownForm(String),
}

/// One form in the deployment manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Form identifier
    pub id: String,

    /// blake3 digest of the canonical (JSON) form document
    pub digest: String,

    /// Identifiers this form depends on within the batch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

/// An ordered deployment plan for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployManifest {
    /// When the manifest was generated
    pub generated_at: DateTime<Utc>,

    /// Forms in dependency-safe order
    pub forms: Vec<ManifestEntry>,

    /// External dependencies the target must already contain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

impl DeployManifest {
    /// Builds a manifest from an analysis and the bundle it was computed on
    pub fn from_analysis(analysis: &DependencyAnalysis, bundle: &FormBundle) -> Result<Self> {
        if !analysis.is_deployable() {
            return Err(
                ManifestError::CircularDependencies(analysis.circular_dependencies.len()).into(),
            );
        }

        let mut forms = Vec::with_capacity(analysis.deployment_order.len());
        for id in &analysis.deployment_order {
            let form = bundle
                .get(id)
                .ok_or_else(|| ManifestError::UnknownForm(id.clone()))?;

            let canonical = serde_json::to_vec(form)
                .with_context(|| format!("Failed to serialize form '{}'", id))?;

            forms.push(ManifestEntry {
                id: id.clone(),
                digest: blake3::hash(&canonical).to_hex().to_string(),
                depends_on: analysis
                    .internal_dependencies_of(id)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }

        Ok(Self {
            generated_at: Utc::now(),
            forms,
            requires: analysis.external_dependencies.iter().cloned().collect(),
        })
    }

    /// Writes the manifest as pretty JSON, atomically (temp file + rename)
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Reads a previously written manifest
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }
}
