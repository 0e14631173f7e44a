//! Form bundle loading
//!
//! A bundle is a directory of form definition files, one form per file,
//! JSON or YAML, with the filename stem as the form identifier. Malformed
//! documents are rejected here with file context, so the analysis engine only
//! ever sees well-formed trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::FormNode;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Forms directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Duplicate form id '{0}' (defined by more than one file)")]
    DuplicateId(String),
}

/// A batch of forms loaded from disk, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct FormBundle {
    forms: BTreeMap<String, FormNode>,
}

impl FormBundle {
    /// Loads every form definition in a directory (non-recursive)
    ///
    /// Accepts `.json`, `.yaml` and `.yml` files; everything else is
    /// skipped. Two files sharing a stem (e.g. `intake.json` and
    /// `intake.yaml`) would produce one ambiguous identifier and are
    /// rejected.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BundleError::MissingDirectory(dir.to_path_buf()).into());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read forms directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("json" | "yaml" | "yml")
                )
            })
            .collect();
        paths.sort();

        let mut forms = BTreeMap::new();
        for path in paths {
            let id = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => continue,
            };

            let form = Self::load_file(&path)?;
            if forms.insert(id.clone(), form).is_some() {
                return Err(BundleError::DuplicateId(id).into());
            }
        }

        Ok(Self { forms })
    }

    /// Parses a single form definition file
    pub fn load_file(path: &Path) -> Result<FormNode> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );

        if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse form file: {}", path.display()))
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse form file: {}", path.display()))
        }
    }

    /// Returns the forms keyed by identifier
    pub fn forms(&self) -> &BTreeMap<String, FormNode> {
        &self.forms
    }

    /// Looks up one form by identifier
    pub fn get(&self, id: &str) -> Option<&FormNode> {
        self.forms.get(id)
    }

    /// Number of forms in the bundle
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Returns true if no forms were loaded
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
