//! Target environment manifests
//!
//! An environment manifest lists the form identifiers already present in a
//! deployment target. It is produced by whatever exported the target's
//! state; formship only reads it, to tell verified external dependencies
//! from missing ones. No manifest means externals are reported unverified.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// On-disk manifest shape: either a bare list of identifiers or a mapping
/// with a `forms` key, JSON or YAML.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    List(Vec<String>),
    Keyed { forms: Vec<String> },
}

/// The set of form identifiers known to exist in a target environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    forms: BTreeSet<String>,
}

impl Environment {
    /// An environment with no known forms (no target specified)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an environment from a list of identifiers
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forms: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads an environment manifest file (JSON or YAML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read environment manifest: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );

        let manifest: ManifestFile = if is_yaml {
            serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse environment manifest: {}", path.display())
            })?
        } else {
            serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse environment manifest: {}", path.display())
            })?
        };

        let ids = match manifest {
            ManifestFile::List(ids) => ids,
            ManifestFile::Keyed { forms } => forms,
        };

        Ok(Self::from_ids(ids))
    }

    /// Returns true if the environment is known to contain the form
    pub fn contains(&self, id: &str) -> bool {
        self.forms.contains(id)
    }

    /// All known identifiers, sorted
    pub fn forms(&self) -> &BTreeSet<String> {
        &self.forms
    }

    /// Splits a set of identifiers into (present, missing) for this target
    pub fn verify<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a String>,
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut present = BTreeSet::new();
        let mut missing = BTreeSet::new();
        for id in ids {
            if self.contains(id) {
                present.insert(id.clone());
            } else {
                missing.insert(id.clone());
            }
        }
        (present, missing)
    }
}
