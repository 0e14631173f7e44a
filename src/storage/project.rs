//! Project management
//!
//! Handles project initialization and ties configuration, the forms
//! directory and target environments together.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, Environment, FormBundle};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a formship project. Run 'formship init' first.")]
    NotInProject,
}

/// A formship project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".formship").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let formship_dir = root.join(".formship");

        fs::create_dir_all(&formship_dir).with_context(|| {
            format!(
                "Failed to create .formship directory: {}",
                formship_dir.display()
            )
        })?;

        let forms_dir = root.join("forms");
        fs::create_dir_all(&forms_dir)
            .with_context(|| format!("Failed to create forms directory: {}", forms_dir.display()))?;

        let config_path = formship_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# formship configuration

# Directory containing form definitions (one file per form,
# filename stem is the form id)
forms_dir = "forms"

# Named deployment targets. Each target points at an environment
# manifest listing the form ids already present there, e.g.
#
# [targets.staging]
# manifest = "envs/staging.json"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .formship directory path
    pub fn formship_dir(&self) -> PathBuf {
        self.root.join(".formship")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the forms directory path
    pub fn forms_dir(&self) -> PathBuf {
        self.root.join(&self.config.project.forms_dir)
    }

    /// Loads the project's form bundle
    pub fn load_bundle(&self) -> Result<FormBundle> {
        FormBundle::load(&self.forms_dir())
    }

    /// Loads the environment for a target name (or the default target)
    ///
    /// Returns an empty environment when no target is configured or named;
    /// external dependencies are then reported unverified.
    pub fn load_environment(&self, target: Option<&str>) -> Result<Environment> {
        match self.config.project.resolve_target(target)? {
            Some(target_config) => Environment::load(&self.root.join(&target_config.manifest)),
            None => Ok(Environment::empty()),
        }
    }

    /// Default location of the deployment manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.formship_dir().join("deploy-manifest.json")
    }
}
