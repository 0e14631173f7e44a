//! Configuration handling for formship
//!
//! Configuration is stored in `.formship/config.toml` (project) and
//! `~/.config/formship/config.toml` (global).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Unknown target '{0}'. Define it under [targets] in .formship/config.toml")]
    UnknownTarget(String),
}

/// A named deployment target backed by an environment manifest file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// Path to the environment manifest, relative to the project root
    pub manifest: PathBuf,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory containing form definitions, relative to the project root
    pub forms_dir: PathBuf,

    /// Target used when no `--target` is given
    pub default_target: Option<String>,

    /// Named deployment targets
    pub targets: BTreeMap<String, TargetConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            forms_dir: PathBuf::from("forms"),
            default_target: None,
            targets: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Resolves a target by name, falling back to the default target
    pub fn resolve_target(&self, name: Option<&str>) -> Result<Option<&TargetConfig>> {
        let name = match name.or(self.default_target.as_deref()) {
            Some(name) => name,
            None => return Ok(None),
        };

        self.targets
            .get(name)
            .map(Some)
            .ok_or_else(|| ConfigError::UnknownTarget(name.to_string()).into())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "formship", "formship").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".formship").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for a `.formship/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".formship").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.project_root.as_deref().ok_or_else(|| {
            anyhow::anyhow!("Not in a formship project. Run 'formship init' first.")
        })?;
        let config_path = root.join(".formship").join("config.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}
