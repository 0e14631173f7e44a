//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{check, graph_cmd, manifest_cmd, plan, refs};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "formship")]
#[command(author, version, about = "Dependency-aware deployment ordering for form definitions")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new formship project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Analyze the bundle and show the deployment plan
    Plan {
        /// Verify external dependencies against a named target
        #[arg(long)]
        target: Option<String>,
    },

    /// Pre-flight validation (fails on cycles or missing dependencies)
    Check {
        /// Verify external dependencies against a named target
        #[arg(long)]
        target: Option<String>,
    },

    /// Show the forms referenced by one form
    Refs {
        /// Form identifier (filename stem)
        form_id: String,
    },

    /// Export the dependency graph as Graphviz dot
    Graph {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write the deployment manifest
    Manifest {
        /// Manifest path (defaults to .formship/deploy-manifest.json)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("formship starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized formship project at {}",
                project.root().display()
            ));
        }

        Commands::Plan { target } => plan::run(&output, target.as_deref())?,
        Commands::Check { target } => check::run(&output, target.as_deref())?,
        Commands::Refs { form_id } => refs::run(&output, &form_id)?,
        Commands::Graph { output: file } => graph_cmd::run(&output, file.as_deref())?,
        Commands::Manifest { output: file } => manifest_cmd::run(&output, file.as_deref())?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
