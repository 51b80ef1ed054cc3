use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "runsight")]
#[command(about = "Reports how a repository is meant to be invoked")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify how the analyzed repository is meant to be run
    Classify {
        /// Extracted analysis JSON, or a directory containing one
        #[arg(short, long)]
        analysis: PathBuf,

        /// Root of the analyzed repository (README, build descriptors)
        #[arg(short, long)]
        repo: PathBuf,

        /// Report destination (defaults to the configured report file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Print summary statistics for an extracted analysis
    Summary {
        /// Extracted analysis JSON, or a directory containing one
        #[arg(short, long)]
        analysis: PathBuf,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Classify { analysis, repo, output, stdout } => {
                engine.classify(&analysis, &repo, output.as_deref(), stdout).await
            }
            Commands::Summary { analysis } => {
                engine.summary(&analysis).await
            }
        }
    }
}
