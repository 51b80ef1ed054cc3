// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use super::{
    rank_invocations, AnalysisLoader, AnalysisSummary, CallGraphIndex, DescriptorSetupInspector,
    InvocationClassifier, InvocationEntry,
};

/// Main orchestration engine: load the extracted analysis, classify the
/// invocation methods, rank them, and write the report.
pub struct Engine {
    config: Config,
    loader: AnalysisLoader,
}

/// Ranked classification result, serialized as the report
#[derive(Debug, Clone, Serialize)]
pub struct InvocationReport {
    pub repository: PathBuf,
    pub generated_at: String,
    pub summary: AnalysisSummary,
    pub invocations: Vec<InvocationEntry>,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        let loader = AnalysisLoader::new(&config.scanning);

        Ok(Self { config, loader })
    }

    /// Run the full classification pipeline for one repository
    pub async fn classify(
        &self,
        analysis_path: &Path,
        repo_root: &Path,
        output: Option<&Path>,
        to_stdout: bool,
    ) -> Result<()> {
        info!("🔍 Classifying invocation methods for {}", repo_root.display());

        let mut analysis = self.loader.load_analysis(analysis_path).await?;
        if analysis.dir_tree.is_empty() {
            debug!("Analysis carries no directory tree, deriving one from the repository");
            analysis.dir_tree = self.loader.directory_tree(repo_root).await?;
        }

        let readme = self.loader.read_readme(repo_root).await?;

        let summary = AnalysisSummary::from_analysis(&analysis);
        info!(
            "Analyzed {} folders, {} files, {} classes, {} dependencies, {} functions",
            summary.folders, summary.files, summary.classes, summary.dependencies, summary.functions
        );

        let index = CallGraphIndex::build(&analysis);
        let inspector = DescriptorSetupInspector::new(repo_root)?;
        let classifier = InvocationClassifier::new(&self.config.classification);
        let entries = classifier.classify(&analysis, &index, &readme, repo_root, &inspector);
        let invocations = rank_invocations(entries);

        info!("Found {} invocation methods", invocations.len());

        let report = InvocationReport {
            repository: repo_root.to_path_buf(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
            invocations,
        };

        let json = if self.config.output.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };

        if to_stdout {
            println!("{}", json);
        } else {
            let target = output
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(&self.config.output.report_file));
            std::fs::write(&target, json)?;
            info!("✅ Report written to {}", target.display());
        }

        Ok(())
    }

    /// Print summary statistics for an extracted analysis
    pub async fn summary(&self, analysis_path: &Path) -> Result<()> {
        let analysis = self.loader.load_analysis(analysis_path).await?;
        let summary = AnalysisSummary::from_analysis(&analysis);

        println!("Analysis completed");
        println!(
            "Total number of folders processed (root folder is considered a folder): {}",
            summary.folders
        );
        println!("Total number of files found: {}", summary.files);
        println!("Total number of classes found: {}", summary.classes);
        println!(
            "Total number of dependencies found in those files: {}",
            summary.dependencies
        );
        println!("Total number of functions parsed: {}", summary.functions);

        Ok(())
    }
}
