// src/core/loader.rs
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ScanningConfig;
use crate::error::{Result, RunsightError};
use super::RepoAnalysis;

/// File name the extraction stage gives the combined analysis
const ANALYSIS_FILE: &str = "DirectoryInfo.json";

/// Loads the extraction stage's output and the repository-side inputs the
/// classifier consumes: README text and the directory tree.
pub struct AnalysisLoader {
    config: ScanningConfig,
}

impl AnalysisLoader {
    pub fn new(config: &ScanningConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Deserialize the repository analysis. `path` may be the JSON file
    /// itself or a directory containing one.
    pub async fn load_analysis(&self, path: &Path) -> Result<RepoAnalysis> {
        let file = if path.is_dir() {
            self.find_analysis_file(path)?
        } else {
            path.to_path_buf()
        };

        debug!("Loading analysis from {}", file.display());
        let content = std::fs::read_to_string(&file)?;
        let analysis: RepoAnalysis = serde_json::from_str(&content)
            .map_err(|e| RunsightError::Analysis(format!("{}: {}", file.display(), e)))?;
        Ok(analysis)
    }

    fn find_analysis_file(&self, dir: &Path) -> Result<PathBuf> {
        for entry in WalkDir::new(dir).max_depth(2).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && entry.file_name() == ANALYSIS_FILE {
                return Ok(entry.into_path());
            }
        }
        Err(RunsightError::Analysis(format!(
            "no {} found under {}",
            ANALYSIS_FILE,
            dir.display()
        )))
    }

    /// Raw README text, or an empty string when the repository has none.
    pub async fn read_readme(&self, repo_root: &Path) -> Result<String> {
        for candidate in &self.config.readme_candidates {
            let path = repo_root.join(candidate);
            if path.is_file() {
                match std::fs::read_to_string(&path) {
                    Ok(content) => return Ok(content),
                    Err(e) => warn!("Unreadable README {}: {}", path.display(), e),
                }
            }
        }
        debug!("No README found in {}", repo_root.display());
        Ok(String::new())
    }

    /// Directory tree of the repository: directory (relative to the
    /// root, "." for the root itself) -> entry names, with the configured
    /// directories and file prefixes skipped.
    pub async fn directory_tree(&self, repo_root: &Path) -> Result<BTreeMap<String, Vec<String>>> {
        let mut tree: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let ignore_dirs = self.config.ignore_dirs.clone();
        let ignore_files = self.config.ignore_files.clone();
        let walker = WalkBuilder::new(repo_root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if entry.file_type().map_or(false, |t| t.is_dir()) {
                    !ignore_dirs
                        .iter()
                        .any(|d| name.as_ref() == d || name.starts_with(d.as_str()))
                } else {
                    !ignore_files.iter().any(|f| name.starts_with(f.as_str()))
                }
            })
            .build();

        for result in walker {
            let entry = result.map_err(|e| RunsightError::FileSystem(e.to_string()))?;
            if entry.depth() == 0 {
                continue;
            }
            let parent = entry.path().parent().unwrap_or(repo_root);
            let relative = parent.strip_prefix(repo_root).unwrap_or(parent);
            let key = if relative.as_os_str().is_empty() {
                ".".to_string()
            } else {
                relative.to_string_lossy().to_string()
            };
            let name = entry.file_name().to_string_lossy().to_string();
            tree.entry(key).or_default().push(name);
        }

        Ok(tree)
    }
}
