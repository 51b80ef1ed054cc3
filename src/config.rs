use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RunsightError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Invocation classification settings
    pub classification: ClassificationConfig,

    /// Repository scanning settings
    pub scanning: ScanningConfig,

    /// Report output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Import names that mark a file as starting a web-style service
    pub service_frameworks: Vec<String>,

    /// Stop relation resolution for an entry file at the first related
    /// file found (the historical behavior). With false, a relation is
    /// collected for every reachable entry file.
    pub stop_after_first_match: bool,

    /// Upper bound on how many entry files get relation resolution;
    /// entry files beyond the cap keep an empty import list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entry_files: Option<usize>,

    /// Extension of the source files the analysis covers
    pub source_extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanningConfig {
    /// Directory names skipped when deriving the directory tree
    pub ignore_dirs: Vec<String>,

    /// File name prefixes skipped when deriving the directory tree
    pub ignore_files: Vec<String>,

    /// README file names probed at the repository root, in order
    pub readme_candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name of the written report
    pub report_file: String,

    /// Pretty-print the report JSON
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classification: ClassificationConfig {
                service_frameworks: vec![
                    "flask".to_string(),
                    "flask_restful".to_string(),
                    "falcon".to_string(),
                    "falcon_app".to_string(),
                    "aiohttp".to_string(),
                    "bottle".to_string(),
                    "django".to_string(),
                    "fastapi".to_string(),
                    "locust".to_string(),
                    "pyramid".to_string(),
                    "hug".to_string(),
                    "eve".to_string(),
                    "connexion".to_string(),
                ],
                stop_after_first_match: true,
                max_entry_files: None,
                source_extension: "py".to_string(),
            },
            scanning: ScanningConfig {
                ignore_dirs: vec![
                    ".git".to_string(),
                    "__pycache__".to_string(),
                    ".idea".to_string(),
                    ".pytest_cache".to_string(),
                ],
                ignore_files: vec![".".to_string()],
                readme_candidates: vec![
                    "README.md".to_string(),
                    "readme.md".to_string(),
                    "README.MD".to_string(),
                    "Readme.md".to_string(),
                    "README.txt".to_string(),
                    "README.rst".to_string(),
                    "README".to_string(),
                ],
            },
            output: OutputConfig {
                report_file: "invocation.json".to_string(),
                pretty: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RunsightError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RunsightError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Runsight.toml",
                    "runsight.toml",
                    ".runsight.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
