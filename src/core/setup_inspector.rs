// src/core/setup_inspector.rs
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, RunsightError};
use super::{InvocationEntry, InvocationKind};

/// Collaborator that inspects a build descriptor and reports whether the
/// repository installs as a package (console entry points declared) or a
/// plain importable library.
pub trait SetupInspector {
    fn inspect(&self, descriptor: &str) -> Result<InvocationEntry>;
}

/// Reads `setup.py` / `setup.cfg` textually from the repository root. The
/// descriptor is never executed; name extraction is best effort and falls
/// back to the repository directory name.
pub struct DescriptorSetupInspector {
    repo_root: PathBuf,
    name_pattern: Regex,
}

impl DescriptorSetupInspector {
    pub fn new(repo_root: &Path) -> Result<Self> {
        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            name_pattern: Regex::new(r#"(?m)^\s*name\s*=\s*["']?([A-Za-z0-9_.\-]+)["']?"#)
                .map_err(|e| RunsightError::Setup(e.to_string()))?,
        })
    }

    fn package_name(&self, content: &str) -> Option<String> {
        self.name_pattern
            .captures(content)
            .map(|captures| captures[1].to_string())
    }

    fn fallback_name(&self) -> String {
        self.repo_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("package")
            .to_string()
    }
}

impl SetupInspector for DescriptorSetupInspector {
    fn inspect(&self, descriptor: &str) -> Result<InvocationEntry> {
        let path = self.repo_root.join(descriptor);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| RunsightError::Setup(format!("cannot read {}: {}", path.display(), e)))?;

        let name = match self.package_name(&content) {
            Some(name) => name,
            None => {
                debug!(
                    "No package name in {}, falling back to the directory name",
                    path.display()
                );
                self.fallback_name()
            }
        };

        // Console entry points make the installed artifact runnable from
        // the command line; anything else is consumed as a library.
        let entry = if content.contains("console_scripts") {
            InvocationEntry {
                installation: Some(format!("pip install {}", name)),
                run: Some(format!("{} --help", name)),
                ..InvocationEntry::new(InvocationKind::Package)
            }
        } else {
            InvocationEntry {
                installation: Some(format!("pip install {}", name)),
                run: Some(format!("import {}", name)),
                ..InvocationEntry::new(InvocationKind::Library)
            }
        };
        Ok(entry)
    }
}
