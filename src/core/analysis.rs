// src/core/analysis.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Repository-wide analysis produced by the extraction stage. Runsight
/// consumes this structure read-only; it never parses source code itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    /// Directory -> analyses of the source files directly inside it
    #[serde(default)]
    pub directories: BTreeMap<String, Vec<FileAnalysis>>,

    /// Directory -> entry names, used to spot build descriptors and for
    /// the final fallback enumeration
    #[serde(default)]
    pub dir_tree: BTreeMap<String, Vec<String>>,
}

impl RepoAnalysis {
    /// Every analyzed file, in directory order.
    pub fn files(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.directories.values().flatten()
    }
}

/// Everything the extraction stage recorded about one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file: FileIdentity,

    /// Import records; absent when the extraction stage could not
    /// produce them for this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyRecord>>,

    /// Top-level function name -> calls made by that function
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, ScopeInfo>,

    /// Class name -> its methods
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<String, ClassInfo>,

    /// Calls made by the module-level body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyInfo>,

    /// Main-guard information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_info: Option<MainInfo>,
}

impl FileAnalysis {
    pub fn has_main_guard(&self) -> bool {
        self.main_info.as_ref().map_or(false, |m| m.main_flag)
    }

    pub fn has_body_calls(&self) -> bool {
        self.body.as_ref().map_or(false, |b| !b.calls.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub file_name_base: String,
    pub extension: String,
}

impl FileIdentity {
    /// Base name with extension, the form README mentions use
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_name_base, self.extension)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Dotted module path of a from-import, split into segments
    #[serde(default)]
    pub from_module: Vec<String>,

    /// Imported name, split into segments
    #[serde(default)]
    pub import: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Calls and nested definitions of one function or method scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeInfo {
    /// Call targets in source order
    #[serde(default)]
    pub calls: Vec<String>,

    /// Nested function definitions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, ScopeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    #[serde(default)]
    pub methods: BTreeMap<String, ScopeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyInfo {
    #[serde(default)]
    pub calls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainInfo {
    /// True when the file carries a guarded "run as main program" check
    #[serde(default)]
    pub main_flag: bool,

    /// Function invoked inside the guard, when one was recognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_function: Option<String>,
}

/// Counts reported after an analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub folders: usize,
    pub files: usize,
    pub classes: usize,
    pub dependencies: usize,
    pub functions: usize,
}

impl AnalysisSummary {
    pub fn from_analysis(analysis: &RepoAnalysis) -> Self {
        let mut summary = Self::default();
        for files in analysis.directories.values() {
            summary.folders += 1;
            for file in files {
                summary.files += 1;
                summary.classes += file.classes.len();
                summary.functions += file.functions.len();
                summary.dependencies += file.dependencies.as_ref().map_or(0, |d| d.len());
            }
        }
        summary
    }
}
