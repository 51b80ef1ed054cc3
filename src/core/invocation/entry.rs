// src/core/invocation/entry.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One reported way to run or import the analyzed software.
///
/// Entries are value objects: equality is structural, and that equality
/// is what deduplicates repeated detections of the same invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationEntry {
    #[serde(rename = "type")]
    pub kind: InvocationKind,

    /// Command line that runs the software, for runnable entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    /// Module path to import, for entries that are not directly runnable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,

    /// Installation command, for package and library entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_structure: Option<HasStructure>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned_in_readme: Option<bool>,

    /// Entry files this script reaches through its call graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<PathBuf>>,

    /// Entry files whose call graphs reach this script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_by: Option<Vec<PathBuf>>,

    /// Dense rank position assigned after scoring; 1 is best
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<u32>,
}

impl InvocationEntry {
    /// An entry of the given kind with every other field unset.
    pub fn new(kind: InvocationKind) -> Self {
        Self {
            kind,
            run: None,
            import: None,
            installation: None,
            has_structure: None,
            mentioned_in_readme: None,
            imports: None,
            imported_by: None,
            ranking: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationKind {
    Package,
    Library,
    Service,
    Script,
    Test,
    #[serde(rename = "script without main")]
    ScriptWithoutMain,
}

/// How much runnable structure a file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasStructure {
    Main,
    Body,
    WithoutBody,
}
