// src/core/call_graph/model.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::super::{ClassInfo, FileAnalysis, RepoAnalysis, ScopeInfo};

/// Scope category under which module-level body calls are stored
pub const BODY_SCOPE: &str = "body";

/// Calls made by one scope (a function, a method, or the module body),
/// plus the records of its nested definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Call targets as extracted: source order, not deduplicated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local: Vec<String>,

    /// Nested scope name -> its own record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: BTreeMap<String, CallRecord>,
}

impl CallRecord {
    /// Normalize one extracted scope. A scope without calls anywhere in
    /// it yields no record at all; empty branches are pruned on the way.
    fn from_scope(scope: &ScopeInfo) -> Option<Self> {
        let nested = collect_scopes(&scope.functions);
        if scope.calls.is_empty() && nested.is_empty() {
            return None;
        }
        Some(Self {
            local: scope.calls.clone(),
            nested,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.nested.is_empty()
    }
}

fn collect_scopes(scopes: &BTreeMap<String, ScopeInfo>) -> BTreeMap<String, CallRecord> {
    scopes
        .iter()
        .filter_map(|(name, scope)| CallRecord::from_scope(scope).map(|r| (name.clone(), r)))
        .collect()
}

fn collect_methods(class: &ClassInfo) -> BTreeMap<String, CallRecord> {
    collect_scopes(&class.methods)
}

/// Per-file call graph: scope category ("functions", "body" or a class
/// name) -> scope name -> record. Built once per file, immutable after.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCallGraph {
    #[serde(flatten)]
    pub scopes: BTreeMap<String, BTreeMap<String, CallRecord>>,
}

impl FileCallGraph {
    pub fn from_analysis(file: &FileAnalysis) -> Self {
        let mut scopes = BTreeMap::new();

        let functions = collect_scopes(&file.functions);
        if !functions.is_empty() {
            scopes.insert("functions".to_string(), functions);
        }

        if let Some(body) = &file.body {
            if !body.calls.is_empty() {
                let record = CallRecord {
                    local: body.calls.clone(),
                    nested: BTreeMap::new(),
                };
                scopes.insert(
                    BODY_SCOPE.to_string(),
                    BTreeMap::from([(BODY_SCOPE.to_string(), record)]),
                );
            }
        }

        for (class_name, class) in &file.classes {
            let methods = collect_methods(class);
            if !methods.is_empty() {
                scopes.insert(class_name.clone(), methods);
            }
        }

        Self { scopes }
    }

    /// Every record in every scope category, nested records excluded
    /// (callers recurse through `nested` themselves).
    pub fn records(&self) -> impl Iterator<Item = &CallRecord> {
        self.scopes.values().flat_map(|group| group.values())
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Directory -> file path -> call graph, covering the whole scanned tree.
/// Built once per run and treated as read-only during classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallGraphIndex {
    pub directories: BTreeMap<String, BTreeMap<PathBuf, FileCallGraph>>,
}

impl CallGraphIndex {
    pub fn build(analysis: &RepoAnalysis) -> Self {
        let mut directories = BTreeMap::new();
        for (dir, files) in &analysis.directories {
            let graphs = files
                .iter()
                .map(|file| (file.file.path.clone(), FileCallGraph::from_analysis(file)))
                .collect();
            directories.insert(dir.clone(), graphs);
        }
        Self { directories }
    }

    /// Call graph of one file, by exact path.
    pub fn file_graph(&self, path: &Path) -> Option<&FileCallGraph> {
        self.directories.values().find_map(|files| files.get(path))
    }

    /// Call graph of the file whose base name matches the given module
    /// stem (case-sensitive, directory ignored). Files sharing a stem in
    /// different directories resolve to whichever the index iterates
    /// first. None means the edge is simply not traversable.
    pub fn resolve_module(&self, stem: &str) -> Option<&FileCallGraph> {
        if stem.is_empty() {
            return None;
        }
        self.directories.values().find_map(|files| {
            files
                .iter()
                .find(|(path, _)| path.file_stem().and_then(|s| s.to_str()) == Some(stem))
                .map(|(_, graph)| graph)
        })
    }
}
