// src/core/call_graph/relations.rs
use std::path::{Path, PathBuf};

use super::{CallGraphIndex, CallRecord, FileCallGraph};

/// Maximum number of module hops followed while searching for a relation
/// between two entry files
pub const MAX_HOPS: usize = 2;

/// Decides whether invoking one entry file can reach code belonging to
/// another, following call strings through at most [`MAX_HOPS`] other
/// modules' call graphs. Matching is textual over module stems, which
/// makes the search cheap and deliberately unsound in both directions.
pub struct RelationResolver<'a> {
    index: &'a CallGraphIndex,
    stop_after_first_match: bool,
}

impl<'a> RelationResolver<'a> {
    pub fn new(index: &'a CallGraphIndex, stop_after_first_match: bool) -> Self {
        Self {
            index,
            stop_after_first_match,
        }
    }

    /// Entry files whose code the given file can reach, in candidate
    /// order, each recorded once. With `stop_after_first_match` set, the
    /// scan over candidates ends at the first related file found.
    pub fn related_entry_files(
        &self,
        file: &Path,
        graph: &FileCallGraph,
        candidates: &[PathBuf],
    ) -> Vec<PathBuf> {
        let self_base = module_base(file);
        let mut related = Vec::new();

        for candidate in candidates {
            if candidate.as_path() == file {
                continue;
            }
            let target_base = module_base(candidate);
            if self.graph_reaches(graph, &target_base, &self_base, 0)
                && !related.contains(candidate)
            {
                related.push(candidate.clone());
                if self.stop_after_first_match {
                    break;
                }
            }
        }

        related
    }

    fn graph_reaches(
        &self,
        graph: &FileCallGraph,
        target_base: &str,
        self_base: &str,
        depth: usize,
    ) -> bool {
        graph
            .records()
            .any(|record| self.record_reaches(record, target_base, self_base, depth))
    }

    fn record_reaches(
        &self,
        record: &CallRecord,
        target_base: &str,
        self_base: &str,
        depth: usize,
    ) -> bool {
        record
            .local
            .iter()
            .any(|call| self.call_reaches(call, target_base, self_base, depth))
            || record
                .nested
                .values()
                .any(|nested| self.record_reaches(nested, target_base, self_base, depth))
    }

    /// One call string. Self-referential calls never count as a match and
    /// are never expanded further, so a file cannot relate to itself
    /// through its own module name.
    fn call_reaches(&self, call: &str, target_base: &str, self_base: &str, depth: usize) -> bool {
        if call.contains(target_base) && !call.contains(self_base) {
            return true;
        }
        if call.contains(self_base) {
            return false;
        }
        if depth < MAX_HOPS && !call.is_empty() {
            let stem = call.split('.').next().unwrap_or_default();
            if let Some(external) = self.index.resolve_module(stem) {
                return self.graph_reaches(external, target_base, self_base, depth + 1);
            }
        }
        false
    }
}

/// Module stem plus a trailing dot, the textual key relation matching
/// works on ("b.py" -> "b.")
fn module_base(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    format!("{}.", stem)
}
