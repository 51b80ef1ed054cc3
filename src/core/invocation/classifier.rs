// src/core/invocation/classifier.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ClassificationConfig;

use super::super::{
    CallGraphIndex, FileAnalysis, RelationResolver, RepoAnalysis, SetupInspector,
};
use super::{HasStructure, InvocationEntry, InvocationKind, ServiceDetector};

/// Build descriptors recognized as package/library markers, probed in
/// order per directory
const SETUP_FILES: [&str; 2] = ["setup.py", "setup.cfg"];

/// A file whose top-level body carries a guarded main check. Discovered
/// once per run and never duplicated.
#[derive(Debug, Clone)]
struct EntryFile {
    path: PathBuf,
    file_name: String,
}

impl EntryFile {
    fn new(file: &FileAnalysis) -> Self {
        Self {
            path: file.file.path.clone(),
            file_name: file.file.file_name(),
        }
    }
}

/// Combines build-descriptor detection, main-guard flags, test
/// heuristics, the service detector and the relation resolver into one
/// invocation entry per reported way of running the software.
pub struct InvocationClassifier<'a> {
    config: &'a ClassificationConfig,
    services: ServiceDetector,
}

impl<'a> InvocationClassifier<'a> {
    pub fn new(config: &'a ClassificationConfig) -> Self {
        Self {
            config,
            services: ServiceDetector::new(&config.service_frameworks),
        }
    }

    /// Classify the whole repository. `readme` is the raw README text,
    /// matched by substring containment of file names; `repo_root` only
    /// shapes the paths of fallback entries; `setup` is consulted when a
    /// directory listing contains a build descriptor.
    ///
    /// Nothing here is fatal: unusable descriptors and incomplete file
    /// records degrade to a lower-confidence classification.
    pub fn classify(
        &self,
        analysis: &RepoAnalysis,
        index: &CallGraphIndex,
        readme: &str,
        repo_root: &Path,
        setup: &dyn SetupInspector,
    ) -> Vec<InvocationEntry> {
        let mut entries: Vec<InvocationEntry> = Vec::new();

        // 1. Package/library exploration. A build descriptor anywhere in
        // the tree is inspected, but per-file exploration continues: a
        // packaged repository can still carry runnable mains.
        let mut package_library = false;
        for (directory, names) in &analysis.dir_tree {
            for descriptor in SETUP_FILES {
                if names.iter().any(|n| n == descriptor) {
                    match setup.inspect(descriptor) {
                        Ok(entry) => {
                            if !entries.contains(&entry) {
                                entries.push(entry);
                            }
                            package_library = true;
                        }
                        Err(e) => {
                            warn!("Skipping {} in {}: {}", descriptor, directory, e);
                        }
                    }
                    break;
                }
            }
        }

        // 2-3. Per-file exploration: tests, services with a main guard,
        // plain main files, and files that only run top-level code.
        let mut main_files: Vec<EntryFile> = Vec::new();
        let mut test_files: Vec<&FileAnalysis> = Vec::new();
        let mut body_files: Vec<&FileAnalysis> = Vec::new();
        let mut service_main = false;

        for file in analysis.files() {
            let is_test = is_test_file(file);
            if is_test {
                test_files.push(file);
            }

            if file.has_main_guard() {
                let is_service = match &file.dependencies {
                    Some(deps) => self.services.is_service(deps),
                    None => {
                        // Incomplete record: fall back to a plain main
                        // file rather than failing the run.
                        debug!(
                            "{}: no dependency record, treating as plain script",
                            file.file.path.display()
                        );
                        false
                    }
                };

                if is_service {
                    let entry = self.service_entry(file, HasStructure::Main, readme);
                    if !entries.contains(&entry) {
                        entries.push(entry);
                    }
                    service_main = true;
                } else if !is_test && !main_files.iter().any(|m| m.path == file.file.path) {
                    main_files.push(EntryFile::new(file));
                }
            } else if file.has_body_calls() {
                body_files.push(file);
            }
        }

        // 4. Entry-to-entry relations through the call-graph index.
        let resolver = RelationResolver::new(index, self.config.stop_after_first_match);
        let considered = self
            .config
            .max_entry_files
            .unwrap_or(main_files.len())
            .min(main_files.len());
        if considered < main_files.len() {
            debug!(
                "Relation resolution capped at {} of {} entry files",
                considered,
                main_files.len()
            );
        }

        let candidate_paths: Vec<PathBuf> = main_files.iter().map(|m| m.path.clone()).collect();
        let mut imports: Vec<Vec<PathBuf>> = vec![Vec::new(); main_files.len()];
        let mut imported_by: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

        for (i, main) in main_files.iter().take(considered).enumerate() {
            let graph = match index.file_graph(&main.path) {
                Some(graph) => graph,
                None => continue,
            };
            let related = resolver.related_entry_files(&main.path, graph, &candidate_paths);
            for target in &related {
                imported_by
                    .entry(target.clone())
                    .or_default()
                    .push(main.path.clone());
            }
            imports[i] = related;
        }

        for (i, main) in main_files.iter().enumerate() {
            entries.push(InvocationEntry {
                run: Some(format!("python {}", main.path.display())),
                has_structure: Some(HasStructure::Main),
                mentioned_in_readme: Some(readme.contains(&main.file_name)),
                imports: non_empty(imports[i].clone()),
                imported_by: imported_by.get(&main.path).cloned(),
                ..InvocationEntry::new(InvocationKind::Script)
            });
        }
        let script_main = !main_files.is_empty();

        // Test files are run by themselves; they keep their main
        // structure even when a test runner would drive them externally.
        for file in &test_files {
            entries.push(InvocationEntry {
                run: Some(format!("python {}", file.file.path.display())),
                has_structure: Some(HasStructure::Main),
                mentioned_in_readme: Some(readme.contains(&file.file.file_name())),
                ..InvocationEntry::new(InvocationKind::Test)
            });
        }

        // 5. Body-only files. Service detection always runs; plain body
        // scripts are reported only when nothing stronger was found
        // anywhere in the repository.
        let mut body_services: Vec<&Path> = Vec::new();
        for file in &body_files {
            let is_service = file
                .dependencies
                .as_deref()
                .map_or(false, |deps| self.services.is_service(deps));
            if is_service {
                let entry = self.service_entry(file, HasStructure::Body, readme);
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
                body_services.push(&file.file.path);
            }
        }

        if !package_library && !service_main && !script_main {
            for file in &body_files {
                if body_services.iter().any(|p| *p == file.file.path) {
                    continue;
                }
                entries.push(InvocationEntry {
                    run: Some(format!("python {}", file.file.path.display())),
                    has_structure: Some(HasStructure::Body),
                    mentioned_in_readme: Some(readme.contains(&file.file.file_name())),
                    ..InvocationEntry::new(InvocationKind::Script)
                });
            }
        }

        // 6. Nothing produced an entry: report every source file in the
        // tree as import-only.
        if entries.is_empty() {
            let suffix = format!(".{}", self.config.source_extension);
            for (directory, names) in &analysis.dir_tree {
                for name in names {
                    if !name.ends_with(&suffix) {
                        continue;
                    }
                    let path = fallback_path(repo_root, directory, name);
                    entries.push(InvocationEntry {
                        import: Some(path.display().to_string()),
                        has_structure: Some(HasStructure::WithoutBody),
                        mentioned_in_readme: Some(readme.contains(name)),
                        ..InvocationEntry::new(InvocationKind::ScriptWithoutMain)
                    });
                }
            }
        }

        entries
    }

    fn service_entry(
        &self,
        file: &FileAnalysis,
        structure: HasStructure,
        readme: &str,
    ) -> InvocationEntry {
        InvocationEntry {
            run: Some(format!("python {}", file.file.path.display())),
            has_structure: Some(structure),
            mentioned_in_readme: Some(readme.contains(&file.file.file_name())),
            ..InvocationEntry::new(InvocationKind::Service)
        }
    }
}

/// A file whose functions or methods invoke anything with "assert" in the
/// call name is treated as a test file, main-guard or not.
fn is_test_file(file: &FileAnalysis) -> bool {
    let method_scopes = file.classes.values().flat_map(|c| c.methods.values());
    let function_scopes = file.functions.values();
    method_scopes
        .chain(function_scopes)
        .flat_map(|scope| scope.calls.iter())
        .any(|call| call.contains("assert"))
}

fn non_empty(paths: Vec<PathBuf>) -> Option<Vec<PathBuf>> {
    if paths.is_empty() {
        None
    } else {
        Some(paths)
    }
}

fn fallback_path(repo_root: &Path, directory: &str, name: &str) -> PathBuf {
    if directory.is_empty() || directory == "." {
        repo_root.join(name)
    } else {
        repo_root.join(directory).join(name)
    }
}
