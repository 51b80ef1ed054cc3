use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use runsight::config::{ClassificationConfig, Config};
use runsight::core::{
    rank_invocations, BodyInfo, CallGraphIndex, ClassInfo, DependencyRecord, FileAnalysis,
    FileIdentity, HasStructure, InvocationClassifier, InvocationEntry, InvocationKind, MainInfo,
    RelationResolver, RepoAnalysis, ScopeInfo, SetupInspector,
};
use runsight::error::{Result, RunsightError};

/// Inspector for repositories without a usable build descriptor.
struct NoSetup;

impl SetupInspector for NoSetup {
    fn inspect(&self, _descriptor: &str) -> Result<InvocationEntry> {
        Err(RunsightError::Setup("unavailable".to_string()))
    }
}

/// Inspector standing in for a descriptor with console entry points.
struct PackageSetup;

impl SetupInspector for PackageSetup {
    fn inspect(&self, _descriptor: &str) -> Result<InvocationEntry> {
        Ok(InvocationEntry {
            installation: Some("pip install demo".to_string()),
            run: Some("demo --help".to_string()),
            ..InvocationEntry::new(InvocationKind::Package)
        })
    }
}

fn identity(path: &str) -> FileIdentity {
    let path = PathBuf::from(path);
    let base = path.file_stem().unwrap().to_string_lossy().to_string();
    let extension = path.extension().unwrap().to_string_lossy().to_string();
    FileIdentity {
        path,
        file_name_base: base,
        extension,
    }
}

fn scope(calls: &[&str]) -> ScopeInfo {
    ScopeInfo {
        calls: calls.iter().map(|c| c.to_string()).collect(),
        functions: BTreeMap::new(),
    }
}

/// A file with a main guard and the given body calls.
fn entry_file(path: &str, body_calls: &[&str]) -> FileAnalysis {
    FileAnalysis {
        file: identity(path),
        dependencies: Some(Vec::new()),
        body: Some(BodyInfo {
            calls: body_calls.iter().map(|c| c.to_string()).collect(),
        }),
        main_info: Some(MainInfo {
            main_flag: true,
            main_function: None,
        }),
        ..Default::default()
    }
}

/// A plain module: no main guard, a single function with the given calls.
fn helper_file(path: &str, function: &str, calls: &[&str]) -> FileAnalysis {
    FileAnalysis {
        file: identity(path),
        dependencies: Some(Vec::new()),
        functions: BTreeMap::from([(function.to_string(), scope(calls))]),
        ..Default::default()
    }
}

/// A file with top-level body calls and nothing else.
fn body_file(path: &str, calls: &[&str]) -> FileAnalysis {
    FileAnalysis {
        file: identity(path),
        dependencies: Some(Vec::new()),
        body: Some(BodyInfo {
            calls: calls.iter().map(|c| c.to_string()).collect(),
        }),
        ..Default::default()
    }
}

fn import_dep(name: &str) -> DependencyRecord {
    DependencyRecord {
        import: vec![name.to_string()],
        ..Default::default()
    }
}

fn repo(files: Vec<FileAnalysis>) -> RepoAnalysis {
    let mut dir_tree = BTreeMap::new();
    dir_tree.insert(
        ".".to_string(),
        files.iter().map(|f| f.file.file_name()).collect(),
    );
    let mut directories = BTreeMap::new();
    directories.insert(".".to_string(), files);
    RepoAnalysis {
        directories,
        dir_tree,
    }
}

fn default_config() -> ClassificationConfig {
    Config::default().classification
}

fn classify(analysis: &RepoAnalysis, readme: &str) -> Vec<InvocationEntry> {
    classify_with(analysis, readme, &default_config(), &NoSetup)
}

fn classify_with(
    analysis: &RepoAnalysis,
    readme: &str,
    config: &ClassificationConfig,
    setup: &dyn SetupInspector,
) -> Vec<InvocationEntry> {
    let index = CallGraphIndex::build(analysis);
    let classifier = InvocationClassifier::new(config);
    classifier.classify(analysis, &index, readme, Path::new("/repo"), setup)
}

fn find_script<'a>(entries: &'a [InvocationEntry], path: &str) -> &'a InvocationEntry {
    let run = format!("python {}", path);
    entries
        .iter()
        .find(|e| e.kind == InvocationKind::Script && e.run.as_deref() == Some(run.as_str()))
        .unwrap_or_else(|| panic!("no script entry for {}", path))
}

#[test]
fn related_entry_files_appear_in_imports_and_imported_by() {
    let analysis = repo(vec![
        entry_file("/repo/a.py", &["b.module_func"]),
        entry_file("/repo/b.py", &["print"]),
    ]);

    let entries = classify(&analysis, "");

    let a = find_script(&entries, "/repo/a.py");
    assert_eq!(a.imports.as_deref(), Some(&[PathBuf::from("/repo/b.py")][..]));
    assert!(a.imported_by.is_none());

    let b = find_script(&entries, "/repo/b.py");
    assert!(b.imports.is_none());
    assert_eq!(
        b.imported_by.as_deref(),
        Some(&[PathBuf::from("/repo/a.py")][..])
    );
}

#[test]
fn service_framework_import_with_main_guard_is_a_service() {
    let mut app = entry_file("/repo/app.py", &["app.run"]);
    app.dependencies = Some(vec![
        import_dep("Flask"),
        DependencyRecord {
            from_module: vec!["flask".to_string()],
            ..Default::default()
        },
    ]);
    let analysis = repo(vec![app]);

    let entries = classify(&analysis, "");

    let services: Vec<_> = entries
        .iter()
        .filter(|e| e.kind == InvocationKind::Service)
        .collect();
    assert_eq!(services.len(), 1, "service detections must deduplicate");
    assert_eq!(services[0].has_structure, Some(HasStructure::Main));
    assert!(!entries.iter().any(|e| e.kind == InvocationKind::Script));
}

#[test]
fn build_descriptor_yields_exactly_one_package_entry() {
    let mut analysis = repo(vec![entry_file("/repo/tool.py", &["run"])]);
    analysis
        .dir_tree
        .get_mut(".")
        .unwrap()
        .push("setup.py".to_string());

    let entries = classify_with(&analysis, "", &default_config(), &PackageSetup);
    let packages = entries
        .iter()
        .filter(|e| e.kind == InvocationKind::Package)
        .count();
    assert_eq!(packages, 1);

    // The package always outranks everything else in the repository.
    let ranked = rank_invocations(entries);
    assert_eq!(ranked[0].kind, InvocationKind::Package);
    assert_eq!(ranked[0].ranking, Some(1));
    assert!(ranked
        .iter()
        .any(|e| e.kind == InvocationKind::Script && e.ranking > Some(1)));
}

#[test]
fn repository_without_signals_falls_back_to_import_only_entries() {
    let bare_x = FileAnalysis {
        file: identity("/repo/x.py"),
        dependencies: Some(Vec::new()),
        ..Default::default()
    };
    let bare_y = FileAnalysis {
        file: identity("/repo/y.py"),
        dependencies: Some(Vec::new()),
        ..Default::default()
    };
    let analysis = repo(vec![bare_x, bare_y]);

    let ranked = rank_invocations(classify(&analysis, ""));

    assert_eq!(ranked.len(), 2);
    for entry in &ranked {
        assert_eq!(entry.kind, InvocationKind::ScriptWithoutMain);
        assert_eq!(entry.has_structure, Some(HasStructure::WithoutBody));
        assert_eq!(entry.ranking, Some(1));
    }
    assert!(ranked
        .iter()
        .any(|e| e.import.as_deref() == Some("/repo/x.py")));
}

#[test]
fn assert_calls_make_a_file_a_test_even_with_a_main_guard() {
    let mut file = entry_file("/repo/test_math.py", &["unittest.main"]);
    file.classes = BTreeMap::from([(
        "TestMath".to_string(),
        ClassInfo {
            methods: BTreeMap::from([("test_add".to_string(), scope(&["self.assertEqual"]))]),
        },
    )]);
    let analysis = repo(vec![file]);

    let entries = classify(&analysis, "");

    assert!(entries.iter().any(|e| e.kind == InvocationKind::Test));
    assert!(!entries.iter().any(|e| e.kind == InvocationKind::Script));
}

#[test]
fn function_level_asserts_are_detected_too() {
    let checker = helper_file("/repo/checks.py", "verify", &["assert_state"]);
    let analysis = repo(vec![checker]);

    let entries = classify(&analysis, "");
    assert!(entries.iter().any(|e| e.kind == InvocationKind::Test));
}

#[test]
fn self_referential_calls_never_form_a_relation() {
    let analysis = repo(vec![
        entry_file("/repo/s.py", &["s.t.go"]),
        entry_file("/repo/t.py", &["noop"]),
    ]);

    let entries = classify(&analysis, "");
    let s = find_script(&entries, "/repo/s.py");
    assert!(
        s.imports.is_none(),
        "a call mentioning the file's own stem must not count"
    );

    // Without the self stem in the call string the relation is found.
    let analysis = repo(vec![
        entry_file("/repo/s.py", &["t.go"]),
        entry_file("/repo/t.py", &["noop"]),
    ]);
    let entries = classify(&analysis, "");
    let s = find_script(&entries, "/repo/s.py");
    assert_eq!(s.imports.as_deref(), Some(&[PathBuf::from("/repo/t.py")][..]));
}

#[test]
fn relation_through_two_module_hops_is_found() {
    let analysis = repo(vec![
        entry_file("/repo/a.py", &["m1.start"]),
        helper_file("/repo/m1.py", "start", &["m2.step"]),
        helper_file("/repo/m2.py", "step", &["d.finish"]),
        entry_file("/repo/d.py", &["run"]),
    ]);
    let index = CallGraphIndex::build(&analysis);
    let resolver = RelationResolver::new(&index, true);

    let graph = index.file_graph(Path::new("/repo/a.py")).unwrap();
    let related = resolver.related_entry_files(
        Path::new("/repo/a.py"),
        graph,
        &[PathBuf::from("/repo/d.py")],
    );
    assert_eq!(related, vec![PathBuf::from("/repo/d.py")]);
}

#[test]
fn relation_needing_three_module_hops_is_not_found() {
    let analysis = repo(vec![
        entry_file("/repo/a.py", &["m1.start"]),
        helper_file("/repo/m1.py", "start", &["m2.step"]),
        helper_file("/repo/m2.py", "step", &["m3.jump"]),
        helper_file("/repo/m3.py", "jump", &["d.finish"]),
        entry_file("/repo/d.py", &["run"]),
    ]);
    let index = CallGraphIndex::build(&analysis);
    let resolver = RelationResolver::new(&index, true);

    let graph = index.file_graph(Path::new("/repo/a.py")).unwrap();
    let related = resolver.related_entry_files(
        Path::new("/repo/a.py"),
        graph,
        &[PathBuf::from("/repo/d.py")],
    );
    assert!(related.is_empty());
}

#[test]
fn candidate_scan_stops_or_continues_per_configuration() {
    let analysis = repo(vec![
        entry_file("/repo/a.py", &["b.f", "c.g"]),
        entry_file("/repo/b.py", &["noop"]),
        entry_file("/repo/c.py", &["noop"]),
    ]);
    let index = CallGraphIndex::build(&analysis);
    let candidates = [PathBuf::from("/repo/b.py"), PathBuf::from("/repo/c.py")];
    let graph = index.file_graph(Path::new("/repo/a.py")).unwrap();

    let stopping = RelationResolver::new(&index, true);
    assert_eq!(
        stopping.related_entry_files(Path::new("/repo/a.py"), graph, &candidates),
        vec![PathBuf::from("/repo/b.py")]
    );

    let exhaustive = RelationResolver::new(&index, false);
    assert_eq!(
        exhaustive.related_entry_files(Path::new("/repo/a.py"), graph, &candidates),
        vec![PathBuf::from("/repo/b.py"), PathBuf::from("/repo/c.py")]
    );
}

#[test]
fn body_only_file_is_a_script_when_nothing_stronger_exists() {
    let analysis = repo(vec![body_file("/repo/job.py", &["helper.run"])]);
    let entries = classify(&analysis, "");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, InvocationKind::Script);
    assert_eq!(entries[0].has_structure, Some(HasStructure::Body));
}

#[test]
fn body_only_file_is_suppressed_by_a_script_with_main() {
    let analysis = repo(vec![
        entry_file("/repo/main.py", &["work"]),
        body_file("/repo/job.py", &["helper.run"]),
    ]);
    let entries = classify(&analysis, "");

    assert!(entries
        .iter()
        .any(|e| e.kind == InvocationKind::Script
            && e.has_structure == Some(HasStructure::Main)));
    assert!(!entries
        .iter()
        .any(|e| e.has_structure == Some(HasStructure::Body)));
}

#[test]
fn body_service_is_reported_alongside_plain_body_scripts() {
    let mut service = body_file("/repo/api.py", &["app.run"]);
    service.dependencies = Some(vec![import_dep("fastapi")]);
    let analysis = repo(vec![service, body_file("/repo/job.py", &["helper.run"])]);

    let entries = classify(&analysis, "");

    assert!(entries
        .iter()
        .any(|e| e.kind == InvocationKind::Service
            && e.has_structure == Some(HasStructure::Body)));
    assert!(entries
        .iter()
        .any(|e| e.kind == InvocationKind::Script
            && e.has_structure == Some(HasStructure::Body)
            && e.run.as_deref() == Some("python /repo/job.py")));
}

#[test]
fn missing_dependency_record_degrades_to_a_plain_script() {
    let mut file = entry_file("/repo/opaque.py", &["work"]);
    file.dependencies = None;
    let analysis = repo(vec![file]);

    let entries = classify(&analysis, "");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, InvocationKind::Script);
    assert_eq!(entries[0].has_structure, Some(HasStructure::Main));
}

#[test]
fn entry_file_cap_limits_relation_resolution_sources() {
    let mut config = default_config();
    config.max_entry_files = Some(1);

    let analysis = repo(vec![
        entry_file("/repo/a.py", &["b.f"]),
        entry_file("/repo/b.py", &["a.f"]),
    ]);
    let entries = classify_with(&analysis, "", &config, &NoSetup);

    let a = find_script(&entries, "/repo/a.py");
    assert_eq!(a.imports.as_deref(), Some(&[PathBuf::from("/repo/b.py")][..]));

    // The second entry file was never used as a relation source.
    let b = find_script(&entries, "/repo/b.py");
    assert!(b.imports.is_none());
    assert_eq!(
        b.imported_by.as_deref(),
        Some(&[PathBuf::from("/repo/a.py")][..])
    );
}

#[test]
fn readme_mentions_raise_an_entry_above_its_peers() {
    let analysis = repo(vec![
        entry_file("/repo/a.py", &["work"]),
        entry_file("/repo/b.py", &["work"]),
    ]);
    let ranked = rank_invocations(classify(&analysis, "Start the demo with python b.py"));

    assert_eq!(ranked[0].run.as_deref(), Some("python /repo/b.py"));
    assert_eq!(ranked[0].ranking, Some(1));
    assert_eq!(ranked[1].run.as_deref(), Some("python /repo/a.py"));
    assert_eq!(ranked[1].ranking, Some(2));
}

#[test]
fn ranking_is_positive_and_monotone_in_score() {
    let mut app = entry_file("/repo/app.py", &["app.run"]);
    app.dependencies = Some(vec![import_dep("flask")]);
    let analysis = repo(vec![
        app,
        entry_file("/repo/tool.py", &["work"]),
        entry_file("/repo/other.py", &["work"]),
    ]);

    let ranked = rank_invocations(classify(&analysis, ""));
    assert!(ranked.iter().all(|e| e.ranking.unwrap() >= 1));

    // Service (7) before scripts (2, 2); the tied scripts share a rank.
    assert_eq!(ranked[0].kind, InvocationKind::Service);
    assert_eq!(ranked[0].ranking, Some(1));
    assert_eq!(ranked[1].ranking, Some(2));
    assert_eq!(ranked[2].ranking, Some(2));
}

#[test]
fn classification_is_idempotent() {
    let mut app = entry_file("/repo/app.py", &["tool.start"]);
    app.dependencies = Some(vec![import_dep("flask")]);
    let analysis = repo(vec![
        app,
        entry_file("/repo/tool.py", &["work"]),
        body_file("/repo/job.py", &["helper.run"]),
    ]);

    let first = rank_invocations(classify(&analysis, "see tool.py"));
    let second = rank_invocations(classify(&analysis, "see tool.py"));
    assert_eq!(first, second);
}
