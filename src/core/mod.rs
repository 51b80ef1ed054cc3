// src/core/mod.rs
mod engine;
mod analysis;
mod loader;
mod setup_inspector;

// Call graph model and entry-to-entry relation search
mod call_graph;

// Invocation classification and ranking
mod invocation;

pub use analysis::{
    AnalysisSummary, BodyInfo, ClassInfo, DependencyRecord, FileAnalysis, FileIdentity,
    MainInfo, RepoAnalysis, ScopeInfo,
};
pub use loader::AnalysisLoader;
pub use setup_inspector::{DescriptorSetupInspector, SetupInspector};

pub use call_graph::{CallGraphIndex, CallRecord, FileCallGraph, RelationResolver, MAX_HOPS};
pub use invocation::{
    rank_invocations, HasStructure, InvocationClassifier, InvocationEntry, InvocationKind,
    ServiceDetector,
};

// Export the main engine
pub use engine::{Engine, InvocationReport};
