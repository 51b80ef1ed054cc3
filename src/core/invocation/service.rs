// src/core/invocation/service.rs
use std::collections::HashSet;

use super::super::DependencyRecord;

/// Matches a file's import records against the catalogue of known
/// service-framework names.
pub struct ServiceDetector {
    frameworks: HashSet<String>,
}

impl ServiceDetector {
    pub fn new(frameworks: &[String]) -> Self {
        Self {
            frameworks: frameworks.iter().map(|f| f.to_lowercase()).collect(),
        }
    }

    /// True when any imported or from-imported token names a known
    /// framework. Tokens match case-insensitively and exactly; no
    /// substring matching.
    pub fn is_service(&self, dependencies: &[DependencyRecord]) -> bool {
        dependencies.iter().any(|dep| {
            dep.import
                .iter()
                .chain(dep.from_module.iter())
                .any(|token| self.frameworks.contains(&token.to_lowercase()))
        })
    }
}
