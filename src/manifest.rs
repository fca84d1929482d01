//! Aggregate view of every template referenced by some render tree.
//!
//! External build-manifest and change-detection collaborators need to know
//! which files participate in rendering at all. The manifest is defined
//! strictly as the union of paths appearing in at least one successfully
//! resolved render tree, plus the set of directories containing them;
//! templates no target reaches are excluded.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::resolver::Resolver;

/// Deduplicated, sorted listing of referenced templates and their
/// directories, in root-relative form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub templates: Vec<String>,
    pub directories: Vec<String>,
}

impl Manifest {
    /// Collect the manifest from a resolver snapshot. Targets that fail to
    /// resolve contribute nothing.
    pub fn collect(resolver: &Resolver) -> Self {
        let mut templates = BTreeSet::new();
        let mut directories = BTreeSet::new();

        for (_, result) in resolver.resolve_all() {
            let Ok(tree) = result else { continue };
            for path in tree {
                directories.insert(path.dir().to_string_lossy().into_owned());
                templates.insert(path.relative());
            }
        }

        Self {
            templates: templates.into_iter().collect(),
            directories: directories.into_iter().collect(),
        }
    }

    /// Serialize for external consumers.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
