//! Project-level resolution orchestration.
//!
//! Ties the pieces together for the common case: index the on-disk
//! template tree, classify it, and resolve every target's render tree in
//! one pass. The returned filesystem lets the external compiler read each
//! resolved path via `open`/`read_file`.

use crate::config::EngineConfig;
use crate::log;
use crate::path::TemplatePath;
use crate::resolver::{RenderTree, ResolveError, Resolver};
use crate::vfs::{Filesystem, FsError};

/// Per-target resolution results for one project scan.
pub type ProjectTrees = Vec<(TemplatePath, Result<RenderTree, ResolveError>)>;

/// Scan the configured project root and resolve every target.
///
/// A target that fails to resolve (layout cycle, missing short name)
/// appears in the results with its error; it never aborts the batch. The
/// filesystem is returned alongside so callers can read the resolved
/// template contents.
pub fn resolve_project(config: &EngineConfig) -> Result<(Filesystem, ProjectTrees), FsError> {
    let fs = Filesystem::with_config(config);
    fs.scan(config)?;

    let resolver = Resolver::new(&fs, &config.conventions());
    let results = resolver.resolve_all();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    log!("resolve"; "{} targets resolved, {} failed", results.len() - failed, failed);
    for (path, result) in &results {
        if let Err(err) = result {
            log!("error"; "{}: {err}", path.relative());
        }
    }

    Ok((fs, results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_project_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        for (path, content) in [
            ("_base.tmpl", "<html>"),
            ("g/nav.tmpl", "<nav>"),
            ("posts/local.tmpl", "<aside>"),
            ("posts/hello.base.tmpl", "<p>hi</p>"),
        ] {
            let full = dir.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
        }

        let config = EngineConfig::with_root(dir.path());
        let (fs, results) = resolve_project(&config).unwrap();

        assert_eq!(results.len(), 1);
        let (target, tree) = &results[0];
        assert_eq!(target.relative(), "posts/hello.base.tmpl");

        let tree = tree.as_ref().unwrap();
        let rel: Vec<String> = tree.iter().map(TemplatePath::relative).collect();
        assert_eq!(
            rel,
            [
                "./_base.tmpl",
                "g/nav.tmpl",
                "posts/local.tmpl",
                "posts/hello.base.tmpl",
            ]
        );

        // every resolved path is readable through the filesystem
        for path in tree {
            assert!(!fs.read_file(path.relative()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_resolve_project_reports_failures_without_aborting() {
        let dir = tempfile::TempDir::new().unwrap();
        for path in ["_base.tmpl", "a/ok.base.tmpl", "a/broken.ghost.tmpl"] {
            let full = dir.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, "x").unwrap();
        }

        let config = EngineConfig::with_root(dir.path());
        let (_, results) = resolve_project(&config).unwrap();

        assert_eq!(results.len(), 2);
        let ok = results
            .iter()
            .filter(|(_, r)| r.is_ok())
            .count();
        assert_eq!(ok, 1);
        let failed: Vec<_> = results
            .iter()
            .filter_map(|(p, r)| r.as_ref().err().map(|e| (p.relative(), e.clone())))
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, "a/broken.ghost.tmpl");
        assert_eq!(failed[0].1, ResolveError::MissingLayout("ghost".into()));
    }
}
