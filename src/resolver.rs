//! Layout-chain and render-tree resolution.
//!
//! # Architecture
//!
//! ```text
//! Resolver::new(&Filesystem, &Conventions)
//!     │
//!     └── snapshot + classify every indexed file
//!             │
//!             ├── layout_chain(short, dir)   → [root layout .. leaf layout]
//!             ├── render_tree(target)        → chain ++ globals ++ locals ++ target
//!             └── resolve_all()              → per-target results, in parallel
//! ```
//!
//! A resolver takes one consistent snapshot of the index at construction;
//! nothing is cached across filesystem mutations, so callers build a fresh
//! resolver per batch.
//!
//! # Shadowing
//!
//! When the same short name is defined at several directory levels between
//! the root and a target, every level contributes its own entry to the
//! chain, root first. Later entries may override fragments of earlier ones
//! at render time; which fragments win is the compiler's concern.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::path::TemplatePath;
use crate::template::{Conventions, TemplateKind, classify};
use crate::vfs::Filesystem;

/// Errors resolving a single target. A failure aborts only that target's
/// resolution; batch callers continue with the remaining targets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no layout named `{0}` is reachable from the target directory")]
    MissingLayout(CompactString),

    #[error("layout parent declarations form a cycle at `{0}`")]
    Cycle(CompactString),
}

/// The fully ordered list of template paths needed to render one target.
pub type RenderTree = Vec<TemplatePath>;

/// A renderable target and the layout short name it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: TemplatePath,
    pub layout: CompactString,
}

#[derive(Debug, Clone)]
struct LayoutEntry {
    path: TemplatePath,
    depth: usize,
    parent: Option<CompactString>,
}

/// Read-side view over a classified snapshot of the filesystem index.
#[derive(Debug)]
pub struct Resolver {
    layouts: FxHashMap<CompactString, Vec<LayoutEntry>>,
    globals: Vec<TemplatePath>,
    locals: FxHashMap<PathBuf, Vec<TemplatePath>>,
    targets: Vec<Target>,
}

impl Resolver {
    /// Snapshot and classify the current index contents.
    pub fn new(fs: &Filesystem, conv: &Conventions) -> Self {
        let mut layouts: FxHashMap<CompactString, Vec<LayoutEntry>> = FxHashMap::default();
        let mut globals = Vec::new();
        let mut locals: FxHashMap<PathBuf, Vec<TemplatePath>> = FxHashMap::default();
        let mut targets = Vec::new();

        for path in fs.paths() {
            let Some(template) = classify(&path, conv) else {
                continue;
            };
            match template.kind {
                TemplateKind::Layout { short, parent } => {
                    layouts.entry(short).or_default().push(LayoutEntry {
                        depth: path.depth(),
                        path,
                        parent,
                    });
                }
                TemplateKind::Target { layout } => targets.push(Target { path, layout }),
                TemplateKind::Global => globals.push(path),
                TemplateKind::Local => {
                    locals.entry(path.dir().to_path_buf()).or_default().push(path);
                }
            }
        }

        // root-first within each short name; lexicographic within the
        // positional groups so render trees are fully deterministic
        for entries in layouts.values_mut() {
            entries.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path)));
        }
        globals.sort();
        for entries in locals.values_mut() {
            entries.sort();
        }
        targets.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            layouts,
            globals,
            locals,
            targets,
        }
    }

    /// Every classified target in the snapshot, in path order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Resolve the ordered, root-first chain of layout entries that apply
    /// to `short` for a target in `target_dir`.
    ///
    /// Collects every same-short-name layout defined at the root, in an
    /// ancestor of `target_dir`, or in `target_dir` itself, ordered by
    /// increasing depth; a declared parent's chain (deepest declaration
    /// wins when levels disagree) is resolved recursively and prepended.
    pub fn layout_chain(
        &self,
        short: &str,
        target_dir: &Path,
    ) -> Result<Vec<TemplatePath>, ResolveError> {
        let mut visited: Vec<CompactString> = Vec::new();
        self.chain_into(short, target_dir, &mut visited)
    }

    fn chain_into(
        &self,
        short: &str,
        target_dir: &Path,
        visited: &mut Vec<CompactString>,
    ) -> Result<Vec<TemplatePath>, ResolveError> {
        if visited.iter().any(|seen| seen == short) {
            return Err(ResolveError::Cycle(CompactString::from(short)));
        }
        visited.push(CompactString::from(short));

        let candidates: Vec<&LayoutEntry> = self
            .layouts
            .get(short)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| dir_applies(e.path.dir(), target_dir))
                    .collect()
            })
            .unwrap_or_default();
        if candidates.is_empty() {
            return Err(ResolveError::MissingLayout(CompactString::from(short)));
        }

        // deepest (most specific) parent declaration wins
        let parent = candidates.iter().rev().find_map(|e| e.parent.clone());

        let mut chain = match parent {
            Some(parent) => self.chain_into(&parent, target_dir, visited)?,
            None => Vec::new(),
        };
        chain.extend(candidates.into_iter().map(|e| e.path.clone()));
        Ok(chain)
    }

    /// The fully ordered render tree for one target: layout chain, then
    /// every global (sorted by full path), then the locals of the target's
    /// own directory (sorted), then the target itself. The groups cannot
    /// overlap, so no deduplication is needed.
    pub fn render_tree(&self, target: &Target) -> Result<RenderTree, ResolveError> {
        let mut tree = self.layout_chain(&target.layout, target.path.dir())?;
        tree.extend(self.globals.iter().cloned());
        if let Some(locals) = self.locals.get(target.path.dir()) {
            tree.extend(locals.iter().cloned());
        }
        tree.push(target.path.clone());
        Ok(tree)
    }

    /// Resolve every target in the snapshot, in parallel.
    ///
    /// Per-target failures (cycle, missing layout) are reported alongside
    /// the successes; one bad target never aborts the batch.
    pub fn resolve_all(&self) -> Vec<(TemplatePath, Result<RenderTree, ResolveError>)> {
        self.targets
            .par_iter()
            .map(|target| (target.path.clone(), self.render_tree(target)))
            .collect()
    }
}

/// Whether a layout defined in `layout_dir` applies to a target in
/// `target_dir`: the layout's directory must be the root, an ancestor of
/// the target's directory, or that directory itself.
fn dir_applies(layout_dir: &Path, target_dir: &Path) -> bool {
    layout_dir == Path::new(".") || target_dir.starts_with(layout_dir)
}
