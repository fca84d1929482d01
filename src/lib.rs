//! latvus - template dependency resolution for static site builds.
//!
//! Given a project root full of template fragments, latvus determines, for
//! every renderable target, the exact ordered sequence of fragments the
//! external compiler must consume: the layout inheritance chain, the
//! shared globals, the directory-local includes, and the target itself.
//!
//! # Architecture
//!
//! ```text
//! EngineConfig (root, extension, global dir, layout marker)
//!     │
//!     ▼
//! Filesystem ────────── indexed entries, disk-backed or virtual
//!     │                 (add / add_virtual / open / read_dir / flush)
//!     ▼
//! classify() ─────────── Layout / Target / Global / Local by naming
//!     │                  convention
//!     ▼
//! Resolver ──────────── layout_chain() per (short name, directory),
//!     │                 render_tree() per target, resolve_all() batch
//!     ▼
//! Manifest ──────────── union of every referenced template path
//! ```
//!
//! # Conventions
//!
//! | File                | Meaning                                        |
//! |---------------------|------------------------------------------------|
//! | `_base.tmpl`        | layout `base`                                  |
//! | `a/_sub.base.tmpl`  | layout `sub` in `a/`, extending `base`         |
//! | `a/post.sub.tmpl`   | target in `a/` rendered through `sub`          |
//! | `g/nav.tmpl`        | global fragment, applied to every target       |
//! | `a/aside.tmpl`      | local fragment, applied to targets in `a/`     |
//!
//! A layout short name defined at several directory levels contributes one
//! entry per level to the chain, root first (shadowing); the compiler
//! decides which fragments override which.

pub mod build;
pub mod config;
pub mod locate;
pub mod logger;
pub mod manifest;
pub mod path;
pub mod resolver;
pub mod template;
pub mod vfs;

pub use build::{ProjectTrees, resolve_project};
pub use config::{ConfigError, EngineConfig};
pub use locate::{ProjectRoot, locate_from, project_root};
pub use manifest::Manifest;
pub use path::{PathError, TemplatePath};
pub use resolver::{RenderTree, ResolveError, Resolver, Target};
pub use template::{Conventions, Template, TemplateKind, classify};
pub use vfs::{Backing, Entry, Filesystem, FsError};
