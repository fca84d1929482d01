//! Project root discovery.
//!
//! Walks upward from a starting directory to the nearest directory that
//! holds a `latvus.toml` (falling back to a `.git` directory) and derives
//! the module name from it. The result is an explicit value rather than
//! ambient global state; [`project_root`] memoizes one lookup per process
//! for callers that want the original convenience.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The engine configuration file name searched for during discovery.
pub const CONFIG_FILE: &str = "latvus.toml";

static PROJECT_ROOT: OnceLock<Option<ProjectRoot>> = OnceLock::new();

/// A located project: its root directory and module identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub root: PathBuf,
    pub module: String,
}

impl ProjectRoot {
    /// Path of the configuration file inside this root (which may or may
    /// not exist when discovery matched on `.git`).
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

/// Search upward from `start` for the project root.
pub fn locate_from(start: &Path) -> Option<ProjectRoot> {
    let mut dir = start;
    loop {
        if dir.join(CONFIG_FILE).is_file() || dir.join(".git").is_dir() {
            let module = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Some(ProjectRoot {
                root: dir.to_path_buf(),
                module,
            });
        }
        dir = dir.parent()?;
    }
}

/// Locate the project root from the current working directory, once per
/// process. Subsequent calls return the first result.
pub fn project_root() -> Option<&'static ProjectRoot> {
    PROJECT_ROOT
        .get_or_init(|| {
            let cwd = std::env::current_dir().ok()?;
            locate_from(&cwd)
        })
        .as_ref()
}
