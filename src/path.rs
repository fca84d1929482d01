//! Root-relative path model for indexed template files.
//!
//! Every path handed to the engine is normalized into a `TemplatePath`:
//! a (directory, file) pair expressed relative to the project root. A path
//! that cannot be expressed under the root is rejected here, at the
//! boundary, so the rest of the crate only ever sees valid root-relative
//! locations.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Path-level errors, raised at parse time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path `{0}` resolves outside the project root")]
    OutsideRoot(PathBuf),

    #[error("path `{0}` has no parent directory inside the project root")]
    NoParent(PathBuf),
}

/// A normalized location under the project root.
///
/// Holds the directory part (`"."` for the root itself) and the file name
/// (empty for a directory). The split follows the indexing convention: a
/// trailing segment with an extension is a file, anything else is a
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplatePath {
    root: Arc<PathBuf>,
    dir: PathBuf,
    file: String,
}

impl TemplatePath {
    /// Parse a raw path against the project root.
    ///
    /// Accepts relative paths (interpreted from the root) and absolute
    /// paths (which must lie under the root). `.` and `..` segments are
    /// resolved during normalization; a path that climbs above the root
    /// fails with [`PathError::OutsideRoot`].
    pub fn parse(root: &Arc<PathBuf>, raw: impl AsRef<Path>) -> Result<Self, PathError> {
        let raw = raw.as_ref();

        let rel = if raw.is_absolute() {
            raw.strip_prefix(root.as_path())
                .map_err(|_| PathError::OutsideRoot(raw.to_path_buf()))?
        } else {
            raw
        };

        let mut segments: Vec<String> = Vec::new();
        for component in rel.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(seg) => {
                    segments.push(seg.to_string_lossy().into_owned());
                }
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(PathError::OutsideRoot(raw.to_path_buf()));
                    }
                }
                // A rooted component can only appear when strip_prefix was
                // not applicable, i.e. an absolute path outside the root.
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PathError::OutsideRoot(raw.to_path_buf()));
                }
            }
        }

        // A trailing segment with an extension is a file name; otherwise
        // the whole path designates a directory.
        let has_file = segments
            .last()
            .is_some_and(|last| Path::new(last).extension().is_some());
        let file = if has_file {
            segments.pop().unwrap_or_default()
        } else {
            String::new()
        };

        let dir = if segments.is_empty() {
            PathBuf::from(".")
        } else {
            segments.iter().collect()
        };

        Ok(Self {
            root: Arc::clone(root),
            dir,
            file,
        })
    }

    /// Build a path directly from a root-relative directory and file name.
    pub fn from_parts(
        root: &Arc<PathBuf>,
        dir: impl AsRef<Path>,
        file: impl Into<String>,
    ) -> Result<Self, PathError> {
        let mut path = Self::parse(root, dir.as_ref())?;
        path.file = file.into();
        Ok(path)
    }

    /// The project root this path is anchored to.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Root-relative directory (`"."` for the root itself).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name with extension; empty for a directory.
    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// File name without its final extension.
    pub fn file_stem(&self) -> &str {
        match Path::new(&self.file).file_stem() {
            Some(stem) => stem.to_str().unwrap_or(&self.file),
            None => &self.file,
        }
    }

    /// Final extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file).extension().and_then(|e| e.to_str())
    }

    /// Whether this path designates a directory.
    pub fn is_dir(&self) -> bool {
        self.file.is_empty()
    }

    /// Whether the canonical form of this path is absolute, i.e. whether
    /// the root it is anchored to is absolute.
    pub fn is_absolute(&self) -> bool {
        self.root.is_absolute()
    }

    /// Whether this path designates the project root directory itself.
    pub fn is_root(&self) -> bool {
        self.is_dir() && self.dir == Path::new(".")
    }

    /// Directory depth below the project root; the root itself is 0.
    pub fn depth(&self) -> usize {
        if self.dir == Path::new(".") {
            0
        } else {
            self.dir.components().count()
        }
    }

    /// Path to the containing directory; fails when already at the root.
    pub fn parent(&self) -> Result<Self, PathError> {
        if !self.is_dir() {
            return Self::from_parts(&self.root, &self.dir, "");
        }
        match self.dir.parent() {
            Some(up) if self.dir != Path::new(".") => Self::from_parts(&self.root, up, ""),
            _ => Err(PathError::NoParent(self.dir.clone())),
        }
    }

    /// Root-relative display form.
    ///
    /// Files at the root render as `./name.ext` so that listings line up
    /// with deeper entries like `a/name.ext`; the root directory itself
    /// renders as `.`.
    pub fn relative(&self) -> String {
        if self.is_dir() {
            return self.dir.to_string_lossy().into_owned();
        }
        if self.dir == Path::new(".") {
            format!("./{}", self.file)
        } else {
            format!("{}/{}", self.dir.to_string_lossy(), self.file)
        }
    }

    /// Canonical absolute form, reconstructed from the root.
    pub fn absolute(&self) -> PathBuf {
        let mut abs = self.root.as_path().to_path_buf();
        if self.dir != Path::new(".") {
            abs.push(&self.dir);
        }
        if !self.file.is_empty() {
            abs.push(&self.file);
        }
        abs
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.absolute().display())
    }
}

impl PartialOrd for TemplatePath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TemplatePath {
    /// Byte-lexicographic order on the root-relative form, so sorted
    /// listings match a plain directory listing by name.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.relative().cmp(&other.relative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Arc<PathBuf> {
        Arc::new(PathBuf::from("/site"))
    }

    #[test]
    fn test_parse_file_in_root() {
        let p = TemplatePath::parse(&root(), "_layout.tmpl").unwrap();
        assert_eq!(p.dir(), Path::new("."));
        assert_eq!(p.file_name(), "_layout.tmpl");
        assert_eq!(p.file_stem(), "_layout");
        assert_eq!(p.extension(), Some("tmpl"));
        assert_eq!(p.depth(), 0);
        assert_eq!(p.relative(), "./_layout.tmpl");
        assert_eq!(p.absolute(), PathBuf::from("/site/_layout.tmpl"));
    }

    #[test]
    fn test_parse_nested_file() {
        let p = TemplatePath::parse(&root(), "a/b/1.base.tmpl").unwrap();
        assert_eq!(p.dir(), Path::new("a/b"));
        assert_eq!(p.file_name(), "1.base.tmpl");
        assert_eq!(p.file_stem(), "1.base");
        assert_eq!(p.depth(), 2);
        assert_eq!(p.relative(), "a/b/1.base.tmpl");
    }

    #[test]
    fn test_parse_directory() {
        let p = TemplatePath::parse(&root(), "a/b").unwrap();
        assert!(p.is_dir());
        assert_eq!(p.file_name(), "");
        assert_eq!(p.depth(), 2);
        assert_eq!(p.relative(), "a/b");
    }

    #[test]
    fn test_parse_root_directory() {
        let p = TemplatePath::parse(&root(), ".").unwrap();
        assert!(p.is_root());
        assert_eq!(p.depth(), 0);
        assert_eq!(p.relative(), ".");
    }

    #[test]
    fn test_depth_matches_separator_count() {
        for (raw, depth) in [
            ("1.tmpl", 0),
            ("a/1.tmpl", 1),
            ("a/b/1.tmpl", 2),
            ("a/b/c/1.tmpl", 3),
        ] {
            let p = TemplatePath::parse(&root(), raw).unwrap();
            assert_eq!(p.depth(), depth, "depth of {raw}");
            assert_eq!(
                p.depth(),
                p.relative().matches('/').count() - usize::from(p.depth() == 0),
            );
        }
    }

    #[test]
    fn test_absolute_inside_root() {
        let p = TemplatePath::parse(&root(), "/site/g/1.tmpl").unwrap();
        assert_eq!(p.dir(), Path::new("g"));
        assert_eq!(p.file_name(), "1.tmpl");
    }

    #[test]
    fn test_absolute_outside_root_rejected() {
        let err = TemplatePath::parse(&root(), "/elsewhere/1.tmpl").unwrap_err();
        assert_eq!(err, PathError::OutsideRoot(PathBuf::from("/elsewhere/1.tmpl")));
    }

    #[test]
    fn test_parent_traversal_outside_root_rejected() {
        assert!(TemplatePath::parse(&root(), "../1.tmpl").is_err());
        assert!(TemplatePath::parse(&root(), "a/../../1.tmpl").is_err());
        // `..` that stays inside the root is fine
        let p = TemplatePath::parse(&root(), "a/b/../1.tmpl").unwrap();
        assert_eq!(p.relative(), "a/1.tmpl");
    }

    #[test]
    fn test_normalization_of_dot_segments() {
        let p = TemplatePath::parse(&root(), "./a/./1.tmpl").unwrap();
        assert_eq!(p.relative(), "a/1.tmpl");
    }

    #[test]
    fn test_parent_of_file_and_directory() {
        let p = TemplatePath::parse(&root(), "a/b/1.tmpl").unwrap();
        assert_eq!(p.parent().unwrap().relative(), "a/b");
        let d = TemplatePath::parse(&root(), "a/b").unwrap();
        assert_eq!(d.parent().unwrap().relative(), "a");
    }

    #[test]
    fn test_parent_of_root_fails() {
        let p = TemplatePath::parse(&root(), ".").unwrap();
        assert!(matches!(p.parent(), Err(PathError::NoParent(_))));
    }

    #[test]
    fn test_ordering_is_byte_lexicographic() {
        let mut paths = vec![
            TemplatePath::parse(&root(), "g/2.tmpl").unwrap(),
            TemplatePath::parse(&root(), "a/1.tmpl").unwrap(),
            TemplatePath::parse(&root(), "g/1.tmpl").unwrap(),
            TemplatePath::parse(&root(), "_base.tmpl").unwrap(),
        ];
        paths.sort();
        let rel: Vec<_> = paths.iter().map(TemplatePath::relative).collect();
        assert_eq!(rel, ["./_base.tmpl", "a/1.tmpl", "g/1.tmpl", "g/2.tmpl"]);
    }
}
