//! In-memory virtual filesystem over the project root.
//!
//! The `Filesystem` indexes template files as [`Entry`] values, either
//! disk-backed (bytes read lazily from storage) or virtual (bytes held in
//! memory until [`Filesystem::flush`] persists them). It is the single
//! owner of all entry data; the resolvers only ever read from it.
//!
//! # Thread Safety
//!
//! One `RwLock` guards the whole index:
//! - mutations (`add`, `add_virtual`, `flush`, `scan`) take the write lock
//! - queries (`open`, `read_dir`, `read_file`, `paths`) take the read lock
//!
//! so queries may run concurrently with each other but never observe a
//! partially mutated index.

mod entry;

pub use entry::{Backing, Entry};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::EngineConfig;
use crate::log;
use crate::path::{PathError, TemplatePath};

/// Filesystem-level errors.
#[derive(Debug, Error)]
pub enum FsError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("file not found in index: `{0}`")]
    NotFound(String),

    #[error("not a directory: `{0}`")]
    NotADirectory(String),

    #[error("failed to flush `{path}` to disk")]
    Flush {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read `{path}` from disk")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
struct Index {
    /// Entries keyed by root-relative form.
    entries: FxHashMap<String, Entry>,
    next_id: u64,
}

impl Index {
    fn insert(&mut self, path: TemplatePath, backing: Backing) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        // re-adding a path replaces the previous entry under a fresh id
        self.entries.insert(path.relative(), Entry::new(id, path, backing));
        id
    }
}

/// The indexed collection of template files under one project root.
#[derive(Debug)]
pub struct Filesystem {
    root: Arc<PathBuf>,
    index: RwLock<Index>,
}

impl Filesystem {
    /// Create an empty filesystem anchored at `root` (an absolute path).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
            index: RwLock::new(Index::default()),
        }
    }

    /// Create an empty filesystem anchored at the configured project root.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::new(config.root.clone())
    }

    /// The project root all indexed paths are relative to.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Index a disk-backed file. Content is not touched here; it is read
    /// lazily when the entry is opened.
    pub fn add(&self, raw: impl AsRef<Path>) -> Result<u64, FsError> {
        let path = TemplatePath::parse(&self.root, raw)?;
        Ok(self.index.write().insert(path, Backing::Disk))
    }

    /// Index an in-memory entry. [`flush`](Self::flush) persists it to
    /// storage later.
    pub fn add_virtual(&self, raw: impl AsRef<Path>, data: Vec<u8>) -> Result<u64, FsError> {
        let path = TemplatePath::parse(&self.root, raw)?;
        Ok(self.index.write().insert(path, Backing::Virtual(data)))
    }

    /// Look up an entry by path, returning a snapshot of it.
    pub fn open(&self, raw: impl AsRef<Path>) -> Result<Entry, FsError> {
        let path = TemplatePath::parse(&self.root, raw)?;
        let key = path.relative();
        self.index
            .read()
            .entries
            .get(&key)
            .cloned()
            .ok_or(FsError::NotFound(key))
    }

    /// List the entries directly inside a directory, sorted by file name
    /// in byte order (the same order a plain directory listing yields).
    pub fn read_dir(&self, raw: impl AsRef<Path>) -> Result<Vec<Entry>, FsError> {
        let path = TemplatePath::parse(&self.root, raw)?;
        if !path.is_dir() {
            return Err(FsError::NotADirectory(path.relative()));
        }

        let index = self.index.read();
        let mut entries: Vec<Entry> = index
            .entries
            .values()
            .filter(|e| e.path().dir() == path.dir())
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.path().file_name().cmp(b.path().file_name()));
        Ok(entries)
    }

    /// The full content of an indexed file.
    pub fn read_file(&self, raw: impl AsRef<Path>) -> Result<Vec<u8>, FsError> {
        self.open(raw)?.contents()
    }

    /// Write every virtual entry to storage, converting each to disk
    /// backing as it succeeds.
    ///
    /// Processing is sequential in insertion order and not atomic across
    /// entries: the first failed write stops the pass and is returned, and
    /// entries flushed before it stay disk-backed. Because converted
    /// entries are no longer selected, calling `flush` again retries only
    /// the remainder; with nothing left to write it is a no-op.
    pub fn flush(&self) -> Result<(), FsError> {
        let mut index = self.index.write();
        let mut pending: Vec<&mut Entry> = index
            .entries
            .values_mut()
            .filter(|e| e.is_virtual())
            .collect();
        pending.sort_by_key(|e| e.id());

        for entry in pending {
            entry.flush()?;
        }
        Ok(())
    }

    /// Walk the project root and index every on-disk file carrying the
    /// configured template extension. The output directory and hidden
    /// directories are skipped. Returns the number of files indexed.
    pub fn scan(&self, config: &EngineConfig) -> Result<usize, FsError> {
        let output = self.root.join(&config.output);
        let mut count = 0usize;

        for entry in WalkDir::new(self.root.as_path())
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                let hidden = e
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with('.') && n.len() > 1);
                !hidden && e.path() != output
            })
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let matches_ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == config.template_extension());
            if matches_ext {
                self.add(entry.path())?;
                count += 1;
            }
        }

        log!("scan"; "indexed {} template files under {}", count, self.root.display());
        Ok(count)
    }

    /// A consistent snapshot of every indexed path, for the resolvers.
    pub fn paths(&self) -> Vec<TemplatePath> {
        let index = self.index.read();
        let mut entries: Vec<&Entry> = index.entries.values().collect();
        entries.sort_by_key(|e| e.id());
        entries.iter().map(|e| e.path().clone()).collect()
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.index.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().entries.is_empty()
    }
}
