//! Indexed file entries and their disk/virtual backing.

use std::fs;
use std::time::SystemTime;

use crate::path::TemplatePath;

use super::FsError;

/// Where an entry's bytes live.
///
/// `Virtual` holds content entirely in memory until [`Entry::flush`]
/// persists it; `Disk` entries carry no content and are read lazily from
/// storage. The transition is one-way: flush turns `Virtual` into `Disk`
/// and nothing turns it back.
#[derive(Debug, Clone)]
pub enum Backing {
    Disk,
    Virtual(Vec<u8>),
}

/// A single indexed file.
#[derive(Debug, Clone)]
pub struct Entry {
    id: u64,
    path: TemplatePath,
    backing: Backing,
    mod_time: SystemTime,
}

impl Entry {
    pub(super) fn new(id: u64, path: TemplatePath, backing: Backing) -> Self {
        Self {
            id,
            path,
            backing,
            mod_time: SystemTime::now(),
        }
    }

    /// Unique ascending identifier assigned at insertion.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &TemplatePath {
        &self.path
    }

    pub fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.backing, Backing::Virtual(_))
    }

    /// The entry's bytes.
    ///
    /// Virtual entries return their in-memory content; disk-backed entries
    /// are read from storage at call time.
    pub fn contents(&self) -> Result<Vec<u8>, FsError> {
        match &self.backing {
            Backing::Virtual(data) => Ok(data.clone()),
            Backing::Disk => fs::read(self.path.absolute()).map_err(|source| FsError::Io {
                path: self.path.relative(),
                source,
            }),
        }
    }

    /// Write a virtual entry's bytes to its absolute location and convert
    /// it to disk backing. Disk-backed entries are left untouched.
    pub(super) fn flush(&mut self) -> Result<(), FsError> {
        let Backing::Virtual(data) = &self.backing else {
            return Ok(());
        };

        let abs = self.path.absolute();
        let write = || -> std::io::Result<()> {
            if let Some(parent) = abs.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&abs, data)
        };
        write().map_err(|source| FsError::Flush {
            path: self.path.relative(),
            source,
        })?;

        // entry is now disk-backed; drop the in-memory copy
        self.backing = Backing::Disk;
        self.mod_time = SystemTime::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_virtual_contents_without_disk() {
        let root = Arc::new(PathBuf::from("/nonexistent-root"));
        let path = TemplatePath::parse(&root, "a/1.tmpl").unwrap();
        let entry = Entry::new(0, path, Backing::Virtual(b"hello".to_vec()));
        assert!(entry.is_virtual());
        assert_eq!(entry.contents().unwrap(), b"hello");
    }

    #[test]
    fn test_flush_transitions_to_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = Arc::new(dir.path().to_path_buf());
        let path = TemplatePath::parse(&root, "sub/new.tmpl").unwrap();

        let mut entry = Entry::new(0, path.clone(), Backing::Virtual(b"body".to_vec()));
        entry.flush().unwrap();

        assert!(!entry.is_virtual());
        assert_eq!(std::fs::read(path.absolute()).unwrap(), b"body");
        // contents now come from storage
        assert_eq!(entry.contents().unwrap(), b"body");
    }

    #[test]
    fn test_flush_on_disk_entry_is_noop() {
        let root = Arc::new(PathBuf::from("/nonexistent-root"));
        let path = TemplatePath::parse(&root, "1.tmpl").unwrap();
        let mut entry = Entry::new(0, path, Backing::Disk);
        // no write is attempted, so a bogus root does not matter
        entry.flush().unwrap();
    }
}
