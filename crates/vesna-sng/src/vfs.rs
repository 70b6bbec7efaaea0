//! Filesystem capability interface for extraction targets.
//!
//! Extraction runs against [`Vfs`] rather than `std::fs` directly, so the
//! same code serves the native filesystem and sandboxed or in-memory
//! targets. The implementation is chosen once at the call boundary.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations extraction needs.
pub trait Vfs {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and any missing parents.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Write `data` to `path`, replacing any existing file.
    fn write_file(&mut self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Read the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`Vfs`] backed by the host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFs;

impl Vfs for NativeFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        std::fs::write(path, data)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory [`Vfs`] for tests and sandboxed embeddings.
///
/// Mirrors native semantics where it matters for extraction: writing into
/// a directory that was never created fails, and writes replace existing
/// files silently.
#[derive(Debug, Default)]
pub struct MemFs {
    dirs: HashSet<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to a stored file, for assertions.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Number of stored files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl Vfs for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.dirs.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", parent.display()),
                ))
            }
            _ => {
                self.files.insert(path.to_path_buf(), data.to_vec());
                Ok(())
            }
        }
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memfs_create_dir_all_creates_ancestors() {
        let mut fs = MemFs::new();
        fs.create_dir_all(Path::new("a/b/c")).unwrap();

        assert!(fs.exists(Path::new("a")));
        assert!(fs.exists(Path::new("a/b")));
        assert!(fs.exists(Path::new("a/b/c")));
        assert!(!fs.exists(Path::new("a/b/c/d")));
    }

    #[test]
    fn test_memfs_write_requires_parent_dir() {
        let mut fs = MemFs::new();
        let err = fs
            .write_file(Path::new("missing/file.bin"), b"data")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.create_dir_all(Path::new("missing")).unwrap();
        fs.write_file(Path::new("missing/file.bin"), b"data").unwrap();
        assert_eq!(fs.read_file(Path::new("missing/file.bin")).unwrap(), b"data");
    }

    #[test]
    fn test_memfs_write_replaces_existing() {
        let mut fs = MemFs::new();
        fs.write_file(Path::new("f"), b"old").unwrap();
        fs.write_file(Path::new("f"), b"new").unwrap();
        assert_eq!(fs.file("f"), Some(&b"new"[..]));
        assert_eq!(fs.file_count(), 1);
    }
}
