//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// An in-memory file system.
///
/// This is where compiled bundles land instead of the real disk: entries are
/// created when a build starts, read back once, and removed. Clones share
/// storage, so a handle kept by the build backend and a handle kept inside an
/// overlay see the same files.
///
/// # Example
/// ```
/// use devdash_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/out/1/bundle.js"), b"code").unwrap();
/// assert_eq!(fs.take_file(Path::new("/out/1/bundle.js")).unwrap(), b"code");
/// assert!(!fs.exists(Path::new("/out/1/bundle.js")));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a new memory file system pre-populated with files.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        {
            let mut map = fs.files.write().unwrap();
            for (path, content) in files {
                map.insert(path.as_ref().to_string(), content);
            }
        }
        fs
    }

    /// Remove a file. Removing a missing file is not an error.
    pub fn remove_file(&self, path: &Path) {
        let normalized = self.normalize_path(path);
        if let Ok(mut files) = self.files.write() {
            files.remove(&normalized);
        }
    }

    /// Read a file and remove it in one step.
    ///
    /// Bundle slots are read exactly once by the response path; taking the
    /// entry keeps the store empty between requests.
    pub fn take_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = self.normalize_path(path);
        let mut files = self.files.write().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        files.remove(&normalized).ok_or(VfsError::NotFound { path: normalized })
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    /// True if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize a path string for internal storage.
    /// Uses forward slashes consistently for cross-platform compatibility.
    fn normalize_path(&self, path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = self.normalize_path(path);
        let files = self.files.read().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;

        files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| VfsError::NotFound {
                path: normalized.clone(),
            })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = self.normalize_path(path);
        let mut files = self.files.write().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        files.insert(normalized, content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = self.normalize_path(path);
        let files = match self.files.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        files.contains_key(&normalized)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        // A key stored under `path/` makes `path` a directory
        let mut prefix = self.normalize_path(path);
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        let files = match self.files.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        files.range(prefix.clone()..).next().is_some_and(|(k, _)| k.starts_with(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(!fs.exists(Path::new("/anything.js")));
        assert!(fs.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/out/1/bundle.js");

        fs.write_file(path, b"compiled output").unwrap();

        let content = fs.read_file(path).unwrap();
        assert_eq!(content, b"compiled output");
    }

    #[test]
    fn test_read_nonexistent() {
        let fs = MemoryFileSystem::new();
        let result = fs.read_file(Path::new("/nonexistent.js"));

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_take_file_removes_entry() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/out/7/bundle.js");

        fs.write_file(path, b"once").unwrap();
        assert_eq!(fs.take_file(path).unwrap(), b"once");
        assert!(!fs.exists(path));
        assert!(matches!(
            fs.take_file(path).unwrap_err(),
            VfsError::NotFound { .. }
        ));
    }

    #[test]
    fn test_remove_file_is_idempotent() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/job/3/entry.js");

        fs.write_file(path, b"shim").unwrap();
        fs.remove_file(path);
        assert!(!fs.exists(path));
        // Second removal is a no-op
        fs.remove_file(path);
    }

    #[test]
    fn test_overwrite_file() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/overwrite.js");

        fs.write_file(path, b"first").unwrap();
        fs.write_file(path, b"second").unwrap();

        let content = fs.read_file(path).unwrap();
        assert_eq!(content, b"second");
    }

    #[test]
    fn test_is_dir_from_stored_keys() {
        let fs = MemoryFileSystem::new();
        fs.write_file(Path::new("/job/5/entry.js"), b"x").unwrap();

        assert!(fs.is_dir(Path::new("/job")));
        assert!(fs.is_dir(Path::new("/job/5")));
        assert!(!fs.is_dir(Path::new("/job/5/entry.js")));
        assert!(!fs.is_dir(Path::new("/jo")));
        assert!(!fs.is_dir(Path::new("/other")));
    }

    #[test]
    fn test_empty_content() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/empty.js");

        fs.write_file(path, b"").unwrap();
        let content = fs.read_file(path).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_clone_shares_data() {
        let fs1 = MemoryFileSystem::new();
        let path = Path::new("/shared.js");

        fs1.write_file(path, b"shared").unwrap();

        let fs2 = fs1.clone();
        assert!(fs2.exists(path));
        assert_eq!(fs2.read_file(path).unwrap(), b"shared");

        // Write via fs2, should be visible in fs1
        fs2.write_file(path, b"modified").unwrap();
        assert_eq!(fs1.read_file(path).unwrap(), b"modified");
    }

    #[test]
    fn test_with_files() {
        let fs = MemoryFileSystem::with_files([
            ("/a.js", b"content a".to_vec()),
            ("/b.js", b"content b".to_vec()),
        ]);

        assert_eq!(fs.read_file(Path::new("/a.js")).unwrap(), b"content a");
        assert_eq!(fs.read_file(Path::new("/b.js")).unwrap(), b"content b");
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn test_concurrent_distinct_slots() {
        // Two "requests" writing to their own job-keyed slots never collide
        let fs = MemoryFileSystem::new();
        let mut handles = vec![];

        for i in 0..10 {
            let fs_clone = fs.clone();
            handles.push(thread::spawn(move || {
                let slot = format!("/out/{}/bundle.js", i);
                let data = format!("bundle {}", i);
                fs_clone.write_file(Path::new(&slot), data.as_bytes()).unwrap();
                let back = fs_clone.take_file(Path::new(&slot)).unwrap();
                assert_eq!(back, data.as_bytes());
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // All slots drained
        assert!(fs.is_empty());
    }

    #[test]
    fn test_concurrent_reads() {
        let fs = MemoryFileSystem::with_files([("/test.js", b"concurrent".to_vec())]);
        let mut handles = vec![];

        for _ in 0..10 {
            let fs_clone = fs.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let content = fs_clone.read_file(Path::new("/test.js")).unwrap();
                    assert_eq!(content, b"concurrent");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
