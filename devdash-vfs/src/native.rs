//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::{Component, Path, PathBuf};

/// The real OS file system, optionally confined to a root directory.
///
/// When a root is set, every path is lexically normalized (`.` dropped, `..`
/// popped) before use and must stay inside the root; escapes fail with
/// `InvalidPath` before any disk access happens. The router performs its own
/// confinement on URLs, so this is the second line of defense for module
/// paths produced during import resolution.
///
/// # Example
/// ```
/// use devdash_vfs::{NativeFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = NativeFileSystem::with_root(Path::new("/tmp"));
/// assert!(fs.read_file(Path::new("/tmp/../etc/passwd")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    root: Option<PathBuf>,
}

impl NativeFileSystem {
    /// Create a new unconfined native file system.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Create a native file system confined to `root`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: Some(normalize(root)),
        }
    }

    /// Normalize `path` and verify it stays inside the confinement root.
    fn confine(&self, path: &Path) -> VfsResult<PathBuf> {
        let resolved = normalize(path);
        match &self.root {
            Some(root) if !resolved.starts_with(root) => Err(VfsError::InvalidPath {
                path: path.to_string_lossy().to_string(),
                reason: format!("escapes root {}", root.display()),
            }),
            _ => Ok(resolved),
        }
    }
}

/// Lexical path normalization: drops `.`, pops `..` without touching disk.
/// Leading `..` components that would climb above the start are dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl Default for NativeFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let path = self.confine(path)?;
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VfsError::NotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                e.into()
            }
        })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let path = self.confine(path)?;
        std::fs::write(&path, content).map_err(|e| e.into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.confine(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.confine(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.confine(path).map(|p| p.is_dir()).unwrap_or(false)
    }
}
