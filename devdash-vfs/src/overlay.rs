//! Overlay file system: ordered read layers, first match wins

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::Path;
use std::sync::Arc;

/// A composite read view over an ordered list of layers.
///
/// Reads consult each layer in priority order and return the first hit, so a
/// synthesized entry shim in a memory layer shadows (and coexists with) the
/// real project tree below it. Writes always go to the top layer; generated
/// files never touch disk.
///
/// # Example
/// ```
/// use devdash_vfs::{MemoryFileSystem, NativeFileSystem, OverlayFileSystem, VirtualFileSystem};
/// use std::sync::Arc;
/// use std::path::Path;
///
/// let synthetic = MemoryFileSystem::new();
/// let overlay = OverlayFileSystem::new(vec![
///     Arc::new(synthetic.clone()),
///     Arc::new(NativeFileSystem::new()),
/// ]);
/// synthetic.write_file(Path::new("/job/1/entry.js"), b"shim").unwrap();
/// assert!(overlay.is_file(Path::new("/job/1/entry.js")));
/// ```
pub struct OverlayFileSystem {
    layers: Vec<Arc<dyn VirtualFileSystem>>,
}

impl OverlayFileSystem {
    /// Create an overlay from layers in priority order (index 0 wins).
    pub fn new(layers: Vec<Arc<dyn VirtualFileSystem>>) -> Self {
        Self { layers }
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl VirtualFileSystem for OverlayFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        for layer in &self.layers {
            match layer.read_file(path) {
                Err(VfsError::NotFound { .. }) | Err(VfsError::InvalidPath { .. }) => continue,
                other => return other,
            }
        }
        Err(VfsError::NotFound {
            path: path.to_string_lossy().to_string(),
        })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        match self.layers.first() {
            Some(top) => top.write_file(path, content),
            None => Err(VfsError::Custom {
                message: String::from("overlay has no layers"),
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.layers.iter().any(|layer| layer.exists(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.layers.iter().any(|layer| layer.is_file(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.layers.iter().any(|layer| layer.is_dir(path))
    }
}
