//! VirtualFileSystem trait definition

use crate::error::VfsResult;
use std::path::Path;

/// Virtual File System trait
///
/// Provides a unified read/write interface so the build backend never cares
/// whether a module comes from the project tree, a synthesized in-memory
/// entry, or an overlay of both.
///
/// # Implementations
/// - `MemoryFileSystem`: in-memory store for compiled output and synthetic entries
/// - `NativeFileSystem`: the real project tree, optionally confined to a root
/// - `OverlayFileSystem`: ordered layers consulted in priority order
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;
}
