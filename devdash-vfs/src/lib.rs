//! Devdash Virtual File System
//!
//! A virtual file system abstraction with multiple backend implementations.
//! The build backend writes compiled bundles into a [`MemoryFileSystem`]
//! instead of the real disk, and resolves its inputs through an
//! [`OverlayFileSystem`] so synthesized entry files shadow the project tree.
//!
//! # Usage
//! ```rust,ignore
//! use devdash_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let out = MemoryFileSystem::new();
//! out.write_file(Path::new("/out/1/bundle.js"), b"...").unwrap();
//! let bundle = out.take_file(Path::new("/out/1/bundle.js")).unwrap();
//! ```

mod error;
mod memory;
mod native;
mod overlay;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::{normalize, NativeFileSystem};
pub use overlay::OverlayFileSystem;
pub use r#trait::VirtualFileSystem;

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system rooted at `root`.
pub fn rooted_fs(root: &std::path::Path) -> NativeFileSystem {
    NativeFileSystem::with_root(root)
}
