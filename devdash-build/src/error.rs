//! Build error types

use crate::types::Diagnostics;
use devdash_vfs::VfsError;
use thiserror::Error;

/// Error type for the build backend
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    /// The compiler ran and reported errors; no bundle is produced
    #[error("compilation failed with {} error(s)", .0.errors.len())]
    CompilationFailed(Diagnostics),

    /// The toolchain itself crashed or could not be started
    #[error("toolchain fault: {0}")]
    ToolchainFault(String),

    /// Input or output store failure
    #[error(transparent)]
    Vfs(#[from] VfsError),
}

impl BuildError {
    /// Compiler diagnostics, if this failure carries any
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            BuildError::CompilationFailed(diags) => Some(diags),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_counts_errors() {
        let mut diags = Diagnostics::default();
        diags.error("a");
        diags.error("b");
        let err = BuildError::CompilationFailed(diags);
        assert_eq!(err.to_string(), "compilation failed with 2 error(s)");
        assert_eq!(err.diagnostics().unwrap().errors.len(), 2);
    }

    #[test]
    fn test_toolchain_fault_has_no_diagnostics() {
        let err = BuildError::ToolchainFault("segfault".into());
        assert!(err.diagnostics().is_none());
        assert!(err.to_string().contains("segfault"));
    }
}
