//! Serve error taxonomy
//!
//! Every error a request can produce, caught at the connection handler and
//! turned into a response there; nothing propagates past it.

use devdash_build::BuildError;
use thiserror::Error;

/// Error type for request handling
#[derive(Error, Debug)]
pub enum ServeError {
    /// Requested path does not exist and nothing else can serve it
    #[error("not found")]
    NotFound,

    /// Requested path resolves outside the project root; answered exactly
    /// like NotFound so the rejection discloses nothing
    #[error("path escapes the project root")]
    TraversalRejected,

    /// Path resolves to a special filesystem object
    #[error("not a file or directory: {0}")]
    NotAFileOrDirectory(String),

    /// The build backend failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Unexpected I/O failure while serving
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServeError {
    /// The HTTP status this error is answered with
    pub fn status(&self) -> u16 {
        match self {
            ServeError::NotFound | ServeError::TraversalRejected => 404,
            ServeError::Build(BuildError::CompilationFailed(_))
            | ServeError::Build(BuildError::ToolchainFault(_)) => 502,
            _ => 500,
        }
    }
}
