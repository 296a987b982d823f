//! Devdash build backend - on-demand compilation of project sources
//!
//! A uniform interface over the two compilation toolchains the dashboard
//! serves: the script bundler (imperative sources, bundled directly) and the
//! foreign toolchain (compiled to a script module first, then mounted
//! through a synthesized entry). Every build writes its output into an
//! in-memory store under a per-job key and reads it back once; the real
//! filesystem is never written.
//!
//! ```rust,ignore
//! use devdash_build::{BuildBackend, CompilationJob};
//! use devdash_config::BuildConfig;
//! use std::path::Path;
//!
//! let backend = BuildBackend::new(Path::new("/project"), BuildConfig::default());
//! let bundle = backend.build(&CompilationJob::script("/project/app.js".into()))?;
//! ```

mod backend;
mod bundler;
mod error;
mod foreign;
mod rewrite;
mod scan;
mod shim;
mod types;

pub use backend::BuildBackend;
pub use bundler::Bundler;
pub use error::BuildError;
pub use types::{CompilationJob, CompiledBundle, Diagnostics, SourceKind};
