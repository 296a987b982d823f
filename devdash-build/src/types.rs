//! Build job and bundle types

use std::path::PathBuf;

/// What kind of source a compilation job starts from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// An imperative script, bundled directly
    Script,
    /// A foreign-language module; the foreign toolchain compiles it to a
    /// script module first, then a synthesized entry mounts it
    ForeignModule,
}

/// One compilation request
///
/// Jobs are created per HTTP request and never reused. The synthetic entry
/// content for `ForeignModule` jobs is generated inside the backend.
#[derive(Clone, Debug)]
pub struct CompilationJob {
    /// Absolute path of the requested source file
    pub source_path: PathBuf,
    /// How to compile it
    pub kind: SourceKind,
}

impl CompilationJob {
    pub fn script(source_path: PathBuf) -> Self {
        Self {
            source_path,
            kind: SourceKind::Script,
        }
    }

    pub fn foreign(source_path: PathBuf) -> Self {
        Self {
            source_path,
            kind: SourceKind::ForeignModule,
        }
    }
}

/// Compiler-reported messages collected during a build
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// A finished build: one self-contained block of executable code plus the
/// warnings that rode along. Consumed exactly once by the response path.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledBundle {
    pub code: String,
    pub diagnostics: Diagnostics,
}
