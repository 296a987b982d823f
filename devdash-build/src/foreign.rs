//! Foreign toolchain invocation
//!
//! The foreign compiler is an external command: configured argv, source path
//! appended as the last argument, compiled JS on stdout, diagnostics on
//! stderr. Output is fully captured in memory; the compiler writes nothing
//! into the project tree on our behalf. A nonzero exit is a compilation
//! failure carrying stderr; a compiler that cannot be started at all is a
//! toolchain fault.

use crate::error::BuildError;
use crate::types::Diagnostics;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Output of a successful foreign compile
#[derive(Debug)]
pub struct ForeignOutput {
    /// The compiled script module
    pub code: String,
    /// Non-fatal stderr chatter, reported as warnings
    pub warnings: Vec<String>,
}

/// Run the configured foreign compiler over `source_path`.
pub fn compile(command: &[String], source_path: &Path) -> Result<ForeignOutput, BuildError> {
    let program = command.first().ok_or_else(|| {
        BuildError::ToolchainFault(
            "no foreign compiler configured (set build.foreign_compiler)".into(),
        )
    })?;

    debug!(
        target: "devdash::build",
        compiler = %program,
        source = %source_path.display(),
        "running foreign toolchain"
    );

    let output = Command::new(program)
        .args(&command[1..])
        .arg(source_path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| BuildError::ToolchainFault(format!("failed to start {}: {}", program, e)))?;

    let stderr_lines: Vec<String> = String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if !output.status.success() {
        let errors = if stderr_lines.is_empty() {
            vec![format!("{} exited with {}", program, output.status)]
        } else {
            stderr_lines
        };
        return Err(BuildError::CompilationFailed(Diagnostics {
            errors,
            warnings: Vec::new(),
        }));
    }

    let code = String::from_utf8(output.stdout)
        .map_err(|_| BuildError::ToolchainFault(format!("{} produced non-UTF-8 output", program)))?;

    Ok(ForeignOutput {
        code,
        warnings: stderr_lines,
    })
}
