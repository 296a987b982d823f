//! Build backend: a uniform interface over the compilation toolchains
//!
//! Every job runs fresh: the bundler walks the graph from scratch, synthetic
//! inputs and the output slot live under per-job keys in the in-memory
//! stores, and both are removed before `build` returns. Two concurrent
//! requests therefore never observe each other's output.

use crate::bundler::Bundler;
use crate::error::BuildError;
use crate::types::{CompilationJob, CompiledBundle, SourceKind};
use crate::{foreign, shim};
use devdash_config::BuildConfig;
use devdash_vfs::{
    normalize, MemoryFileSystem, NativeFileSystem, OverlayFileSystem, VirtualFileSystem,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// The build backend shared by all request handlers.
pub struct BuildBackend {
    /// Top input layer: generated entry shims and compiled foreign modules
    synthetic: MemoryFileSystem,
    /// Virtual Output Store: bundles land here, never on disk
    outputs: MemoryFileSystem,
    /// Read path for module resolution: synthetic first, project tree second
    inputs: OverlayFileSystem,
    root: PathBuf,
    config: BuildConfig,
    next_job: AtomicU64,
}

impl BuildBackend {
    pub fn new(project_root: &Path, config: BuildConfig) -> Self {
        let synthetic = MemoryFileSystem::new();
        let outputs = MemoryFileSystem::new();
        let inputs = OverlayFileSystem::new(vec![
            Arc::new(synthetic.clone()),
            Arc::new(NativeFileSystem::with_root(project_root)),
        ]);
        Self {
            synthetic,
            outputs,
            inputs,
            root: normalize(project_root),
            config,
            next_job: AtomicU64::new(1),
        }
    }

    /// Run one compilation job to completion.
    pub fn build(&self, job: &CompilationJob) -> Result<CompiledBundle, BuildError> {
        let job_id = self.next_job.fetch_add(1, Ordering::Relaxed);
        info!(
            target: "devdash::build",
            job = job_id,
            kind = ?job.kind,
            source = %job.source_path.display(),
            "build started"
        );

        let result = self.run(job, job_id);
        self.cleanup(job_id);

        match &result {
            Ok(bundle) => {
                for warning in &bundle.diagnostics.warnings {
                    warn!(target: "devdash::build", job = job_id, "{}", warning);
                }
                info!(target: "devdash::build", job = job_id, "build finished");
            }
            Err(e) => {
                warn!(target: "devdash::build", job = job_id, "build failed: {}", e);
            }
        }
        result
    }

    fn run(&self, job: &CompilationJob, job_id: u64) -> Result<CompiledBundle, BuildError> {
        let mut foreign_warnings = Vec::new();

        let (entry, virtual_prefix) = match job.kind {
            SourceKind::Script => (job.source_path.clone(), None),
            SourceKind::ForeignModule => {
                let compiled = foreign::compile(&self.config.foreign_compiler, &job.source_path)?;
                foreign_warnings = compiled.warnings;

                let prefix = format!("/job/{}", job_id);
                let module_slot = PathBuf::from(format!("{}/module.js", prefix));
                let entry_slot = PathBuf::from(format!("{}/entry.js", prefix));

                self.synthetic
                    .write_file(&module_slot, compiled.code.as_bytes())?;
                let entry_shim = shim::synthesize(
                    "./module.js",
                    &self.config.mount_id,
                    self.config.max_unwrap_depth,
                );
                self.synthetic.write_file(&entry_slot, entry_shim.as_bytes())?;

                (entry_slot, Some(prefix))
            }
        };

        let bundler = Bundler::new(
            &self.inputs,
            &self.root,
            virtual_prefix,
            self.config.script_extensions.clone(),
        );
        let mut bundle = bundler
            .bundle(&entry)
            .map_err(BuildError::CompilationFailed)?;
        for warning in foreign_warnings {
            bundle.diagnostics.warning(warning);
        }

        // The bundle transits the Virtual Output Store: written to the
        // per-job slot, read back once, slot dropped.
        let slot = PathBuf::from(format!("/out/{}/bundle.js", job_id));
        self.outputs.write_file(&slot, bundle.code.as_bytes())?;
        let bytes = self.outputs.take_file(&slot)?;

        Ok(CompiledBundle {
            code: String::from_utf8_lossy(&bytes).into_owned(),
            diagnostics: bundle.diagnostics,
        })
    }

    /// Remove this job's store entries. Safe to call whether or not the
    /// build produced them.
    fn cleanup(&self, job_id: u64) {
        let prefix = format!("/job/{}", job_id);
        self.synthetic
            .remove_file(Path::new(&format!("{}/module.js", prefix)));
        self.synthetic
            .remove_file(Path::new(&format!("{}/entry.js", prefix)));
        self.outputs
            .remove_file(Path::new(&format!("/out/{}/bundle.js", job_id)));
    }

    /// True if nothing is left in the in-memory stores (test hook).
    pub fn stores_drained(&self) -> bool {
        self.synthetic.is_empty() && self.outputs.is_empty()
    }
}
