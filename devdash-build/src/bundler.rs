//! Script bundler: import-graph walk and self-contained emission
//!
//! Walks the import graph from an entry module, reading every module through
//! the overlay resolver, and emits one self-contained script: a small module
//! registry plus one factory per module, dependencies first, entry invoked
//! last. Each build is a fresh walk; nothing is cached between jobs.

use crate::rewrite;
use crate::scan::{self, DYNAMIC_IMPORT_RE};
use crate::types::{CompiledBundle, Diagnostics};
use devdash_vfs::{normalize, VirtualFileSystem};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

struct ModuleRecord {
    id: String,
    deps: Vec<(String, String)>, // (raw specifier, resolved module id)
    body: String,
}

/// One bundling run over one entry module.
pub struct Bundler<'a> {
    fs: &'a dyn VirtualFileSystem,
    root: PathBuf,
    virtual_prefix: Option<String>,
    extensions: Vec<String>,
    diagnostics: Diagnostics,
    order: Vec<ModuleRecord>,
    seen: HashSet<PathBuf>,
}

impl<'a> Bundler<'a> {
    /// `virtual_prefix` marks the synthetic input area for this job so its
    /// paths appear as stable `virtual:` ids in the emitted bundle instead of
    /// leaking per-job store keys.
    pub fn new(
        fs: &'a dyn VirtualFileSystem,
        root: &Path,
        virtual_prefix: Option<String>,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            fs,
            root: normalize(root),
            virtual_prefix,
            extensions,
            diagnostics: Diagnostics::default(),
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Bundle from `entry`. On success the emitted code and any warnings are
    /// returned; on failure the full diagnostics, never a partial bundle.
    pub fn bundle(mut self, entry: &Path) -> Result<CompiledBundle, Diagnostics> {
        let entry = normalize(entry);
        if !self.fs.is_file(&entry) {
            self.diagnostics.error(format!(
                "Cannot resolve entry module '{}'",
                self.display_id(&entry)
            ));
            return Err(self.diagnostics);
        }

        self.visit(&entry);

        if self.diagnostics.has_errors() {
            return Err(self.diagnostics);
        }

        let entry_id = self.display_id(&entry);
        let code = self.emit(&entry_id);
        Ok(CompiledBundle {
            code,
            diagnostics: self.diagnostics,
        })
    }

    fn visit(&mut self, path: &Path) {
        if !self.seen.insert(path.to_path_buf()) {
            return;
        }

        let id = self.display_id(path);

        let bytes = match self.fs.read_file(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.diagnostics.error(format!("{}: {}", id, e));
                return;
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(_) => {
                self.diagnostics.error(format!("{}: not valid UTF-8", id));
                return;
            }
        };

        let scanned = scan::scan(&source);
        for err in &scanned.errors {
            self.diagnostics.error(format!("{}: {}", id, err));
        }

        for caps in DYNAMIC_IMPORT_RE.captures_iter(&scanned.without_comments) {
            self.diagnostics.warning(format!(
                "{}: dynamic import '{}' is bundled eagerly",
                id, &caps[1]
            ));
        }

        let mut deps = Vec::new();
        for spec in scan::specifiers(&scanned.without_comments) {
            match self.resolve(&spec, path) {
                Ok(dep_path) => {
                    deps.push((spec, self.display_id(&dep_path)));
                    self.visit(&dep_path);
                }
                Err(message) => self.diagnostics.error(message),
            }
        }

        let body = rewrite::to_common_js(&source);
        self.order.push(ModuleRecord { id, deps, body });
    }

    fn resolve(&self, spec: &str, importer: &Path) -> Result<PathBuf, String> {
        let importer_id = self.display_id(importer);
        let joined = if spec.starts_with("./") || spec.starts_with("../") {
            let base = importer.parent().unwrap_or_else(|| Path::new("/"));
            normalize(&base.join(spec))
        } else if spec.starts_with('/') {
            normalize(Path::new(spec))
        } else {
            return Err(format!(
                "Cannot resolve module '{}' imported from '{}' (package imports are not supported)",
                spec, importer_id
            ));
        };

        self.find_candidate(&joined).ok_or_else(|| {
            format!(
                "Cannot resolve module '{}' imported from '{}'",
                spec, importer_id
            )
        })
    }

    fn find_candidate(&self, joined: &Path) -> Option<PathBuf> {
        if self.fs.is_file(joined) {
            return Some(joined.to_path_buf());
        }
        for ext in &self.extensions {
            let candidate = PathBuf::from(format!("{}.{}", joined.display(), ext));
            if self.fs.is_file(&candidate) {
                return Some(candidate);
            }
        }
        for ext in &self.extensions {
            let candidate = joined.join(format!("index.{}", ext));
            if self.fs.is_file(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Stable module id for emission: root-relative for project files,
    /// `virtual:` for this job's synthetic inputs.
    fn display_id(&self, path: &Path) -> String {
        let s = path.to_string_lossy().replace('\\', "/");
        if let Some(prefix) = &self.virtual_prefix {
            if let Some(rest) = s.strip_prefix(prefix.as_str()) {
                return format!("virtual:{}", rest.trim_start_matches('/'));
            }
        }
        let root = self.root.to_string_lossy().replace('\\', "/");
        if let Some(rest) = s.strip_prefix(root.as_str()) {
            let rel = rest.trim_start_matches('/');
            if !rel.is_empty() {
                return rel.to_string();
            }
        }
        s
    }

    fn emit(&self, entry_id: &str) -> String {
        let mut out = String::from(RUNTIME);
        for module in &self.order {
            let deps = module
                .deps
                .iter()
                .map(|(spec, id)| format!("{}: {}", js_string(spec), js_string(id)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "__define({}, {{{}}}, function (require, module, exports) {{\n",
                js_string(&module.id),
                deps
            ));
            out.push_str(&module.body);
            if !module.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("});\n");
        }
        out.push_str(&format!("__require({});\n}})();\n", js_string(entry_id)));
        out
    }
}

const RUNTIME: &str = r#"(function () {
"use strict";
var __modules = {};
var __deps = {};
var __cache = {};
function __define(id, deps, factory) {
  __modules[id] = factory;
  __deps[id] = deps;
}
function __require(id) {
  var cached = __cache[id];
  if (cached) return cached.exports;
  var module = { exports: {} };
  __cache[id] = module;
  var localRequire = function (spec) {
    var target = __deps[id][spec];
    if (target === undefined) throw new Error("Module not bundled: " + spec);
    return __require(target);
  };
  __modules[id](localRequire, module, module.exports);
  return module.exports;
}
"#;

/// Escape a string as a double-quoted JS literal.
fn js_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}
