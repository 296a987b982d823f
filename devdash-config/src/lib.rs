//! Devdash Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all devdash crates.

use serde::Deserialize;

/// Default port for the dashboard server
pub const DEFAULT_PORT: u16 = 8000;

/// Top-level dashboard configuration
///
/// Loadable from a `dashboard.json` file; every field is optional there and
/// falls back to the defaults below. CLI flags override file values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Port for the web server
    pub port: u16,
    /// Build backend configuration
    pub build: BuildConfig,
}

/// Configuration for the build backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Extensions compiled as imperative scripts (bundled directly)
    pub script_extensions: Vec<String>,
    /// Extensions compiled through the foreign toolchain first
    pub foreign_extensions: Vec<String>,
    /// Extensions served raw as `text/html`
    pub markup_extensions: Vec<String>,
    /// Foreign compiler argv; the source path is appended as the last
    /// argument, compiled JS is read from stdout, diagnostics from stderr.
    /// Empty means no foreign toolchain is available.
    pub foreign_compiler: Vec<String>,
    /// DOM element id the synthesized entry shim mounts into
    pub mount_id: String,
    /// Bound on namespace unwrapping in the synthesized entry shim
    pub max_unwrap_depth: usize,
}

/// Subsystem enum for per-subsystem log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    Router,
    Build,
    Vfs,
    Http,
}

impl Subsystem {
    /// Get the string name of the subsystem
    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Router => "router",
            Subsystem::Build => "build",
            Subsystem::Vfs => "vfs",
            Subsystem::Http => "http",
        }
    }

    /// Get the log target name for this subsystem
    pub fn target(&self) -> String {
        format!("devdash::{}", self.as_str())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            build: BuildConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            script_extensions: vec!["js".into(), "mjs".into()],
            foreign_extensions: vec!["elm".into()],
            markup_extensions: vec!["html".into(), "htm".into()],
            foreign_compiler: Vec::new(),
            mount_id: "app".into(),
            max_unwrap_depth: 8,
        }
    }
}

impl BuildConfig {
    /// True if `ext` (without the leading dot) is a script extension
    pub fn is_script(&self, ext: &str) -> bool {
        self.script_extensions.iter().any(|e| e == ext)
    }

    /// True if `ext` is compiled through the foreign toolchain
    pub fn is_foreign(&self, ext: &str) -> bool {
        self.foreign_extensions.iter().any(|e| e == ext)
    }

    /// True if `ext` is served raw as markup
    pub fn is_markup(&self, ext: &str) -> bool {
        self.markup_extensions.iter().any(|e| e == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.port, 8000);
        assert!(config.build.is_script("js"));
        assert!(config.build.is_script("mjs"));
        assert!(config.build.is_foreign("elm"));
        assert!(config.build.is_markup("html"));
        assert!(!config.build.is_script("elm"));
        assert_eq!(config.build.mount_id, "app");
        assert_eq!(config.build.max_unwrap_depth, 8);
        assert!(config.build.foreign_compiler.is_empty());
    }

    #[test]
    fn test_subsystem_targets() {
        assert_eq!(Subsystem::Router.target(), "devdash::router");
        assert_eq!(Subsystem::Build.target(), "devdash::build");
        assert_eq!(Subsystem::Vfs.as_str(), "vfs");
        assert_eq!(Subsystem::Http.as_str(), "http");
    }

    #[test]
    fn test_deserialize_partial_file() {
        let json = r#"{ "port": 9000, "build": { "mount_id": "root" } }"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.build.mount_id, "root");
        // Unspecified fields keep their defaults
        assert!(config.build.is_script("js"));
        assert_eq!(config.build.max_unwrap_depth, 8);
    }

    #[test]
    fn test_deserialize_empty_object() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
