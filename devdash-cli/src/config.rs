//! CLI log configuration
//!
//! Per-subsystem level overrides layered over a global default.

use devdash_config::Subsystem;
use tracing::Level;

/// CLI log configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub router: Option<Level>,
    pub build: Option<Level>,
    pub vfs: Option<Level>,
    pub http: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            router: None,
            build: None,
            vfs: None,
            http: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific target
    pub fn level_for(&self, target: &str) -> Level {
        let overridden = if target == Subsystem::Router.target() {
            self.router
        } else if target == Subsystem::Build.target() {
            self.build
        } else if target == Subsystem::Vfs.target() {
            self.vfs
        } else if target == Subsystem::Http.target() {
            self.http
        } else {
            None
        };
        overridden.unwrap_or(self.global)
    }
}

/// Parse a log level string
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "silent" => Some(Level::ERROR), // silent = only errors
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_fallback() {
        let config = LogConfig::default();
        assert_eq!(config.level_for("devdash::router"), Level::INFO);
        assert_eq!(config.level_for("devdash::other"), Level::INFO);
    }

    #[test]
    fn test_per_subsystem_override() {
        let config = LogConfig {
            build: Some(Level::DEBUG),
            ..Default::default()
        };
        assert_eq!(config.level_for("devdash::build"), Level::DEBUG);
        assert_eq!(config.level_for("devdash::http"), Level::INFO);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_level("silent"), Some(Level::ERROR));
        assert_eq!(parse_level("loud"), None);
    }
}
