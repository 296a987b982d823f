//! Devdash CLI - local development dashboard
//!
//! Serves the project directory in a browser: directories become navigable
//! listings, source files are compiled on demand and returned as executable
//! pages.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;

mod config;
mod logging;

use config::LogConfig;
use devdash_config::DashboardConfig;
use devdash_server::{Router, Server};
use logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "devdash",
    about = "Local development dashboard - browse your project and run source files in the browser",
    version = "0.1.0"
)]
struct Cli {
    /// Port for the web server
    #[arg(short, long, value_name = "N")]
    port: Option<u16>,

    /// Project root to serve
    #[arg(long, default_value = ".", value_name = "DIR")]
    root: PathBuf,

    /// Configuration file (default: ./dashboard.json when present)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Global log level: silent, error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    log_level: String,

    /// Log output format: pretty, compact, json
    #[arg(long, default_value = "compact", value_name = "FORMAT")]
    log_format: String,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let dashboard = match load_dashboard_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // CLI flags win over the config file
    let port = cli.port.unwrap_or(dashboard.port);

    let level = match config::parse_level(&cli.log_level) {
        Some(level) => level,
        None => {
            eprintln!("Error: unknown log level '{}'", cli.log_level);
            process::exit(1);
        }
    };
    let format = match logging::parse_format(&cli.log_format) {
        Some(format) => format,
        None => {
            eprintln!("Error: unknown log format '{}'", cli.log_format);
            process::exit(1);
        }
    };

    let log_config = LogConfig {
        global: level,
        ..Default::default()
    };
    logging::init_with_file(&log_config, format, cli.log_file.as_ref());

    let router = match Router::new(&cli.root, dashboard.build) {
        Ok(router) => router,
        Err(e) => {
            eprintln!("Error: cannot serve '{}': {}", cli.root.display(), e);
            process::exit(1);
        }
    };
    info!(
        target: "devdash::cli",
        root = %router.root().display(),
        port = port,
        "starting dashboard"
    );

    let server = match Server::bind(("127.0.0.1", port), router) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Error: cannot bind port {}: {}", port, e);
            process::exit(1);
        }
    };

    println!(
        "Go to <http://localhost:{}> to see your project dashboard.",
        port
    );

    if let Err(e) = server.run() {
        eprintln!("Error: server terminated: {}", e);
        process::exit(1);
    }
}

/// Read and parse the dashboard configuration.
///
/// An explicitly named file must exist; the implicit `dashboard.json` is
/// optional and silently skipped when absent.
fn load_dashboard_config(path: Option<&Path>) -> Result<DashboardConfig, String> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from("dashboard.json"), false),
    };

    if !path.exists() {
        if required {
            return Err(format!(
                "'{}' not found\n\nHint: create it with an object like {{ \"port\": 8000 }}, or drop --config to use defaults",
                path.display()
            ));
        }
        return Ok(DashboardConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = std::env::temp_dir().join(format!("devdash_cfg_gone_{}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let err = load_dashboard_config(Some(&path)).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_config_file_values_are_used() {
        let path = std::env::temp_dir().join(format!("devdash_cfg_ok_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "port": 9001 }"#).unwrap();
        let config = load_dashboard_config(Some(&path)).unwrap();
        assert_eq!(config.port, 9001);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_json_is_error() {
        let path =
            std::env::temp_dir().join(format!("devdash_cfg_bad_{}.json", std::process::id()));
        std::fs::write(&path, "{ nope").unwrap();
        let err = load_dashboard_config(Some(&path)).unwrap_err();
        assert!(err.contains("failed to parse"));
        std::fs::remove_file(&path).unwrap();
    }
}
