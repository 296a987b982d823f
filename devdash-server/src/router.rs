//! Request routing: classify the path, dispatch, answer
//!
//! Every request resolves to a normalized absolute path confined to the
//! project root, then dispatches on what it finds there: directory →
//! listing, script/foreign file → build backend, markup → raw bytes,
//! anything else → passthrough. Errors never leave this module as errors;
//! `route` always produces a response.

use crate::error::ServeError;
use crate::http::Response;
use crate::{assets, listing, pages};
use devdash_build::{BuildBackend, BuildError, CompilationJob};
use devdash_config::BuildConfig;
use devdash_vfs::normalize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub struct Router {
    root: PathBuf,
    backend: BuildBackend,
    build: BuildConfig,
}

impl Router {
    /// `root` must exist; it is canonicalized once at startup and every
    /// request is confined to it.
    pub fn new(root: &Path, build: BuildConfig) -> std::io::Result<Self> {
        let root = root.canonicalize()?;
        let backend = BuildBackend::new(&root, build.clone());
        Ok(Self {
            root,
            backend,
            build,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Route one decoded URL path to a response. Infallible by design: every
    /// error becomes an error page here.
    pub fn route(&self, url_path: &str) -> Response {
        match self.dispatch(url_path) {
            Ok(response) => response,
            Err(e) => self.error_response(url_path, e),
        }
    }

    fn dispatch(&self, url_path: &str) -> Result<Response, ServeError> {
        let abs = self.resolve(url_path)?;

        let metadata = match std::fs::symlink_metadata(&abs) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The passthrough layer reads the same tree, so a missing
                // path has no fallback left
                return Err(ServeError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            return Ok(Response::html(200, listing::render(&abs, url_path)?));
        }

        if metadata.is_file() {
            let extension = abs
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_ascii_lowercase();

            if self.build.is_script(&extension) {
                return self.compile(url_path, CompilationJob::script(abs));
            }
            if self.build.is_foreign(&extension) {
                return self.compile(url_path, CompilationJob::foreign(abs));
            }
            if self.build.is_markup(&extension) {
                let bytes = std::fs::read(&abs)?;
                return Ok(Response::raw("text/html", bytes));
            }
            return assets::serve(&abs);
        }

        Err(ServeError::NotAFileOrDirectory(url_path.to_string()))
    }

    fn compile(&self, url_path: &str, job: CompilationJob) -> Result<Response, ServeError> {
        let bundle = self.backend.build(&job)?;
        Ok(Response::html(
            200,
            pages::bundle_page(url_path, &self.build.mount_id, &bundle.code),
        ))
    }

    /// Resolve a URL path against the project root. Purely lexical: no
    /// filesystem access, and an escape is rejected before any happens.
    fn resolve(&self, url_path: &str) -> Result<PathBuf, ServeError> {
        let relative = url_path.trim_start_matches('/');
        let resolved = normalize(&self.root.join(relative));
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(ServeError::TraversalRejected)
        }
    }

    fn error_response(&self, url_path: &str, error: ServeError) -> Response {
        let status = error.status();
        match &error {
            ServeError::NotFound => {
                info!(target: "devdash::router", path = %url_path, "not found");
            }
            ServeError::TraversalRejected => {
                warn!(target: "devdash::router", path = %url_path, "traversal attempt rejected");
            }
            ServeError::Build(BuildError::CompilationFailed(diags)) => {
                warn!(
                    target: "devdash::router",
                    path = %url_path,
                    errors = diags.errors.len(),
                    "compilation failed"
                );
            }
            other => {
                error!(target: "devdash::router", path = %url_path, "request failed: {}", other);
            }
        }

        let body = match error {
            ServeError::NotFound | ServeError::TraversalRejected => pages::not_found(url_path),
            ServeError::Build(BuildError::CompilationFailed(diags)) => {
                pages::diagnostics_page(url_path, &diags)
            }
            ServeError::Build(BuildError::ToolchainFault(_)) => {
                pages::error_page(status, "The compiler toolchain crashed; see the server log.")
            }
            _ => pages::error_page(status, "Internal error; see the server log."),
        };
        Response::html(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempProject {
        root: PathBuf,
    }

    impl TempProject {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir()
                .join(format!("devdash_router_{}_{}", name, std::process::id()));
            std::fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
        }

        fn router(&self) -> Router {
            Router::new(&self.root, BuildConfig::default()).unwrap()
        }
    }

    impl Drop for TempProject {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn test_directory_gets_listing() {
        let project = TempProject::new("listing");
        project.write("src/a.txt", "x");
        std::fs::create_dir_all(project.root.join("src/sub")).unwrap();

        let response = project.router().route("/src");
        assert_eq!(response.status, 200);
        let body = String::from_utf8(response.body).unwrap();
        let sub = body.find("/src/sub").unwrap();
        let file = body.find("/src/a.txt").unwrap();
        assert!(sub < file);
    }

    #[test]
    fn test_missing_path_is_404() {
        let project = TempProject::new("missing");
        let response = project.router().route("/missing.js");
        assert_eq!(response.status, 404);
    }

    #[test]
    fn test_script_is_compiled_inline() {
        let project = TempProject::new("script");
        project.write("app.js", "import util from \"./util.js\";\nutil();\n");
        project.write("util.js", "export default function () {}\n");

        let response = project.router().route("/app.js");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("__define(\"app.js\""));
        assert!(body.contains("<div id=\"app\"></div>"));
    }

    #[test]
    fn test_broken_import_is_502_with_diagnostics() {
        let project = TempProject::new("broken");
        project.write("app.js", "import gone from \"./missing\";\n");

        let response = project.router().route("/app.js");
        assert_eq!(response.status, 502);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("./missing"));
    }

    #[test]
    fn test_traversal_is_answered_as_404() {
        let project = TempProject::new("traversal");
        project.write("secret.txt", "x");

        let response = project.router().route("/../../etc/passwd");
        assert_eq!(response.status, 404);
        let body = String::from_utf8(response.body).unwrap();
        // The rejection looks exactly like a plain miss
        assert!(body.contains("404"));
    }

    #[test]
    fn test_markup_served_raw() {
        let project = TempProject::new("markup");
        project.write("index.html", "<h1>hand written</h1>");

        let response = project.router().route("/index.html");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.body, b"<h1>hand written</h1>");
    }

    #[test]
    fn test_other_extension_passes_through() {
        let project = TempProject::new("passthrough");
        project.write("style.css", "body {}");

        let response = project.router().route("/style.css");
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/css");
    }

    #[test]
    fn test_foreign_module_compiled_via_toolchain() {
        let project = TempProject::new("foreign");
        project.write(
            "Main.elm",
            "module.exports = { Elm: { Main: { init: function () {} } } };\n",
        );

        let mut config = BuildConfig::default();
        config.foreign_compiler = vec!["/bin/sh".into(), "-c".into(), "cat \"$0\"".into()];
        let router = Router::new(&project.root, config).unwrap();

        let response = router.route("/Main.elm");
        assert_eq!(response.status, 200);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("virtual:entry.js"));
        assert!(body.contains("document.getElementById(\"app\")"));
    }

    #[test]
    fn test_foreign_without_toolchain_is_502() {
        let project = TempProject::new("no_toolchain");
        project.write("Main.elm", "x\n");

        let response = project.router().route("/Main.elm");
        assert_eq!(response.status, 502);
    }

    #[cfg(unix)]
    #[test]
    fn test_special_file_is_internal_error() {
        let project = TempProject::new("special");
        let socket = project.root.join("control.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();

        let response = project.router().route("/control.sock");
        assert_eq!(response.status, 500);
    }

    #[test]
    fn test_uppercase_extension_still_classified() {
        let project = TempProject::new("upper");
        project.write("APP.JS", "console.log(1);\n");

        let response = project.router().route("/APP.JS");
        assert_eq!(response.status, 200);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("__define"));
    }
}
