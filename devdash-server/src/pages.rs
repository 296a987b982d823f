//! HTML page templates for compiled bundles and error responses

use devdash_build::Diagnostics;
use std::fmt::Write as _;

/// Escape text for HTML body and attribute positions.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The executable page for a compiled bundle: a mount node and the bundle
/// inlined in a script tag.
pub fn bundle_page(title: &str, mount_id: &str, code: &str) -> String {
    // A literal "</script" inside the bundle would end the tag early
    let safe_code = code.replace("</script", "<\\/script");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<div id="{mount}"></div>
<script type="text/javascript">{code}</script>
</body>
</html>
"#,
        title = html_escape(title),
        mount = html_escape(mount_id),
        code = safe_code,
    )
}

/// Diagnostics page for a failed compilation.
pub fn diagnostics_page(title: &str, diags: &Diagnostics) -> String {
    let mut sections = String::new();
    if !diags.errors.is_empty() {
        sections.push_str("<h2>Errors</h2>\n<ul>\n");
        for error in &diags.errors {
            let _ = writeln!(sections, "<li><pre>{}</pre></li>", html_escape(error));
        }
        sections.push_str("</ul>\n");
    }
    if !diags.warnings.is_empty() {
        sections.push_str("<h2>Warnings</h2>\n<ul>\n");
        for warning in &diags.warnings {
            let _ = writeln!(sections, "<li><pre>{}</pre></li>", html_escape(warning));
        }
        sections.push_str("</ul>\n");
    }
    shell(
        &format!("Build failed: {}", title),
        &format!("<h1>Build failed</h1>\n<p><code>{}</code></p>\n{}", html_escape(title), sections),
    )
}

/// 404 page.
pub fn not_found(path: &str) -> String {
    shell(
        "Not Found",
        &format!(
            "<h1>404</h1>\n<p><code>{}</code> was not found.</p>",
            html_escape(path)
        ),
    )
}

/// Generic error page.
pub fn error_page(status: u16, message: &str) -> String {
    shell(
        &format!("{}", status),
        &format!("<h1>{}</h1>\n<p>{}</p>", status, html_escape(message)),
    )
}

fn shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ margin: 0; padding: 40px; max-width: 600px; background: #f2f1f6; font-family: menlo; }}
h1, h2 {{ color: #303030; }}
pre {{ white-space: pre-wrap; background: #fff; padding: 12px; }}
code {{ color: #2e83e3; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_bundle_page_inlines_code() {
        let page = bundle_page("/app.js", "app", "console.log(1);");
        assert!(page.contains("<div id=\"app\"></div>"));
        assert!(page.contains("<script type=\"text/javascript\">console.log(1);</script>"));
        assert!(page.contains("<title>/app.js</title>"));
    }

    #[test]
    fn test_bundle_page_neutralizes_script_close() {
        let page = bundle_page("/x.js", "app", "var s = \"</script>\";");
        assert!(!page.contains("\"</script>\";"));
        assert!(page.contains("<\\/script"));
    }

    #[test]
    fn test_diagnostics_page_lists_errors_and_warnings() {
        let mut diags = Diagnostics::default();
        diags.error("Cannot resolve module './gone'");
        diags.warning("dynamic import bundled eagerly");

        let page = diagnostics_page("/app.js", &diags);
        assert!(page.contains("Cannot resolve module &#39;./gone&#39;"));
        assert!(page.contains("<h2>Errors</h2>"));
        assert!(page.contains("<h2>Warnings</h2>"));
    }

    #[test]
    fn test_not_found_names_path() {
        let page = not_found("/missing.js");
        assert!(page.contains("/missing.js"));
        assert!(page.contains("404"));
    }
}
