//! Directory listing generation
//!
//! One enumeration, one stat per entry, directories first, files second,
//! each group in enumeration order. Entries that vanish between enumeration
//! and stat are skipped. Links stay inside the dashboard's routing space:
//! every href is the entry's URL path, never a real filesystem path.

use crate::pages::html_escape;
use std::fmt::Write as _;
use std::path::Path;

const FOLDER_ICON: &str = r##"<svg viewBox="0 0 128 128" xmlns="http://www.w3.org/2000/svg"><path d="M109 19H24c-3 0-5 2-5 5v85c0 3 2 5 5 5h85c3 0 5-2 5-5V24c0-3-2-5-5-5z" fill="#fff"/><path d="M96 59H59L49 49H24c-3 0-5 2-5 5v55c0 3 2 5 5 5h77V64c0-3-3-5-5-5z" fill="#fff0b3"/><path d="M39 109c0 3 2 5 5 5h57v-10H44c-3 0-5 2-5 5z" fill="#f2b630"/><path d="M107 114H24c-3 0-5-2-5-5V54c0-3 2-5 5-5h22l5 2 6 6 5 2h34c2 0 5 2 5 5v43c0 4 3 7 6 7 4 0 7-3 7-7V59M114 59V24c0-3-2-5-5-5H24c-3 0-5 2-5 5v16" fill="none" stroke="#444b54" stroke-width="6" stroke-linecap="round" stroke-linejoin="round" stroke-miterlimit="10"/></svg>"##;

const FILE_ICON: &str = r##"<svg viewBox="0 0 128 128" xmlns="http://www.w3.org/2000/svg"><path d="M99 114H29c-3 0-5-2-5-5V19c0-3 2-5 5-5h55l20 20v75c0 3-2 5-5 5z" fill="#fff"/><path d="M95 37H81V14H29c-3 0-5 2-5 5v90c0 3 2 5 5 5h70c3 0 5-2 5-5V34L84 14h-3" fill="none" stroke="#444b54" stroke-width="6" stroke-linecap="round" stroke-linejoin="round" stroke-miterlimit="10"/><path fill="#c3dbea" d="M79 79H49a15 15 0 1 0 30 0z"/><circle fill="#c3dbea" cx="49" cy="59" r="8"/><path fill="#c3dbea" d="M83 62h-9c-2 0-3-1-3-3s1-3 3-3h9c2 0 3 1 3 3s-1 3-3 3z"/></svg>"##;

const STYLE: &str = r#"
@keyframes pulse { 0% { background: #2e83e3; } 100% { background: #88b4e7; } }
body { margin: 0; padding: 40px; max-width: 600px; background: #f2f1f6; }
.header { border-bottom: 10px solid #f2f1f6; padding: 24px; font-size: 18px; font-family: menlo; font-weight: bold; background: #fff; }
.header__home { display: inline-block; text-decoration: none; color: #2e83e3; }
.header__home:hover { text-decoration: underline; }
.header__seg { display: inline-block; text-decoration: none; color: #303030; }
.header__seg:hover { text-decoration: underline; }
.header__sep { display: inline-block; color: #303030; }
.list { margin: 0; padding: 0; background: #fff; }
.list__item { margin: 0; padding: 0; list-style: none; border-bottom: 1px solid #f2f1f6; }
.list__item svg { vertical-align: middle; width: 28px; }
.list__item:last-child { border-bottom: none; }
.list__item_link { text-decoration: none; color: #303030; fill: #303030; font-family: menlo; font-size: 14px; padding: 24px; display: block; }
.list__item_link:hover { background: #2e83e3; color: #fff; fill: #fff; }
.list__item_link.clicked, .list__item_link.clicked:hover { color: #fff; animation: pulse 1s ease-in-out infinite alternate; }
"#;

/// Render the listing page for `abs_dir`, reached at `url_path`.
pub fn render(abs_dir: &Path, url_path: &str) -> std::io::Result<String> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(abs_dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        // A stale entry whose stat fails is skipped, not fatal
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => dirs.push(name),
            Ok(_) => files.push(name),
            Err(_) => continue,
        }
    }

    let mut items = String::new();
    for name in dirs.iter() {
        write_item(&mut items, url_path, name, FOLDER_ICON);
    }
    for name in files.iter() {
        write_item(&mut items, url_path, name, FILE_ICON);
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="header">{breadcrumbs}</div>
<ul class="list">
{items}</ul>
<script type="text/javascript">
document.querySelectorAll(".list__item_link").forEach(function (element) {{
  element.addEventListener("click", function (event) {{
    event.target.classList.add("clicked");
  }});
}});
</script>
</body>
</html>
"#,
        title = html_escape(url_path),
        style = STYLE,
        breadcrumbs = breadcrumbs(url_path),
        items = items,
    ))
}

fn write_item(out: &mut String, url_path: &str, name: &str, icon: &str) {
    let base = url_path.trim_end_matches('/');
    let href = format!("{}/{}", base, name);
    let _ = write!(
        out,
        "<li class=\"list__item\"><a class=\"list__item_link\" href=\"{}\">{} {}</a></li>\n",
        html_escape(&href),
        icon,
        html_escape(name)
    );
}

/// `~ / seg / seg` header, each segment linking to its prefix.
fn breadcrumbs(url_path: &str) -> String {
    let mut out = String::from(r#"<a href="/" class="header__home">~</a>"#);
    let segments: Vec<&str> = url_path.split('/').filter(|s| !s.is_empty()).collect();
    let mut prefix = String::new();
    for segment in segments {
        prefix.push('/');
        prefix.push_str(segment);
        let _ = write!(
            out,
            r#"<span class="header__sep">/</span><a class="header__seg" href="{}">{}</a>"#,
            html_escape(&prefix),
            html_escape(segment)
        );
    }
    out
}
