//! Module rewrite: ES module syntax to the bundle's CommonJS-style runtime
//!
//! The emitted bundle wraps every module in a factory function, so `import`
//! and `export` statements cannot survive as-is. This pass rewrites them to
//! `require`/`exports` forms. It is textual, like the rest of the bundler:
//! good enough for a development dashboard, not a production compiler.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static IMPORT_NS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\*\s*as\s+([A-Za-z_$][\w$]*)\s+from\s*["']([^"']+)["']\s*;?"#)
        .unwrap()
});

static IMPORT_DEFAULT_NAMED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\bimport\s+([A-Za-z_$][\w$]*)\s*,\s*\{([^}]*)\}\s*from\s*["']([^"']+)["']\s*;?"#,
    )
    .unwrap()
});

static IMPORT_NAMED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\{([^}]*)\}\s*from\s*["']([^"']+)["']\s*;?"#).unwrap()
});

static IMPORT_DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+([A-Za-z_$][\w$]*)\s+from\s*["']([^"']+)["']\s*;?"#).unwrap()
});

static IMPORT_SIDE_EFFECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*(["'])([^"']+)["']\s*;?"#).unwrap());

static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\(\s*(["'][^"']+["'])\s*\)"#).unwrap());

static EXPORT_STAR_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bexport\s*\*\s*from\s*["']([^"']+)["']\s*;?"#).unwrap());

static EXPORT_NAMED_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bexport\s*\{([^}]*)\}\s*from\s*["']([^"']+)["']\s*;?"#).unwrap()
});

static EXPORT_NAMED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bexport\s*\{([^}]*)\}\s*;?"#).unwrap());

static EXPORT_DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bexport\s+default\s+"#).unwrap());

static EXPORT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bexport\s+(async\s+function|function|class|const|let|var)\s+([A-Za-z_$][\w$]*)"#)
        .unwrap()
});

/// One `a` or `a as b` item from an import/export clause
fn clause_items(clause: &str) -> Vec<(String, String)> {
    clause
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let mut parts = item.split_whitespace();
            let name = parts.next().unwrap_or_default().to_string();
            match (parts.next(), parts.next()) {
                (Some("as"), Some(alias)) => (name, alias.to_string()),
                _ => (name.clone(), name),
            }
        })
        .collect()
}

/// Binding for a clause member: `default` binds through the interop lookup
fn member_access(ns: &str, name: &str) -> String {
    format!("{}.{}", ns, name)
}

/// Rewrite one module body. Returns the transformed source.
pub fn to_common_js(source: &str) -> String {
    let mut counter = 0usize;
    let mut exported: Vec<(String, String)> = Vec::new(); // (exported name, local name)
    let mut tail = String::new();

    // Dynamic import first so the plain-import patterns never see it
    let text = DYNAMIC_IMPORT_RE
        .replace_all(source, "Promise.resolve(require($1))")
        .into_owned();

    let text = IMPORT_NS_RE
        .replace_all(&text, "const $1 = require(\"$2\");")
        .into_owned();

    let text = IMPORT_DEFAULT_NAMED_RE
        .replace_all(&text, |caps: &Captures| {
            counter += 1;
            let ns = format!("__imp_{}", counter);
            let mut out = format!("const {} = require(\"{}\");", ns, &caps[3]);
            out.push_str(&format!(
                " const {} = {}.default !== undefined ? {}.default : {};",
                &caps[1], ns, ns, ns
            ));
            for (name, alias) in clause_items(&caps[2]) {
                out.push_str(&format!(" const {} = {};", alias, member_access(&ns, &name)));
            }
            out
        })
        .into_owned();

    let text = IMPORT_NAMED_RE
        .replace_all(&text, |caps: &Captures| {
            counter += 1;
            let ns = format!("__imp_{}", counter);
            let mut out = format!("const {} = require(\"{}\");", ns, &caps[2]);
            for (name, alias) in clause_items(&caps[1]) {
                out.push_str(&format!(" const {} = {};", alias, member_access(&ns, &name)));
            }
            out
        })
        .into_owned();

    let text = IMPORT_DEFAULT_RE
        .replace_all(&text, |caps: &Captures| {
            counter += 1;
            let ns = format!("__imp_{}", counter);
            format!(
                "const {} = require(\"{}\"); const {} = {}.default !== undefined ? {}.default : {};",
                ns, &caps[2], &caps[1], ns, ns, ns
            )
        })
        .into_owned();

    let text = IMPORT_SIDE_EFFECT_RE
        .replace_all(&text, "require(\"$2\");")
        .into_owned();

    let text = EXPORT_STAR_FROM_RE
        .replace_all(&text, |caps: &Captures| {
            counter += 1;
            let ns = format!("__reexp_{}", counter);
            format!(
                "const {} = require(\"{}\"); Object.keys({}).forEach(function (k) {{ exports[k] = {}[k]; }});",
                ns, &caps[1], ns, ns
            )
        })
        .into_owned();

    let text = EXPORT_NAMED_FROM_RE
        .replace_all(&text, |caps: &Captures| {
            counter += 1;
            let ns = format!("__reexp_{}", counter);
            let mut out = format!("const {} = require(\"{}\");", ns, &caps[2]);
            for (name, alias) in clause_items(&caps[1]) {
                out.push_str(&format!(" exports.{} = {};", alias, member_access(&ns, &name)));
            }
            out
        })
        .into_owned();

    let text = EXPORT_NAMED_RE
        .replace_all(&text, |caps: &Captures| {
            for (name, alias) in clause_items(&caps[1]) {
                exported.push((alias, name));
            }
            String::new()
        })
        .into_owned();

    let text = EXPORT_DEFAULT_RE
        .replace_all(&text, "exports.default = ")
        .into_owned();

    let text = EXPORT_DECL_RE
        .replace_all(&text, |caps: &Captures| {
            exported.push((caps[2].to_string(), caps[2].to_string()));
            format!("{} {}", &caps[1], &caps[2])
        })
        .into_owned();

    for (exported_name, local_name) in &exported {
        tail.push_str(&format!("\nexports.{} = {};", exported_name, local_name));
    }

    if tail.is_empty() {
        text
    } else {
        format!("{}{}", text, tail)
    }
}
