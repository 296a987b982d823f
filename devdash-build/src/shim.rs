//! Entry shim synthesis for foreign-module jobs
//!
//! A compiled foreign module exports a namespace of unknown depth; the shim
//! imports it, takes the first exported member, and unwraps nested
//! namespaces until it finds a value with an `init` capability, then mounts
//! that into the page. The unwrap loop is bounded so a cyclic or
//! self-referential export terminates instead of spinning. If nothing
//! mountable exists the shim reports to the browser console and does nothing
//! further; the backend cannot detect that case at build time.

/// Generate the entry shim for one job.
///
/// `module_specifier` is the import specifier of the compiled module as seen
/// from the shim (a sibling in the synthetic layer, so `./module.js`).
pub fn synthesize(module_specifier: &str, mount_id: &str, max_depth: usize) -> String {
    format!(
        r#"var namespace = require("{spec}");
var keys = Object.keys(namespace || {{}});
var candidate = keys.length ? namespace[keys[0]] : null;
for (var depth = 0; depth < {max_depth}; depth++) {{
  if (candidate && typeof candidate.init === "function") {{
    candidate.init({{ node: document.getElementById("{mount}") }});
    candidate = null;
    break;
  }}
  var inner = Object.keys(candidate || {{}});
  if (!inner.length) {{
    break;
  }}
  candidate = candidate[inner[0]];
}}
if (candidate) {{
  console.error("devdash: no mountable export found within {max_depth} levels");
}}
"#,
        spec = module_specifier,
        max_depth = max_depth,
        mount = mount_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shim_imports_module_and_mounts() {
        let shim = synthesize("./module.js", "app", 8);
        assert!(shim.contains("require(\"./module.js\")"));
        assert!(shim.contains("document.getElementById(\"app\")"));
        assert!(shim.contains("typeof candidate.init === \"function\""));
    }

    #[test]
    fn test_shim_starts_from_first_export() {
        let shim = synthesize("./module.js", "app", 8);
        assert!(shim.contains("namespace[keys[0]]"));
    }

    #[test]
    fn test_unwrap_loop_is_bounded() {
        let shim = synthesize("./module.js", "app", 5);
        assert!(shim.contains("depth < 5"));
        assert!(shim.contains("within 5 levels"));
        // No unbounded recursion: the shim walks with a plain counted loop
        assert!(!shim.contains("function init("));
    }

    #[test]
    fn test_mount_id_is_configurable() {
        let shim = synthesize("./module.js", "root", 8);
        assert!(shim.contains("document.getElementById(\"root\")"));
    }
}
