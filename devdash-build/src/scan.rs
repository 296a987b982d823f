//! Source scanning: comment/string tracking, syntax checks, import specifiers
//!
//! The bundler does not parse scripts; it scans them. One pass produces two
//! blanked views of the source (comments removed with newlines kept, and
//! additionally string contents removed) plus any lexical errors. Import
//! specifiers are then matched on the comment-free view so commented-out
//! imports never enter the module graph.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import("spec")`, dynamic import
pub static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap());

/// `import ... from "spec"`; the in-between part may span lines but cannot
/// contain quotes or semicolons, which keeps the match inside one statement
pub static IMPORT_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s+[^;'"]*?\bfrom\s*["']([^"']+)["']"#).unwrap());

/// `import "spec"`, side-effect import
pub static IMPORT_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*["']([^"']+)["']"#).unwrap());

/// `export ... from "spec"`, re-export
pub static EXPORT_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bexport\s+[^;'"]*?\bfrom\s*["']([^"']+)["']"#).unwrap());

/// `require("spec")`
pub static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\brequire\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap());

/// Result of scanning one module
pub struct ScanResult {
    /// Source with comments blanked (newlines preserved), strings intact
    pub without_comments: String,
    /// Source with comments blanked and string/template contents blanked
    pub code_only: String,
    /// Lexical and balance errors, messages carry 1-based line numbers
    pub errors: Vec<String>,
}

/// Import specifiers referenced by a module, in order of appearance, deduplicated.
pub fn specifiers(without_comments: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |spec: &str| {
        if !out.iter().any(|s| s == spec) {
            out.push(spec.to_string());
        }
    };
    // Positional dedup order does not matter for correctness, only for
    // stable emission order, so collect matches with their offsets first.
    let mut found: Vec<(usize, String)> = Vec::new();
    for re in [
        &*IMPORT_FROM_RE,
        &*EXPORT_FROM_RE,
        &*DYNAMIC_IMPORT_RE,
        &*IMPORT_BARE_RE,
        &*REQUIRE_RE,
    ] {
        for caps in re.captures_iter(without_comments) {
            let m = caps.get(1).unwrap();
            found.push((m.start(), m.as_str().to_string()));
        }
    }
    found.sort_by_key(|(pos, _)| *pos);
    for (_, spec) in found {
        push(&spec);
    }
    out
}

/// Scan one module's source.
pub fn scan(source: &str) -> ScanResult {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str(char),
        Template,
    }

    let mut without_comments = String::with_capacity(source.len());
    let mut code_only = String::with_capacity(source.len());
    let mut errors = Vec::new();

    let mut state = State::Code;
    let mut line = 1usize;
    let mut string_open_line = 0usize;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                    without_comments.push_str("  ");
                    code_only.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    string_open_line = line;
                    without_comments.push_str("  ");
                    code_only.push_str("  ");
                }
                '"' | '\'' => {
                    state = State::Str(c);
                    string_open_line = line;
                    without_comments.push(c);
                    code_only.push(c);
                }
                '`' => {
                    state = State::Template;
                    string_open_line = line;
                    without_comments.push(c);
                    code_only.push(c);
                }
                _ => {
                    without_comments.push(c);
                    code_only.push(c);
                }
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    without_comments.push('\n');
                    code_only.push('\n');
                } else {
                    without_comments.push(' ');
                    code_only.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    without_comments.push_str("  ");
                    code_only.push_str("  ");
                } else if c == '\n' {
                    without_comments.push('\n');
                    code_only.push('\n');
                } else {
                    without_comments.push(' ');
                    code_only.push(' ');
                }
            }
            State::Str(quote) => {
                if c == '\\' {
                    without_comments.push(c);
                    code_only.push(' ');
                    if let Some(&next) = chars.peek() {
                        chars.next();
                        if next == '\n' {
                            line += 1;
                        }
                        without_comments.push(next);
                        code_only.push(if next == '\n' { '\n' } else { ' ' });
                    }
                } else if c == quote {
                    state = State::Code;
                    without_comments.push(c);
                    code_only.push(c);
                } else if c == '\n' {
                    errors.push(format!(
                        "Unterminated string literal at line {}",
                        string_open_line
                    ));
                    state = State::Code;
                    without_comments.push('\n');
                    code_only.push('\n');
                } else {
                    without_comments.push(c);
                    code_only.push(' ');
                }
            }
            State::Template => {
                if c == '\\' {
                    without_comments.push(c);
                    code_only.push(' ');
                    if let Some(&next) = chars.peek() {
                        chars.next();
                        if next == '\n' {
                            line += 1;
                        }
                        without_comments.push(next);
                        code_only.push(if next == '\n' { '\n' } else { ' ' });
                    }
                } else if c == '`' {
                    state = State::Code;
                    without_comments.push(c);
                    code_only.push(c);
                } else {
                    without_comments.push(c);
                    code_only.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
        }
    }

    match state {
        State::BlockComment => {
            errors.push(format!(
                "Unterminated block comment starting at line {}",
                string_open_line
            ));
        }
        State::Str(_) => {
            errors.push(format!(
                "Unterminated string literal at line {}",
                string_open_line
            ));
        }
        State::Template => {
            errors.push(format!(
                "Unterminated template literal starting at line {}",
                string_open_line
            ));
        }
        _ => {}
    }

    errors.extend(check_brackets(&code_only));

    ScanResult {
        without_comments,
        code_only,
        errors,
    }
}

/// Balance check over `()[]{}` on a string/comment-free view.
fn check_brackets(code_only: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1usize;

    for c in code_only.chars() {
        match c {
            '\n' => line += 1,
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        errors.push(format!(
                            "Mismatched '{}' at line {} (opened with '{}' at line {})",
                            c, line, open, open_line
                        ));
                        // Stop after the first mismatch; everything after is noise
                        return errors;
                    }
                    None => {
                        errors.push(format!("Unexpected '{}' at line {}", c, line));
                        return errors;
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((open, open_line)) = stack.pop() {
        errors.push(format!("Unclosed '{}' opened at line {}", open, open_line));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_module_has_no_errors() {
        let result = scan("const x = 1;\nfunction f() { return [x]; }\n");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        let result = scan("const x = \"oops\nconst y = 1;\n");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Unterminated string literal at line 1"));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let result = scan("const x = 1; /* never closed\nmore\n");
        assert!(result.errors.iter().any(|e| e.contains("block comment")));
    }

    #[test]
    fn test_unbalanced_brackets() {
        let result = scan("function f() { return (1; }\n");
        assert!(!result.errors.is_empty());
        assert!(result.errors[0].contains("Mismatched"));
    }

    #[test]
    fn test_unclosed_brace() {
        let result = scan("function f() {\n  return 1;\n");
        assert!(result.errors.iter().any(|e| e.contains("Unclosed '{'")));
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let result = scan("const x = \"(((\";\nconst y = `}}}`;\n");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_template_spans_lines() {
        let result = scan("const t = `line one\nline two`;\n");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let result = scan("const x = \"a\\\"b\";\n");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_specifiers_basic() {
        let result = scan(
            "import a from \"./a.js\";\nimport { b } from './b';\nconst c = require(\"./c.js\");\n",
        );
        assert_eq!(
            specifiers(&result.without_comments),
            vec!["./a.js", "./b", "./c.js"]
        );
    }

    #[test]
    fn test_specifiers_multiline_clause() {
        let source = "import {\n  one,\n  two,\n} from \"./pair.js\";\n";
        let result = scan(source);
        assert_eq!(specifiers(&result.without_comments), vec!["./pair.js"]);
    }

    #[test]
    fn test_specifiers_skip_comments() {
        let source = "// import dead from \"./dead.js\";\nimport live from \"./live.js\";\n";
        let result = scan(source);
        assert_eq!(specifiers(&result.without_comments), vec!["./live.js"]);
    }

    #[test]
    fn test_specifiers_export_from_and_dynamic() {
        let source =
            "export { x } from \"./x.js\";\nexport * from './y.js';\nimport(\"./lazy.js\");\n";
        let result = scan(source);
        assert_eq!(
            specifiers(&result.without_comments),
            vec!["./x.js", "./y.js", "./lazy.js"]
        );
    }

    #[test]
    fn test_specifiers_side_effect_import() {
        let result = scan("import \"./setup.js\";\n");
        assert_eq!(specifiers(&result.without_comments), vec!["./setup.js"]);
    }

    #[test]
    fn test_specifiers_deduplicated() {
        let source = "import a from \"./a.js\";\nconst again = require(\"./a.js\");\n";
        let result = scan(source);
        assert_eq!(specifiers(&result.without_comments), vec!["./a.js"]);
    }
}
