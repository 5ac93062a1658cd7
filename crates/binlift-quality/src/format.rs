//! Heuristic reformatting
//!
//! Some backends return an entire function on one or two lines. This is a
//! regex-free, brace-counting approximation of a formatter, not a parser:
//! it splits statements onto their own lines and re-indents by brace
//! depth. Text that already has line structure (6+ newlines) passes
//! through untouched, which also makes the pass idempotent.

/// Newline count at or above which text is considered already formatted.
const FORMATTED_NEWLINES: usize = 6;

/// Spaces per brace depth level.
const INDENT: usize = 4;

/// Reformat unstructured output. Already-formatted text is returned
/// unchanged; `format_code(format_code(x)) == format_code(x)`.
pub fn format_code(text: &str) -> String {
    if text.matches('\n').count() >= FORMATTED_NEWLINES {
        return text.to_string();
    }
    let broken = insert_breaks(text);
    let collapsed = collapse_blank_runs(&broken);
    reindent(&collapsed)
}

/// Insert newlines after statement terminators and opening braces, and
/// before closing braces. Semicolons inside parentheses (loop headers)
/// are protected.
fn insert_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut paren_depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '(' => {
                paren_depth += 1;
                out.push(ch);
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(ch);
            }
            ';' => {
                out.push(ch);
                if paren_depth == 0 && chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            '{' => {
                out.push(ch);
                if chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            '}' => {
                if !out.trim_end_matches([' ', '\t']).ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
                out.push(ch);
                if chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Reduce 3+ consecutive blank lines to exactly one.
fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blanks = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            blanks += 1;
            continue;
        }
        if blanks > 0 {
            let keep = if blanks >= 3 { 1 } else { blanks };
            for _ in 0..keep {
                out.push("");
            }
            blanks = 0;
        }
        out.push(line);
    }
    out.join("\n")
}

/// Re-indent by brace depth, dedenting closing-brace lines before emit.
fn reindent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        let line_depth = if trimmed.starts_with('}') {
            depth.saturating_sub(1)
        } else {
            depth
        };
        for _ in 0..line_depth * INDENT {
            out.push(' ');
        }
        out.push_str(trimmed);
        out.push('\n');

        let opens = trimmed.matches('{').count();
        let closes = trimmed.matches('}').count();
        depth = (depth + opens).saturating_sub(closes);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_formatted_passthrough() {
        let text = "int main(void)\n{\n    int x;\n    x = 1;\n    x += 2;\n    return x;\n}\n";
        assert_eq!(format_code(text), text);
    }

    #[test]
    fn test_one_liner_gets_structure() {
        let text = "int f(int a) { int b; b = a + 1; return b; }";
        let result = format_code(text);
        assert!(result.lines().count() > 3);
        assert!(result.contains("    int b;"));
        assert!(result.contains("    return b;"));
    }

    #[test]
    fn test_for_header_not_split() {
        let text = "void f(void) { for (int i = 0; i < 10; i++) { g(i); } }";
        let result = format_code(text);
        assert!(result.contains("for (int i = 0; i < 10; i++)"));
    }

    #[test]
    fn test_closing_braces_dedented() {
        let text = "void f(void) { if (a) { g(); } }";
        let result = format_code(text);
        let closing: Vec<&str> = result.lines().filter(|l| l.trim() == "}").collect();
        assert_eq!(closing.len(), 2);
        // Inner close indented one level, outer at column zero
        assert!(result.lines().any(|l| l == "    }"));
        assert!(result.lines().any(|l| l == "}"));
    }

    #[test]
    fn test_idempotent() {
        let texts = [
            "int f(int a) { int b; b = a + 1; return b; }",
            "void g(void) { for (int i = 0; i < 3; i++) { h(i); } }",
            "int x;",
        ];
        for text in texts {
            let once = format_code(text);
            let twice = format_code(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", text);
        }
    }

    #[test]
    fn test_blank_runs_collapsed() {
        let text = "int a;\n\n\n\n\nint b; int c; int d; int e;";
        let result = format_code(text);
        assert!(!result.contains("\n\n\n"));
    }
}
