//! Repetition truncation
//!
//! Runaway generation has signatures: the same line over and over,
//! variable names inflating by one character per declaration, dozens of
//! near-identical locals. When one appears, everything from the start of
//! the run onward is generator noise; truncate there and close any braces
//! left open so the fragment stays structurally valid.

/// Comment appended when truncation leaves open braces.
const TRUNCATION_MARKER: &str = "// [truncated: repetitive generation]";

/// Consecutive identical lines tolerated before truncation.
const MAX_CONSECUTIVE: usize = 3;

/// Length of an inflating-name declaration run that triggers truncation.
const MAX_INFLATING_RUN: usize = 5;

/// Declarations of one local-variable pattern tolerated per body.
const MAX_PATTERN_DECLS: usize = 15;

/// Occurrences of one non-trivial line tolerated anywhere in the body.
const MAX_LINE_OCCURRENCES: usize = 4;

/// Minimum length for a line to count as non-trivial in the recurrence
/// check; bare braces and semicolons legitimately repeat.
const NON_TRIVIAL_LEN: usize = 15;

/// Synthetic variable prefixes the decompiler (and models imitating it)
/// emit for locals.
const LOCAL_PATTERNS: &[&str] = &[
    "uVar", "iVar", "lVar", "cVar", "sVar", "fVar", "dVar", "bVar", "pcVar", "puVar", "piVar",
    "plVar", "pvVar", "local_", "uStack_", "iStack_", "auStack_",
];

/// Scan for runaway-generation signatures and truncate at the first one.
/// Output never grows beyond the input except for the closing marker, and
/// braces are rebalanced whenever truncation occurred.
pub fn detrepeat(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let cut = [
        consecutive_run(&lines),
        inflating_run(&lines),
        pattern_flood(&lines),
        recurring_line(&lines),
    ]
    .into_iter()
    .flatten()
    .min();

    let cut = match cut {
        Some(cut) => cut,
        None => return text.to_string(),
    };

    let mut out = lines[..cut].join("\n");

    let open = out.matches('{').count();
    let close = out.matches('}').count();
    if open > close {
        out.push('\n');
        out.push_str(TRUNCATION_MARKER);
        for _ in 0..(open - close) {
            out.push_str("\n}");
        }
    }
    out
}

/// (a) The same stripped line repeated 3+ times consecutively. Returns the
/// index where the run starts.
fn consecutive_run(lines: &[&str]) -> Option<usize> {
    let mut run_start = 0;
    let mut run_len = 0;
    let mut prev: Option<&str> = None;

    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() {
            prev = None;
            run_len = 0;
            continue;
        }
        if prev == Some(stripped) {
            run_len += 1;
            if run_len >= MAX_CONSECUTIVE {
                return Some(run_start);
            }
        } else {
            run_start = i;
            run_len = 1;
            prev = Some(stripped);
        }
    }
    None
}

/// (b) Declared identifiers growing or shrinking by exactly one trailing
/// character each step, 5+ in a row.
fn inflating_run(lines: &[&str]) -> Option<usize> {
    let mut run_start = 0;
    let mut run_len = 0;
    let mut prev: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        let ident = match declared_identifier(line) {
            Some(ident) => ident,
            None => {
                prev = None;
                run_len = 0;
                continue;
            }
        };

        let inflating = prev
            .as_deref()
            .map(|p| is_one_char_step(p, &ident))
            .unwrap_or(false);

        if inflating {
            run_len += 1;
            if run_len >= MAX_INFLATING_RUN {
                return Some(run_start);
            }
        } else {
            run_start = i;
            run_len = 1;
        }
        prev = Some(ident);
    }
    None
}

/// (c) More than 15 declarations matching one local-variable pattern.
fn pattern_flood(lines: &[&str]) -> Option<usize> {
    let mut counts = [0usize; LOCAL_PATTERNS.len()];

    for (i, line) in lines.iter().enumerate() {
        let ident = match declared_identifier(line) {
            Some(ident) => ident,
            None => continue,
        };
        for (p, pattern) in LOCAL_PATTERNS.iter().enumerate() {
            if ident.starts_with(pattern) {
                counts[p] += 1;
                if counts[p] > MAX_PATTERN_DECLS {
                    return Some(i);
                }
            }
        }
    }
    None
}

/// (d) Any non-trivial line recurring 4+ times anywhere in the body.
/// Returns the index of the occurrence that crossed the limit.
fn recurring_line(lines: &[&str]) -> Option<usize> {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if stripped.len() < NON_TRIVIAL_LEN {
            continue;
        }
        if stripped.chars().all(|c| "{};".contains(c) || c.is_whitespace()) {
            continue;
        }
        let count = counts.entry(stripped).or_insert(0);
        *count += 1;
        if *count >= MAX_LINE_OCCURRENCES {
            return Some(i);
        }
    }
    None
}

/// Extract the declared identifier from a line that looks like a plain
/// local declaration (`long lVar3;`). Assignments and calls do not count.
fn declared_identifier(line: &str) -> Option<String> {
    let stripped = line.trim().strip_suffix(';')?;
    if stripped.contains('=') || stripped.contains('(') || stripped.contains("return") {
        return None;
    }
    let mut words = stripped.split_whitespace();
    let first = words.next()?;
    let rest: Vec<&str> = words.collect();
    if rest.is_empty() {
        return None;
    }
    // Skip obvious non-declarations (labels, preprocessor, control flow)
    if first.starts_with('#') || first.ends_with(':') {
        return None;
    }
    let ident = rest.last()?.trim_start_matches('*');
    if ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') && !ident.is_empty() {
        Some(ident.to_string())
    } else {
        None
    }
}

/// One name is the other plus exactly one trailing character.
fn is_one_char_step(a: &str, b: &str) -> bool {
    if a.len().abs_diff(b.len()) != 1 {
        return false;
    }
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };
    long.starts_with(short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_untouched() {
        let text = "int main(void)\n{\n    int x = 0;\n    x += 1;\n    return x;\n}";
        assert_eq!(detrepeat(text), text);
    }

    #[test]
    fn test_consecutive_identical_lines_truncated() {
        let text = "int main(void)\n{\n    int total_count = 0;\n    total_count = total_count + 1;\n    total_count = total_count + 1;\n    total_count = total_count + 1;\n    total_count = total_count + 1;\n}";
        let result = detrepeat(text);
        assert!(result.len() < text.len());
        // Run starts at the first repeated line
        assert_eq!(result.matches("total_count = total_count + 1;").count(), 0);
        assert_eq!(
            result.matches('{').count(),
            result.matches('}').count()
        );
        assert!(result.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_inflating_names_truncated() {
        let decls: String = (0..8)
            .map(|i| format!("    long lVarX{};\n", "x".repeat(i)))
            .collect();
        let text = format!("void f(void)\n{{\n{}}}", decls);
        let result = detrepeat(&text);
        assert!(result.len() < text.len());
        assert_eq!(result.matches('{').count(), result.matches('}').count());
    }

    #[test]
    fn test_pattern_flood_truncated() {
        let decls: String = (0..20).map(|i| format!("    int iVar{};\n", i)).collect();
        let text = format!("void f(void)\n{{\n{}    return;\n}}", decls);
        let result = detrepeat(&text);
        assert!(result.len() < text.len());
        // Truncated just before the declaration that crossed the limit
        assert!(result.contains("iVar14"));
        assert!(!result.contains("iVar15"));
    }

    #[test]
    fn test_recurring_nontrivial_line_truncated() {
        let mut text = String::from("void f(void)\n{\n");
        for i in 0..4 {
            text.push_str(&format!("    int unique_{} = {};\n", i, i));
            text.push_str("    buffer[index] = value * 2 + offset;\n");
        }
        text.push_str("}");
        let result = detrepeat(&text);
        assert!(result.len() < text.len());
        assert_eq!(result.matches("buffer[index]").count(), 3);
    }

    #[test]
    fn test_never_longer_without_truncation() {
        let text = "short";
        assert_eq!(detrepeat(text), text);
    }

    #[test]
    fn test_braces_balanced_after_truncation() {
        let text = "void f(void)\n{\n    if (a) {\n        do_work(a, b, c, d);\n        do_work(a, b, c, d);\n        do_work(a, b, c, d);\n        do_work(a, b, c, d);\n";
        let result = detrepeat(&text);
        assert_eq!(result.matches('{').count(), result.matches('}').count());
    }
}
