//! Trivial-body detection
//!
//! Some noise functions only reveal themselves after decompilation: their
//! body reduces to nothing, or a single `return <identifier>;`. Those are
//! not worth a backend round-trip.

/// Strip `//` line comments and `/* */` block comments.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '/' {
            match chars.peek() {
                Some('/') => {
                    // Skip to end of line; the newline itself is kept
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = ' ';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                    continue;
                }
                _ => {}
            }
        }
        out.push(ch);
    }
    out
}

/// Text between the outermost matching braces, or `None` if there is no
/// balanced outer pair.
fn outer_body(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether a statement is `return` or `return <identifier>` (synthetic
/// pass-through stubs). Literal returns (`return 0`) do not count: a
/// constant-returning function can still be meaningful user code.
fn is_bare_return(statement: &str) -> bool {
    let rest = match statement.strip_prefix("return") {
        // Word boundary: `returnable` is not a return statement
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => return false,
    };
    if rest.is_empty() {
        return true;
    }
    let mut chars = rest.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// True when the control-flow body reduces to at most one non-brace
/// statement that is empty or a bare `return <identifier>;`.
pub fn is_trivial_body(code: &str) -> bool {
    let stripped = strip_comments(code);
    let body = match outer_body(&stripped) {
        Some(body) => body,
        None => return stripped.trim().is_empty(),
    };

    let statements: Vec<&str> = body
        .split(';')
        .map(str::trim)
        .filter(|s| {
            !s.is_empty() && !s.chars().all(|c| c == '{' || c == '}' || c.is_whitespace())
        })
        .collect();

    match statements.as_slice() {
        [] => true,
        [only] => is_bare_return(only),
        _ => false,
    }
}
