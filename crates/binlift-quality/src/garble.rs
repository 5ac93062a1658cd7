//! Garble detection
//!
//! Generative backends occasionally hallucinate: bracket storms, stray
//! file paths, replacement markers, punctuation runs. A garbled generation
//! is worthless, so the gate detects it and tells the caller to keep the
//! pre-generation text instead.

/// Characters that almost never appear in real C output but show up in
/// corrupted generations.
const NOISE_CHARS: &[char] = &['@', '\\', '^', '`', '~', '|'];

/// Maximum fraction of noise characters before text counts as garbled.
const NOISE_RATIO: f64 = 0.05;

/// Known hallucination artifacts. Any occurrence marks the text garbled.
const ARTIFACTS: &[&str] = &[
    "((((", "))))", "[[[[", "]]]]", "!!!", "???", "\u{FFFD}", ".cpp\"", ".c\" line",
];

/// Longest plausible single line of generated code.
const MAX_LINE_LEN: usize = 500;

/// True when generated text shows corruption or hallucination artifacts
/// rather than plausible code.
pub fn is_garbled(text: &str) -> bool {
    let total = text.chars().count();
    if total < 10 {
        return true;
    }

    let noise = text.chars().filter(|c| NOISE_CHARS.contains(c)).count();
    if noise as f64 > total as f64 * NOISE_RATIO {
        return true;
    }

    if ARTIFACTS.iter().any(|a| text.contains(a)) {
        return true;
    }

    if text.lines().any(|line| line.len() > MAX_LINE_LEN) {
        return true;
    }

    // Brace imbalance beyond half the open count is a sign the generation
    // lost track of structure.
    let open = text.matches('{').count();
    let close = text.matches('}').count();
    let diff = open.abs_diff(close);
    if diff > open / 2 && diff > 0 {
        return true;
    }

    false
}
