//! Quality gate
//!
//! Applies the three checks in order to raw backend output: garble
//! detection first (a garbled generation is discarded outright in favor
//! of the pre-generation text), then repetition truncation, then
//! reformatting of line-starved output.

use crate::format::format_code;
use crate::garble::is_garbled;
use crate::repetition::detrepeat;
use serde::{Deserialize, Serialize};

/// What the gate did with a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVerdict {
    /// Accepted as-is (possibly reformatted).
    Clean,
    /// Accepted after cutting a repetition run.
    Truncated,
    /// Garbled; the fallback text was returned instead.
    Rejected,
}

/// Gate result: the text to use, and what happened to get it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateOutcome {
    pub text: String,
    pub verdict: GateVerdict,
}

/// Validates and repairs one backend generation before acceptance.
#[derive(Debug, Clone, Default)]
pub struct QualityGate;

impl QualityGate {
    pub fn new() -> Self {
        Self
    }

    /// Run a generation through the gate. `fallback` is the pre-generation
    /// text to revert to when the candidate is rejected.
    pub fn apply(&self, candidate: &str, fallback: &str) -> GateOutcome {
        if is_garbled(candidate) {
            return GateOutcome {
                text: fallback.to_string(),
                verdict: GateVerdict::Rejected,
            };
        }

        let truncated = detrepeat(candidate);
        let was_truncated = truncated != candidate;

        GateOutcome {
            text: format_code(&truncated),
            verdict: if was_truncated {
                GateVerdict::Truncated
            } else {
                GateVerdict::Clean
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "int main(void)\n{\n    return 0;\n}\n";

    #[test]
    fn test_clean_generation_accepted() {
        let candidate = "int main(void)\n{\n    int x = 1;\n    x += 2;\n    g(x);\n    return x;\n}\n";
        let outcome = QualityGate::new().apply(candidate, FALLBACK);
        assert_eq!(outcome.verdict, GateVerdict::Clean);
        assert_eq!(outcome.text, candidate);
    }

    #[test]
    fn test_garbled_generation_reverts_to_fallback() {
        let outcome = QualityGate::new().apply("!!!", FALLBACK);
        assert_eq!(outcome.verdict, GateVerdict::Rejected);
        assert_eq!(outcome.text, FALLBACK);
    }

    #[test]
    fn test_garble_check_runs_before_truncation() {
        // Both garbled and repetitive: rejection wins, fallback returned
        let candidate = "int f(void) { x = 1; }\nsame_line_of_code();\nsame_line_of_code();\nsame_line_of_code();\n!!!";
        let outcome = QualityGate::new().apply(candidate, FALLBACK);
        assert_eq!(outcome.verdict, GateVerdict::Rejected);
        assert_eq!(outcome.text, FALLBACK);
    }

    #[test]
    fn test_repetitive_generation_truncated() {
        let candidate = "void f(void)\n{\n    counter = counter + step;\n    counter = counter + step;\n    counter = counter + step;\n    counter = counter + step;\n    finish(counter);\n}\n";
        let outcome = QualityGate::new().apply(candidate, FALLBACK);
        assert_eq!(outcome.verdict, GateVerdict::Truncated);
        assert!(outcome.text.len() < candidate.len());
    }

    #[test]
    fn test_unformatted_generation_reformatted() {
        let candidate = "int f(int a) { int b; b = a * 2; return b; }";
        let outcome = QualityGate::new().apply(candidate, FALLBACK);
        assert_eq!(outcome.verdict, GateVerdict::Clean);
        assert!(outcome.text.lines().count() > 3);
    }
}
