//! binlift-classify: function retention classifier
//!
//! Decides, per recovered function, whether it is user-authored code worth
//! sending through AI refinement, or compiler/runtime/library noise to
//! skip. Classification is a pure function of the function's name,
//! structural flags, byte size, optional body text, and the configuration:
//! same inputs always produce the same decision.
//!
//! # Example
//!
//! ```
//! use binlift_classify::{ClassifierConfig, FunctionClassifier, FunctionFacts};
//!
//! let classifier = FunctionClassifier::new(ClassifierConfig::default());
//! let decision = classifier.classify(&FunctionFacts {
//!     name: "memcpy",
//!     is_external: false,
//!     is_thunk: false,
//!     byte_size: 128,
//!     body: None,
//! });
//! assert!(!decision.retain);
//! ```

pub mod names;
pub mod rules;
pub mod trivial;

use rules::{build_rules, ClassifierRule, RuleAction};
use serde::{Deserialize, Serialize};

/// Thresholds controlling the size and stub rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Reject every auto-named (`FUN_*` style) function outright.
    pub skip_auto_named: bool,
    /// Minimum byte size for auto-named functions.
    pub min_auto_size: u64,
    /// Absolute minimum byte size for any function.
    pub min_size_floor: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            skip_auto_named: false,
            min_auto_size: 32,
            min_size_floor: 8,
        }
    }
}

/// Everything known about one recovered function at classification time.
/// The body is optional because a first pruning pass runs before
/// decompiled text exists.
#[derive(Debug, Clone, Copy)]
pub struct FunctionFacts<'a> {
    pub name: &'a str,
    pub is_external: bool,
    pub is_thunk: bool,
    pub byte_size: u64,
    pub body: Option<&'a str>,
}

/// The outcome plus the tag of the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub retain: bool,
    pub rule: &'static str,
}

/// Ordered rule pipeline. First matching rule wins; an unmatched function
/// is retained.
pub struct FunctionClassifier {
    rules: Vec<ClassifierRule>,
}

impl FunctionClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            rules: build_rules(&config),
        }
    }

    pub fn classify(&self, facts: &FunctionFacts<'_>) -> Decision {
        for rule in &self.rules {
            if rule.matches(facts) {
                return Decision {
                    retain: rule.action == RuleAction::Retain,
                    rule: rule.tag,
                };
            }
        }
        Decision {
            retain: true,
            rule: "default",
        }
    }
}

impl Default for FunctionClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(name: &str) -> FunctionFacts<'_> {
        FunctionFacts {
            name,
            is_external: false,
            is_thunk: false,
            byte_size: 256,
            body: None,
        }
    }

    #[test]
    fn test_entry_points_always_retained() {
        let classifier = FunctionClassifier::default();
        for name in ["main", "_main", "wmain", "WinMain", "MAIN", "WINMAIN"] {
            // Worst case: tiny, flagged as thunk
            let decision = classifier.classify(&FunctionFacts {
                name,
                is_external: false,
                is_thunk: true,
                byte_size: 1,
                body: None,
            });
            assert!(decision.retain, "{} must be retained", name);
            assert_eq!(decision.rule, "entry_point");
        }
    }

    #[test]
    fn test_external_and_thunk_rejected() {
        let classifier = FunctionClassifier::default();
        let decision = classifier.classify(&FunctionFacts {
            is_thunk: true,
            ..facts("process_order")
        });
        assert!(!decision.retain);
        assert_eq!(decision.rule, "external_or_thunk");
    }

    #[test]
    fn test_library_names_rejected_case_insensitive() {
        let classifier = FunctionClassifier::default();
        for name in ["memcpy", "MEMCPY", "printf", "CreateFileW", "_initterm"] {
            assert!(!classifier.classify(&facts(name)).retain, "{}", name);
        }
    }

    #[test]
    fn test_runtime_prefixes_rejected() {
        let classifier = FunctionClassifier::default();
        for name in ["__security_init_cookie", "__scrt_is_managed_app", "_Cnd_wait"] {
            assert!(!classifier.classify(&facts(name)).retain, "{}", name);
        }
    }

    #[test]
    fn test_double_underscore_rejected_but_start_allowed() {
        let classifier = FunctionClassifier::default();
        assert!(!classifier.classify(&facts("__my_helper")).retain);
        assert!(!classifier.classify(&facts("_private_thing")).retain);
        assert!(classifier.classify(&facts("_start")).retain);
    }

    #[test]
    fn test_template_vocab_in_name_rejected() {
        let classifier = FunctionClassifier::default();
        assert!(
            !classifier
                .classify(&facts("std_basic_string_append"))
                .retain
        );
        assert!(!classifier.classify(&facts("make_shared_ptr_thing")).retain);
    }

    #[test]
    fn test_template_vocab_in_body_rejected() {
        let classifier = FunctionClassifier::default();
        let body = "void f(void) {\n    basic_string<char> s;\n    s.append(\"x\");\n}";
        let decision = classifier.classify(&FunctionFacts {
            body: Some(body),
            ..facts("looks_like_user_code")
        });
        assert!(!decision.retain);
        assert_eq!(decision.rule, "body_noise");
    }

    #[test]
    fn test_short_names_rejected() {
        let classifier = FunctionClassifier::default();
        assert!(!classifier.classify(&facts("fn")).retain);
        assert!(!classifier.classify(&facts("x")).retain);
    }

    #[test]
    fn test_size_thresholds() {
        let classifier = FunctionClassifier::default();

        // Auto-named below the auto threshold
        let decision = classifier.classify(&FunctionFacts {
            byte_size: 16,
            ..facts("FUN_00401000")
        });
        assert!(!decision.retain);
        assert_eq!(decision.rule, "auto_size");

        // Anything below the absolute floor
        let decision = classifier.classify(&FunctionFacts {
            byte_size: 4,
            ..facts("tiny_helper")
        });
        assert!(!decision.retain);
        assert_eq!(decision.rule, "size_floor");

        // Entry point below the floor is still retained
        let decision = classifier.classify(&FunctionFacts {
            byte_size: 4,
            ..facts("main")
        });
        assert!(decision.retain);
    }

    #[test]
    fn test_skip_auto_named_switch() {
        let permissive = FunctionClassifier::default();
        let strict = FunctionClassifier::new(ClassifierConfig {
            skip_auto_named: true,
            ..ClassifierConfig::default()
        });

        let f = facts("FUN_00401200");
        assert!(permissive.classify(&f).retain);
        assert!(!strict.classify(&f).retain);
    }

    #[test]
    fn test_trivial_body_rejected() {
        let classifier = FunctionClassifier::default();
        let decision = classifier.classify(&FunctionFacts {
            body: Some("int stub(void)\n{\n    return uVar1;\n}\n"),
            ..facts("pass_through")
        });
        assert!(!decision.retain);
        assert_eq!(decision.rule, "trivial_body");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = FunctionClassifier::default();
        let f = FunctionFacts {
            body: Some("int f(int a) {\n    int b;\n    b = a + 1;\n    return b;\n}"),
            ..facts("compute_next")
        };
        let first = classifier.classify(&f);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&f), first);
        }
        assert!(first.retain);
    }
}
