//! Classifier rule pipeline
//!
//! The classifier is an ordered list of independent predicate rules,
//! evaluated in a fixed order with first-match-wins semantics. Each rule
//! carries a tag so rejections can be logged and individual rules tested
//! in isolation.

use crate::names::{
    AUTO_NAME_PREFIXES, CRT_ENTRY_SUBSTRINGS, ENTRY_POINTS, ENTRY_VARIANTS, LIBRARY_NAME_SET,
    RUNTIME_PREFIXES, TEMPLATE_VOCAB,
};
use crate::{ClassifierConfig, FunctionFacts};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a matched rule does with the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Retain,
    Reject,
}

/// The predicate behind one rule.
#[derive(Debug, Clone)]
pub enum RuleCheck {
    /// Canonical entry-point name (case-insensitive).
    EntryPoint,
    /// External linkage or thunk flag set.
    ExternalOrThunk,
    /// Auto-generated decompiler name (`FUN_*` style).
    AutoNamed,
    /// Exact case-insensitive match against a name table.
    NameExact(&'static Lazy<HashSet<&'static str>>),
    /// Case-insensitive prefix match against a table.
    NamePrefix(&'static [&'static str]),
    /// Case-insensitive substring match against a table.
    NameSubstring(&'static [&'static str]),
    /// Double leading underscore, or single leading underscore without an
    /// entry-point allow-list entry.
    LeadingMarker,
    /// Name shorter than the given length.
    ShortName(usize),
    /// Auto-named function smaller than the given byte size.
    AutoSizeUnder(u64),
    /// Any function smaller than the given byte size.
    SizeUnder(u64),
    /// Body text contains a table entry (post-decompilation noise scan).
    BodyPattern(&'static [&'static str]),
    /// Body reduces to nothing or a bare pass-through return.
    TrivialBody,
}

/// One tagged rule in the pipeline.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    pub tag: &'static str,
    pub action: RuleAction,
    pub check: RuleCheck,
}

impl ClassifierRule {
    pub fn new(tag: &'static str, action: RuleAction, check: RuleCheck) -> Self {
        Self { tag, action, check }
    }

    /// Whether this rule's predicate matches the function.
    pub fn matches(&self, facts: &FunctionFacts<'_>) -> bool {
        let name = facts.name.to_lowercase();
        match &self.check {
            RuleCheck::EntryPoint => ENTRY_POINTS.contains(&name.as_str()),
            RuleCheck::ExternalOrThunk => facts.is_external || facts.is_thunk,
            RuleCheck::AutoNamed => is_auto_named(&name),
            RuleCheck::NameExact(table) => table.contains(name.as_str()),
            RuleCheck::NamePrefix(table) => table.iter().any(|p| name.starts_with(p)),
            RuleCheck::NameSubstring(table) => table.iter().any(|s| name.contains(s)),
            RuleCheck::LeadingMarker => {
                if name.starts_with("__") {
                    true
                } else {
                    name.starts_with('_') && !ENTRY_VARIANTS.contains(&name.as_str())
                }
            }
            RuleCheck::ShortName(min) => facts.name.len() < *min,
            RuleCheck::AutoSizeUnder(min) => is_auto_named(&name) && facts.byte_size < *min,
            RuleCheck::SizeUnder(min) => facts.byte_size < *min,
            RuleCheck::BodyPattern(table) => match facts.body {
                Some(body) => {
                    let body = body.to_lowercase();
                    table.iter().any(|s| body.contains(s))
                }
                None => false,
            },
            RuleCheck::TrivialBody => match facts.body {
                Some(body) => crate::trivial::is_trivial_body(body),
                None => false,
            },
        }
    }
}

fn is_auto_named(lower_name: &str) -> bool {
    AUTO_NAME_PREFIXES.iter().any(|p| lower_name.starts_with(p))
}

/// Build the fixed pipeline for a configuration. Order matters: the
/// always-retain rule shields entry points from everything below it.
pub fn build_rules(config: &ClassifierConfig) -> Vec<ClassifierRule> {
    let mut rules = vec![ClassifierRule::new(
        "entry_point",
        RuleAction::Retain,
        RuleCheck::EntryPoint,
    )];

    rules.push(ClassifierRule::new(
        "external_or_thunk",
        RuleAction::Reject,
        RuleCheck::ExternalOrThunk,
    ));

    if config.skip_auto_named {
        rules.push(ClassifierRule::new(
            "auto_named",
            RuleAction::Reject,
            RuleCheck::AutoNamed,
        ));
    }

    rules.extend([
        ClassifierRule::new(
            "library_name",
            RuleAction::Reject,
            RuleCheck::NameExact(&LIBRARY_NAME_SET),
        ),
        ClassifierRule::new(
            "runtime_prefix",
            RuleAction::Reject,
            RuleCheck::NamePrefix(RUNTIME_PREFIXES),
        ),
        ClassifierRule::new(
            "crt_entry",
            RuleAction::Reject,
            RuleCheck::NameSubstring(CRT_ENTRY_SUBSTRINGS),
        ),
        ClassifierRule::new(
            "leading_marker",
            RuleAction::Reject,
            RuleCheck::LeadingMarker,
        ),
        ClassifierRule::new(
            "template_vocab",
            RuleAction::Reject,
            RuleCheck::NameSubstring(TEMPLATE_VOCAB),
        ),
        ClassifierRule::new("short_name", RuleAction::Reject, RuleCheck::ShortName(3)),
        ClassifierRule::new(
            "auto_size",
            RuleAction::Reject,
            RuleCheck::AutoSizeUnder(config.min_auto_size),
        ),
        ClassifierRule::new(
            "size_floor",
            RuleAction::Reject,
            RuleCheck::SizeUnder(config.min_size_floor),
        ),
        ClassifierRule::new(
            "body_noise",
            RuleAction::Reject,
            RuleCheck::BodyPattern(TEMPLATE_VOCAB),
        ),
        ClassifierRule::new("trivial_body", RuleAction::Reject, RuleCheck::TrivialBody),
    ]);

    rules
}
