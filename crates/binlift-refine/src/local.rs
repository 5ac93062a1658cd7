//! Deterministic local backend
//!
//! Token-level substitution of decompiler artifact types for standard C
//! equivalents. No model, no I/O, always available; this is the floor the
//! fallback chain can never drop below.

use crate::backend::{Backend, BackendError, BackendTier, GenerateOptions};
use async_trait::async_trait;

/// Replacements applied in order. Longer artifact names come first so
/// `undefined8` is consumed before the bare `undefined` rule sees it.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("undefined8", "uint64_t"),
    ("undefined4", "uint32_t"),
    ("undefined2", "uint16_t"),
    ("undefined", "uint8_t"),
    ("(void *)0x0", "NULL"),
    ("== 0x0", "== NULL"),
    ("!= 0x0", "!= NULL"),
];

/// Pure-function backend; `generate` cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTransformBackend;

impl MockTransformBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Backend for MockTransformBackend {
    fn id(&self) -> &'static str {
        "local-transform"
    }

    fn tier(&self) -> BackendTier {
        BackendTier::Local
    }

    async fn available(&self) -> bool {
        true
    }

    async fn generate(&self, text: &str, _opts: &GenerateOptions) -> Result<String, BackendError> {
        let mut out = text.to_string();
        for (from, to) in SUBSTITUTIONS {
            out = out.replace(from, to);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_artifact_types_replaced() {
        let backend = MockTransformBackend::new();
        let text = "undefined8 f(undefined4 a)\n{\n    undefined2 b;\n    undefined c;\n    return 0;\n}";
        let out = backend
            .generate(text, &GenerateOptions::default())
            .await
            .unwrap();
        assert!(out.contains("uint64_t f(uint32_t a)"));
        assert!(out.contains("uint16_t b;"));
        assert!(out.contains("uint8_t c;"));
        assert!(!out.contains("undefined"));
    }

    #[tokio::test]
    async fn test_null_forms_replaced() {
        let backend = MockTransformBackend::new();
        let text = "if (p == 0x0) { q = (void *)0x0; } else if (p != 0x0) { r(); }";
        let out = backend
            .generate(text, &GenerateOptions::default())
            .await
            .unwrap();
        assert!(out.contains("p == NULL"));
        assert!(out.contains("q = NULL;"));
        assert!(out.contains("p != NULL"));
    }

    #[tokio::test]
    async fn test_always_available() {
        assert!(MockTransformBackend::new().available().await);
    }
}
