//! Strategy-level robustness tests: refine must return usable text for
//! any input, in any backend weather.

use binlift_quality::QualityGate;
use binlift_refine::{
    Backend, BackendError, BackendRegistry, BackendTier, GenerateOptions, Mode, RefineStrategy,
};
use async_trait::async_trait;
use std::sync::Arc;

struct AlwaysDown(BackendTier);

#[async_trait]
impl Backend for AlwaysDown {
    fn id(&self) -> &'static str {
        "always-down"
    }

    fn tier(&self) -> BackendTier {
        self.0
    }

    async fn available(&self) -> bool {
        false
    }

    async fn generate(&self, _: &str, _: &GenerateOptions) -> Result<String, BackendError> {
        Err(BackendError::Unavailable("down".to_string()))
    }
}

fn dead_chain() -> RefineStrategy {
    let registry = BackendRegistry::empty()
        .register(Arc::new(AlwaysDown(BackendTier::CloudRewrite)))
        .register(Arc::new(AlwaysDown(BackendTier::RemoteGpu)))
        .register(Arc::new(AlwaysDown(BackendTier::Cleanup)));
    RefineStrategy::new(registry, QualityGate::new())
}

#[tokio::test]
async fn test_empty_input_survives() {
    let out = dead_chain().refine("f", "", Mode::Auto).await;
    assert_eq!(out, "");
}

#[tokio::test]
async fn test_large_input_survives() {
    let line = "    buffer[i] = buffer[i] ^ key[i % key_len];\n";
    let mut big = String::from("void scramble(void)\n{\n");
    while big.len() < 1_000_000 {
        big.push_str(line);
    }
    big.push('}');

    let out = dead_chain().refine("scramble", &big, Mode::Auto).await;
    assert_eq!(out, big);
}

#[tokio::test]
async fn test_non_code_input_survives() {
    let inputs = ["\0\u{FFFD}\0", "no code here at all", "{{{{{{", "}}}"];
    let strategy = dead_chain();
    for input in inputs {
        let out = strategy.refine("f", input, Mode::Auto).await;
        assert_eq!(out, input);
    }
}

#[tokio::test]
async fn test_all_tiers_down_both_modes() {
    let raw = "undefined8 f(void)\n{\n    return 0;\n}\n";
    let strategy = dead_chain();
    assert_eq!(strategy.refine("f", raw, Mode::Auto).await, raw);
    assert_eq!(strategy.refine("f", raw, Mode::CloudRewrite).await, raw);
}

#[tokio::test]
async fn test_default_registry_never_errors_on_junk() {
    let strategy = RefineStrategy::new(BackendRegistry::default(), QualityGate::new());
    let out = strategy
        .refine("f", "undefined undefined8 undefined4", Mode::Auto)
        .await;
    assert_eq!(out, "uint8_t uint64_t uint32_t");
}
