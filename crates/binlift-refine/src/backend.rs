//! Backend contract
//!
//! A backend takes decompiler output for one function and returns a
//! cleaner rendition. Availability is re-checked on every call; a backend
//! that was reachable a minute ago may not be now, and the strategy must
//! see that before it commits a request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a backend sits in the fallback order. Lower tiers are tried
/// first; `Cleanup` is a post-pass, not a fallback step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendTier {
    /// Hosted model asked to rewrite the function wholesale.
    CloudRewrite,
    /// Dedicated GPU service running a decompilation-tuned model.
    RemoteGpu,
    /// On-box fallback; always reachable.
    Local,
    /// Readability pass applied after a successful refinement.
    Cleanup,
}

impl std::fmt::Display for BackendTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BackendTier::CloudRewrite => "cloud_rewrite",
            BackendTier::RemoteGpu => "remote_gpu",
            BackendTier::Local => "local",
            BackendTier::Cleanup => "cleanup",
        };
        f.write_str(s)
    }
}

/// Knobs passed through to whatever model sits behind a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("BACKEND/unavailable: {0}")]
    Unavailable(String),

    #[error("BACKEND/timeout after {0}s")]
    Timeout(u64),

    #[error("BACKEND/http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("BACKEND/bad response: {0}")]
    BadResponse(String),
}

/// One refinement engine. Implementations must never panic on arbitrary
/// input text; every failure mode maps to a `BackendError`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stable identifier used in logs and the backends listing.
    fn id(&self) -> &'static str;

    fn tier(&self) -> BackendTier;

    /// Whether a call right now has a chance of succeeding. Checked
    /// before every generate; results are never cached.
    async fn available(&self) -> bool;

    /// Rewrite one function body. `text` is raw decompiler output (or a
    /// prior tier's output, for cleanup backends).
    async fn generate(&self, text: &str, opts: &GenerateOptions) -> Result<String, BackendError>;
}

/// Serializable availability snapshot for one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendDescriptor {
    pub id: String,
    pub tier: BackendTier,
    pub available: bool,
}

/// Strip a markdown code fence if the model wrapped its answer in one.
/// Handles a leading ```` ```c ```` / ```` ```cpp ```` / bare ```` ``` ````
/// line and a trailing ```` ``` ```` line.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let without_open = match trimmed.find('\n') {
        Some(i) => &trimmed[i + 1..],
        None => return String::new(),
    };
    let without_close = without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim_end();
    without_close.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_stripped() {
        let text = "```c\nint main(void) { return 0; }\n```";
        assert_eq!(strip_code_fences(text), "int main(void) { return 0; }");
    }

    #[test]
    fn test_cpp_fence_stripped() {
        let text = "```cpp\nvoid f();\n```\n";
        assert_eq!(strip_code_fences(text), "void f();");
    }

    #[test]
    fn test_unfenced_text_untouched() {
        let text = "int main(void) { return 0; }";
        assert_eq!(strip_code_fences(text), text);
    }

    #[test]
    fn test_tier_order_matches_fallback_order() {
        assert!(BackendTier::CloudRewrite < BackendTier::RemoteGpu);
        assert!(BackendTier::RemoteGpu < BackendTier::Local);
    }
}
