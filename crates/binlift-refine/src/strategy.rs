//! Tiered refinement strategy
//!
//! Order of attack for one function: an explicit cloud-rewrite request
//! short-circuits everything; otherwise the GPU service is tried, then
//! the local transform, then a cleanup pass over whatever survived. Every
//! backend output goes through the quality gate with the tier's input as
//! the fallback, so a bad generation can only ever revert text, never
//! corrupt it. `refine` has no error path by construction.

use crate::backend::{Backend, BackendDescriptor, BackendTier, GenerateOptions};
use crate::cloud::{CloudRewriteBackend, CloudTask};
use crate::local::MockTransformBackend;
use crate::remote::RemoteGpuBackend;
use binlift_quality::{GateVerdict, QualityGate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-job refinement mode requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Tiered fallback: GPU service, then local transform, then cleanup.
    Auto,
    /// Single hosted-model rewrite, no further tiers.
    CloudRewrite,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Auto
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Auto => f.write_str("auto"),
            Mode::CloudRewrite => f.write_str("cloud_rewrite"),
        }
    }
}

/// Ordered set of configured backends. Within a tier, backends are tried
/// in registration order until one produces output; tiers with no
/// registration are skipped by the strategy.
pub struct BackendRegistry {
    backends: Vec<Arc<dyn Backend>>,
}

impl Default for BackendRegistry {
    /// Local transform only. This is the offline configuration: no keys,
    /// no network, still functional.
    fn default() -> Self {
        Self {
            backends: vec![Arc::new(MockTransformBackend::new())],
        }
    }
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Full chain, configured from the environment. Backends with missing
    /// configuration register anyway and report themselves unavailable.
    pub fn from_env() -> Self {
        Self::empty()
            .register(Arc::new(CloudRewriteBackend::from_env(CloudTask::Rewrite)))
            .register(Arc::new(RemoteGpuBackend::from_env()))
            .register(Arc::new(RemoteGpuBackend::managed_from_env()))
            .register(Arc::new(MockTransformBackend::new()))
            .register(Arc::new(CloudRewriteBackend::from_env(CloudTask::Cleanup)))
    }

    pub fn register(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// All backends of one tier, in registration order.
    pub fn tier_backends(
        &self,
        tier: BackendTier,
    ) -> impl Iterator<Item = &Arc<dyn Backend>> {
        self.backends.iter().filter(move |b| b.tier() == tier)
    }

    /// Availability snapshot of every registered backend, in registration
    /// order.
    pub async fn descriptors(&self) -> Vec<BackendDescriptor> {
        let mut out = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            out.push(BackendDescriptor {
                id: backend.id().to_string(),
                tier: backend.tier(),
                available: backend.available().await,
            });
        }
        out
    }
}

/// Applies the tiered fallback with quality gating at every seam.
pub struct RefineStrategy {
    registry: BackendRegistry,
    gate: QualityGate,
    options: GenerateOptions,
}

impl RefineStrategy {
    pub fn new(registry: BackendRegistry, gate: QualityGate) -> Self {
        Self {
            registry,
            gate,
            options: GenerateOptions::default(),
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Refine one function. Never fails: when every tier is unavailable
    /// or every generation is rejected, the input comes back unchanged.
    pub async fn refine(&self, name: &str, raw: &str, mode: Mode) -> String {
        if mode == Mode::CloudRewrite {
            if let Some(text) = self.try_tier(BackendTier::CloudRewrite, name, raw).await {
                return text;
            }
            tracing::debug!(function = name, "cloud rewrite unavailable, using fallback chain");
        }

        let mut current = raw.to_string();

        let primary = match self.try_tier(BackendTier::RemoteGpu, name, &current).await {
            Some(text) => Some(text),
            None => self.try_tier(BackendTier::Local, name, &current).await,
        };
        if let Some(text) = primary {
            current = text;
        }

        if let Some(text) = self.try_tier(BackendTier::Cleanup, name, &current).await {
            current = text;
        }

        current
    }

    /// Refine a batch sequentially, preserving order.
    pub async fn refine_all(
        &self,
        functions: &[(String, String)],
        mode: Mode,
    ) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(functions.len());
        for (name, code) in functions {
            let refined = self.refine(name, code, mode).await;
            out.push((name.clone(), refined));
        }
        out
    }

    /// One standalone cleanup pass, bypassing the fallback chain. `None`
    /// when no cleanup backend is registered and available.
    pub async fn cleanup_only(&self, name: &str, code: &str) -> Option<String> {
        self.try_tier(BackendTier::Cleanup, name, code).await
    }

    /// One tier attempt. Backends of the tier are tried in registration
    /// order; the first that is available and returns output wins. `None`
    /// means the whole tier did not run (unregistered, unavailable, or
    /// every call failed); `Some` is gated text, which on a rejected
    /// generation is the input itself.
    async fn try_tier(&self, tier: BackendTier, name: &str, input: &str) -> Option<String> {
        for backend in self.registry.tier_backends(tier) {
            if !backend.available().await {
                tracing::debug!(function = name, backend = backend.id(), "unavailable");
                continue;
            }

            match backend.generate(input, &self.options).await {
                Ok(candidate) => {
                    let outcome = self.gate.apply(&candidate, input);
                    match outcome.verdict {
                        GateVerdict::Rejected => {
                            tracing::warn!(
                                function = name,
                                backend = backend.id(),
                                "generation rejected by quality gate"
                            );
                        }
                        GateVerdict::Truncated => {
                            tracing::warn!(
                                function = name,
                                backend = backend.id(),
                                "repetitive generation truncated"
                            );
                        }
                        GateVerdict::Clean => {}
                    }
                    return Some(outcome.text);
                }
                Err(e) => {
                    tracing::warn!(
                        function = name,
                        backend = backend.id(),
                        "backend failed: {}",
                        e
                    );
                }
            }
        }
        None
    }
}
