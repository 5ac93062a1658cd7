//! Remote GPU backends
//!
//! POSTs raw decompiler output to an HTTP inference service running a
//! decompilation-tuned model. Two deployments share the wire contract
//! (`{"ghidra_code": ...}` in, `{"refined_code": ...}` out): a dedicated
//! GPU service, and a managed cloud endpoint exposed through a direct
//! URL. The long generate timeout is intentional: cold model starts on
//! the far side can take most of a minute.

use crate::backend::{Backend, BackendError, BackendTier, GenerateOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Backend over an HTTP inference endpoint. Unavailable when no endpoint
/// URL is configured, or when a configured health URL fails a
/// short-timeout check.
pub struct RemoteGpuBackend {
    id: &'static str,
    client: reqwest::Client,
    health_client: reqwest::Client,
    endpoint_url: Option<String>,
    health_url: Option<String>,
}

impl RemoteGpuBackend {
    pub fn new(
        id: &'static str,
        endpoint_url: Option<String>,
        health_url: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        let health_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            id,
            client,
            health_client,
            endpoint_url: endpoint_url.filter(|u| !u.is_empty()),
            health_url: health_url.filter(|u| !u.is_empty()),
        }
    }

    /// Dedicated GPU service, configured from the environment.
    pub fn from_env() -> Self {
        Self::new(
            "remote-gpu",
            std::env::var("BINLIFT_GPU_URL").ok(),
            std::env::var("BINLIFT_GPU_HEALTH_URL").ok(),
        )
    }

    /// Managed cloud endpoint. One base URL; the service exposes
    /// `/decompile` and `/health` under it.
    pub fn managed_from_env() -> Self {
        let base = std::env::var("BINLIFT_MANAGED_GPU_URL")
            .ok()
            .filter(|u| !u.is_empty());
        Self::new(
            "managed-gpu",
            base.as_ref().map(|b| format!("{}/decompile", b)),
            base.as_ref().map(|b| format!("{}/health", b)),
        )
    }
}

#[derive(Serialize)]
struct RefineRequest<'a> {
    ghidra_code: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct RefineResponse {
    refined_code: String,
}

#[async_trait]
impl Backend for RemoteGpuBackend {
    fn id(&self) -> &'static str {
        self.id
    }

    fn tier(&self) -> BackendTier {
        BackendTier::RemoteGpu
    }

    /// Configured endpoint plus, when a health URL is set, a passing
    /// short-timeout health check. Checked fresh on every call.
    async fn available(&self) -> bool {
        if self.endpoint_url.is_none() {
            return false;
        }
        match &self.health_url {
            Some(url) => match self.health_client.get(url).send().await {
                Ok(response) => response.status().is_success(),
                Err(_) => false,
            },
            None => true,
        }
    }

    async fn generate(&self, text: &str, opts: &GenerateOptions) -> Result<String, BackendError> {
        let url = self
            .endpoint_url
            .as_deref()
            .ok_or_else(|| BackendError::Unavailable("no endpoint configured".to_string()))?;

        let body = RefineRequest {
            ghidra_code: text,
            max_tokens: opts.max_tokens,
            temperature: opts.temperature,
        };

        let response = self.client.post(url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(REQUEST_TIMEOUT_SECS)
            } else {
                BackendError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(BackendError::BadResponse(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: RefineResponse = response.json().await?;
        if parsed.refined_code.trim().is_empty() {
            return Err(BackendError::BadResponse("empty refined_code".to_string()));
        }
        Ok(parsed.refined_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_without_endpoint() {
        assert!(!RemoteGpuBackend::new("remote-gpu", None, None).available().await);
        assert!(
            !RemoteGpuBackend::new("remote-gpu", Some(String::new()), None)
                .available()
                .await
        );
    }

    #[tokio::test]
    async fn test_available_without_health_url_when_configured() {
        let backend = RemoteGpuBackend::new(
            "remote-gpu",
            Some("http://gpu.internal/decompile".to_string()),
            None,
        );
        assert!(backend.available().await);
    }

    #[tokio::test]
    async fn test_unreachable_health_url_means_unavailable() {
        // Health target that cannot resolve; the check must fail closed
        let backend = RemoteGpuBackend::new(
            "remote-gpu",
            Some("http://gpu.internal/decompile".to_string()),
            Some("http://nonexistent.invalid/health".to_string()),
        );
        assert!(!backend.available().await);
    }

    #[tokio::test]
    async fn test_managed_endpoint_derives_paths() {
        let backend = RemoteGpuBackend::new(
            "managed-gpu",
            Some("http://managed.example/decompile".to_string()),
            Some("http://managed.example/health".to_string()),
        );
        assert_eq!(backend.id(), "managed-gpu");
        assert_eq!(backend.tier(), BackendTier::RemoteGpu);
    }

    #[tokio::test]
    async fn test_generate_without_endpoint_is_unavailable_error() {
        let backend = RemoteGpuBackend::new("remote-gpu", None, None);
        let err = backend
            .generate("int f(void);", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)));
    }
}
