//! Hosted-model backend
//!
//! Talks to a generateContent-style HTTP API. The same client serves two
//! roles: a full rewrite of raw decompiler output, and a lighter cleanup
//! pass over an already-refined function. Role selection changes the
//! prompt and the advertised tier, nothing else.

use crate::backend::{strip_code_fences, Backend, BackendError, BackendTier, GenerateOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const REWRITE_PROMPT: &str = "You are an expert reverse engineer. Rewrite the following \
decompiled pseudo-C into clean, idiomatic, readable C. Recover meaningful variable names, \
simplify control flow, and replace decompiler artifacts with standard types. Return only \
the C code, no explanation.";

const CLEANUP_PROMPT: &str = "Improve the readability of the following C function without \
changing its behavior: consistent formatting, clearer names where obvious, no commentary. \
Return only the C code.";

/// Which prompt this instance sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudTask {
    Rewrite,
    Cleanup,
}

/// Backend over a hosted generative API. Unavailable whenever no API key
/// is configured, which keeps the strategy from ever hitting the network
/// in key-less deployments.
pub struct CloudRewriteBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    task: CloudTask,
}

impl CloudRewriteBackend {
    pub fn new(api_key: Option<String>, task: CloudTask) -> Self {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, task)
    }

    pub fn with_endpoint(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        task: CloudTask,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            task,
        }
    }

    /// Read key and endpoint overrides from the environment.
    pub fn from_env(task: CloudTask) -> Self {
        let api_key = std::env::var("BINLIFT_CLOUD_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let base_url =
            std::env::var("BINLIFT_CLOUD_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("BINLIFT_CLOUD_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::with_endpoint(api_key, base_url, model, task)
    }

    fn prompt(&self) -> &'static str {
        match self.task {
            CloudTask::Rewrite => REWRITE_PROMPT,
            CloudTask::Cleanup => CLEANUP_PROMPT,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl Backend for CloudRewriteBackend {
    fn id(&self) -> &'static str {
        match self.task {
            CloudTask::Rewrite => "cloud-rewrite",
            CloudTask::Cleanup => "cloud-cleanup",
        }
    }

    fn tier(&self) -> BackendTier {
        match self.task {
            CloudTask::Rewrite => BackendTier::CloudRewrite,
            CloudTask::Cleanup => BackendTier::Cleanup,
        }
    }

    async fn available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, text: &str, opts: &GenerateOptions) -> Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::Unavailable("no API key configured".to_string()))?;

        let prompt = format!("{}\n\n```c\n{}\n```", self.prompt(), text);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: opts.temperature,
                max_output_tokens: opts.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
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

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| BackendError::BadResponse("empty candidate list".to_string()))?;

        Ok(strip_code_fences(text))
    }
}
