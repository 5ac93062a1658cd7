//! API Handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use binlift_core::{BinliftError, JobOrchestrator, JobResultView, JobStatusView};
use binlift_refine::Mode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Hard cap on uploaded binary size.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Error envelope matching the rest of the JSON surface.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<BinliftError> for ApiError {
    fn from(e: BinliftError) -> Self {
        let status = match e {
            BinliftError::NotFound => StatusCode::NOT_FOUND,
            BinliftError::NotReady => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: e.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub status: &'static str,
}

/// PE starts with "MZ", ELF with 0x7f "ELF".
fn is_supported_binary(content: &[u8]) -> bool {
    content.starts_with(b"MZ") || content.starts_with(b"\x7fELF")
}

pub async fn upload(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.bin")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read file field: {}", e)))?;
            file = Some((filename, data.to_vec()));
        }
    }

    let (filename, content) = file.ok_or_else(|| ApiError::bad_request("missing file field"))?;

    if content.is_empty() {
        return Err(ApiError::bad_request("empty file"));
    }
    if content.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: format!("file exceeds {} byte limit", MAX_UPLOAD_BYTES),
        });
    }
    if !is_supported_binary(&content) {
        return Err(ApiError::bad_request("not a valid PE or ELF binary"));
    }

    let mode = params.mode.unwrap_or_default();
    let job_id = orchestrator.submit(&content, &filename, mode).await?;

    Ok(Json(UploadResponse {
        job_id,
        status: "pending",
    }))
}

pub async fn job_status(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusView>, ApiError> {
    Ok(Json(orchestrator.get_status(&job_id)?))
}

pub async fn job_result(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResultView>, ApiError> {
    Ok(Json(orchestrator.get_result(&job_id)?))
}

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub code: String,
    #[serde(default)]
    pub function_name: Option<String>,
}

/// One-off readability pass over already-decompiled code, outside any job.
pub async fn cleanup(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.code.is_empty() {
        return Err(ApiError::bad_request("no code provided"));
    }

    let name = request.function_name.as_deref().unwrap_or("function");
    match orchestrator
        .strategy()
        .cleanup_only(name, &request.code)
        .await
    {
        Some(cleaned) => Ok(Json(json!({
            "original_code": request.code,
            "cleaned_code": cleaned,
            "function_name": request.function_name,
        }))),
        None => Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: "no cleanup backend configured".to_string(),
        }),
    }
}

pub async fn list_backends(
    State(orchestrator): State<Arc<JobOrchestrator>>,
) -> Json<Value> {
    let backends = orchestrator.strategy().registry().descriptors().await;
    Json(json!({ "backends": backends }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
