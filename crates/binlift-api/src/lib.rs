//! binlift API: REST endpoints over the job orchestrator
pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use binlift_core::JobOrchestrator;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_app(orchestrator: Arc<JobOrchestrator>) -> Router {
    Router::new()
        .route("/api/upload", post(handlers::upload))
        .route("/api/job/{job_id}", get(handlers::job_status))
        .route("/api/job/{job_id}/result", get(handlers::job_result))
        .route("/api/cleanup", post(handlers::cleanup))
        .route("/api/backends", get(handlers::list_backends))
        .route("/api/health", get(handlers::health))
        // Headroom over the file cap for multipart framing
        .layer(DefaultBodyLimit::max(handlers::MAX_UPLOAD_BYTES + 16 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(orchestrator)
}

pub async fn run(addr: &str, orchestrator: Arc<JobOrchestrator>) {
    let app = create_app(orchestrator);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("binlift API listening on {}", addr);
    axum::serve(listener, app).await.expect("Server error");
}
