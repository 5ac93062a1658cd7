//! Binary entrypoint for the binlift API server.
use binlift_core::{CoreConfig, JobOrchestrator, MemoryJobStore, MockDisassembler};
use binlift_quality::QualityGate;
use binlift_refine::{BackendRegistry, RefineStrategy};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let strategy = Arc::new(RefineStrategy::new(
        BackendRegistry::from_env(),
        QualityGate::new(),
    ));
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::new(MemoryJobStore::new()),
        Arc::new(MockDisassembler),
        strategy,
        CoreConfig::from_env(),
    ));

    // Default listen address can be overridden with BINLIFT_ADDR
    let addr = std::env::var("BINLIFT_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
    binlift_api::run(&addr, orchestrator).await;
}
