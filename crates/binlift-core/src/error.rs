//! Unified error model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinliftError {
    /// The disassembly engine errored or timed out.
    #[error("ADAPTER/{0}")]
    AdapterFailure(String),

    /// A refinement backend is unreachable, unauthenticated, or mis-configured.
    #[error("BACKEND/{0}")]
    BackendUnavailable(String),

    /// Generated output failed the quality gate.
    #[error("QUALITY/{0}")]
    QualityRejected(String),

    /// Unknown job token.
    #[error("JOB/not found")]
    NotFound,

    /// Result requested before the job reached a terminal state.
    #[error("JOB/still processing")]
    NotReady,

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),

    #[error("INTERNAL/{0}")]
    Internal(String),
}
