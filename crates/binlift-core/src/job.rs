//! Job data model
//!
//! A `Job` tracks one submitted binary through the processing state
//! machine. Jobs are owned by the orchestrator: created on submission,
//! mutated only by the processing routine, read by status/result queries.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle states for a decompilation job.
///
/// Transitions are monotonic: a job never moves backward, and `Completed`
/// and `Failed` are terminal. `Failed` is reachable from any non-terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Uploading,
    Disassembling,
    Analyzing,
    AiRefactoring,
    Completed,
    Failed,
}

impl JobStatus {
    /// Position in the forward progression. `Failed` ranks above every
    /// non-terminal state so the failure transition is always allowed.
    pub fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Uploading => 1,
            JobStatus::Disassembling => 2,
            JobStatus::Analyzing => 3,
            JobStatus::AiRefactoring => 4,
            JobStatus::Completed => 5,
            JobStatus::Failed => 6,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Mapping of recovered function name to pseudo-source text.
pub type FunctionMap = BTreeMap<String, String>;

/// One recovered function in a job result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub raw_code: String,
    pub refined_code: Option<String>,
}

/// A single decompilation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    /// Free-text description of the current stage, shown to polling clients.
    pub stage: String,
    /// 0-100, non-decreasing.
    pub progress: u8,
    /// Timestamped human-readable log lines, in order.
    pub logs: Vec<String>,
    pub error: Option<String>,
    pub raw_functions: FunctionMap,
    pub refined_functions: FunctionMap,
    pub created_at: chrono::DateTime<Utc>,
}

impl Job {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            stage: "Queued".to_string(),
            progress: 0,
            logs: Vec::new(),
            error: None,
            raw_functions: BTreeMap::new(),
            refined_functions: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a timestamped log line.
    pub fn log(&mut self, message: impl Into<String>) {
        let line = format!("[{}] {}", Utc::now().format("%H:%M:%S"), message.into());
        self.logs.push(line);
    }

    /// Move the job forward. Backward status transitions are ignored and
    /// progress is clamped to be non-decreasing.
    pub fn transition(&mut self, status: JobStatus, stage: impl Into<String>, progress: u8) {
        if status.rank() < self.status.rank() {
            return;
        }
        self.status = status;
        self.stage = stage.into();
        self.progress = self.progress.max(progress.min(100));
    }

    /// Record a terminal failure.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = JobStatus::Failed;
        self.stage = "Failed".to_string();
        self.error = Some(message.clone());
        self.log(format!("[!] Error: {}", message));
    }

    /// Per-function result records, keyed off the raw map.
    pub fn function_records(&self) -> Vec<FunctionRecord> {
        self.raw_functions
            .iter()
            .map(|(name, raw)| FunctionRecord {
                name: name.clone(),
                raw_code: raw.clone(),
                refined_code: self.refined_functions.get(name).cloned(),
            })
            .collect()
    }
}

/// Join a function map into one reviewable source text, each function
/// prefixed with a `// Function:` header.
pub fn combine_functions(functions: &FunctionMap) -> String {
    functions
        .iter()
        .map(|(name, code)| format!("// Function: {}\n{}", name, code))
        .collect::<Vec<_>>()
        .join("\n\n")
}
