//! Job orchestrator
//!
//! Owns the end-to-end state machine per submitted binary:
//! disassembly → classification → refinement → completion. Submission
//! returns immediately; processing runs on a spawned task. Functions
//! within one job are refined strictly sequentially so progress advances
//! smoothly and downstream backends are not fanned out against.

use crate::config::CoreConfig;
use crate::disasm::{Disassembler, RecoveredMap};
use crate::error::BinliftError;
use crate::job::{combine_functions, FunctionRecord, Job, JobStatus};
use crate::store::JobStore;
use binlift_classify::{ClassifierConfig, FunctionClassifier, FunctionFacts};
use binlift_refine::{Mode, RefineStrategy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Status snapshot returned to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub stage: String,
    pub progress: u8,
    pub logs: Vec<String>,
    pub error: Option<String>,
}

/// Full result for a terminal job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub functions: Vec<FunctionRecord>,
    pub raw_combined: String,
    pub refined_combined: String,
    pub error: Option<String>,
}

/// Drives every job from upload to completion.
pub struct JobOrchestrator {
    store: Arc<dyn JobStore>,
    disassembler: Arc<dyn Disassembler>,
    strategy: Arc<RefineStrategy>,
    classifier: FunctionClassifier,
    config: CoreConfig,
}

impl JobOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        disassembler: Arc<dyn Disassembler>,
        strategy: Arc<RefineStrategy>,
        config: CoreConfig,
    ) -> Self {
        let classifier = FunctionClassifier::new(ClassifierConfig {
            skip_auto_named: config.skip_auto_named,
            min_auto_size: config.min_auto_size,
            min_size_floor: config.min_size_floor,
        });
        Self {
            store,
            disassembler,
            strategy,
            classifier,
            config,
        }
    }

    pub fn strategy(&self) -> &RefineStrategy {
        &self.strategy
    }

    /// Accept an uploaded binary and schedule processing. Returns the job
    /// token without waiting for any work to happen.
    pub async fn submit(
        self: &Arc<Self>,
        content: &[u8],
        filename: &str,
        mode: Mode,
    ) -> Result<Uuid, BinliftError> {
        let job_id = Uuid::new_v4();

        // Client-supplied names are untrusted; keep only the final component
        let filename = std::path::Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let file_path = self.config.temp_dir.join(format!("{}_{}", job_id, filename));
        tokio::fs::write(&file_path, content).await?;

        let mut job = Job::new(job_id);
        job.transition(JobStatus::Uploading, "Uploading binary...", 5);
        job.log(format!("[*] File received: {}", filename));
        job.log(format!("[*] Size: {} bytes", content.len()));
        job.log(format!("[*] Mode: {}", mode));
        self.store.put(job);

        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            orchestrator.process(job_id, file_path, mode).await;
        });

        Ok(job_id)
    }

    pub fn get_status(&self, job_id: &Uuid) -> Result<JobStatusView, BinliftError> {
        let job = self.store.get(job_id).ok_or(BinliftError::NotFound)?;
        Ok(JobStatusView {
            job_id: *job_id,
            status: job.status,
            stage: job.stage,
            progress: job.progress,
            logs: job.logs,
            error: job.error,
        })
    }

    pub fn get_result(&self, job_id: &Uuid) -> Result<JobResultView, BinliftError> {
        let job = self.store.get(job_id).ok_or(BinliftError::NotFound)?;
        if !job.status.is_terminal() {
            return Err(BinliftError::NotReady);
        }
        Ok(JobResultView {
            job_id: *job_id,
            status: job.status,
            functions: job.function_records(),
            raw_combined: combine_functions(&job.raw_functions),
            refined_combined: combine_functions(&job.refined_functions),
            error: job.error,
        })
    }

    /// Processing routine for one job. The pipeline runs on a child task so
    /// a panic inside it is observed as a join error rather than silently
    /// killing the job; the temp binary is removed unconditionally on exit,
    /// and any error or panic lands in the job's terminal state.
    async fn process(self: Arc<Self>, job_id: Uuid, file_path: PathBuf, mode: Mode) {
        let runner = Arc::clone(&self);
        let pipeline_path = file_path.clone();
        let outcome = tokio::spawn(async move {
            runner.run_pipeline(job_id, &pipeline_path, mode).await
        })
        .await;

        if let Err(e) = tokio::fs::remove_file(&file_path).await {
            tracing::debug!(job_id = %job_id, "temp file cleanup: {}", e);
        }

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(job_id = %job_id, "job failed: {}", e);
                self.update(&job_id, |job| job.fail(e.to_string()));
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, "processing task panicked: {}", e);
                self.update(&job_id, |job| {
                    job.fail(format!("processing aborted unexpectedly: {}", e))
                });
            }
        }
    }

    async fn run_pipeline(
        &self,
        job_id: Uuid,
        file_path: &PathBuf,
        mode: Mode,
    ) -> Result<(), BinliftError> {
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.update(&job_id, |job| {
            job.transition(JobStatus::Disassembling, "Disassembling binary...", 10);
            job.log("[*] Starting disassembly...");
            job.log(format!("[*] Loading binary: {}", filename));
            job.log(format!("[*] Refinement mode: {}", mode));
        });

        let recovered = self.disassembler.disassemble(file_path, job_id).await?;

        self.update(&job_id, |job| {
            job.log(format!("[+] Found {} functions", recovered.len()));
            for name in recovered.keys().take(10) {
                job.log(format!("    - {}", name));
            }
            if recovered.len() > 10 {
                job.log(format!("    ... and {} more", recovered.len() - 10));
            }
            job.transition(JobStatus::Analyzing, "Analyzing control flow...", 40);
            job.log("[*] Analyzing control flow graphs...");
            job.log("[*] Identifying function boundaries...");
        });

        let retained = self.classify(&job_id, &recovered);

        self.update(&job_id, |job| {
            for (name, function) in &recovered {
                job.raw_functions
                    .insert(name.clone(), function.code.clone());
            }
        });

        let candidates = self.rank_and_cap(&job_id, retained);
        let total = candidates.len();

        self.update(&job_id, |job| {
            job.transition(JobStatus::AiRefactoring, "AI refactoring code...", 60);
            job.log("[*] Starting AI refinement...");
        });

        for (i, (name, code)) in candidates.into_iter().enumerate() {
            let progress = 60 + ((i * 35) / total.max(1)) as u8;
            self.update(&job_id, |job| {
                job.log(format!("[*] Processing function: {}", name));
                job.transition(
                    JobStatus::AiRefactoring,
                    format!("Refactoring {}...", name),
                    progress,
                );
            });

            let refined = self.strategy.refine(&name, &code, mode).await;

            self.update(&job_id, |job| {
                job.refined_functions.insert(name.clone(), refined.clone());
                job.log(format!("[+] Completed: {}", name));
            });
        }

        self.update(&job_id, |job| {
            job.transition(JobStatus::Completed, "Completed!", 100);
            job.log("[+] Decompilation and refinement complete!");
            job.log(format!("[+] Refined {} functions", total));
        });

        Ok(())
    }

    /// Run the classifier over every recovered function, logging rejects.
    /// Returns retained (name, code) pairs in map order.
    fn classify(&self, job_id: &Uuid, recovered: &RecoveredMap) -> Vec<(String, String)> {
        let mut retained = Vec::new();
        let mut rejected = 0usize;

        for (name, function) in recovered {
            let facts = FunctionFacts {
                name,
                is_external: function.is_external,
                is_thunk: function.is_thunk,
                byte_size: function.byte_size,
                body: Some(&function.code),
            };
            let decision = self.classifier.classify(&facts);
            if decision.retain {
                retained.push((name.clone(), function.code.clone()));
            } else {
                rejected += 1;
                tracing::debug!(job_id = %job_id, name = %name, rule = decision.rule, "rejected");
            }
        }

        if rejected > 0 {
            self.update(job_id, |job| {
                job.log(format!(
                    "[*] Classifier retained {} of {} functions ({} library/runtime noise)",
                    retained.len(),
                    retained.len() + rejected,
                    rejected
                ));
            });
        }

        retained
    }

    /// Rank candidates (entry-point-ish names first, original order within
    /// each group) and cap at the configured per-job limit.
    fn rank_and_cap(
        &self,
        job_id: &Uuid,
        candidates: Vec<(String, String)>,
    ) -> Vec<(String, String)> {
        let (mut priority, others): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|(name, _)| {
                let lower = name.to_lowercase();
                ["main", "entry", "start"].iter().any(|p| lower.contains(p))
            });
        priority.extend(others);

        let total = priority.len();
        priority.truncate(self.config.max_functions);

        let skipped = total - priority.len();
        if skipped > 0 {
            let kept = priority.len();
            self.update(job_id, |job| {
                job.log(format!(
                    "[*] Processing {} functions (skipping {} for speed)",
                    kept, skipped
                ));
            });
        }

        priority
    }

    fn update(&self, job_id: &Uuid, f: impl FnOnce(&mut Job)) {
        let mut f = Some(f);
        self.store.update(job_id, &mut |job| {
            if let Some(f) = f.take() {
                f(job);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disasm::MockDisassembler;
    use crate::store::MemoryJobStore;
    use binlift_refine::BackendRegistry;
    use binlift_quality::QualityGate;

    fn orchestrator() -> Arc<JobOrchestrator> {
        let strategy = Arc::new(RefineStrategy::new(
            BackendRegistry::default(),
            QualityGate::new(),
        ));
        Arc::new(JobOrchestrator::new(
            Arc::new(MemoryJobStore::new()),
            Arc::new(MockDisassembler),
            strategy,
            CoreConfig {
                temp_dir: std::env::temp_dir().join("binlift-orch-tests"),
                ..CoreConfig::default()
            },
        ))
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let orch = orchestrator();
        assert!(matches!(
            orch.get_status(&Uuid::new_v4()),
            Err(BinliftError::NotFound)
        ));
        assert!(matches!(
            orch.get_result(&Uuid::new_v4()),
            Err(BinliftError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_result_before_completion_is_not_ready() {
        let orch = orchestrator();
        let id = Uuid::new_v4();
        orch.store.put(Job::new(id));
        assert!(matches!(orch.get_result(&id), Err(BinliftError::NotReady)));
    }

    #[test]
    fn test_rank_puts_entry_points_first() {
        let orch = orchestrator();
        let candidates = vec![
            ("FUN_00401100".to_string(), String::new()),
            ("main".to_string(), String::new()),
            ("FUN_00401200".to_string(), String::new()),
            ("_start".to_string(), String::new()),
        ];
        let ranked = orch.rank_and_cap(&Uuid::new_v4(), candidates);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["main", "_start", "FUN_00401100", "FUN_00401200"]);
    }
}
