//! binlift-core: job orchestration for decompilation refinement
//!
//! Converts a submitted binary into reviewable source: the disassembly
//! adapter produces pseudo-C per function, the classifier prunes
//! library/runtime noise, and the refinement strategy rewrites what
//! remains. Jobs move through a monotonic state machine
//! (`pending → uploading → disassembling → analyzing → ai_refactoring →
//! completed`, with `failed` reachable anywhere) and expose status and
//! result snapshots to polling clients.

pub mod config;
pub mod disasm;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod store;

pub use config::CoreConfig;
pub use disasm::{Disassembler, MockDisassembler, RecoveredFunction, RecoveredMap};
pub use error::BinliftError;
pub use job::{combine_functions, FunctionRecord, Job, JobStatus};
pub use orchestrator::{JobOrchestrator, JobResultView, JobStatusView};
pub use store::{JobStore, MemoryJobStore};
