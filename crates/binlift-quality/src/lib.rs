//! binlift-quality: output quality gate for generative backends
//!
//! Text-generation backends degrade in recognizable ways: hallucination
//! artifacts, repetition loops, single-line walls of code. This crate
//! detects and repairs those failure modes before output reaches a user.
//!
//! # Example
//!
//! ```
//! use binlift_quality::{QualityGate, GateVerdict};
//!
//! let gate = QualityGate::new();
//! let outcome = gate.apply("!!!", "int main(void) { return 0; }");
//! assert_eq!(outcome.verdict, GateVerdict::Rejected);
//! ```

pub mod format;
pub mod garble;
pub mod gate;
pub mod repetition;

pub use format::format_code;
pub use garble::is_garbled;
pub use gate::{GateOutcome, GateVerdict, QualityGate};
pub use repetition::detrepeat;
