//! binlift-refine: tiered refinement of decompiled functions
//!
//! A `RefineStrategy` walks an ordered set of backends (hosted model, GPU
//! inference service, local deterministic transform, cleanup pass) and
//! gates every generation through binlift-quality. The strategy never
//! errors; the worst case for any function is its input text unchanged.

pub mod backend;
pub mod cloud;
pub mod local;
pub mod remote;
pub mod strategy;

pub use backend::{Backend, BackendDescriptor, BackendError, BackendTier, GenerateOptions};
pub use cloud::{CloudRewriteBackend, CloudTask};
pub use local::MockTransformBackend;
pub use remote::RemoteGpuBackend;
pub use strategy::{BackendRegistry, Mode, RefineStrategy};
