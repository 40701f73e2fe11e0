//! Per-sprite-set jobs and the worker pool that runs them.

pub mod job;
pub mod orchestrator;

pub use job::{JobOutcome, run_job};
pub use orchestrator::{BatchReport, FailurePolicy, pack, run_batch};
