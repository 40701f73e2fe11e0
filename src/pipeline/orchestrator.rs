use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::config::PackConfig;
use crate::encode::{ImageCodec, PngCodec};
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::pipeline::job::{JobOutcome, run_job};
use crate::source::{FrameSource, SpriteSet};

/// What the batch does once a job has failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep running every remaining job; report the first failure at the end.
    #[default]
    DrainAll,
    /// Stop starting new jobs once a failure is recorded. Jobs already running still finish.
    StopScheduling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Jobs never started because of [`FailurePolicy::StopScheduling`].
    pub not_started: usize,
}

#[derive(Default)]
struct Tally {
    done: AtomicUsize,
    written: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    not_started: AtomicUsize,
}

/// Read every sprite set from `source`, then pack them all with the PNG codec.
///
/// A source failure aborts before any job is scheduled.
pub fn pack(cfg: &PackConfig, source: &dyn FrameSource) -> SpritePackResult<BatchReport> {
    cfg.validate()?;
    let sets = source.read_sprite_sets()?;
    run_batch(&sets, &PngCodec::new(cfg.compression), cfg)
}

/// Run every sprite set through [`run_job`] on a pool of `cfg.worker_count()` threads.
///
/// Each worker takes one sprite set at a time. The first job error (in completion order) is
/// kept and returned once all workers are done, wrapped as [`SpritePackError::Job`].
pub fn run_batch(
    sets: &[SpriteSet],
    codec: &dyn ImageCodec,
    cfg: &PackConfig,
) -> SpritePackResult<BatchReport> {
    cfg.validate()?;
    let pool = build_thread_pool(cfg.worker_count())?;

    let total = sets.len();
    let tally = Tally::default();
    let first_error = Mutex::new(None::<SpritePackError>);
    let stop = AtomicBool::new(false);

    tracing::info!(total, workers = pool.current_num_threads(), "packing sprite sets");

    pool.install(|| {
        sets.par_iter().with_max_len(1).for_each(|set| {
            if cfg.failure_policy == FailurePolicy::StopScheduling && stop.load(Ordering::Acquire)
            {
                tally.not_started.fetch_add(1, Ordering::Relaxed);
                return;
            }

            let result = run_job(set, codec, cfg);
            let done = tally.done.fetch_add(1, Ordering::Relaxed) + 1;
            match result {
                Ok(JobOutcome::Written { path, frames }) => {
                    tally.written.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(done, total, frames, path = %path.display(), "wrote sprite set");
                }
                Ok(JobOutcome::Skipped) => {
                    tally.skipped.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(done, total, sprite_set = set.index, "skipped empty sprite set");
                }
                Err(e) => {
                    tally.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(done, total, sprite_set = set.index, error = %e, "job failed");
                    stop.store(true, Ordering::Release);
                    let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.is_none() {
                        *slot = Some(e.in_job(set.index));
                    }
                }
            }
        });
    });

    if let Some(err) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(err);
    }

    Ok(BatchReport {
        total,
        written: tally.written.into_inner(),
        skipped: tally.skipped.into_inner(),
        failed: tally.failed.into_inner(),
        not_started: tally.not_started.into_inner(),
    })
}

fn build_thread_pool(threads: usize) -> SpritePackResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("spritepack-worker-{i}"))
        .build()
        .map_err(|e| SpritePackError::validation(format!("failed to build worker pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
