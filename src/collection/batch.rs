//! Bounded parallel batches
//!
//! Each store owns a rayon pool sized to its concurrency limit. A batch
//! maps every input to its result on that pool; the indexed collect puts
//! result `i` at position `i` whatever order the units finish in.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use super::errors::{CollectionError, CollectionResult};

/// Build the worker pool for one collection.
pub(crate) fn build_pool(collection: &str, max_concurrency: usize) -> CollectionResult<ThreadPool> {
    let prefix = collection.to_string();
    ThreadPoolBuilder::new()
        .num_threads(max_concurrency)
        .thread_name(move |i| format!("{}-batch-{}", prefix, i))
        .build()
        .map_err(|e| {
            CollectionError::Configuration(format!(
                "failed to start batch pool for '{}': {}",
                collection, e
            ))
        })
}

/// Run `op` over every input on `pool`.
///
/// Blocks until every unit has finished. Returns results in input order,
/// or the error of the lowest failing input index. Once any unit fails,
/// units not yet started are skipped. A panicking unit fails the batch
/// with `WorkerPanicked`.
pub(crate) fn run_batch<I, T, F>(pool: &ThreadPool, inputs: Vec<I>, op: F) -> CollectionResult<Vec<T>>
where
    I: Send,
    T: Send,
    F: Fn(I) -> CollectionResult<T> + Sync,
{
    let len = inputs.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    debug!(count = len, workers = pool.current_num_threads().min(len), "batch started");

    let failed = AtomicBool::new(false);
    let slots: Vec<Option<CollectionResult<T>>> = pool.install(|| {
        inputs
            .into_par_iter()
            .map(|input| {
                if failed.load(Ordering::Acquire) {
                    return None;
                }
                let result = panic::catch_unwind(AssertUnwindSafe(|| op(input)))
                    .unwrap_or_else(|_| Err(CollectionError::WorkerPanicked));
                if result.is_err() {
                    failed.store(true, Ordering::Release);
                }
                Some(result)
            })
            .collect()
    });

    let first_failure = slots.iter().position(|slot| matches!(slot, Some(Err(_))));
    if let Some(index) = first_failure {
        if let Some(Some(Err(err))) = slots.into_iter().nth(index) {
            warn!(count = len, index, code = err.code(), "batch failed");
            return Err(err);
        }
        return Err(CollectionError::Internal("batch failure slot vanished".into()));
    }

    debug!(count = len, "batch finished");
    slots
        .into_iter()
        .map(|slot| {
            // Skipped slots only exist after a recorded failure.
            slot.unwrap_or_else(|| Err(CollectionError::Internal("batch slot left empty".into())))
        })
        .collect()
}
