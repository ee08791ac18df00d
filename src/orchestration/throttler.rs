//! # Parallel Task Throttler
//!
//! Caps the number of concurrently executing orchestrated tasks, independent
//! of which job submitted them. One throttler instance is shared by every
//! orchestrator in a job tree (explicit `Arc` sharing — constructed once by
//! the scheduler wiring and injected, never an ambient global).

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, error, instrument};

use crate::config::CardlinkConfig;

use super::task::OrchestratedTask;
use super::types::OrchestratedExecutionResult;

/// Bounded-concurrency gate for task execution.
///
/// The bound is fixed for the lifetime of the instance. Child-job fan-out is
/// not throttled here — only task bodies count against the bound.
pub struct ParallelTaskThrottler {
    semaphore: Arc<Semaphore>,
    max_parallelism: usize,
}

impl ParallelTaskThrottler {
    /// Create a throttler with an explicit concurrency bound.
    pub fn new(max_parallelism: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_parallelism)),
            max_parallelism,
        }
    }

    /// Create a throttler sized from configuration. An absent or unparsable
    /// setting falls back to the stock bound of 10.
    pub fn from_config() -> Self {
        Self::new(CardlinkConfig::max_concurrent_tasks_or_default())
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    /// Number of currently free concurrency slots.
    pub fn available_capacity(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run a batch of tasks under the shared bound.
    ///
    /// Each task waits for a free slot, executes on its own worker, and
    /// releases the slot unconditionally when it finishes or panics. Returns
    /// one result per submitted task, in completion order (not submission
    /// order). The call blocks until every task in the batch has completed;
    /// concurrently submitted batches share the same bound.
    #[instrument(skip(self, tasks), fields(task_count = tasks.len(), bound = self.max_parallelism))]
    pub async fn run(
        &self,
        tasks: Vec<Arc<dyn OrchestratedTask>>,
    ) -> Vec<OrchestratedExecutionResult> {
        if tasks.is_empty() {
            return Vec::new();
        }

        debug!(task_count = tasks.len(), "Submitting task batch to throttler");

        let mut handles = FuturesUnordered::new();
        for task in tasks {
            let semaphore = Arc::clone(&self.semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        // Only possible if the semaphore were closed, which
                        // this type never does.
                        error!(error = %e, "Task throttler semaphore closed");
                        return OrchestratedExecutionResult::TerminalError;
                    }
                };
                task.execute().await
                // permit dropped here, releasing the slot before the result
                // is observed by the collector
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        while let Some(joined) = handles.next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    crate::logging::log_error(
                        "ParallelTaskThrottler",
                        "run",
                        &e.to_string(),
                        Some("task panicked; recording terminal error"),
                    );
                    results.push(OrchestratedExecutionResult::TerminalError);
                }
            }
        }

        results
    }
}

impl std::fmt::Debug for ParallelTaskThrottler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelTaskThrottler")
            .field("max_parallelism", &self.max_parallelism)
            .field("available_capacity", &self.available_capacity())
            .finish()
    }
}
