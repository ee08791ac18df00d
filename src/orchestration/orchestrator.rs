//! # Job Orchestrator
//!
//! Recursively drives execution of a job tree, aggregating per-node results
//! into an overall severity and a total executed-task count.
//!
//! One orchestrator instance exists per job-tree node and is not reused
//! across executions; child jobs get a fresh orchestrator each. The engine
//! carries no cancellation token and no timeout anywhere — a hung task or
//! child job blocks its parent indefinitely. Any watchdog lives outside this
//! subsystem.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use super::job::OrchestratedJob;
use super::throttler::ParallelTaskThrottler;
use super::types::{
    ExecutionOrder, ExecutionSummary, OrchestratedExecutionResult, ScheduledJobDetails,
};

/// Drives one node of a job tree.
pub struct JobOrchestrator {
    job: Arc<dyn OrchestratedJob>,
    details: ScheduledJobDetails,
    throttler: Arc<ParallelTaskThrottler>,
}

impl JobOrchestrator {
    /// Create an orchestrator for one job-tree node. The throttler is shared
    /// across the whole tree so that the task-concurrency bound holds
    /// system-wide.
    pub fn new(
        job: Arc<dyn OrchestratedJob>,
        details: ScheduledJobDetails,
        throttler: Arc<ParallelTaskThrottler>,
    ) -> Self {
        Self {
            job,
            details,
            throttler,
        }
    }

    pub fn details(&self) -> &ScheduledJobDetails {
        &self.details
    }

    /// Execute the job body: startup, then tasks and child jobs per the
    /// job's execution mode. Teardown is NOT chained here — the caller
    /// invokes [`JobOrchestrator::cleanup`] with the returned summary.
    #[instrument(skip(self), fields(job_id = %self.details.job_id, job_type = %self.details.job_type))]
    pub async fn execute(&self) -> ExecutionSummary {
        self.execute_node().await
    }

    /// Run teardown and fold its severity into the final reported result.
    /// A terminal teardown failure always wins; a non-terminal one is
    /// recorded unless the body already failed terminally.
    #[instrument(skip(self, execution), fields(job_id = %self.details.job_id, job_type = %self.details.job_type))]
    pub async fn cleanup(&self, execution: ExecutionSummary) -> ExecutionSummary {
        let teardown_result = self.job.tear_down(execution.result).await;
        if teardown_result.is_error() {
            warn!(
                teardown_result = %teardown_result,
                body_result = %execution.result,
                "Job teardown reported an error"
            );
        }

        ExecutionSummary::new(
            execution.result.combine(teardown_result),
            execution.tasks_executed,
        )
    }

    /// Boxed recursion point: synchronous child jobs recurse directly on the
    /// parent's worker, so the future type must not be self-referentially
    /// infinite.
    fn execute_node(&self) -> BoxFuture<'_, ExecutionSummary> {
        Box::pin(async move {
            let startup_result = self.job.start_up().await;
            if startup_result.is_error() {
                warn!(
                    startup_result = %startup_result,
                    "Job startup failed; skipping tasks and child jobs"
                );
                return ExecutionSummary::new(startup_result, 0);
            }

            let summary = if self.job.asynchronous() {
                self.execute_asynchronous().await
            } else {
                self.execute_synchronous().await
            };

            info!(
                result = %summary.result,
                tasks_executed = summary.tasks_executed,
                "Job execution completed"
            );
            crate::logging::log_job_operation(
                "execute",
                Some(self.details.job_id),
                Some(&self.details.job_type),
                &summary.result.to_string(),
                None,
            );

            summary
        })
    }

    /// Launch tasks and child jobs concurrently, then wait for everything.
    /// Once launched, no work item is skipped because a sibling failed.
    async fn execute_asynchronous(&self) -> ExecutionSummary {
        let tasks = self.job.tasks();
        let task_count = tasks.len();
        let child_jobs = self.job.child_jobs();

        debug!(
            task_count,
            child_count = child_jobs.len(),
            "Launching asynchronous job body"
        );

        let task_batch = self.throttler.run(tasks);

        let mut child_handles = FuturesUnordered::new();
        for child in child_jobs {
            let details = self.details.clone();
            let throttler = Arc::clone(&self.throttler);
            child_handles.push(tokio::spawn(async move {
                let orchestrator = JobOrchestrator::new(child, details, throttler);
                let execution = orchestrator.execute().await;
                orchestrator.cleanup(execution).await
            }));
        }

        let task_results = task_batch.await;
        let mut summary = ExecutionSummary::new(
            OrchestratedExecutionResult::aggregate(task_results),
            task_count,
        );

        while let Some(joined) = child_handles.next().await {
            match joined {
                Ok(child_summary) => summary = summary.fold(child_summary),
                Err(e) => {
                    error!(error = %e, "Child job work item panicked; recording terminal error");
                    summary = summary.fold(ExecutionSummary::new(
                        OrchestratedExecutionResult::TerminalError,
                        0,
                    ));
                }
            }
        }

        summary
    }

    /// Run the two phases in the configured order. The second phase is
    /// skipped only when the first aggregates to a terminal error; a
    /// non-terminal error is recorded and progression continues.
    async fn execute_synchronous(&self) -> ExecutionSummary {
        let first = match self.job.execution_order() {
            ExecutionOrder::TasksFirst => self.execute_tasks_sequentially().await,
            ExecutionOrder::ChildrenFirst => self.execute_children_sequentially().await,
        };

        if first.result.is_terminal() {
            warn!(
                tasks_executed = first.tasks_executed,
                "First synchronous phase failed terminally; skipping second phase"
            );
            return first;
        }

        let second = match self.job.execution_order() {
            ExecutionOrder::TasksFirst => self.execute_children_sequentially().await,
            ExecutionOrder::ChildrenFirst => self.execute_tasks_sequentially().await,
        };

        first.fold(second)
    }

    /// Tasks run strictly in sequence, stopping at the first terminal error
    /// (remaining tasks are skipped) and continuing past non-terminal ones.
    async fn execute_tasks_sequentially(&self) -> ExecutionSummary {
        let mut summary = ExecutionSummary::new(OrchestratedExecutionResult::Success, 0);

        for task in self.job.tasks() {
            let result = task.execute().await;
            summary = summary.fold(ExecutionSummary::new(result, 1));

            if result.is_terminal() {
                warn!(
                    task = task.name(),
                    "Task failed terminally; skipping remaining tasks in this job"
                );
                break;
            }
            if result.is_error() {
                debug!(
                    task = task.name(),
                    result = %result,
                    "Task reported non-terminal error; continuing"
                );
            }
        }

        summary
    }

    /// Child jobs run strictly in sequence with the same
    /// stop-on-terminal, continue-on-non-terminal policy as tasks.
    async fn execute_children_sequentially(&self) -> ExecutionSummary {
        let mut summary = ExecutionSummary::new(OrchestratedExecutionResult::Success, 0);

        for child in self.job.child_jobs() {
            let orchestrator = JobOrchestrator::new(
                child,
                self.details.clone(),
                Arc::clone(&self.throttler),
            );
            let execution = orchestrator.execute_node().await;
            let child_summary = orchestrator.cleanup(execution).await;
            let terminal = child_summary.result.is_terminal();
            summary = summary.fold(child_summary);

            if terminal {
                warn!("Child job failed terminally; skipping remaining child jobs");
                break;
            }
        }

        summary
    }
}

impl std::fmt::Debug for JobOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobOrchestrator")
            .field("job_id", &self.details.job_id)
            .field("job_type", &self.details.job_type)
            .finish()
    }
}
