//! # Orchestration Engine
//!
//! Recursive job-tree execution with aggregated error-severity propagation
//! and bounded task parallelism.
//!
//! ## Core Components
//!
//! - **JobOrchestrator**: drives one job-tree node; recursion creates a
//!   fresh orchestrator per child job
//! - **OrchestratedJob / OrchestratedTask**: the composable units of
//!   scheduled batch work
//! - **ParallelTaskThrottler**: shared bounded-concurrency gate for task
//!   execution across the whole tree
//! - **JobOrchestratorFactory**: dispatches persisted job-type
//!   discriminators to registered job builders
//!
//! ## Execution Model
//!
//! Each node runs `start_up`, then its body (concurrent in asynchronous
//! mode, two ordered sequential phases in synchronous mode), then
//! `tear_down` via the caller-invoked `cleanup`. Severities aggregate
//! bottom-up by maximum under `Success < NonTerminalError < TerminalError`;
//! a terminal error halts synchronous sibling progression, a non-terminal
//! error is recorded and execution continues.

pub mod factory;
pub mod job;
pub mod orchestrator;
pub mod task;
pub mod throttler;
pub mod types;

pub use factory::{JobBuilder, JobOrchestratorFactory};
pub use job::OrchestratedJob;
pub use orchestrator::JobOrchestrator;
pub use task::OrchestratedTask;
pub use throttler::ParallelTaskThrottler;
pub use types::{
    ExecutionOrder, ExecutionSummary, OrchestratedExecutionResult, ScheduledJobDetails,
};
