#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cardlink Core
//!
//! Rust core for a card-linked-offers commerce backend: the orchestrated
//! batch-job execution engine and the partner file-record marshaling layer.
//!
//! ## Overview
//!
//! Scheduled infrastructure hands a persisted job-details record to the
//! [`orchestration::JobOrchestratorFactory`]; the factory builds a job tree
//! and wraps it in a [`orchestration::JobOrchestrator`], which drives tasks
//! and nested child jobs to completion with aggregated error-severity
//! propagation and a shared bound on task parallelism. Separately, the
//! [`records`] layer decodes and encodes the multi-megabyte daily
//! settlement and merchant files exchanged with payment-network partners.
//!
//! Partner network clients, file transfer, and persistence are external
//! collaborators consumed behind interfaces; they are not implemented here.
//!
//! ## Module Organization
//!
//! - [`orchestration`] - Job trees, tasks, throttled parallel execution
//! - [`records`] - Fixed-width record codecs and file parsers/builders
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured tracing setup and log helpers
//!
//! ## Error Model
//!
//! Job and task failures travel as the tri-state
//! [`orchestration::OrchestratedExecutionResult`]; malformed partner data is
//! reported through validity flags and structured warnings, never panics;
//! `Result` errors are reserved for configuration mistakes and unreadable
//! streams.

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod records;

pub use config::CardlinkConfig;
pub use error::{CardlinkError, Result};
pub use orchestration::{
    ExecutionOrder, ExecutionSummary, JobBuilder, JobOrchestrator, JobOrchestratorFactory,
    OrchestratedExecutionResult, OrchestratedJob, OrchestratedTask, ParallelTaskThrottler,
    ScheduledJobDetails,
};
pub use records::{
    ClearingFile, ClearingFileParser, FilteringFileBuilder, FilteringRecord, Merchant,
    RewardNetworkFileParser,
};
