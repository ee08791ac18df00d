//! Structured error handling for the cardlink core.
//!
//! Malformed partner file data is never surfaced through these types — the
//! record layer reports it through validity flags and structured logs. These
//! errors cover programmer/configuration mistakes and infrastructure failures
//! (an unreadable stream, a misconfigured job type).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardlinkError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Orchestration error: {0}")]
    OrchestrationError(String),

    #[error("Unknown job type '{0}'")]
    UnknownJobType(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CardlinkError>;
