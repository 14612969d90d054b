//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A job with this name is already pending. The existing job is untouched.
    #[error("job `{0}` already exists")]
    DuplicateJob(String),
    /// No pending job with this name: never scheduled, already executed, or
    /// already preempted.
    #[error("job `{0}` not found")]
    JobNotFound(String),
    /// The registry and the priority queues disagree on a job's location.
    /// This is an internal invariant breach, not a caller error; treat it as
    /// a defect requiring investigation.
    #[error("inconsistent state: job `{0}` registered but missing from its queue")]
    InconsistentState(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
