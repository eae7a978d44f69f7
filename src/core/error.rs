//! Error types for scheduler operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Validation variants are raised before any job is launched. Supervisor
/// variants (`Launch`, `Poll`) stop the scheduling loop immediately.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A job source carries no `max_threads` declaration.
    #[error("max_threads not set in {job}")]
    MissingThreadDeclaration {
        /// Job name.
        job: String,
    },
    /// A job declares a thread count that is zero or out of range.
    #[error("invalid max_threads value `{value}` in {job}")]
    InvalidThreadDeclaration {
        /// Job name.
        job: String,
        /// Raw declared value.
        value: String,
    },
    /// A job requires more threads than the whole batch budget.
    #[error(
        "job {job} requires {required} threads, which is more than the total available ({budget})"
    )]
    CapacityUnsatisfiable {
        /// Job name.
        job: String,
        /// Threads the job declares.
        required: u32,
        /// Total thread budget of the run.
        budget: u32,
    },
    /// The execution collaborator failed to start a job.
    #[error("failed to launch {job}: {source}")]
    Launch {
        /// Job name.
        job: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A liveness check on a running job failed.
    #[error("failed to poll {job}: {source}")]
    Poll {
        /// Job name.
        job: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A ledger state change that the job lifecycle does not allow.
    #[error("invalid transition for {job}: {from} -> {to}")]
    InvalidTransition {
        /// Job name.
        job: String,
        /// State the job was in.
        from: &'static str,
        /// State that was requested.
        to: &'static str,
    },
    /// Filesystem failure outside of a job's own execution.
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SchedulerError {
    /// Build an [`SchedulerError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is raised during pre-scheduling validation.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingThreadDeclaration { .. }
                | Self::InvalidThreadDeclaration { .. }
                | Self::CapacityUnsatisfiable { .. }
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
