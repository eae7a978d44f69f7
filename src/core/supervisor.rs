//! Execution collaborator seam: launching jobs and polling their liveness.

use async_trait::async_trait;

use super::{JobDescriptor, SchedulerError};

/// Starts jobs out of process and checks on them without blocking.
///
/// The scheduling loop owns the launcher and every handle it returns. A handle
/// is polled until it reports an exit code, then passed to
/// [`JobLauncher::finalize`] exactly once, which consumes it.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use sim_batch_scheduler::core::{JobDescriptor, JobLauncher, SchedulerError};
///
/// struct Instant;
///
/// #[async_trait]
/// impl JobLauncher for Instant {
///     type Handle = i32;
///
///     async fn launch(&mut self, _job: &JobDescriptor, _log_name: &str) -> Result<i32, SchedulerError> {
///         Ok(0)
///     }
///
///     fn poll(&mut self, _job: &JobDescriptor, handle: &mut i32) -> Result<Option<i32>, SchedulerError> {
///         Ok(Some(*handle))
///     }
///
///     fn finalize(&mut self, _job: &JobDescriptor, _handle: i32) {}
/// }
/// ```
#[async_trait]
pub trait JobLauncher: Send {
    /// Supervisor-owned state for one running job (process and log sink).
    type Handle: Send;

    /// Create a fresh log sink named `log_name` and start `job`. Returns without
    /// waiting for the job to make progress.
    async fn launch(
        &mut self,
        job: &JobDescriptor,
        log_name: &str,
    ) -> Result<Self::Handle, SchedulerError>;

    /// Non-blocking liveness check. `None` while the job runs, its exit code after.
    fn poll(
        &mut self,
        job: &JobDescriptor,
        handle: &mut Self::Handle,
    ) -> Result<Option<i32>, SchedulerError>;

    /// Release the job's log sink once `poll` has reported completion.
    fn finalize(&mut self, job: &JobDescriptor, handle: Self::Handle);
}
