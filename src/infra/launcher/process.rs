//! Launcher running each job as a child process with a per-job log file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::core::{JobDescriptor, JobLauncher, SchedulerError};

/// Runs `<executable> <job source> <args...>` with stdout and stderr sent to a log file.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    executable: PathBuf,
    args: Vec<String>,
    log_dir: PathBuf,
}

/// A running child process and the log file it writes to.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    log: fs::File,
    log_path: PathBuf,
}

impl ProcessHandle {
    /// Path of the job's log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl ProcessLauncher {
    /// Create a launcher after checking that `executable` can be run.
    pub fn new(
        executable: impl Into<PathBuf>,
        args: Vec<String>,
        log_dir: impl Into<PathBuf>,
    ) -> Result<Self, SchedulerError> {
        let executable = executable.into();
        check_executable(&executable)?;
        Ok(Self {
            executable,
            args,
            log_dir: log_dir.into(),
        })
    }

    /// Directory receiving per-job log files.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Fail unless `path` is a regular file with an execute bit set.
pub fn check_executable(path: &Path) -> Result<(), SchedulerError> {
    let meta = fs::metadata(path).map_err(|_| {
        SchedulerError::Config(format!("executable not found: {}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(SchedulerError::Config(format!(
            "executable is not a file: {}",
            path.display()
        )));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(SchedulerError::Config(format!(
                "{} is not executable, check its permissions",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Exit code of a finished process; a signal kill maps to the negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

fn launch_error(job: &JobDescriptor, source: std::io::Error) -> SchedulerError {
    SchedulerError::Launch {
        job: job.source().display().to_string(),
        source,
    }
}

#[async_trait]
impl JobLauncher for ProcessLauncher {
    type Handle = ProcessHandle;

    async fn launch(
        &mut self,
        job: &JobDescriptor,
        log_name: &str,
    ) -> Result<ProcessHandle, SchedulerError> {
        let log_path = self.log_dir.join(log_name);
        let log = tokio::fs::File::create(&log_path)
            .await
            .map_err(|e| launch_error(job, e))?
            .into_std()
            .await;
        let stdout = log.try_clone().map_err(|e| launch_error(job, e))?;
        let stderr = log.try_clone().map_err(|e| launch_error(job, e))?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg(job.source())
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        tracing::info!(command = ?cmd.as_std(), log = %log_path.display(), "running command");

        let child = cmd.spawn().map_err(|e| launch_error(job, e))?;
        Ok(ProcessHandle {
            child,
            log,
            log_path,
        })
    }

    fn poll(
        &mut self,
        job: &JobDescriptor,
        handle: &mut ProcessHandle,
    ) -> Result<Option<i32>, SchedulerError> {
        handle
            .child
            .try_wait()
            .map(|status| status.map(exit_code))
            .map_err(|source| SchedulerError::Poll {
                job: job.source().display().to_string(),
                source,
            })
    }

    fn finalize(&mut self, job: &JobDescriptor, handle: ProcessHandle) {
        if let Err(e) = handle.log.sync_all() {
            tracing::warn!(
                job = %job.source().display(),
                log = %handle.log_path.display(),
                error = %e,
                "failed to flush job log"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessLauncher::new(dir.path().join("run"), Vec::new(), dir.path()).unwrap_err();
        assert!(matches!(err, SchedulerError::Config(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_directory_is_not_executable() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_executable(dir.path()).unwrap_err();
        assert!(matches!(err, SchedulerError::Config(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        let err = check_executable(&path).unwrap_err();
        assert!(matches!(err, SchedulerError::Config(msg) if msg.contains("not executable")));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_exit_code_is_negated() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatus::from_raw(9)), -9);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    }
}
