//! In-memory launcher with scripted outcomes, for dry runs and testing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{JobDescriptor, JobLauncher, SchedulerError};

/// How a scripted job behaves once launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    /// Polls that report the job as still running before it exits.
    pub polls: u32,
    /// Exit code reported when the job finishes.
    pub exit_code: i32,
}

impl Script {
    /// A job that exits on its first poll.
    pub const fn instant(exit_code: i32) -> Self {
        Self {
            polls: 0,
            exit_code,
        }
    }
}

/// Handle of a scripted job.
#[derive(Debug)]
pub struct ScriptedHandle {
    remaining_polls: u32,
    exit_code: i32,
}

#[derive(Debug, Default)]
struct Journal {
    launched: Vec<PathBuf>,
    finalized: Vec<PathBuf>,
}

/// Launcher that never starts a process. Each job follows its [`Script`].
///
/// Clones share the launch journal.
#[derive(Debug, Clone)]
pub struct ScriptedLauncher {
    scripts: HashMap<PathBuf, Script>,
    default: Script,
    fail_on: Option<PathBuf>,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedLauncher {
    /// Every job exits with `default` unless scripted otherwise.
    pub fn new(default: Script) -> Self {
        Self {
            scripts: HashMap::new(),
            default,
            fail_on: None,
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    /// Script the job whose source is `source`.
    #[must_use]
    pub fn with_script(mut self, source: impl Into<PathBuf>, script: Script) -> Self {
        self.scripts.insert(source.into(), script);
        self
    }

    /// Make launching `source` fail as if the OS refused to spawn it.
    #[must_use]
    pub fn failing_on(mut self, source: impl Into<PathBuf>) -> Self {
        self.fail_on = Some(source.into());
        self
    }

    /// Sources launched so far, in launch order.
    pub fn launched(&self) -> Vec<PathBuf> {
        self.journal.lock().launched.clone()
    }

    /// Sources finalized so far, in finalization order.
    pub fn finalized(&self) -> Vec<PathBuf> {
        self.journal.lock().finalized.clone()
    }

    fn script_for(&self, source: &Path) -> Script {
        self.scripts.get(source).copied().unwrap_or(self.default)
    }
}

#[async_trait]
impl JobLauncher for ScriptedLauncher {
    type Handle = ScriptedHandle;

    async fn launch(
        &mut self,
        job: &JobDescriptor,
        _log_name: &str,
    ) -> Result<ScriptedHandle, SchedulerError> {
        if self.fail_on.as_deref() == Some(job.source()) {
            return Err(SchedulerError::Launch {
                job: job.source().display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted launch failure"),
            });
        }
        self.journal.lock().launched.push(job.source().to_path_buf());
        let script = self.script_for(job.source());
        Ok(ScriptedHandle {
            remaining_polls: script.polls,
            exit_code: script.exit_code,
        })
    }

    fn poll(
        &mut self,
        _job: &JobDescriptor,
        handle: &mut ScriptedHandle,
    ) -> Result<Option<i32>, SchedulerError> {
        if handle.remaining_polls == 0 {
            return Ok(Some(handle.exit_code));
        }
        handle.remaining_polls -= 1;
        Ok(None)
    }

    fn finalize(&mut self, job: &JobDescriptor, _handle: ScriptedHandle) {
        self.journal.lock().finalized.push(job.source().to_path_buf());
    }
}
