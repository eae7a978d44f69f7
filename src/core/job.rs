//! Job descriptors and lifecycle records.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Position of a job in discovery order. Doubles as the admission tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub usize);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One unit of work and the threads it declares. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    source: PathBuf,
    required_threads: u32,
}

impl JobDescriptor {
    /// Create a descriptor for `source`.
    pub fn new(source: impl Into<PathBuf>, required_threads: u32) -> Self {
        Self {
            source: source.into(),
            required_threads,
        }
    }

    /// Reference to the job's executable source.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Threads the job needs while running.
    pub const fn required_threads(&self) -> u32 {
        self.required_threads
    }

    /// Short human-readable name: the source file name, or the full path if it has none.
    pub fn name(&self) -> String {
        display_name(&self.source)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Lifecycle state of a job. Moves `Pending -> Running -> Finished` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum JobState {
    /// Waiting for capacity.
    Pending,
    /// Launched and holding its declared threads.
    Running,
    /// Exited with the recorded code.
    Finished {
        /// Process exit code. Signal terminations are recorded as the negated signal number.
        exit_code: i32,
    },
}

impl JobState {
    /// Short label used in logs and errors.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Finished { .. } => "finished",
        }
    }
}

/// Scheduler's view of a job: descriptor, state, and supervisor handle while running.
#[derive(Debug)]
pub struct JobRecord<H> {
    /// Discovery position.
    pub id: JobId,
    /// Descriptor the record was seeded from.
    pub descriptor: JobDescriptor,
    /// Unique file name for the job's log sink.
    pub log_name: String,
    pub(crate) state: JobState,
    pub(crate) handle: Option<H>,
}

impl<H> JobRecord<H> {
    /// Current lifecycle state.
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Exit code, set only once the job has finished.
    pub const fn exit_code(&self) -> Option<i32> {
        match self.state {
            JobState::Finished { exit_code } => Some(exit_code),
            _ => None,
        }
    }

    /// Threads the job declares.
    pub const fn required_threads(&self) -> u32 {
        self.descriptor.required_threads()
    }

    /// Job name used in logs and errors.
    pub fn name(&self) -> String {
        self.descriptor.name()
    }
}
