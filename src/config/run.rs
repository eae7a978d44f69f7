//! Batch run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerLimits;

/// Arguments appended to every job invocation unless overridden.
pub const DEFAULT_JOB_ARGS: [&str; 5] = ["1", "1", "1", "1", "0"];

/// Everything needed to run one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the job sources.
    pub job_dir: PathBuf,
    /// Search `job_dir` recursively.
    #[serde(default)]
    pub recursive: bool,
    /// Total threads shared by all running jobs.
    pub total_threads: u32,
    /// Pause between scheduling ticks in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Program started once per job, with the job source as first argument.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    /// Arguments appended after the job source.
    #[serde(default = "default_job_args")]
    pub job_args: Vec<String>,
    /// Parent directory for per-run log directories.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File extension identifying job sources, without the dot.
    #[serde(default = "default_job_extension")]
    pub job_extension: String,
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_executable() -> PathBuf {
    PathBuf::from("./run")
}

fn default_job_args() -> Vec<String> {
    DEFAULT_JOB_ARGS.iter().map(ToString::to_string).collect()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("run_many_logs")
}

fn default_job_extension() -> String {
    "sh".into()
}

impl RunConfig {
    /// Configuration with defaults for everything but the job directory and budget.
    pub fn new(job_dir: impl Into<PathBuf>, total_threads: u32) -> Self {
        Self {
            job_dir: job_dir.into(),
            recursive: false,
            total_threads,
            poll_interval_ms: default_poll_interval_ms(),
            executable: default_executable(),
            job_args: default_job_args(),
            output_dir: default_output_dir(),
            job_extension: default_job_extension(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.total_threads == 0 {
            return Err("total_threads must be greater than 0".into());
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        if self.job_extension.is_empty() {
            return Err("job_extension must not be empty".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json_str(&input)
    }

    /// Pause between scheduling ticks.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Scheduler limits derived from this configuration.
    pub const fn limits(&self) -> SchedulerLimits {
        SchedulerLimits::new(self.total_threads).with_poll_interval(self.poll_interval())
    }
}
