//! Run summary: one exit code per job plus an overall verdict.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Ledger, SchedulerError};

/// File name of the plain-text summary.
pub const SUMMARY_TEXT_FILE: &str = "main_log.txt";
/// File name of the JSON summary.
pub const SUMMARY_JSON_FILE: &str = "summary.json";

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every job exited with code 0.
    AllSucceeded,
    /// At least one job exited non-zero.
    OneOrMoreFailed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllSucceeded => f.write_str("All commands executed successfully."),
            Self::OneOrMoreFailed => f.write_str("One or more commands failed."),
        }
    }
}

/// Final result of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job source.
    pub source: PathBuf,
    /// Threads the job declared.
    pub required_threads: u32,
    /// Log file name inside the run directory.
    pub log_name: String,
    /// Exit code.
    pub exit_code: i32,
}

/// Summary of a completed run, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-job results.
    pub jobs: Vec<JobResult>,
    /// Overall verdict.
    pub verdict: Verdict,
}

impl RunSummary {
    /// Build the summary from a ledger whose jobs have all finished.
    pub fn from_ledger<H>(ledger: &Ledger<H>) -> Result<Self, SchedulerError> {
        let jobs = ledger
            .records()
            .iter()
            .map(|r| {
                r.exit_code()
                    .map(|exit_code| JobResult {
                        source: r.descriptor.source().to_path_buf(),
                        required_threads: r.required_threads(),
                        log_name: r.log_name.clone(),
                        exit_code,
                    })
                    .ok_or_else(|| SchedulerError::InvalidTransition {
                        job: r.name(),
                        from: r.state().label(),
                        to: "reported",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let verdict = if jobs.iter().all(|j| j.exit_code == 0) {
            Verdict::AllSucceeded
        } else {
            Verdict::OneOrMoreFailed
        };
        Ok(Self { jobs, verdict })
    }

    /// Jobs that exited non-zero.
    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.jobs.iter().filter(|j| j.exit_code != 0)
    }

    /// Write the plain-text summary.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "Run Summary:")?;
        for job in &self.jobs {
            writeln!(out, "{}: Exit code {}", job.source.display(), job.exit_code)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.verdict)?;
        out.flush()
    }

    /// Write `main_log.txt` and `summary.json` into `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<(), SchedulerError> {
        let text_path = dir.join(SUMMARY_TEXT_FILE);
        let text = std::fs::File::create(&text_path)
            .map_err(|e| SchedulerError::io(&text_path, e))?;
        self.write_text(io::BufWriter::new(text))
            .map_err(|e| SchedulerError::io(&text_path, e))?;

        let json_path = dir.join(SUMMARY_JSON_FILE);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| SchedulerError::io(&json_path, e.into()))?;
        std::fs::write(&json_path, json).map_err(|e| SchedulerError::io(&json_path, e))
    }
}
