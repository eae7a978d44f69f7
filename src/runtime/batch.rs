//! End-to-end batch orchestration: discover, validate, schedule, report.
//!
//! Every validation step runs before the run directory is created or any
//! job is launched, so a rejected batch leaves nothing behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::RunConfig;
use crate::core::{
    extract, validate_descriptors, AppResult, BatchScheduler, JobDescriptor, JsonLinesAuditSink,
    Phase, RunSummary, SchedulerError,
};
use crate::infra::launcher::{check_executable, Script};
use crate::infra::{discover_jobs, ProcessLauncher, ScriptedLauncher};
use crate::util::clock::run_stamp;

/// File name of the JSON-lines audit trail inside the run directory.
pub const EVENTS_FILE: &str = "events.jsonl";

/// Result of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Directory holding per-job logs and summaries.
    pub run_dir: PathBuf,
    /// Per-job exit codes and verdict.
    pub summary: RunSummary,
}

/// Discover, validate, and run every job described by `cfg`.
///
/// Returns `Ok(None)` when the job directory holds no job sources. A job's own
/// non-zero exit is reported in the summary, never as an error.
pub async fn run_batch(cfg: &RunConfig) -> AppResult<Option<BatchOutcome>> {
    let Some(descriptors) = prepare(cfg)? else {
        return Ok(None);
    };
    check_executable(&cfg.executable)?;
    validate_descriptors(&descriptors, cfg.total_threads)?;

    let run_dir = create_run_dir(cfg)?;
    let launcher = ProcessLauncher::new(&cfg.executable, cfg.job_args.clone(), &run_dir)?;
    let audit = JsonLinesAuditSink::create(&run_dir.join(EVENTS_FILE))?;

    let mut scheduler = BatchScheduler::new(cfg.limits(), launcher).with_audit(Box::new(audit));
    scheduler.seed(descriptors)?;
    let ledger = scheduler.run().await.context("batch aborted")?;

    let summary = RunSummary::from_ledger(&ledger)?;
    summary.write_to_dir(&run_dir)?;
    tracing::info!(
        run_dir = %run_dir.display(),
        verdict = ?summary.verdict,
        "logs and summary written"
    );
    Ok(Some(BatchOutcome { run_dir, summary }))
}

/// Admission batches the scheduler would produce if every job finished instantly.
///
/// Nothing is launched and no files are written.
pub async fn plan_batches(cfg: &RunConfig) -> AppResult<Vec<Vec<PathBuf>>> {
    let Some(descriptors) = prepare(cfg)? else {
        return Ok(Vec::new());
    };
    let mut scheduler = BatchScheduler::new(cfg.limits(), ScriptedLauncher::new(Script::instant(0)));
    scheduler.seed(descriptors)?;

    let mut batches = Vec::new();
    while scheduler.phase() != Phase::Terminated {
        let report = scheduler.tick().await?;
        if report.admitted.is_empty() {
            continue;
        }
        let batch = report
            .admitted
            .iter()
            .filter_map(|id| scheduler.ledger().get(*id))
            .map(|r| r.descriptor.source().to_path_buf())
            .collect();
        batches.push(batch);
    }
    Ok(batches)
}

/// Extract a descriptor from every source, reporting all failures.
///
/// Each failure is logged; the first one is returned.
pub fn extract_all(sources: &[PathBuf]) -> Result<Vec<JobDescriptor>, SchedulerError> {
    let mut descriptors = Vec::with_capacity(sources.len());
    let mut first_err = None;
    for source in sources {
        match extract(source) {
            Ok(d) => descriptors.push(d),
            Err(e) => {
                tracing::error!(job = %source.display(), error = %e, "error processing job");
                first_err.get_or_insert(e);
            }
        }
    }
    first_err.map_or(Ok(descriptors), Err)
}

fn prepare(cfg: &RunConfig) -> AppResult<Option<Vec<JobDescriptor>>> {
    cfg.validate().map_err(SchedulerError::Config)?;
    let sources = discover_jobs(&cfg.job_dir, &cfg.job_extension, cfg.recursive)
        .with_context(|| format!("discovering jobs in {}", cfg.job_dir.display()))?;
    if sources.is_empty() {
        tracing::info!(
            dir = %cfg.job_dir.display(),
            extension = %cfg.job_extension,
            "no job files found"
        );
        return Ok(None);
    }
    Ok(Some(extract_all(&sources)?))
}

fn create_run_dir(cfg: &RunConfig) -> Result<PathBuf, SchedulerError> {
    fs::create_dir_all(&cfg.output_dir).map_err(|e| SchedulerError::io(&cfg.output_dir, e))?;
    let base = format!("{}_{}", dir_label(&cfg.job_dir), run_stamp());
    create_unique_dir(&cfg.output_dir, &base)
}

/// Create `parent/base`, or `parent/base_<n>` when that name is already taken.
fn create_unique_dir(parent: &Path, base: &str) -> Result<PathBuf, SchedulerError> {
    let mut candidate = parent.join(base);
    for n in 2u32.. {
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                candidate = parent.join(format!("{base}_{n}"));
            }
            Err(e) => return Err(SchedulerError::io(&candidate, e)),
        }
    }
    Err(SchedulerError::io(
        &candidate,
        io::Error::from(io::ErrorKind::AlreadyExists),
    ))
}

fn dir_label(dir: &Path) -> String {
    fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "jobs".into())
}
