//! `run-many`: run every job in a directory under a shared thread budget.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sim_batch_scheduler::config::{RunConfig, DEFAULT_JOB_ARGS};
use sim_batch_scheduler::core::{AppResult, Verdict};
use sim_batch_scheduler::runtime::{plan_batches, run_batch};
use sim_batch_scheduler::util::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "run-many")]
#[command(version)]
#[command(
    about = "Calls the run executable for each job file in a directory, scheduling them in parallel based on thread requirements"
)]
struct Args {
    /// Directory containing job files
    directory: Option<PathBuf>,

    /// Recursively search for job files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Total number of threads available for all jobs
    #[arg(long, env = "RUN_MANY_THREADS")]
    threads: Option<u32>,

    /// Seconds to wait between scheduling ticks
    #[arg(long, default_value = "5")]
    poll_interval_secs: u64,

    /// Executable started once per job, with the job file as first argument
    #[arg(long, default_value = "./run")]
    executable: PathBuf,

    /// Parent directory for per-run log directories
    #[arg(long, default_value = "run_many_logs")]
    output_dir: PathBuf,

    /// Extension identifying job files
    #[arg(long, default_value = "sh")]
    extension: String,

    /// Load settings from a JSON file instead of flags
    #[arg(long, conflicts_with = "directory")]
    config: Option<PathBuf>,

    /// Print the admission batches without launching anything
    #[arg(long)]
    dry_run: bool,

    /// Arguments appended to every job invocation (after `--`)
    #[arg(last = true)]
    job_args: Vec<String>,
}

impl Args {
    fn into_config(self) -> AppResult<RunConfig> {
        if let Some(path) = &self.config {
            return RunConfig::from_json_file(path).map_err(anyhow::Error::msg);
        }
        let directory = self
            .directory
            .ok_or_else(|| anyhow::anyhow!("a job directory or --config is required"))?;
        let threads = self
            .threads
            .ok_or_else(|| anyhow::anyhow!("--threads (or RUN_MANY_THREADS) is required"))?;
        let job_args = if self.job_args.is_empty() {
            DEFAULT_JOB_ARGS.iter().map(ToString::to_string).collect()
        } else {
            self.job_args
        };
        let cfg = RunConfig {
            job_dir: directory,
            recursive: self.recursive,
            total_threads: threads,
            poll_interval_ms: self.poll_interval_secs.saturating_mul(1_000),
            executable: self.executable,
            job_args,
            output_dir: self.output_dir,
            job_extension: self.extension,
        };
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let args = Args::parse();
    let dry_run = args.dry_run;
    match run(args, dry_run).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, dry_run: bool) -> AppResult<()> {
    let cfg = args.into_config()?;

    if dry_run {
        for (i, batch) in plan_batches(&cfg).await?.iter().enumerate() {
            println!("batch {}:", i + 1);
            for source in batch {
                println!("  {}", source.display());
            }
        }
        return Ok(());
    }

    let Some(outcome) = run_batch(&cfg).await? else {
        println!("No .{} job files found in {}", cfg.job_extension, cfg.job_dir.display());
        return Ok(());
    };
    if outcome.summary.verdict == Verdict::OneOrMoreFailed {
        for job in outcome.summary.failures() {
            tracing::warn!(job = %job.source.display(), exit_code = job.exit_code, "job failed");
        }
    }
    println!("Logs and summary written to {}", outcome.run_dir.display());
    Ok(())
}
