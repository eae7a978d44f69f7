//! # Simulation Batch Scheduler
//!
//! Runs a batch of independent simulation jobs under a fixed thread budget.
//!
//! Each job is a source file that declares how many threads it needs, e.g.
//! `max_threads='8'`. The scheduler launches jobs as separate processes and
//! keeps the sum of declared threads across running jobs within the budget
//! until every job has exited.
//!
//! ## Key Features
//!
//! - **Capacity invariant**: running jobs never hold more threads than the budget
//! - **First-fit admission**: pending jobs are admitted in discovery order, skipping
//!   jobs that do not fit without blocking smaller ones behind them
//! - **Fail-fast validation**: a job with no declaration, or one that can never fit,
//!   aborts the batch before anything is launched
//! - **Failure isolation**: a job's non-zero exit is recorded and reported, never
//!   stopping the rest of the batch
//!
//! ## Example
//!
//! ```rust,ignore
//! use sim_batch_scheduler::core::{BatchScheduler, JobDescriptor, RunSummary, SchedulerLimits};
//! use sim_batch_scheduler::infra::ProcessLauncher;
//!
//! let launcher = ProcessLauncher::new("./run", vec!["1".into()], "logs")?;
//! let mut scheduler = BatchScheduler::new(SchedulerLimits::new(48), launcher);
//! scheduler.seed(vec![JobDescriptor::new("cfg/a.sh", 8), JobDescriptor::new("cfg/b.sh", 16)])?;
//! let ledger = scheduler.run().await?;
//! let summary = RunSummary::from_ledger(&ledger)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models for batch runs.
pub mod config;
/// Infrastructure adapters for job discovery and execution.
pub mod infra;
/// Batch orchestration tying discovery, scheduling, and reporting together.
pub mod runtime;
/// Shared utilities.
pub mod util;
