//! The scheduling loop: collect finished jobs, recompute capacity, admit, sleep.
//!
//! A single [`BatchScheduler`] owns the ledger and the launcher. Within one
//! tick every liveness check completes before any admission, so capacity
//! freed by a finished job is never spent before it is released.

use std::fmt;
use std::time::Duration;

use super::admission::admit;
use super::capacity::{available, threads_in_use};
use super::{
    build_audit_event, AuditSink, JobDescriptor, JobId, JobLauncher, Ledger, SchedulerError,
};

/// Default pause between ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Fixed limits for one run.
#[derive(Debug, Clone)]
pub struct SchedulerLimits {
    /// Total threads shared by all running jobs.
    pub total_threads: u32,
    /// Pause between ticks.
    pub poll_interval: Duration,
}

impl SchedulerLimits {
    /// Limits with the default poll interval.
    pub const fn new(total_threads: u32) -> Self {
        Self {
            total_threads,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Jobs not yet validated and seeded.
    Initializing,
    /// Pending jobs remain.
    Scheduling,
    /// Nothing pending; waiting for running jobs to exit.
    Draining,
    /// Every job has finished.
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::Scheduling => "scheduling",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Jobs that exited during this tick, with their exit codes.
    pub finished: Vec<(JobId, i32)>,
    /// Jobs launched during this tick, in admission order.
    pub admitted: Vec<JobId>,
    /// Threads held by running jobs at the end of the tick.
    pub threads_in_use: u32,
    /// Phase after the tick.
    pub phase: Phase,
}

/// Check every descriptor against the budget before anything is launched.
///
/// A descriptor must require at least one thread and no more than the budget.
///
/// All violations are logged; the first one is returned.
pub fn validate_descriptors(
    descriptors: &[JobDescriptor],
    total_threads: u32,
) -> Result<(), SchedulerError> {
    if total_threads == 0 {
        return Err(SchedulerError::Config(
            "total thread budget must be greater than 0".into(),
        ));
    }
    let mut first = None;
    for d in descriptors {
        if d.required_threads() == 0 {
            tracing::error!(job = %d.source().display(), "job declares zero threads");
            first.get_or_insert_with(|| SchedulerError::InvalidThreadDeclaration {
                job: d.source().display().to_string(),
                value: "0".into(),
            });
        } else if d.required_threads() > total_threads {
            tracing::error!(
                job = %d.source().display(),
                required = d.required_threads(),
                budget = total_threads,
                "job can never fit in the thread budget"
            );
            first.get_or_insert_with(|| SchedulerError::CapacityUnsatisfiable {
                job: d.source().display().to_string(),
                required: d.required_threads(),
                budget: total_threads,
            });
        }
    }
    first.map_or(Ok(()), Err)
}

/// Single-owner controller driving a batch of jobs to completion.
pub struct BatchScheduler<L: JobLauncher> {
    limits: SchedulerLimits,
    ledger: Ledger<L::Handle>,
    launcher: L,
    audit: Option<Box<dyn AuditSink>>,
    phase: Phase,
    tick: u64,
}

impl<L: JobLauncher> BatchScheduler<L> {
    /// Create an unseeded scheduler.
    pub fn new(limits: SchedulerLimits, launcher: L) -> Self {
        Self {
            limits,
            ledger: Ledger::new(Vec::new()),
            launcher,
            audit: None,
            phase: Phase::Initializing,
            tick: 0,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate `descriptors` and seed the ledger with them as `Pending`.
    ///
    /// Fails without side effects if any job can never fit in the budget.
    pub fn seed(&mut self, descriptors: Vec<JobDescriptor>) -> Result<(), SchedulerError> {
        if self.phase != Phase::Initializing {
            return Err(SchedulerError::Config(format!(
                "scheduler already seeded (phase {})",
                self.phase
            )));
        }
        if let Err(e) = validate_descriptors(&descriptors, self.limits.total_threads) {
            match &e {
                SchedulerError::CapacityUnsatisfiable { job, required, .. } => {
                    self.record_audit(job, "reject", Some(format!("required={required}")));
                }
                SchedulerError::InvalidThreadDeclaration { job, value } => {
                    self.record_audit(job, "reject", Some(format!("required={value}")));
                }
                _ => {}
            }
            return Err(e);
        }
        if self.limits.total_threads as usize > num_cpus::get() {
            tracing::warn!(
                budget = self.limits.total_threads,
                cpus = num_cpus::get(),
                "thread budget exceeds logical CPUs on this host"
            );
        }

        self.ledger = Ledger::new(descriptors);
        let seeded: Vec<(String, u32)> = self
            .ledger
            .records()
            .iter()
            .map(|r| (r.name(), r.required_threads()))
            .collect();
        for (name, required) in seeded {
            self.record_audit(&name, "seed", Some(format!("required={required}")));
        }
        tracing::info!(
            jobs = self.ledger.len(),
            budget = self.limits.total_threads,
            "starting jobs"
        );
        self.set_phase(self.derive_phase());
        Ok(())
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Configured limits.
    pub const fn limits(&self) -> &SchedulerLimits {
        &self.limits
    }

    /// Read-only view of the ledger.
    pub const fn ledger(&self) -> &Ledger<L::Handle> {
        &self.ledger
    }

    /// The launcher driving job execution.
    pub const fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Consume the scheduler, yielding the ledger for reporting.
    pub fn into_ledger(self) -> Ledger<L::Handle> {
        self.ledger
    }

    /// Run one tick without sleeping.
    ///
    /// Any launch or poll failure stops the tick immediately; jobs already
    /// running are left to exit on their own.
    pub async fn tick(&mut self) -> Result<TickReport, SchedulerError> {
        match self.phase {
            Phase::Initializing => {
                return Err(SchedulerError::Config(
                    "scheduler ticked before being seeded".into(),
                ))
            }
            Phase::Terminated => {
                return Ok(TickReport {
                    tick: self.tick,
                    finished: Vec::new(),
                    admitted: Vec::new(),
                    threads_in_use: 0,
                    phase: Phase::Terminated,
                })
            }
            Phase::Scheduling | Phase::Draining => {}
        }
        self.tick += 1;

        let finished = self.collect_finished()?;

        let free = available(&self.ledger, self.limits.total_threads);
        let admission = admit(
            self.ledger.pending().map(|r| (r.id, r.required_threads())),
            free,
        );
        tracing::debug!(
            tick = self.tick,
            available = free,
            admitted = admission.admitted.len(),
            remaining = admission.remaining,
            "admission pass"
        );
        for id in &admission.admitted {
            self.start(*id).await?;
        }

        let in_use = threads_in_use(&self.ledger);
        debug_assert!(in_use <= self.limits.total_threads);
        self.set_phase(self.derive_phase());

        Ok(TickReport {
            tick: self.tick,
            finished,
            admitted: admission.admitted,
            threads_in_use: in_use,
            phase: self.phase,
        })
    }

    /// Tick until every job has finished, sleeping between ticks.
    pub async fn run(mut self) -> Result<Ledger<L::Handle>, SchedulerError> {
        loop {
            let report = self.tick().await.inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    running = self.ledger.running_count(),
                    pending = self.ledger.pending_count(),
                    "scheduler stopped"
                );
            })?;
            if report.phase == Phase::Terminated {
                break;
            }
            tokio::time::sleep(self.limits.poll_interval).await;
        }
        Ok(self.ledger)
    }

    fn collect_finished(&mut self) -> Result<Vec<(JobId, i32)>, SchedulerError> {
        let mut finished = Vec::new();
        for (id, descriptor, handle) in self.ledger.running_handles_mut() {
            if let Some(code) = self.launcher.poll(descriptor, handle)? {
                finished.push((id, code));
            }
        }
        for (id, code) in &finished {
            let handle = self.ledger.mark_finished(*id, *code)?;
            let Some(record) = self.ledger.get(*id) else {
                continue;
            };
            self.launcher.finalize(&record.descriptor, handle);
            let name = record.name();
            tracing::info!(job = %name, exit_code = code, "finished");
            self.record_audit(&name, "finish", Some(format!("exit_code={code}")));
        }
        Ok(finished)
    }

    async fn start(&mut self, id: JobId) -> Result<(), SchedulerError> {
        let (descriptor, log_name) = match self.ledger.get(id) {
            Some(r) => (r.descriptor.clone(), r.log_name.clone()),
            None => {
                return Err(SchedulerError::InvalidTransition {
                    job: id.to_string(),
                    from: "unknown",
                    to: "running",
                })
            }
        };
        let handle = self.launcher.launch(&descriptor, &log_name).await?;
        self.ledger.mark_running(id, handle)?;
        let name = descriptor.name();
        tracing::info!(
            job = %name,
            required = descriptor.required_threads(),
            remaining_jobs = self.ledger.pending_count(),
            "launched"
        );
        self.record_audit(
            &name,
            "admit",
            Some(format!("required={}", descriptor.required_threads())),
        );
        Ok(())
    }

    fn derive_phase(&self) -> Phase {
        match (self.ledger.pending_count(), self.ledger.running_count()) {
            (0, 0) => Phase::Terminated,
            (0, _) => Phase::Draining,
            _ => Phase::Scheduling,
        }
    }

    fn set_phase(&mut self, next: Phase) {
        if next != self.phase {
            tracing::info!(from = %self.phase, to = %next, tick = self.tick, "phase change");
            self.phase = next;
        }
    }

    fn record_audit(&mut self, job: &str, action: &str, payload: Option<String>) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(
                format!("{job}-{action}-{}", self.tick),
                job,
                action,
                self.tick,
                payload,
            ));
        }
    }
}
