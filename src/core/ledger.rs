//! In-memory record of every job and its lifecycle state.
//!
//! The ledger is owned by the scheduling loop and mutated only through
//! [`Ledger::mark_running`] and [`Ledger::mark_finished`], which enforce the
//! `Pending -> Running -> Finished` order.

use std::collections::HashMap;

use super::job::display_name;
use super::{JobDescriptor, JobId, JobRecord, JobState, SchedulerError};

/// Ordered collection of job records, in discovery order.
#[derive(Debug)]
pub struct Ledger<H> {
    records: Vec<JobRecord<H>>,
}

impl<H> Ledger<H> {
    /// Seed a ledger with every descriptor as `Pending`, preserving order.
    pub fn new(descriptors: Vec<JobDescriptor>) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let records = descriptors
            .into_iter()
            .enumerate()
            .map(|(idx, descriptor)| {
                let base = display_name(descriptor.source());
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let log_name = if *count == 1 {
                    format!("{base}.txt")
                } else {
                    format!("{base}.{count}.txt")
                };
                JobRecord {
                    id: JobId(idx),
                    descriptor,
                    log_name,
                    state: JobState::Pending,
                    handle: None,
                }
            })
            .collect();
        Self { records }
    }

    /// Number of jobs in the ledger.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in discovery order.
    pub fn records(&self) -> &[JobRecord<H>] {
        &self.records
    }

    /// Look up one record.
    pub fn get(&self, id: JobId) -> Option<&JobRecord<H>> {
        self.records.get(id.0)
    }

    /// Pending records in discovery order.
    pub fn pending(&self) -> impl Iterator<Item = &JobRecord<H>> {
        self.records
            .iter()
            .filter(|r| matches!(r.state, JobState::Pending))
    }

    /// Running records in discovery order.
    pub fn running(&self) -> impl Iterator<Item = &JobRecord<H>> {
        self.records
            .iter()
            .filter(|r| matches!(r.state, JobState::Running))
    }

    /// Handles of running jobs, for liveness polling.
    pub fn running_handles_mut(
        &mut self,
    ) -> impl Iterator<Item = (JobId, &JobDescriptor, &mut H)> {
        self.records.iter_mut().filter_map(|r| match r.state {
            JobState::Running => {
                let id = r.id;
                let descriptor = &r.descriptor;
                r.handle.as_mut().map(|h| (id, descriptor, h))
            }
            _ => None,
        })
    }

    /// Number of pending jobs.
    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    /// Number of running jobs.
    pub fn running_count(&self) -> usize {
        self.running().count()
    }

    /// True once every job has finished.
    pub fn is_complete(&self) -> bool {
        self.records
            .iter()
            .all(|r| matches!(r.state, JobState::Finished { .. }))
    }

    /// Move a pending job to `Running`, taking ownership of its supervisor handle.
    pub fn mark_running(&mut self, id: JobId, handle: H) -> Result<(), SchedulerError> {
        let record = self.record_mut(id, "running")?;
        if !matches!(record.state, JobState::Pending) {
            return Err(invalid(record, "running"));
        }
        record.state = JobState::Running;
        record.handle = Some(handle);
        Ok(())
    }

    /// Move a running job to `Finished`, returning its handle for finalization.
    pub fn mark_finished(&mut self, id: JobId, exit_code: i32) -> Result<H, SchedulerError> {
        let record = self.record_mut(id, "finished")?;
        if !matches!(record.state, JobState::Running) {
            return Err(invalid(record, "finished"));
        }
        let handle = record
            .handle
            .take()
            .ok_or_else(|| invalid(record, "finished"))?;
        record.state = JobState::Finished { exit_code };
        Ok(handle)
    }

    fn record_mut(&mut self, id: JobId, to: &'static str) -> Result<&mut JobRecord<H>, SchedulerError> {
        self.records
            .get_mut(id.0)
            .ok_or_else(|| SchedulerError::InvalidTransition {
                job: id.to_string(),
                from: "unknown",
                to,
            })
    }
}

fn invalid<H>(record: &JobRecord<H>, to: &'static str) -> SchedulerError {
    SchedulerError::InvalidTransition {
        job: record.name(),
        from: record.state.label(),
        to,
    }
}
