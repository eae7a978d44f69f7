//! Core scheduling abstractions and capacity accounting.

pub mod admission;
pub mod audit;
pub mod capacity;
pub mod error;
pub mod extractor;
pub mod job;
pub mod ledger;
pub mod reporter;
pub mod scheduler;
pub mod supervisor;

pub use admission::{admit, Admission};
pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, JsonLinesAuditSink};
pub use capacity::{available, threads_in_use};
pub use error::{AppResult, SchedulerError};
pub use extractor::{extract, parse_required_threads};
pub use job::{JobDescriptor, JobId, JobRecord, JobState};
pub use ledger::Ledger;
pub use reporter::{JobResult, RunSummary, Verdict};
pub use scheduler::{
    validate_descriptors, BatchScheduler, Phase, SchedulerLimits, TickReport,
    DEFAULT_POLL_INTERVAL,
};
pub use supervisor::JobLauncher;
