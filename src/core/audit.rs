//! Audit sink implementations.
//!
//! Records job lifecycle decisions (seed, admit, finish, reject) either in a
//! bounded in-memory buffer or as JSON lines next to the run's logs.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::SchedulerError;
use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related job name.
    pub job: String,
    /// Action taken (seed, admit, finish, reject).
    pub action: String,
    /// Scheduling tick the event happened in. Zero before the first tick.
    pub tick: u64,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to the scheduler.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events with the given action, in recording order.
    pub fn events_with_action(&self, action: &str) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Audit sink appending one JSON object per line to a file.
pub struct JsonLinesAuditSink {
    writer: BufWriter<File>,
}

impl JsonLinesAuditSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, SchedulerError> {
        let file = File::create(path).map_err(|e| SchedulerError::io(path, e))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl AuditSink for JsonLinesAuditSink {
    fn record(&mut self, event: AuditEvent) {
        let written = serde_json::to_writer(&mut self.writer, &event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write audit event");
        }
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    event_id: impl Into<String>,
    job: impl Into<String>,
    action: impl Into<String>,
    tick: u64,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: event_id.into(),
        job: job.into(),
        action: action.into(),
        tick,
        created_at_ms: now_ms(),
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines_sink_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        {
            let mut sink = JsonLinesAuditSink::create(&path).unwrap();
            sink.record(build_audit_event("e1", "a.sh", "admit", 1, None));
            sink.record(build_audit_event("e2", "a.sh", "finish", 2, Some("exit_code=0".into())));
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let events: Vec<AuditEvent> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, "admit");
        assert_eq!(events[1].payload.as_deref(), Some("exit_code=0"));
    }

    #[test]
    fn test_in_memory_clones_share_buffer() {
        let sink = InMemoryAuditSink::new(8);
        let mut writer = sink.clone();
        writer.record(build_audit_event("e1", "a.sh", "seed", 0, None));
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.events_with_action("seed").len(), 1);
        assert!(sink.events_with_action("admit").is_empty());
    }
}
