//! Tests for audit sink

use sim_batch_scheduler::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("evt1", "a.sh", "admit", 1, Some("required=2".to_string()));

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, "evt1");
    assert_eq!(events[0].job, "a.sh");
    assert_eq!(events[0].action, "admit");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("evt1", "a.sh", "seed", 0, None));
    sink.record(build_audit_event("evt2", "b.sh", "seed", 0, None));
    sink.record(build_audit_event("evt3", "c.sh", "seed", 0, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id, "evt2"); // First one popped
    assert_eq!(events[1].event_id, "evt3");
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("evt1", "a.sh", "finish", 7, Some("exit_code=1".to_string()));

    assert_eq!(event.event_id, "evt1");
    assert_eq!(event.job, "a.sh");
    assert_eq!(event.action, "finish");
    assert_eq!(event.tick, 7);
    assert_eq!(event.payload, Some("exit_code=1".to_string()));
    assert!(event.created_at_ms > 0);
}
