//! Tests for error types

use sim_batch_scheduler::core::SchedulerError;

#[test]
fn test_missing_thread_declaration_error() {
    let err = SchedulerError::MissingThreadDeclaration {
        job: "cfg/a.sh".to_string(),
    };
    assert_eq!(format!("{}", err), "max_threads not set in cfg/a.sh");
    assert!(err.is_validation());
}

#[test]
fn test_capacity_unsatisfiable_error() {
    let err = SchedulerError::CapacityUnsatisfiable {
        job: "cfg/a.sh".to_string(),
        required: 8,
        budget: 4,
    };
    assert_eq!(
        format!("{}", err),
        "job cfg/a.sh requires 8 threads, which is more than the total available (4)"
    );
    assert!(err.is_validation());
}

#[test]
fn test_launch_error() {
    let err = SchedulerError::Launch {
        job: "cfg/a.sh".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    };
    assert_eq!(format!("{}", err), "failed to launch cfg/a.sh: no such file");
    assert!(!err.is_validation());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_invalid_transition_error() {
    let err = SchedulerError::InvalidTransition {
        job: "a.sh".to_string(),
        from: "pending",
        to: "finished",
    };
    assert_eq!(format!("{}", err), "invalid transition for a.sh: pending -> finished");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("bad budget".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: bad budget");
}
