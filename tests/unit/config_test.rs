//! Tests for configuration validation

use std::time::Duration;

use sim_batch_scheduler::config::{RunConfig, DEFAULT_JOB_ARGS};

#[test]
fn test_run_config_defaults() {
    let cfg = RunConfig::new("configs/sweep", 48);
    assert!(cfg.validate().is_ok());
    assert!(!cfg.recursive);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(5));
    assert_eq!(cfg.job_args, DEFAULT_JOB_ARGS);
    assert_eq!(cfg.job_extension, "sh");
}

#[test]
fn test_run_config_invalid_threads() {
    let cfg = RunConfig::new("configs", 0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_run_config_invalid_poll_interval() {
    let mut cfg = RunConfig::new("configs", 4);
    cfg.poll_interval_ms = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_run_config_invalid_extension() {
    let mut cfg = RunConfig::new("configs", 4);
    cfg.job_extension.clear();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_run_config_limits() {
    let mut cfg = RunConfig::new("configs", 12);
    cfg.poll_interval_ms = 250;
    let limits = cfg.limits();
    assert_eq!(limits.total_threads, 12);
    assert_eq!(limits.poll_interval, Duration::from_millis(250));
}

#[test]
fn test_run_config_from_json_fills_defaults() {
    let json = r#"{
        "job_dir": "configs/sweep",
        "total_threads": 48,
        "recursive": true
    }"#;

    let cfg = RunConfig::from_json_str(json).unwrap();
    assert!(cfg.recursive);
    assert_eq!(cfg.total_threads, 48);
    assert_eq!(cfg.poll_interval_ms, 5_000);
    assert_eq!(cfg.executable.to_str(), Some("./run"));
    assert_eq!(cfg.output_dir.to_str(), Some("run_many_logs"));
}

#[test]
fn test_run_config_from_json_requires_threads() {
    let json = r#"{ "job_dir": "configs" }"#;
    assert!(RunConfig::from_json_str(json).is_err());
}

#[test]
fn test_run_config_from_json_rejects_zero_budget() {
    let json = r#"{ "job_dir": "configs", "total_threads": 0 }"#;
    let err = RunConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("total_threads"));
}
