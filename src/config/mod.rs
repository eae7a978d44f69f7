//! Configuration models for batch runs.

pub mod run;

pub use run::{RunConfig, DEFAULT_JOB_ARGS};
