//! Infrastructure adapters for job discovery and execution.

pub mod discovery;
pub mod launcher;

pub use discovery::discover_jobs;
pub use launcher::{ProcessLauncher, ScriptedLauncher};
