//! Batch orchestration used by the `run-many` binary.

pub mod batch;

pub use batch::{extract_all, plan_batches, run_batch, BatchOutcome, EVENTS_FILE};
