//! Thread budget accounting derived from ledger state.

use super::Ledger;

/// Threads held by running jobs.
pub fn threads_in_use<H>(ledger: &Ledger<H>) -> u32 {
    ledger.running().map(|r| r.required_threads()).sum()
}

/// Budget left after subtracting every running job's declared threads.
///
/// Recomputed from the ledger on every call; nothing is cached between ticks.
pub fn available<H>(ledger: &Ledger<H>, total_budget: u32) -> u32 {
    total_budget.saturating_sub(threads_in_use(ledger))
}
