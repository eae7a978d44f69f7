//! First-fit admission of pending jobs into the available thread budget.

use super::JobId;

/// Outcome of one admission pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Jobs to launch, in the order they were considered.
    pub admitted: Vec<JobId>,
    /// Budget left after all admitted jobs are charged.
    pub remaining: u32,
}

/// Admit every candidate whose requirement fits the remaining budget.
///
/// Candidates are `(id, required_threads)` pairs in discovery order. The scan
/// is a single pass: each admission is charged immediately, and a job that
/// does not fit does not stop later, smaller jobs from being admitted.
pub fn admit<I>(pending: I, available: u32) -> Admission
where
    I: IntoIterator<Item = (JobId, u32)>,
{
    let mut remaining = available;
    let mut admitted = Vec::new();
    for (id, required) in pending {
        if required <= remaining {
            admitted.push(id);
            remaining -= required;
        }
    }
    Admission {
        admitted,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(reqs: &[u32]) -> Vec<(JobId, u32)> {
        reqs.iter().enumerate().map(|(i, r)| (JobId(i), *r)).collect()
    }

    #[test]
    fn test_fills_in_order() {
        let a = admit(candidates(&[2, 2, 3]), 4);
        assert_eq!(a.admitted, vec![JobId(0), JobId(1)]);
        assert_eq!(a.remaining, 0);
    }

    #[test]
    fn test_skips_large_job_and_continues() {
        let a = admit(candidates(&[3, 5, 1]), 4);
        assert_eq!(a.admitted, vec![JobId(0), JobId(2)]);
        assert_eq!(a.remaining, 0);
    }

    #[test]
    fn test_nothing_fits() {
        let a = admit(candidates(&[3, 3]), 2);
        assert!(a.admitted.is_empty());
        assert_eq!(a.remaining, 2);
    }

    #[test]
    fn test_empty_pending() {
        let a = admit(Vec::new(), 10);
        assert!(a.admitted.is_empty());
        assert_eq!(a.remaining, 10);
    }

    #[test]
    fn test_exhausted_budget_still_scans_every_candidate() {
        let a = admit(candidates(&[2, 3, 0]), 2);
        assert_eq!(a.admitted, vec![JobId(0), JobId(2)]);
        assert_eq!(a.remaining, 0);
    }

    #[test]
    fn test_no_reordering_for_better_packing() {
        // Best-fit would take 3+1; first-fit takes 2 then 1.
        let a = admit(candidates(&[2, 3, 1]), 4);
        assert_eq!(a.admitted, vec![JobId(0), JobId(2)]);
        assert_eq!(a.remaining, 1);
    }
}
