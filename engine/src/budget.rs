//! Shared wall-clock / try-count gating consulted by every search loop.

use std::time::{Duration, Instant};

use env_param::EnvParam;

/// Default wall-clock budget for a refinement-style inner loop, in seconds.
pub static REFINEMENT_TIME_LIMIT_DEFAULT: EnvParam<f64> =
    EnvParam::new("METASOLVE_REFINEMENT_TIME_LIMIT", "30.0");

/// Why a loop stopped. `Budget*` variants are ordinary outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    Exhausted,
    BudgetTime,
    BudgetTries,
    BudgetNoImprovement,
}

/// A composable stopping condition shared by HC/RDM/VND/RVND, the trajectory
/// methods and the genetic algorithm. A loop nested inside another (e.g. the
/// local search re-run inside ILS) is handed its own `Budget` carved out of
/// the remaining wall-clock of the outer one via [`Budget::sub_budget`].
#[derive(Debug, Clone)]
pub struct Budget {
    deadline: Option<Instant>,
    max_tries: Option<u64>,
    tries: u64,
    max_no_improvement: Option<u64>,
    no_improvement: u64,
}

impl Budget {
    pub fn new() -> Self {
        Budget {
            deadline: None,
            max_tries: None,
            tries: 0,
            max_no_improvement: None,
            no_improvement: 0,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    pub fn with_max_tries(mut self, max_tries: u64) -> Self {
        self.max_tries = Some(max_tries);
        self
    }

    pub fn with_max_no_improvement(mut self, max_no_improvement: u64) -> Self {
        self.max_no_improvement = Some(max_no_improvement);
        self
    }

    /// A fresh budget with the same limits, sharing no counters with `self`,
    /// but clamped to the remaining wall-clock of `self`.
    pub fn sub_budget(&self) -> Budget {
        let mut b = Budget::new();
        b.deadline = self.deadline;
        b
    }

    pub fn record_try(&mut self) {
        self.tries += 1;
    }

    pub fn record_improvement(&mut self) {
        self.no_improvement = 0;
    }

    pub fn record_no_improvement(&mut self) {
        self.no_improvement += 1;
    }

    pub fn time_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn tries_exhausted(&self) -> bool {
        self.max_tries.is_some_and(|m| self.tries >= m)
    }

    pub fn no_improvement_exhausted(&self) -> bool {
        self.max_no_improvement.is_some_and(|m| self.no_improvement >= m)
    }

    /// `None` while the loop may keep going; `Some(reason)` once it must stop.
    pub fn should_stop(&self) -> Option<TerminationReason> {
        if self.time_expired() {
            Some(TerminationReason::BudgetTime)
        } else if self.tries_exhausted() {
            Some(TerminationReason::BudgetTries)
        } else if self.no_improvement_exhausted() {
            Some(TerminationReason::BudgetNoImprovement)
        } else {
            None
        }
    }

    pub fn tries(&self) -> u64 {
        self.tries
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_budget_never_stops() {
        let b = Budget::new();
        assert_eq!(b.should_stop(), None);
    }

    #[test]
    fn try_budget_stops_once_reached() {
        let mut b = Budget::new().with_max_tries(3);
        for _ in 0..3 {
            assert_eq!(b.should_stop(), None);
            b.record_try();
        }
        assert_eq!(b.should_stop(), Some(TerminationReason::BudgetTries));
    }

    #[test]
    fn no_improvement_budget_resets_on_improvement() {
        let mut b = Budget::new().with_max_no_improvement(2);
        b.record_no_improvement();
        assert_eq!(b.should_stop(), None);
        b.record_improvement();
        b.record_no_improvement();
        assert_eq!(b.should_stop(), None);
        b.record_no_improvement();
        assert_eq!(b.should_stop(), Some(TerminationReason::BudgetNoImprovement));
    }

    #[test]
    fn time_budget_stops_after_limit() {
        let b = Budget::new().with_time_limit(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(b.should_stop(), Some(TerminationReason::BudgetTime));
    }
}
