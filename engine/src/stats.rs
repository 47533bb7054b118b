//! Diagnostics returned alongside a terminal solution by every search loop.

use crate::budget::TerminationReason;

/// Evaluation counter, owned by whichever search context calls into the
/// evaluator. Deliberately not a process-global so concurrent independent
/// searches never interfere with each other's counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalCounter(u64);

impl EvalCounter {
    pub fn new() -> Self {
        EvalCounter(0)
    }

    pub fn tick(&mut self) {
        self.0 += 1;
    }

    pub fn count(&self) -> u64 {
        self.0
    }
}

/// Run-level diagnostics: how much work happened and how it ended.
#[derive(Debug, Clone)]
pub struct Stats {
    pub evaluations: u64,
    pub iterations: u64,
    pub accepted_moves: u64,
    pub infeasible_rejections: u64,
    pub best_objective: f64,
    pub termination: TerminationReason,
}

impl Stats {
    pub fn new(termination: TerminationReason) -> Self {
        Stats {
            evaluations: 0,
            iterations: 0,
            accepted_moves: 0,
            infeasible_rejections: 0,
            best_objective: f64::NAN,
            termination,
        }
    }
}

/// What every search loop (local search, trajectory method, or GA) hands
/// back to its caller: the best solution observed, its objective, and the
/// run's diagnostics.
#[derive(Debug, Clone)]
pub struct SearchResult<S> {
    pub solution: S,
    pub objective: f64,
    pub stats: Stats,
}
