//! Record-to-Record Travel (§4.6): accepts any neighbor within a decaying
//! tolerance of the best-so-far record, rather than only improving moves.

use rand::RngCore;

use crate::budget::{Budget, TerminationReason};
use crate::problem::Problem;
use crate::stats::{EvalCounter, SearchResult, Stats};

pub fn run<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    initial: P::Solution,
    initial_tolerance: f64,
    alpha: f64,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> SearchResult<P::Solution> {
    let mut counter = EvalCounter::new();
    let mut current = initial;
    let mut current_obj = problem.evaluate(&current, &mut counter);
    let mut record = current_obj;
    let mut best = current.clone();
    let mut tolerance = initial_tolerance;
    let mut stats = Stats::new(TerminationReason::Exhausted);

    tracing::debug!(initial_tolerance, alpha, start_objective = current_obj, "record-to-record travel starting");

    let termination = loop {
        if let Some(reason) = budget.should_stop() {
            break reason;
        }
        stats.iterations += 1;
        budget.record_try();

        let Some(mv) = problem.random_move(&current, neighborhoods, rng) else {
            continue;
        };
        if problem.is_error(mv) {
            continue;
        }
        let (candidate, applied) = problem.apply(&current, mv);
        if !applied || !problem.is_feasible(&candidate) {
            stats.infeasible_rejections += 1;
            continue;
        }
        let candidate_obj = problem.evaluate(&candidate, &mut counter);
        let bound = match problem.sense() {
            crate::objective::Sense::Max => record - tolerance,
            crate::objective::Sense::Min => record + tolerance,
        };
        if problem.sense().at_least_as_good(candidate_obj, bound) {
            current = candidate;
            current_obj = candidate_obj;
            stats.accepted_moves += 1;
            if problem.sense().improves(candidate_obj, record) {
                record = candidate_obj;
                best = current.clone();
                tracing::trace!(objective = record, tolerance, "record-to-record travel improved the record");
                budget.record_improvement();
            } else {
                budget.record_no_improvement();
            }
        } else {
            budget.record_no_improvement();
        }
        tolerance *= alpha;
    };

    stats.termination = termination;
    stats.best_objective = record;
    stats.evaluations = counter.count();
    tracing::debug!(?termination, objective = record, iterations = stats.iterations, "record-to-record travel finished");
    SearchResult { solution: best, objective: record, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sukp::{BitSolution, SukpInstance, SukpProblem, moves::SukpNeighborhood};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn rrt_never_returns_worse_than_initial() {
        let inst = SukpInstance::new(5, vec![10, 30], vec![1, 4], vec![(0, 0), (1, 0), (1, 1)]).unwrap();
        let problem = SukpProblem::new(inst);
        let initial = BitSolution::zeros(2);
        let mut counter = EvalCounter::new();
        let initial_obj = problem.evaluate(&initial, &mut counter);
        let budget = Budget::new().with_max_tries(500);
        let mut rng = SmallRng::seed_from_u64(13);
        let result = run(&problem, &[SukpNeighborhood::FlipBit], initial, 5.0, 0.9, budget, &mut rng);
        assert!(result.objective >= initial_obj);
    }
}
