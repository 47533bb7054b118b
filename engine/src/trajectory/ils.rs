//! Iterated Local Search (§4.6): alternates perturbation and re-optimization,
//! escalating the perturbation strength on stagnation.

use env_param::EnvParam;
use rand::{Rng, RngCore};

use crate::budget::{Budget, TerminationReason};
use crate::problem::Problem;
use crate::search::local_search::{self, LocalSearchKind};
use crate::search::refine::RefinementStep;
use crate::stats::{SearchResult, Stats};

pub static ILS_MAX_TRIES_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_ILS_MAX_TRIES", "1000");
pub static LS_MAX_TRIES_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_ILS_LS_MAX_TRIES", "1000");

#[allow(clippy::too_many_arguments)]
pub fn run<P: Problem>(
    problem: &P,
    steps: &[RefinementStep<P::Neighborhood>],
    perturb_neighborhoods: &[P::Neighborhood],
    local_search_kinds: &[LocalSearchKind],
    initial: P::Solution,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> SearchResult<P::Solution> {
    let ls_max_tries = LS_MAX_TRIES_DEFAULT.get();
    let max_tries_without_improvement = ILS_MAX_TRIES_DEFAULT.get();

    let mut total_evaluations = 0u64;
    let mut total_iterations = 0u64;
    let mut accepted = 0u64;

    let pick_kind = |rng: &mut dyn RngCore| local_search_kinds[rng.random_range(0..local_search_kinds.len())];

    let ls_budget = budget.sub_budget().with_max_tries(ls_max_tries);
    let first = local_search::run(problem, pick_kind(rng), steps, initial, ls_budget, rng);
    total_evaluations += first.stats.evaluations;
    let mut incumbent = first.solution;
    let mut incumbent_obj = first.objective;

    let mut level: u32 = 0;
    let mut tries_since_best: u64 = 0;

    tracing::debug!(start_objective = incumbent_obj, max_tries_without_improvement, "iterated local search starting");

    let termination = loop {
        if let Some(reason) = budget.should_stop() {
            break reason;
        }
        if tries_since_best >= max_tries_without_improvement {
            break TerminationReason::BudgetNoImprovement;
        }
        total_iterations += 1;
        budget.record_try();

        let mut perturbed = incumbent.clone();
        for _ in 0..=level {
            if let Some(mv) = problem.random_move(&perturbed, perturb_neighborhoods, rng) {
                if !problem.is_error(mv) {
                    let (candidate, applied) = problem.apply(&perturbed, mv);
                    if applied && problem.is_feasible(&candidate) {
                        perturbed = candidate;
                    }
                }
            }
        }

        let ls_budget = budget.sub_budget().with_max_tries(ls_max_tries);
        let reoptimized = local_search::run(problem, pick_kind(rng), steps, perturbed, ls_budget, rng);
        total_evaluations += reoptimized.stats.evaluations;

        if problem.sense().improves(reoptimized.objective, incumbent_obj) {
            incumbent = reoptimized.solution;
            incumbent_obj = reoptimized.objective;
            accepted += 1;
            level = 0;
            tries_since_best = 0;
            tracing::trace!(objective = incumbent_obj, "iterated local search accepted a perturbation");
            budget.record_improvement();
        } else {
            level += 1;
            tries_since_best += 1;
            budget.record_no_improvement();
        }
    };

    let mut stats = Stats::new(termination);
    stats.iterations = total_iterations;
    stats.accepted_moves = accepted;
    stats.evaluations = total_evaluations;
    stats.best_objective = incumbent_obj;
    tracing::debug!(?termination, objective = incumbent_obj, iterations = total_iterations, "iterated local search finished");
    SearchResult { solution: incumbent, objective: incumbent_obj, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::refine::RefinementKind;
    use crate::sukp::{BitSolution, SukpInstance, SukpProblem, moves::SukpNeighborhood};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn ils_never_returns_worse_than_initial() {
        let inst = SukpInstance::new(5, vec![10, 30], vec![1, 4], vec![(0, 0), (1, 0), (1, 1)]).unwrap();
        let problem = SukpProblem::new(inst);
        let initial = BitSolution::zeros(2);
        let mut counter = crate::stats::EvalCounter::new();
        let initial_obj = problem.evaluate(&initial, &mut counter);

        let steps = vec![RefinementStep::new(RefinementKind::FirstImproving, vec![SukpNeighborhood::FlipBit])];
        let budget = Budget::new().with_max_tries(200);
        let mut rng = SmallRng::seed_from_u64(17);
        let result = run(
            &problem,
            &steps,
            &[SukpNeighborhood::FlipBit],
            &[LocalSearchKind::HillClimbing],
            initial,
            budget,
            &mut rng,
        );
        assert!(result.objective >= initial_obj);
    }
}
