//! Single-solution local-search orchestrators over the refinement steps
//! of [`super::refine`] (§4.5).

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;

use super::refine::{apply_step, RefinementStep, StepOutcome};
use crate::budget::{Budget, TerminationReason};
use crate::problem::Problem;
use crate::stats::{EvalCounter, SearchResult, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalSearchKind {
    HillClimbing,
    RandomDescent,
    Vnd,
    /// `outer_shuffle`: reorder the step list once before the loop starts.
    /// `inner_shuffle`: reorder it again every time the pointer resets to 0.
    /// Both are explicit fields here rather than hardcoded booleans.
    Rvnd { outer_shuffle: bool, inner_shuffle: bool },
}

pub fn run<P: Problem>(
    problem: &P,
    kind: LocalSearchKind,
    steps: &[RefinementStep<P::Neighborhood>],
    initial: P::Solution,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> SearchResult<P::Solution> {
    let mut counter = EvalCounter::new();
    let mut current = initial;
    let mut current_obj = problem.evaluate(&current, &mut counter);
    let mut stats = Stats::new(TerminationReason::Exhausted);

    tracing::debug!(?kind, steps = steps.len(), start_objective = current_obj, "local search starting");

    let termination = match kind {
        LocalSearchKind::HillClimbing => hill_climbing(
            problem, steps, &mut current, &mut current_obj, &mut counter, &mut budget, rng, &mut stats,
        ),
        LocalSearchKind::RandomDescent => random_descent(
            problem, steps, &mut current, &mut current_obj, &mut counter, &mut budget, rng, &mut stats,
        ),
        LocalSearchKind::Vnd => vnd(
            problem, steps, &mut current, &mut current_obj, &mut counter, &mut budget, rng, false, false,
            &mut stats,
        ),
        LocalSearchKind::Rvnd { outer_shuffle, inner_shuffle } => vnd(
            problem, steps, &mut current, &mut current_obj, &mut counter, &mut budget, rng, outer_shuffle,
            inner_shuffle,
            &mut stats,
        ),
    };

    stats.termination = termination;
    stats.best_objective = current_obj;
    stats.evaluations = counter.count();
    tracing::debug!(?termination, objective = current_obj, iterations = stats.iterations, "local search finished");
    SearchResult { solution: current, objective: current_obj, stats }
}

#[allow(clippy::too_many_arguments)]
fn hill_climbing<P: Problem>(
    problem: &P,
    steps: &[RefinementStep<P::Neighborhood>],
    current: &mut P::Solution,
    current_obj: &mut f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
    rng: &mut dyn RngCore,
    stats: &mut Stats,
) -> TerminationReason {
    if steps.is_empty() {
        return TerminationReason::Exhausted;
    }
    let mut idx = 0usize;
    let mut failed_in_a_row = 0usize;
    loop {
        if let Some(reason) = budget.should_stop() {
            return reason;
        }
        if failed_in_a_row >= steps.len() {
            return TerminationReason::Exhausted;
        }
        stats.iterations += 1;
        let step = &steps[idx % steps.len()];
        match apply_step(problem, step, current, *current_obj, counter, budget, rng) {
            StepOutcome::Improved(sol, obj) => {
                *current = sol;
                *current_obj = obj;
                failed_in_a_row = 0;
                stats.accepted_moves += 1;
                tracing::trace!(objective = obj, "hill climbing accepted a move");
                budget.record_improvement();
            }
            StepOutcome::NoImprovement => {
                failed_in_a_row += 1;
                budget.record_no_improvement();
            }
        }
        idx += 1;
    }
}

#[allow(clippy::too_many_arguments)]
fn random_descent<P: Problem>(
    problem: &P,
    steps: &[RefinementStep<P::Neighborhood>],
    current: &mut P::Solution,
    current_obj: &mut f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
    rng: &mut dyn RngCore,
    stats: &mut Stats,
) -> TerminationReason {
    if steps.is_empty() {
        return TerminationReason::Exhausted;
    }
    let mut failed: HashSet<usize> = HashSet::new();
    loop {
        if let Some(reason) = budget.should_stop() {
            return reason;
        }
        if failed.len() >= steps.len() {
            return TerminationReason::Exhausted;
        }
        stats.iterations += 1;
        let idx = rng.random_range(0..steps.len());
        match apply_step(problem, &steps[idx], current, *current_obj, counter, budget, rng) {
            StepOutcome::Improved(sol, obj) => {
                *current = sol;
                *current_obj = obj;
                failed.clear();
                stats.accepted_moves += 1;
                tracing::trace!(objective = obj, "random descent accepted a move");
                budget.record_improvement();
            }
            StepOutcome::NoImprovement => {
                failed.insert(idx);
                budget.record_no_improvement();
            }
        }
    }
}

/// Shared by VND (`shuffle = false`) and RVND (`shuffle = true`, reshuffled
/// on every pointer reset when `reshuffle_on_restart` is set).
#[allow(clippy::too_many_arguments)]
fn vnd<P: Problem>(
    problem: &P,
    steps: &[RefinementStep<P::Neighborhood>],
    current: &mut P::Solution,
    current_obj: &mut f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
    rng: &mut dyn RngCore,
    shuffle: bool,
    reshuffle_on_restart: bool,
    stats: &mut Stats,
) -> TerminationReason {
    if steps.is_empty() {
        return TerminationReason::Exhausted;
    }
    let mut order: Vec<usize> = (0..steps.len()).collect();
    if shuffle {
        order.shuffle(rng);
    }
    let mut idx = 0usize;
    loop {
        if let Some(reason) = budget.should_stop() {
            return reason;
        }
        if idx >= steps.len() {
            return TerminationReason::Exhausted;
        }
        stats.iterations += 1;
        let step = &steps[order[idx]];
        match apply_step(problem, step, current, *current_obj, counter, budget, rng) {
            StepOutcome::Improved(sol, obj) => {
                *current = sol;
                *current_obj = obj;
                stats.accepted_moves += 1;
                tracing::trace!(objective = obj, "vnd accepted a move, restarting at the first step");
                budget.record_improvement();
                idx = 0;
                if reshuffle_on_restart {
                    order.shuffle(rng);
                }
            }
            StepOutcome::NoImprovement => {
                idx += 1;
                budget.record_no_improvement();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::refine::RefinementKind;
    use crate::sukp::{BitSolution, SukpInstance, SukpProblem, moves::SukpNeighborhood};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn toy_problem() -> SukpProblem {
        // package 0 needs {0}, benefit 10, size 1; package 1 needs {0,1}, benefit 30, size 1+4=5=capacity.
        let inst = SukpInstance::new(5, vec![10, 30], vec![1, 4], vec![(0, 0), (1, 0), (1, 1)]).unwrap();
        SukpProblem::new(inst)
    }

    #[test]
    fn hill_climbing_reaches_a_local_optimum_at_least_as_good_as_start() {
        let problem = toy_problem();
        let steps = vec![RefinementStep::new(RefinementKind::FirstImproving, vec![SukpNeighborhood::FlipBit])];
        let initial = BitSolution::zeros(2);
        let budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(5);
        let result = super::run(&problem, LocalSearchKind::HillClimbing, &steps, initial, budget, &mut rng);
        assert!(result.objective >= 0.0);
        assert_eq!(result.stats.termination, TerminationReason::Exhausted);
    }

    #[test]
    fn vnd_finds_the_best_single_package_solution() {
        let problem = toy_problem();
        let steps = vec![RefinementStep::new(RefinementKind::BestImproving, vec![SukpNeighborhood::FlipBit])];
        let initial = BitSolution::zeros(2);
        let budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(9);
        let result = super::run(&problem, LocalSearchKind::Vnd, &steps, initial, budget, &mut rng);
        assert_eq!(result.objective, 30.0);
    }

    #[test]
    fn rvnd_with_both_shuffles_still_converges() {
        let problem = toy_problem();
        let steps = vec![RefinementStep::new(RefinementKind::FirstImproving, vec![SukpNeighborhood::FlipBit])];
        let initial = BitSolution::zeros(2);
        let budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(11);
        let result = super::run(
            &problem,
            LocalSearchKind::Rvnd { outer_shuffle: true, inner_shuffle: true },
            &steps,
            initial,
            budget,
            &mut rng,
        );
        assert!(result.objective >= 0.0);
    }
}
