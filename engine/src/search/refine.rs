//! One-step improvement primitives shared by the local-search loops (§4.4).
//! Each step returns only an improving, feasible neighbor, or a distinguished
//! "no improvement found" outcome leaving the current solution untouched.

use rand::RngCore;

use crate::budget::Budget;
use crate::problem::Problem;
use crate::stats::EvalCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefinementKind {
    RandomImproving,
    FirstImproving,
    BestImproving,
}

#[derive(Debug, Clone)]
pub struct RefinementStep<N> {
    pub kind: RefinementKind,
    pub neighborhoods: Vec<N>,
}

impl<N> RefinementStep<N> {
    pub fn new(kind: RefinementKind, neighborhoods: Vec<N>) -> Self {
        RefinementStep { kind, neighborhoods }
    }
}

#[derive(Debug, Clone)]
pub enum StepOutcome<S> {
    Improved(S, f64),
    NoImprovement,
}

/// Tries random moves (drawn from the step's neighborhoods) until one is
/// both feasible and strictly improving, or the budget runs out.
fn random_improving<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    current: &P::Solution,
    current_obj: f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
    rng: &mut dyn RngCore,
) -> StepOutcome<P::Solution> {
    loop {
        if budget.should_stop().is_some() {
            return StepOutcome::NoImprovement;
        }
        budget.record_try();
        let Some(mv) = problem.random_move(current, neighborhoods, rng) else {
            return StepOutcome::NoImprovement;
        };
        if problem.is_error(mv) {
            continue;
        }
        let (candidate, applied) = problem.apply(current, mv);
        if !applied || !problem.is_feasible(&candidate) {
            continue;
        }
        let obj = problem.evaluate(&candidate, counter);
        if problem.sense().improves(obj, current_obj) {
            return StepOutcome::Improved(candidate, obj);
        }
    }
}

/// Scans neighborhoods in order; within each, enumerates moves in canonical
/// order; returns the first feasible strictly-improving neighbor found.
fn first_improving<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    current: &P::Solution,
    current_obj: f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
) -> StepOutcome<P::Solution> {
    for &neighborhood in neighborhoods {
        for mv in problem.enumerate(current, neighborhood) {
            if budget.should_stop().is_some() {
                return StepOutcome::NoImprovement;
            }
            budget.record_try();
            if problem.is_error(mv) {
                continue;
            }
            let (candidate, applied) = problem.apply(current, mv);
            if !applied || !problem.is_feasible(&candidate) {
                continue;
            }
            let obj = problem.evaluate(&candidate, counter);
            if problem.sense().improves(obj, current_obj) {
                return StepOutcome::Improved(candidate, obj);
            }
        }
    }
    StepOutcome::NoImprovement
}

/// Scans the full union of neighborhoods and returns the best strictly
/// improving neighbor observed (or the best seen so far, on timeout).
fn best_improving<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    current: &P::Solution,
    current_obj: f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
) -> StepOutcome<P::Solution> {
    let mut best: Option<(P::Solution, f64)> = None;
    for &neighborhood in neighborhoods {
        for mv in problem.enumerate(current, neighborhood) {
            if budget.should_stop().is_some() {
                return best.map_or(StepOutcome::NoImprovement, |(s, o)| StepOutcome::Improved(s, o));
            }
            budget.record_try();
            if problem.is_error(mv) {
                continue;
            }
            let (candidate, applied) = problem.apply(current, mv);
            if !applied || !problem.is_feasible(&candidate) {
                continue;
            }
            let obj = problem.evaluate(&candidate, counter);
            if problem.sense().improves(obj, current_obj) {
                let better_than_best = best.as_ref().is_none_or(|(_, bo)| problem.sense().improves(obj, *bo));
                if better_than_best {
                    best = Some((candidate, obj));
                }
            }
        }
    }
    best.map_or(StepOutcome::NoImprovement, |(s, o)| StepOutcome::Improved(s, o))
}

pub fn apply_step<P: Problem>(
    problem: &P,
    step: &RefinementStep<P::Neighborhood>,
    current: &P::Solution,
    current_obj: f64,
    counter: &mut EvalCounter,
    budget: &mut Budget,
    rng: &mut dyn RngCore,
) -> StepOutcome<P::Solution> {
    let neighborhoods: &[P::Neighborhood] = if step.neighborhoods.is_empty() {
        problem.all_neighborhoods()
    } else {
        &step.neighborhoods
    };
    match step.kind {
        RefinementKind::RandomImproving => {
            random_improving(problem, neighborhoods, current, current_obj, counter, budget, rng)
        }
        RefinementKind::FirstImproving => first_improving(problem, neighborhoods, current, current_obj, counter, budget),
        RefinementKind::BestImproving => best_improving(problem, neighborhoods, current, current_obj, counter, budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sukp::{BitSolution, SukpInstance, SukpProblem, moves::SukpNeighborhood};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn toy_problem() -> SukpProblem {
        let inst = SukpInstance::new(5, vec![10, 20], vec![1, 2, 3], vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap();
        SukpProblem::new(inst)
    }

    #[test]
    fn first_improving_finds_a_better_neighbor() {
        let problem = toy_problem();
        let mut counter = EvalCounter::new();
        let current = BitSolution::zeros(3);
        let current_obj = problem.evaluate(&current, &mut counter);
        let step = RefinementStep::new(RefinementKind::FirstImproving, vec![SukpNeighborhood::FlipBit]);
        let mut budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(1);
        match apply_step(&problem, &step, &current, current_obj, &mut counter, &mut budget, &mut rng) {
            StepOutcome::Improved(_, obj) => assert!(obj > current_obj),
            StepOutcome::NoImprovement => panic!("expected an improving move to exist"),
        }
    }

    #[test]
    fn best_improving_beats_or_matches_first_improving() {
        let problem = toy_problem();
        let mut counter = EvalCounter::new();
        let current = BitSolution::zeros(3);
        let current_obj = problem.evaluate(&current, &mut counter);
        let step = RefinementStep::new(RefinementKind::BestImproving, vec![SukpNeighborhood::FlipBit]);
        let mut budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(1);
        if let StepOutcome::Improved(_, obj) =
            apply_step(&problem, &step, &current, current_obj, &mut counter, &mut budget, &mut rng)
        {
            assert!(obj >= current_obj);
        }
    }

    #[test]
    fn no_improvement_when_already_optimal_neighborhood() {
        let problem = toy_problem();
        let mut counter = EvalCounter::new();
        // selecting both dependencies of package 1 (benefit 20, size 2+3=5 = capacity) is locally optimal for flips alone
        let current = BitSolution::new(vec![false, true, true]);
        let current_obj = problem.evaluate(&current, &mut counter);
        let step = RefinementStep::new(RefinementKind::FirstImproving, vec![SukpNeighborhood::FlipBit]);
        let mut budget = Budget::new().with_max_tries(1000);
        let mut rng = SmallRng::seed_from_u64(1);
        match apply_step(&problem, &step, &current, current_obj, &mut counter, &mut budget, &mut rng) {
            StepOutcome::Improved(_, obj) => assert!(obj <= current_obj, "flip neighborhood should not beat 20"),
            StepOutcome::NoImprovement => {}
        }
    }
}
