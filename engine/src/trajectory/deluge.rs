//! Great Deluge (§4.6): accepts any neighbor within a "water level" that
//! tightens over time. The source this was grounded on only implements the
//! minimization direction; the maximization dual here is an explicit,
//! documented generalization (raising the level instead of lowering it)
//! rather than a literal translation.

use env_param::EnvParam;
use rand::RngCore;

use crate::budget::{Budget, TerminationReason};
use crate::objective::Sense;
use crate::problem::Problem;
use crate::stats::{EvalCounter, SearchResult, Stats};

pub static RAIN_SPEED_FACTOR_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_DELUGE_RAIN_SPEED_FACTOR", "1.0");
pub static INNER_MAX_TRIES_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_DELUGE_INNER_MAX_TRIES", "1000");
pub static OUTER_MAX_TRIES_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_DELUGE_OUTER_MAX_TRIES", "10000");
pub static MAX_NO_IMPROVEMENT_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_DELUGE_MAX_NO_IMPROVEMENT", "1000");

pub fn run<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    initial: P::Solution,
    rain_factor: f64,
    outer_try_budget: u64,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> SearchResult<P::Solution> {
    let mut counter = EvalCounter::new();
    let mut current = initial;
    let mut current_obj = problem.evaluate(&current, &mut counter);
    let mut best = current.clone();
    let mut best_obj = current_obj;
    let rain_speed = rain_factor * current_obj.abs().max(1.0) / (outer_try_budget.max(1) as f64);
    let mut level = current_obj;
    let mut stats = Stats::new(TerminationReason::Exhausted);

    tracing::debug!(rain_speed, start_objective = current_obj, "great deluge starting");

    let sense = problem.sense();
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
        if sense.at_least_as_good(candidate_obj, level) {
            current = candidate;
            current_obj = candidate_obj;
            stats.accepted_moves += 1;
            if sense.improves(current_obj, best_obj) {
                best = current.clone();
                best_obj = current_obj;
                tracing::trace!(objective = best_obj, level, "great deluge improved the record");
                budget.record_improvement();
            } else {
                budget.record_no_improvement();
            }
        } else {
            budget.record_no_improvement();
        }
        level = sense.tighten(level, rain_speed);
    };

    stats.termination = termination;
    stats.best_objective = best_obj;
    stats.evaluations = counter.count();
    tracing::debug!(?termination, objective = best_obj, iterations = stats.iterations, "great deluge finished");
    SearchResult { solution: best, objective: best_obj, stats }
}
