//! Simulated annealing with initial-temperature calibration (§4.6).

use env_param::EnvParam;
use rand::{Rng, RngCore};

use crate::budget::{Budget, TerminationReason};
use crate::problem::Problem;
use crate::stats::{EvalCounter, SearchResult, Stats};

pub static INITIAL_TEMPERATURE_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_SA_INITIAL_TEMPERATURE", "1000");
pub static ALPHA_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_SA_ALPHA", "0.95");
pub static BETA_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_SA_BETA", "1.125");
pub static GAMMA_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_SA_GAMMA", "0.9");
pub static MAX_TRIES_DEFAULT: EnvParam<u64> = EnvParam::new("METASOLVE_SA_MAX_TRIES", "10000");

/// Temperature floor. The original's cold-end condition (`T > 0/T0`) is
/// always true and never actually stops the loop; this crate instead
/// terminates once `T <= T_MIN`, a deliberate, documented fix rather than a
/// silent one.
pub static T_MIN: EnvParam<f64> = EnvParam::new("METASOLVE_SA_T_MIN", "1.0");

/// Raises `t0` by `beta` until a `tries_window`-long Metropolis trial at
/// that temperature accepts at least `gamma` of its proposals, then returns
/// the useful temperature.
#[allow(clippy::too_many_arguments)]
pub fn calibrate_initial_temperature<P: Problem>(
    problem: &P,
    current: &P::Solution,
    current_obj: f64,
    neighborhoods: &[P::Neighborhood],
    counter: &mut EvalCounter,
    rng: &mut dyn RngCore,
    t0: f64,
    beta: f64,
    gamma: f64,
    tries_window: u64,
) -> f64 {
    let mut t = t0;
    loop {
        let mut accepted = 0u64;
        let mut sol = current.clone();
        let mut obj = current_obj;
        for _ in 0..tries_window {
            let Some(mv) = problem.random_move(&sol, neighborhoods, rng) else {
                continue;
            };
            if problem.is_error(mv) {
                continue;
            }
            let (candidate, applied) = problem.apply(&sol, mv);
            if !applied || !problem.is_feasible(&candidate) {
                continue;
            }
            let candidate_obj = problem.evaluate(&candidate, counter);
            if metropolis_accept(problem, candidate_obj, obj, t, rng) {
                sol = candidate;
                obj = candidate_obj;
                accepted += 1;
            }
        }
        if accepted as f64 >= gamma * tries_window as f64 {
            return t;
        }
        t *= beta;
    }
}

fn metropolis_accept<P: Problem>(problem: &P, candidate_obj: f64, current_obj: f64, t: f64, rng: &mut dyn RngCore) -> bool {
    let delta = problem.sense().improvement_of(candidate_obj, current_obj);
    delta > 0.0 || rng.random::<f64>() < (delta / t).exp()
}

pub fn run<P: Problem>(
    problem: &P,
    neighborhoods: &[P::Neighborhood],
    initial: P::Solution,
    initial_temperature: f64,
    alpha: f64,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> SearchResult<P::Solution> {
    let mut counter = EvalCounter::new();
    let mut current = initial;
    let mut current_obj = problem.evaluate(&current, &mut counter);
    let mut best = current.clone();
    let mut best_obj = current_obj;
    let mut t = initial_temperature;
    let t_min = T_MIN.get();
    let mut stats = Stats::new(TerminationReason::Exhausted);

    tracing::debug!(initial_temperature, alpha, t_min, start_objective = current_obj, "simulated annealing starting");

    let termination = loop {
        if t <= t_min {
            break TerminationReason::Exhausted;
        }
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
        if metropolis_accept(problem, candidate_obj, current_obj, t, rng) {
            current = candidate;
            current_obj = candidate_obj;
            stats.accepted_moves += 1;
            if problem.sense().improves(current_obj, best_obj) {
                best = current.clone();
                best_obj = current_obj;
                tracing::trace!(objective = best_obj, temperature = t, "simulated annealing improved the record");
                budget.record_improvement();
            } else {
                budget.record_no_improvement();
            }
        } else {
            budget.record_no_improvement();
        }
        t *= alpha;
    };

    stats.termination = termination;
    stats.best_objective = best_obj;
    stats.evaluations = counter.count();
    tracing::debug!(?termination, objective = best_obj, iterations = stats.iterations, "simulated annealing finished");
    SearchResult { solution: best, objective: best_obj, stats }
}
