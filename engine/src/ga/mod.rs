//! Genetic algorithm over the boolean chromosome encoding (§4.7). Kept
//! outside the generic [`crate::problem::Problem`] machinery: crossover and
//! mutation are defined directly in terms of bit vectors, not of the move
//! library shared by the local-search and trajectory metaheuristics.

pub mod crossover;
pub mod mutation;
pub mod selection;

use std::collections::HashSet;

use env_param::EnvParam;
use rand::RngCore;

use crate::budget::{Budget, TerminationReason};
use crate::error::{ConfigError, ConfigResult};
use crate::objective::Sense;
use crate::problem::Problem;
use crate::stats::{EvalCounter, Stats};
use crate::sukp::{BitSolution, SukpProblem};
use selection::SelectionMethod;

pub static GENERATIONS_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_GENERATIONS", "20");
pub static GENES_PER_GENERATION_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_GENES_PER_GENERATION", "200");
pub static ELITISM_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_ELITISM", "1");
pub static MUTATION_DEFAULT: EnvParam<f64> = EnvParam::new("METASOLVE_GA_MUTATION", "0.01");
pub static MUTATIONS_PER_GENE_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_MUTATIONS_PER_GENE", "1");
pub static PARENTS_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_PARENTS", "100");
pub static LINEAR_RANK_SELECTION_PRESSURE: EnvParam<f64> = EnvParam::new("METASOLVE_GA_SELECTION_PRESSURE", "1.5");
pub static TOURNAMENT_SIZE_DEFAULT: EnvParam<u32> = EnvParam::new("METASOLVE_GA_TOURNAMENT_SIZE", "10");

/// Attempts per individual the population seeding and offspring-filling
/// loops allow before giving up on producing one more unique feasible
/// chromosome.
const ATTEMPTS_PER_INDIVIDUAL: u32 = 50;

pub struct GaConfig {
    pub population_size: usize,
    pub generations: u32,
    pub elitism: usize,
    pub mutation_rate: f64,
    pub mutations_per_gene: usize,
    pub selection: SelectionMethod,
    pub use_rank_transform: bool,
    pub selection_pressure: f64,
    pub parents_per_generation: usize,
}

impl GaConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }
        if let SelectionMethod::Tournament(k) = self.selection {
            if k == 0 {
                return Err(ConfigError::ZeroTournamentSize);
            }
        }
        if self.use_rank_transform && !(1.0..=2.0).contains(&self.selection_pressure) {
            return Err(ConfigError::SelectionPressureOutOfRange(self.selection_pressure));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GaResult {
    pub solution: BitSolution,
    pub objective: f64,
    pub generation_found: u32,
    pub stats: Stats,
}

/// Produces `size` unique feasible chromosomes by repeatedly applying a
/// valid random move to `seed` and keeping the ones that stay feasible,
/// bounded by [`ATTEMPTS_PER_INDIVIDUAL`] attempts per slot.
fn initial_population(problem: &SukpProblem, seed: &BitSolution, size: usize, rng: &mut dyn RngCore) -> Vec<BitSolution> {
    let mut population = Vec::with_capacity(size);
    let mut seen: HashSet<u128> = HashSet::new();
    population.push(seed.clone());
    seen.insert(seed.to_integer());

    let max_attempts = (size as u32).saturating_mul(ATTEMPTS_PER_INDIVIDUAL).max(200);
    let mut attempts = 0;
    while population.len() < size && attempts < max_attempts {
        attempts += 1;
        let Some(mv) = problem.valid_random_move(seed, problem.all_neighborhoods(), rng, 20) else {
            continue;
        };
        let (candidate, applied) = problem.apply(seed, mv);
        if !applied || !problem.is_feasible(&candidate) {
            continue;
        }
        if seen.insert(candidate.to_integer()) {
            population.push(candidate);
        }
    }
    population
}

fn fill_from_parents(
    problem: &SukpProblem,
    parent_pool: &[BitSolution],
    running_keys: &mut HashSet<u128>,
    target_size: usize,
    rng: &mut dyn RngCore,
) -> Vec<BitSolution> {
    use rand::Rng;

    let mut filled = Vec::new();
    if parent_pool.is_empty() {
        return filled;
    }
    let max_attempts = (target_size as u32).saturating_mul(ATTEMPTS_PER_INDIVIDUAL).max(200);
    let mut attempts = 0;
    while filled.len() < target_size && attempts < max_attempts {
        attempts += 1;
        let parent = &parent_pool[rng.random_range(0..parent_pool.len())];
        let Some(mv) = problem.valid_random_move(parent, problem.all_neighborhoods(), rng, 20) else {
            continue;
        };
        let (candidate, applied) = problem.apply(parent, mv);
        if !applied || !problem.is_feasible(&candidate) {
            continue;
        }
        let key = candidate.to_integer();
        if running_keys.insert(key) {
            filled.push(candidate);
        }
    }
    filled
}

/// Runs the genetic algorithm to termination (generation budget, wall-clock,
/// or attempt exhaustion) and returns the best chromosome observed together
/// with the generation it was first recorded in.
pub fn run(
    problem: &SukpProblem,
    config: &GaConfig,
    seed: BitSolution,
    mut budget: Budget,
    rng: &mut dyn RngCore,
) -> ConfigResult<GaResult> {
    config.validate()?;

    let mut counter = EvalCounter::new();
    let mut population = initial_population(problem, &seed, config.population_size, rng);
    let mut fitnesses: Vec<f64> = population.iter().map(|s| problem.evaluate(s, &mut counter)).collect();

    let sense = problem.sense();
    debug_assert_eq!(sense, Sense::Max);

    let initial_best_idx = argbest(&fitnesses, sense);
    let mut best = population[initial_best_idx].clone();
    let mut best_obj = fitnesses[initial_best_idx];
    let mut best_generation = 0u32;

    let mut stats = Stats::new(TerminationReason::Exhausted);

    tracing::debug!(
        population_size = config.population_size,
        generations = config.generations,
        start_objective = best_obj,
        "genetic algorithm starting"
    );

    let termination = loop {
        if let Some(reason) = budget.should_stop() {
            break reason;
        }
        if stats.iterations >= config.generations as u64 {
            break TerminationReason::Exhausted;
        }
        stats.iterations += 1;
        budget.record_try();

        // Elite: top unique individuals, carried over unchanged.
        let mut by_fitness: Vec<usize> = (0..population.len()).collect();
        by_fitness.sort_by(|&a, &b| fitnesses[b].partial_cmp(&fitnesses[a]).unwrap());
        let mut running_keys: HashSet<u128> = HashSet::new();
        let mut next_population: Vec<BitSolution> = Vec::with_capacity(config.population_size);
        for &idx in &by_fitness {
            if next_population.len() >= config.elitism {
                break;
            }
            let key = population[idx].to_integer();
            if running_keys.insert(key) {
                next_population.push(population[idx].clone());
            }
        }
        let elite_count = next_population.len();

        // Parent selection, optionally via a linear-rank weight transform.
        let weights = if config.use_rank_transform {
            selection::linear_rank_weights(&fitnesses, config.selection_pressure)?
        } else {
            fitnesses.clone()
        };
        let parent_indices =
            selection::select_parents(&weights, config.parents_per_generation, config.selection, rng);
        let parent_pool: Vec<BitSolution> = parent_indices.iter().map(|&i| population[i].clone()).collect();

        // Survivors: selected parents not already carried over as elite.
        for parent in &parent_pool {
            if next_population.len() >= config.population_size {
                break;
            }
            let key = parent.to_integer();
            if running_keys.insert(key) {
                next_population.push(parent.clone());
            }
        }

        // Offspring via crossover, rejecting infeasible or duplicate children.
        let mut attempts = 0u32;
        let max_crossover_attempts =
            ((config.population_size as u32).saturating_mul(ATTEMPTS_PER_INDIVIDUAL)).max(200);
        while next_population.len() < config.population_size
            && parent_pool.len() >= 2
            && attempts < max_crossover_attempts
        {
            attempts += 1;
            let a = &parent_pool[rand::Rng::random_range(rng, 0..parent_pool.len())];
            let b = &parent_pool[rand::Rng::random_range(rng, 0..parent_pool.len())];
            let len = a.len();
            if len == 0 {
                break;
            }
            let point = crossover::random_break_point(len, rng);
            let (child_a, child_b) = crossover::k_point_crossover(a, b, &[point]);
            for child in [child_a, child_b] {
                if next_population.len() >= config.population_size {
                    break;
                }
                if !problem.is_feasible(&child) {
                    stats.infeasible_rejections += 1;
                    continue;
                }
                let key = child.to_integer();
                if running_keys.insert(key) {
                    next_population.push(child);
                }
            }
        }

        // Fallback fill: draw from the selected parent pool, not the
        // original seed, so a starved crossover doesn't collapse diversity
        // back to one ancestor.
        if next_population.len() < config.population_size {
            let shortfall = config.population_size - next_population.len();
            let filled = fill_from_parents(problem, &parent_pool, &mut running_keys, shortfall, rng);
            next_population.extend(filled);
        }

        // Mutation: applied to everyone except the preserved elite.
        let (_, rest) = next_population.split_at_mut(elite_count.min(next_population.len()));
        mutation::mutate_population(rest, config.mutation_rate, config.mutations_per_gene, rng);

        population = next_population;
        fitnesses = population.iter().map(|s| problem.evaluate(s, &mut counter)).collect();

        let gen_best_idx = argbest(&fitnesses, sense);
        if sense.improves(fitnesses[gen_best_idx], best_obj) {
            best = population[gen_best_idx].clone();
            best_obj = fitnesses[gen_best_idx];
            best_generation = stats.iterations as u32;
            stats.accepted_moves += 1;
            tracing::trace!(generation = best_generation, objective = best_obj, "genetic algorithm improved the record");
            budget.record_improvement();
        } else {
            budget.record_no_improvement();
        }
    };

    stats.termination = termination;
    stats.best_objective = best_obj;
    stats.evaluations = counter.count();
    tracing::debug!(
        ?termination,
        objective = best_obj,
        generation_found = best_generation,
        "genetic algorithm finished"
    );
    Ok(GaResult { solution: best, objective: best_obj, generation_found: best_generation, stats })
}

fn argbest(fitnesses: &[f64], sense: Sense) -> usize {
    let mut best = 0;
    for i in 1..fitnesses.len() {
        if sense.improves(fitnesses[i], fitnesses[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sukp::SukpInstance;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn toy_problem() -> SukpProblem {
        let inst = SukpInstance::new(5, vec![10, 30], vec![1, 4], vec![(0, 0), (1, 0), (1, 1)]).unwrap();
        SukpProblem::new(inst)
    }

    fn toy_config() -> GaConfig {
        GaConfig {
            population_size: 8,
            generations: 10,
            elitism: 1,
            mutation_rate: 0.2,
            mutations_per_gene: 1,
            selection: SelectionMethod::Tournament(3),
            use_rank_transform: false,
            selection_pressure: 1.5,
            parents_per_generation: 6,
        }
    }

    #[test]
    fn ga_never_returns_worse_than_the_seed() {
        let problem = toy_problem();
        let seed = BitSolution::zeros(2);
        let mut counter = EvalCounter::new();
        let seed_obj = problem.evaluate(&seed, &mut counter);

        let budget = Budget::new().with_max_tries(50);
        let mut rng = SmallRng::seed_from_u64(21);
        let result = run(&problem, &toy_config(), seed, budget, &mut rng).unwrap();
        assert!(result.objective >= seed_obj);
    }

    #[test]
    fn ga_rejects_zero_population() {
        let problem = toy_problem();
        let mut config = toy_config();
        config.population_size = 0;
        let budget = Budget::new().with_max_tries(5);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(run(&problem, &config, BitSolution::zeros(2), budget, &mut rng).is_err());
    }

    #[test]
    fn ga_rejects_zero_tournament_size() {
        let problem = toy_problem();
        let mut config = toy_config();
        config.selection = SelectionMethod::Tournament(0);
        let budget = Budget::new().with_max_tries(5);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(run(&problem, &config, BitSolution::zeros(2), budget, &mut rng).is_err());
    }

    #[test]
    fn ga_reports_feasible_solution_only() {
        let problem = toy_problem();
        let seed = BitSolution::zeros(2);
        let budget = Budget::new().with_max_tries(50);
        let mut rng = SmallRng::seed_from_u64(33);
        let result = run(&problem, &toy_config(), seed, budget, &mut rng).unwrap();
        assert!(problem.is_feasible(&result.solution));
    }
}
