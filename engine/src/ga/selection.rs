use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionMethod {
    Roulette,
    Sus,
    Tournament(usize),
}

pub fn select_parents(weights: &[f64], count: usize, method: SelectionMethod, rng: &mut dyn RngCore) -> Vec<usize> {
    match method {
        SelectionMethod::Roulette => roulette(weights, count, rng),
        SelectionMethod::Sus => sus(weights, count, rng),
        SelectionMethod::Tournament(k) => (0..count).map(|_| tournament(weights, k, rng)).collect(),
    }
}

fn roulette(weights: &[f64], count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return (0..count).map(|_| rng.random_range(0..weights.len())).collect();
    }
    (0..count)
        .map(|_| {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            for (i, &w) in weights.iter().enumerate() {
                acc += w;
                if acc >= target {
                    return i;
                }
            }
            weights.len() - 1
        })
        .collect()
}

/// Stochastic universal sampling: one random start, `count` equally spaced
/// pointers walked once across the cumulative-weight wheel.
fn sus(weights: &[f64], count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || count == 0 {
        return (0..count).map(|_| rng.random_range(0..weights.len())).collect();
    }
    let step = total / count as f64;
    let start = rng.random::<f64>() * step;
    let mut result = Vec::with_capacity(count);
    let mut acc = weights[0];
    let mut idx = 0;
    for k in 0..count {
        let pointer = start + k as f64 * step;
        while acc < pointer && idx + 1 < weights.len() {
            idx += 1;
            acc += weights[idx];
        }
        result.push(idx);
    }
    result
}

fn tournament(weights: &[f64], k: usize, rng: &mut dyn RngCore) -> usize {
    let n = weights.len();
    let k = k.min(n).max(1);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
        .into_iter()
        .take(k)
        .max_by(|&a, &b| weights[a].partial_cmp(&weights[b]).unwrap())
        .unwrap()
}

/// Transforms raw fitnesses into linear-rank selection weights: rank 1 is
/// worst, rank N is best, and `pressure` (in `[1, 2]`) trades off how much
/// more likely the best individual is to be picked over a uniform draw.
pub fn linear_rank_weights(fitnesses: &[f64], pressure: f64) -> ConfigResult<Vec<f64>> {
    if !(1.0..=2.0).contains(&pressure) {
        return Err(ConfigError::SelectionPressureOutOfRange(pressure));
    }
    let n = fitnesses.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut by_fitness: Vec<usize> = (0..n).collect();
    by_fitness.sort_by(|&a, &b| fitnesses[a].partial_cmp(&fitnesses[b]).unwrap());
    let mut rank_of = vec![0usize; n];
    for (rank, &idx) in by_fitness.iter().enumerate() {
        rank_of[idx] = rank + 1;
    }
    if n == 1 {
        return Ok(vec![1.0]);
    }
    let weights = (0..n)
        .map(|i| {
            let rank = rank_of[i] as f64;
            (1.0 / n as f64) * (pressure - 2.0 * (pressure - 1.0) * (rank - 1.0) / (n as f64 - 1.0))
        })
        .collect();
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn roulette_never_picks_outside_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        let weights = vec![1.0, 2.0, 3.0];
        for idx in roulette(&weights, 50, &mut rng) {
            assert!(idx < weights.len());
        }
    }

    #[test]
    fn sus_returns_requested_count() {
        let mut rng = SmallRng::seed_from_u64(6);
        let weights = vec![1.0, 1.0, 1.0, 1.0];
        assert_eq!(sus(&weights, 4, &mut rng).len(), 4);
    }

    #[test]
    fn linear_rank_weights_sum_to_one() {
        let fitnesses = vec![5.0, 1.0, 3.0, 9.0];
        let weights = linear_rank_weights(&fitnesses, 1.5).unwrap();
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn linear_rank_rejects_out_of_range_pressure() {
        assert!(linear_rank_weights(&[1.0, 2.0], 3.0).is_err());
    }
}
