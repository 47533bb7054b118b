use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sukp::BitSolution;

/// Flips `bits_per_mutant` random positions in a `rate` fraction of
/// `population`, chosen without replacement. `rate` is assumed to already be
/// validated against `[0, 1]` by the caller.
pub fn mutate_population(population: &mut [BitSolution], rate: f64, bits_per_mutant: usize, rng: &mut dyn RngCore) {
    if population.is_empty() || bits_per_mutant == 0 {
        return;
    }
    let count = ((population.len() as f64) * rate).floor() as usize;
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.shuffle(rng);
    for &idx in indices.iter().take(count) {
        let chromosome = &mut population[idx];
        if chromosome.is_empty() {
            continue;
        }
        for _ in 0..bits_per_mutant {
            let bit = rand::Rng::random_range(rng, 0..chromosome.len());
            chromosome.flip(bit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn zero_rate_leaves_population_untouched() {
        let mut population = vec![BitSolution::zeros(6), BitSolution::zeros(6)];
        let mut rng = SmallRng::seed_from_u64(1);
        mutate_population(&mut population, 0.0, 1, &mut rng);
        assert!(population.iter().all(|s| s.selected().next().is_none()));
    }

    #[test]
    fn full_rate_mutates_every_individual() {
        let mut population = vec![BitSolution::zeros(6), BitSolution::zeros(6), BitSolution::zeros(6)];
        let mut rng = SmallRng::seed_from_u64(1);
        mutate_population(&mut population, 1.0, 1, &mut rng);
        assert!(population.iter().any(|s| s.selected().next().is_some()));
    }
}
