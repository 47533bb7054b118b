use super::instance::SukpInstance;
use super::solution::BitSolution;
use crate::stats::EvalCounter;

/// Sum of benefits of packages whose full dependency set is selected.
/// Partial satisfaction contributes nothing, so this iterates packages
/// rather than bits.
pub fn benefit(instance: &SukpInstance, sol: &BitSolution, counter: &mut EvalCounter) -> u64 {
    counter.tick();
    (0..instance.num_packages())
        .filter(|&p| instance.needs(p).iter().all(|&d| sol.get(d)))
        .map(|p| instance.benefit(p))
        .sum()
}

pub fn used_capacity(instance: &SukpInstance, sol: &BitSolution) -> u64 {
    sol.selected().map(|d| instance.size(d)).sum()
}

pub fn is_feasible(instance: &SukpInstance, sol: &BitSolution) -> bool {
    used_capacity(instance, sol) <= instance.capacity()
}
