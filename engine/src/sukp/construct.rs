//! Constructive seeders (§4.3). Every seeder returns a feasible solution;
//! none backtrack, all simply skip an item that would overflow the residual
//! capacity.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::instance::SukpInstance;
use super::solution::BitSolution;

/// Which deterministic criterion a greedy seeder sorted dependencies (or
/// packages, for the pack-benefit variant) by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    RatioBenefitOverSize,
    DependencySize,
    PackBenefit,
    DependentsCount,
}

pub const ALL_CRITERIA: [Criterion; 4] = [
    Criterion::RatioBenefitOverSize,
    Criterion::DependencySize,
    Criterion::PackBenefit,
    Criterion::DependentsCount,
];

pub fn create_randomic_solution(instance: &SukpInstance, rng: &mut dyn RngCore) -> BitSolution {
    let mut order: Vec<usize> = (0..instance.num_dependencies()).collect();
    order.shuffle(rng);
    commit_dependencies_in_order(instance, &order)
}

fn commit_dependencies_in_order(instance: &SukpInstance, order: &[usize]) -> BitSolution {
    let mut sol = BitSolution::zeros(instance.num_dependencies());
    let mut used = 0u64;
    for &d in order {
        let size = instance.size(d);
        if used + size <= instance.capacity() {
            sol.set(d, true);
            used += size;
        }
    }
    sol
}

fn dependency_key(instance: &SukpInstance, criterion: Criterion, d: usize) -> f64 {
    match criterion {
        Criterion::RatioBenefitOverSize => {
            let size = instance.size(d);
            if size == 0 {
                f64::INFINITY
            } else {
                instance.total_dependent_benefit(d) as f64 / size as f64
            }
        }
        Criterion::DependencySize => instance.size(d) as f64,
        Criterion::DependentsCount => instance.dependents(d).len() as f64,
        Criterion::PackBenefit => unreachable!("pack-benefit orders packages, not dependencies"),
    }
}

/// Greedy by a per-dependency criterion (ratio, size, or dependents count).
pub fn create_dependency_greedy_solution(instance: &SukpInstance, criterion: Criterion, descending: bool) -> BitSolution {
    let mut order: Vec<usize> = (0..instance.num_dependencies()).collect();
    order.sort_by(|&a, &b| {
        let ka = dependency_key(instance, criterion, a);
        let kb = dependency_key(instance, criterion, b);
        if descending {
            kb.partial_cmp(&ka).unwrap()
        } else {
            ka.partial_cmp(&kb).unwrap()
        }
    });
    commit_dependencies_in_order(instance, &order)
}

/// Greedy by descending package benefit: commits all of a package's missing
/// dependencies at once, only if all of them fit right now.
pub fn create_pack_benefit_greedy_solution(instance: &SukpInstance, descending: bool) -> BitSolution {
    let mut packages: Vec<usize> = (0..instance.num_packages()).collect();
    packages.sort_by(|&a, &b| {
        let (ba, bb) = (instance.benefit(a), instance.benefit(b));
        if descending { bb.cmp(&ba) } else { ba.cmp(&bb) }
    });

    let mut sol = BitSolution::zeros(instance.num_dependencies());
    let mut used = 0u64;
    for p in packages {
        let missing: Vec<usize> = instance.needs(p).iter().copied().filter(|&d| !sol.get(d)).collect();
        let added: u64 = missing.iter().map(|&d| instance.size(d)).sum();
        if used + added <= instance.capacity() {
            for d in missing {
                sol.set(d, true);
            }
            used += added;
        }
    }
    sol
}

/// GRASP-style randomized variant: restrict to the top `cutoff` fraction of
/// the sorted candidate list, then draw uniformly from it without
/// replacement until the list is exhausted.
pub fn create_grasp_solution(
    instance: &SukpInstance,
    criterion: Criterion,
    descending: bool,
    cutoff: f64,
    rng: &mut dyn RngCore,
) -> BitSolution {
    if criterion == Criterion::PackBenefit {
        return create_grasp_pack_benefit_solution(instance, descending, cutoff, rng);
    }
    let mut order: Vec<usize> = (0..instance.num_dependencies()).collect();
    order.sort_by(|&a, &b| {
        let ka = dependency_key(instance, criterion, a);
        let kb = dependency_key(instance, criterion, b);
        if descending {
            kb.partial_cmp(&ka).unwrap()
        } else {
            ka.partial_cmp(&kb).unwrap()
        }
    });
    let take = ((order.len() as f64) * cutoff).ceil().max(1.0) as usize;
    let mut candidates: Vec<usize> = order.into_iter().take(take).collect();
    candidates.shuffle(rng);
    commit_dependencies_in_order(instance, &candidates)
}

fn create_grasp_pack_benefit_solution(
    instance: &SukpInstance,
    descending: bool,
    cutoff: f64,
    rng: &mut dyn RngCore,
) -> BitSolution {
    let mut packages: Vec<usize> = (0..instance.num_packages()).collect();
    packages.sort_by(|&a, &b| {
        let (ba, bb) = (instance.benefit(a), instance.benefit(b));
        if descending { bb.cmp(&ba) } else { ba.cmp(&bb) }
    });
    let take = ((packages.len() as f64) * cutoff).ceil().max(1.0) as usize;
    let mut candidates: Vec<usize> = packages.into_iter().take(take).collect();
    candidates.shuffle(rng);

    let mut sol = BitSolution::zeros(instance.num_dependencies());
    let mut used = 0u64;
    for p in candidates {
        let missing: Vec<usize> = instance.needs(p).iter().copied().filter(|&d| !sol.get(d)).collect();
        let added: u64 = missing.iter().map(|&d| instance.size(d)).sum();
        if used + added <= instance.capacity() {
            for d in missing {
                sol.set(d, true);
            }
            used += added;
        }
    }
    sol
}

/// Runs every deterministic variant in both orderings and returns the
/// highest-benefit result, tagged with the winning criterion and ordering.
pub fn create_best_deterministic_solution(
    instance: &SukpInstance,
) -> (BitSolution, Criterion, bool) {
    let mut best: Option<(BitSolution, Criterion, bool, u64)> = None;
    for &criterion in &ALL_CRITERIA {
        for &descending in &[true, false] {
            let sol = if criterion == Criterion::PackBenefit {
                create_pack_benefit_greedy_solution(instance, descending)
            } else {
                create_dependency_greedy_solution(instance, criterion, descending)
            };
            let mut counter = crate::stats::EvalCounter::new();
            let b = super::evaluator::benefit(instance, &sol, &mut counter);
            if best.as_ref().is_none_or(|(_, _, _, bb)| b > *bb) {
                best = Some((sol, criterion, descending, b));
            }
        }
    }
    let (sol, criterion, descending, _) = best.expect("at least one criterion is always tried");
    (sol, criterion, descending)
}
