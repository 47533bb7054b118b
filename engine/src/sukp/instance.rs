use crate::error::{InstanceError, InstanceResult};

/// Parameters of a Set-Union Knapsack instance. Immutable once built; the
/// `needs`/`dependents` views are precomputed so the evaluator never walks
/// the raw requirement list.
#[derive(Debug, Clone)]
pub struct SukpInstance {
    capacity: u64,
    benefits: Vec<u64>,
    sizes: Vec<u64>,
    /// `needs[p]` = dependencies required by package `p`.
    needs: Vec<Vec<usize>>,
    /// `dependents[d]` = packages that require dependency `d`.
    dependents: Vec<Vec<usize>>,
}

impl SukpInstance {
    /// `requirements` is the list of `(package, dependency)` incidence pairs.
    pub fn new(
        capacity: u64,
        benefits: Vec<u64>,
        sizes: Vec<u64>,
        requirements: Vec<(usize, usize)>,
    ) -> InstanceResult<Self> {
        let num_packages = benefits.len();
        let num_deps = sizes.len();

        let mut needs = vec![Vec::new(); num_packages];
        let mut dependents = vec![Vec::new(); num_deps];
        let mut seen = std::collections::HashSet::with_capacity(requirements.len());

        for (p, d) in requirements {
            if p >= num_packages {
                return Err(InstanceError::IndexOutOfRange {
                    what: "requirement package index",
                    index: p,
                    bound: num_packages,
                });
            }
            if d >= num_deps {
                return Err(InstanceError::IndexOutOfRange {
                    what: "requirement dependency index",
                    index: d,
                    bound: num_deps,
                });
            }
            if !seen.insert((p, d)) {
                return Err(InstanceError::DuplicateRequirement {
                    package: p,
                    dependency: d,
                });
            }
            needs[p].push(d);
            dependents[d].push(p);
        }

        for v in needs.iter_mut().chain(dependents.iter_mut()) {
            v.sort_unstable();
        }

        Ok(SukpInstance {
            capacity,
            benefits,
            sizes,
            needs,
            dependents,
        })
    }

    pub fn num_packages(&self) -> usize {
        self.benefits.len()
    }

    pub fn num_dependencies(&self) -> usize {
        self.sizes.len()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn benefit(&self, package: usize) -> u64 {
        self.benefits[package]
    }

    pub fn size(&self, dependency: usize) -> u64 {
        self.sizes[dependency]
    }

    pub fn needs(&self, package: usize) -> &[usize] {
        &self.needs[package]
    }

    pub fn dependents(&self, dependency: usize) -> &[usize] {
        &self.dependents[dependency]
    }

    /// Total benefit of all packages that depend (at least partly) on `d`,
    /// used by the ratio-greedy seeder (§4.3 variant 2).
    pub fn total_dependent_benefit(&self, dependency: usize) -> u64 {
        self.dependents[dependency].iter().map(|&p| self.benefits[p]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /* === Factories === */

    fn toy_instance() -> SukpInstance {
        // 2 packages, 3 dependencies, capacity 5.
        // package 0 needs {0,1}, package 1 needs {1,2}.
        SukpInstance::new(5, vec![10, 20], vec![1, 2, 3], vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap()
    }

    /* === Tests === */

    #[test]
    fn derived_views_are_consistent_with_requirements() {
        let inst = toy_instance();
        assert_eq!(inst.needs(0), &[0, 1]);
        assert_eq!(inst.needs(1), &[1, 2]);
        assert_eq!(inst.dependents(1), &[0, 1]);
    }

    #[test]
    fn duplicate_requirement_is_rejected() {
        let res = SukpInstance::new(5, vec![10], vec![1], vec![(0, 0), (0, 0)]);
        assert_eq!(
            res,
            Err(InstanceError::DuplicateRequirement { package: 0, dependency: 0 })
        );
    }

    #[test]
    fn out_of_range_package_is_rejected() {
        let res = SukpInstance::new(5, vec![10], vec![1], vec![(1, 0)]);
        assert!(matches!(res, Err(InstanceError::IndexOutOfRange { .. })));
    }

    #[test]
    fn total_dependent_benefit_sums_requesting_packages() {
        let inst = toy_instance();
        assert_eq!(inst.total_dependent_benefit(1), 30);
        assert_eq!(inst.total_dependent_benefit(0), 10);
    }
}
