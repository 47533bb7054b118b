use rand::{Rng, RngCore};

use crate::sukp::BitSolution;

/// Minimum distance a break point must keep from either end of the
/// chromosome, so a crossover never degenerates into copying one parent.
pub const CROSSOVER_MIN_GAP: usize = 5;

/// Cuts both parents at `break_points` (sorted, deduplicated by the caller)
/// and alternates segments between the two children.
pub fn k_point_crossover(parent_a: &BitSolution, parent_b: &BitSolution, break_points: &[usize]) -> (BitSolution, BitSolution) {
    let len = parent_a.len();
    let mut child1 = Vec::with_capacity(len);
    let mut child2 = Vec::with_capacity(len);
    let mut from_a = true;
    let mut start = 0;
    for &end in break_points.iter().chain(std::iter::once(&len)) {
        let end = end.min(len);
        if from_a {
            child1.extend_from_slice(&parent_a.as_slice()[start..end]);
            child2.extend_from_slice(&parent_b.as_slice()[start..end]);
        } else {
            child1.extend_from_slice(&parent_b.as_slice()[start..end]);
            child2.extend_from_slice(&parent_a.as_slice()[start..end]);
        }
        from_a = !from_a;
        start = end;
    }
    (BitSolution::new(child1), BitSolution::new(child2))
}

/// Draws a single break point respecting [`CROSSOVER_MIN_GAP`], or the
/// midpoint if the chromosome is too short to keep the gap on both sides.
pub fn random_break_point(len: usize, rng: &mut dyn RngCore) -> usize {
    if len > 2 * CROSSOVER_MIN_GAP {
        rng.random_range(CROSSOVER_MIN_GAP..(len - CROSSOVER_MIN_GAP))
    } else {
        len / 2
    }
}
