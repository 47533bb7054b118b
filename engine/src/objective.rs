//! Direction of optimization and the signed-delta helper that lets the
//! trajectory metaheuristics (simulated annealing, record-to-record travel,
//! great deluge) share one acceptance formula regardless of whether the
//! underlying problem maximizes (SUKP benefit) or minimizes (transport cost).

/// Which direction "better" points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Max,
    Min,
}

impl Sense {
    /// True if `candidate` is strictly better than `incumbent` under this sense.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Sense::Max => candidate > incumbent,
            Sense::Min => candidate < incumbent,
        }
    }

    /// How much better `candidate` is than `incumbent`: positive means
    /// improvement, negative means worsening, independent of sense.
    pub fn improvement_of(self, candidate: f64, incumbent: f64) -> f64 {
        match self {
            Sense::Max => candidate - incumbent,
            Sense::Min => incumbent - candidate,
        }
    }

    /// True if `value` is at least as good as `bound` (non-strict).
    pub fn at_least_as_good(self, value: f64, bound: f64) -> bool {
        match self {
            Sense::Max => value >= bound,
            Sense::Min => value <= bound,
        }
    }

    /// Moves `level` one rain-speed step `r` closer to being harder to
    /// satisfy, per the sense (see great-deluge design note).
    pub fn tighten(self, level: f64, r: f64) -> f64 {
        match self {
            Sense::Min => level - r,
            Sense::Max => level + r,
        }
    }

    pub fn worst_value(self) -> f64 {
        match self {
            Sense::Max => f64::NEG_INFINITY,
            Sense::Min => f64::INFINITY,
        }
    }

    pub fn best(self, a: f64, b: f64) -> f64 {
        if self.improves(a, b) { a } else { b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvement_of_is_symmetric_in_sign() {
        assert_eq!(Sense::Max.improvement_of(10.0, 5.0), 5.0);
        assert_eq!(Sense::Min.improvement_of(5.0, 10.0), 5.0);
        assert_eq!(Sense::Max.improvement_of(5.0, 10.0), -5.0);
        assert_eq!(Sense::Min.improvement_of(10.0, 5.0), -5.0);
    }

    #[test]
    fn tighten_moves_toward_harder_acceptance() {
        assert_eq!(Sense::Min.tighten(100.0, 10.0), 90.0);
        assert_eq!(Sense::Max.tighten(100.0, 10.0), 110.0);
    }
}
