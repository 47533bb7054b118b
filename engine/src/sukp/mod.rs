pub mod construct;
pub mod evaluator;
pub mod instance;
pub mod moves;
pub mod solution;

pub use instance::SukpInstance;
pub use moves::{SukpMove, SukpNeighborhood};
pub use solution::BitSolution;

use rand::RngCore;

use crate::objective::Sense;
use crate::problem::Problem;
use crate::stats::EvalCounter;

/// Adapts [`SukpInstance`] to the generic [`Problem`] interface consumed by
/// the refinement steps, local-search loops and trajectory metaheuristics.
pub struct SukpProblem {
    pub instance: SukpInstance,
}

impl SukpProblem {
    pub fn new(instance: SukpInstance) -> Self {
        SukpProblem { instance }
    }
}

impl Problem for SukpProblem {
    type Solution = BitSolution;
    type Move = SukpMove;
    type Neighborhood = SukpNeighborhood;

    fn sense(&self) -> Sense {
        Sense::Max
    }

    fn all_neighborhoods(&self) -> &[Self::Neighborhood] {
        &moves::ALL_NEIGHBORHOODS
    }

    fn evaluate(&self, sol: &Self::Solution, counter: &mut EvalCounter) -> f64 {
        evaluator::benefit(&self.instance, sol, counter) as f64
    }

    fn is_feasible(&self, sol: &Self::Solution) -> bool {
        evaluator::is_feasible(&self.instance, sol)
    }

    fn apply(&self, sol: &Self::Solution, mv: Self::Move) -> (Self::Solution, bool) {
        moves::apply(sol, mv)
    }

    fn is_error(&self, mv: Self::Move) -> bool {
        moves::is_error(mv)
    }

    fn random_move(
        &self,
        sol: &Self::Solution,
        neighborhoods: &[Self::Neighborhood],
        rng: &mut dyn RngCore,
    ) -> Option<Self::Move> {
        moves::random_move(sol, neighborhoods, rng)
    }

    fn enumerate<'a>(
        &'a self,
        sol: &'a Self::Solution,
        neighborhood: Self::Neighborhood,
    ) -> Box<dyn Iterator<Item = Self::Move> + 'a> {
        moves::enumerate(sol, neighborhood)
    }
}
