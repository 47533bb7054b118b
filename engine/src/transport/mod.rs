pub mod construct;
pub mod evaluator;
pub mod instance;
pub mod moves;
pub mod solution;

pub use evaluator::Metric;
pub use instance::TransportInstance;
pub use moves::{TransportMove, TransportNeighborhood};
pub use solution::{Going, RouteSolution};

use rand::RngCore;

use crate::objective::Sense;
use crate::problem::Problem;
use crate::stats::EvalCounter;

/// Adapts [`TransportInstance`] to the generic [`Problem`] interface.
/// Restricts local search to the permutation-preserving operators since a
/// feasible route already visits every point exactly once; insert/remove
/// remain available directly through [`moves`] for seeding or
/// construction-time use.
pub struct TransportProblem {
    pub instance: TransportInstance,
    pub metric: Metric,
}

impl TransportProblem {
    pub fn new(instance: TransportInstance, metric: Metric) -> Self {
        TransportProblem { instance, metric }
    }
}

impl Problem for TransportProblem {
    type Solution = RouteSolution;
    type Move = TransportMove;
    type Neighborhood = TransportNeighborhood;

    fn sense(&self) -> Sense {
        Sense::Min
    }

    fn all_neighborhoods(&self) -> &[Self::Neighborhood] {
        &moves::PERMUTATION_NEIGHBORHOODS
    }

    fn evaluate(&self, sol: &Self::Solution, counter: &mut EvalCounter) -> f64 {
        evaluator::cost(&self.instance, sol, self.metric, counter)
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
        let max_point = self.instance.num_points() - 1;
        moves::random_move(sol, max_point, neighborhoods, rng)
    }

    fn enumerate<'a>(
        &'a self,
        sol: &'a Self::Solution,
        neighborhood: Self::Neighborhood,
    ) -> Box<dyn Iterator<Item = Self::Move> + 'a> {
        moves::enumerate(sol, neighborhood)
    }
}
