//! The uniform interface that lets the refinement steps, local-search loops
//! and trajectory metaheuristics (§4.4–§4.6) operate identically over both
//! problems. The genetic algorithm (§4.7) is deliberately *not* expressed
//! against this trait: it is specific to the boolean-chromosome encoding.

use rand::RngCore;

use crate::objective::Sense;
use crate::stats::EvalCounter;

/// A problem that can be searched by the shared local-search and trajectory
/// machinery: an objective, a feasibility predicate, and a move library.
pub trait Problem {
    type Solution: Clone;
    type Move: Copy + Clone + PartialEq + std::fmt::Debug;
    type Neighborhood: Copy + Clone + PartialEq + std::fmt::Debug;

    fn sense(&self) -> Sense;

    /// All neighborhoods this problem exposes, in a stable canonical order.
    fn all_neighborhoods(&self) -> &[Self::Neighborhood];

    /// Objective value of `sol`. Always ticks `counter` exactly once.
    fn evaluate(&self, sol: &Self::Solution, counter: &mut EvalCounter) -> f64;

    fn is_feasible(&self, sol: &Self::Solution) -> bool;

    /// Applies `mv` to `sol`, returning the neighbor and whether the move
    /// actually changed anything (an "error"/degenerate move returns the
    /// input unchanged with `false`).
    fn apply(&self, sol: &Self::Solution, mv: Self::Move) -> (Self::Solution, bool);

    fn is_error(&self, mv: Self::Move) -> bool;

    /// Draws one syntactically-valid move at random from the union of the
    /// given neighborhoods (or all neighborhoods, if empty), or `None` if no
    /// neighborhood in the selection currently admits any move (e.g. an
    /// empty solution and a neighborhood requiring two points).
    fn random_move(
        &self,
        sol: &Self::Solution,
        neighborhoods: &[Self::Neighborhood],
        rng: &mut dyn RngCore,
    ) -> Option<Self::Move>;

    /// Enumerates every move of `neighborhood` applicable to `sol`, in a
    /// deterministic lexicographic order over its parameters.
    fn enumerate<'a>(
        &'a self,
        sol: &'a Self::Solution,
        neighborhood: Self::Neighborhood,
    ) -> Box<dyn Iterator<Item = Self::Move> + 'a>;

    /// Retries [`Problem::random_move`] up to `max_tries` times, returning
    /// the first non-error move (mirrors `getValidRandomMove`).
    fn valid_random_move(
        &self,
        sol: &Self::Solution,
        neighborhoods: &[Self::Neighborhood],
        rng: &mut dyn RngCore,
        max_tries: u32,
    ) -> Option<Self::Move> {
        for _ in 0..max_tries {
            if let Some(mv) = self.random_move(sol, neighborhoods, rng) {
                if !self.is_error(mv) {
                    return Some(mv);
                }
            }
        }
        None
    }
}
