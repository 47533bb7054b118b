//! Route neighborhood operators. The full operator set mirrors the
//! move library used during seeding (which may grow or shrink a partial
//! route); once a route is complete, [`TransportProblem`](super::TransportProblem)
//! restricts local search to the four permutation-preserving operators
//! (swap/reverse/shift/move) since insert/remove would otherwise have to
//! be paired to keep every point visited exactly once.

use rand::{Rng, RngCore};

use super::solution::{Going, RouteSolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportNeighborhood {
    InsertPoint,
    RemovePointByIndex,
    RemovePointByValue,
    SwapPoints,
    ReverseSegment,
    ShiftSegment,
    MoveSegment,
}

pub const ALL_NEIGHBORHOODS: [TransportNeighborhood; 7] = [
    TransportNeighborhood::InsertPoint,
    TransportNeighborhood::RemovePointByIndex,
    TransportNeighborhood::RemovePointByValue,
    TransportNeighborhood::SwapPoints,
    TransportNeighborhood::ReverseSegment,
    TransportNeighborhood::ShiftSegment,
    TransportNeighborhood::MoveSegment,
];

pub const PERMUTATION_NEIGHBORHOODS: [TransportNeighborhood; 4] = [
    TransportNeighborhood::SwapPoints,
    TransportNeighborhood::ReverseSegment,
    TransportNeighborhood::ShiftSegment,
    TransportNeighborhood::MoveSegment,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMove {
    InsertPoint(usize, usize),
    RemovePointByIndex(usize),
    RemovePointByValue(usize),
    SwapPoints(usize, usize),
    ReverseSegment(usize, usize),
    ShiftSegment(usize, usize, usize),
    MoveSegment(usize, usize, usize),
    Error,
}

pub fn is_error(mv: TransportMove) -> bool {
    matches!(mv, TransportMove::Error)
}

pub fn apply(sol: &RouteSolution, mv: TransportMove) -> (RouteSolution, bool) {
    let going = sol.going();
    let points = sol.as_slice();
    match mv {
        TransportMove::InsertPoint(index, value) => {
            let mut v = points.to_vec();
            v.insert(index.min(v.len()), value);
            (RouteSolution::new(v, going), true)
        }
        TransportMove::RemovePointByIndex(index) => {
            let mut v = points.to_vec();
            v.remove(index);
            (RouteSolution::new(v, going), true)
        }
        TransportMove::RemovePointByValue(value) => {
            let mut v = points.to_vec();
            if let Some(pos) = v.iter().position(|&p| p == value) {
                v.remove(pos);
            }
            (RouteSolution::new(v, going), true)
        }
        TransportMove::SwapPoints(i, j) => {
            let mut v = points.to_vec();
            v.swap(i, j);
            (RouteSolution::new(v, going), true)
        }
        TransportMove::ReverseSegment(l, r) => {
            let mut v = points.to_vec();
            v[l..=r].reverse();
            (RouteSolution::new(v, going), true)
        }
        TransportMove::ShiftSegment(l, r, positions) => {
            let seg_len = r - l + 1;
            let positions = positions % seg_len;
            let mut v = points.to_vec();
            if positions != 0 {
                let segment = v[l..=r].to_vec();
                let mut rotated = Vec::with_capacity(seg_len);
                rotated.extend_from_slice(&segment[positions..]);
                rotated.extend_from_slice(&segment[..positions]);
                v[l..=r].copy_from_slice(&rotated);
            }
            (RouteSolution::new(v, going), true)
        }
        TransportMove::MoveSegment(l, r, pos) => {
            let mut v = points.to_vec();
            let segment: Vec<usize> = v.drain(l..=r).collect();
            for (offset, value) in segment.into_iter().enumerate() {
                v.insert(pos + offset, value);
            }
            (RouteSolution::new(v, going), true)
        }
        TransportMove::Error => (sol.clone(), false),
    }
}

fn legal_neighborhoods(len: usize, requested: &[TransportNeighborhood]) -> Vec<TransportNeighborhood> {
    let base: &[TransportNeighborhood] = if requested.is_empty() {
        &ALL_NEIGHBORHOODS
    } else {
        requested
    };
    base.iter()
        .copied()
        .filter(|n| match n {
            TransportNeighborhood::InsertPoint => true,
            TransportNeighborhood::RemovePointByIndex | TransportNeighborhood::RemovePointByValue => len >= 1,
            _ => len >= 2,
        })
        .collect()
}

fn random_segment(len: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let l = rng.random_range(0..len - 1);
    let r = rng.random_range(l + 1..len);
    (l, r)
}

/// `max_point` is the largest valid flat point index (`num_points - 1`),
/// needed only by `InsertPoint` since it may introduce a point value the
/// current (possibly partial) route doesn't yet contain.
pub fn random_move(
    sol: &RouteSolution,
    max_point: usize,
    neighborhoods: &[TransportNeighborhood],
    rng: &mut dyn RngCore,
) -> Option<TransportMove> {
    let len = sol.len();
    let legal = legal_neighborhoods(len, neighborhoods);
    if legal.is_empty() {
        return None;
    }
    let choice = legal[rng.random_range(0..legal.len())];
    Some(match choice {
        TransportNeighborhood::InsertPoint => {
            let index = rng.random_range(0..=len);
            let value = rng.random_range(0..=max_point);
            TransportMove::InsertPoint(index, value)
        }
        TransportNeighborhood::RemovePointByIndex => TransportMove::RemovePointByIndex(rng.random_range(0..len)),
        TransportNeighborhood::RemovePointByValue => {
            let points = sol.as_slice();
            TransportMove::RemovePointByValue(points[rng.random_range(0..len)])
        }
        TransportNeighborhood::SwapPoints => {
            let i = rng.random_range(0..len);
            let mut j = rng.random_range(0..len);
            while j == i {
                j = rng.random_range(0..len);
            }
            TransportMove::SwapPoints(i, j)
        }
        TransportNeighborhood::ReverseSegment => {
            let (l, r) = random_segment(len, rng);
            TransportMove::ReverseSegment(l, r)
        }
        TransportNeighborhood::ShiftSegment => {
            let (l, r) = random_segment(len, rng);
            let seg_len = r - l + 1;
            let positions = rng.random_range(1..=seg_len);
            TransportMove::ShiftSegment(l, r, positions)
        }
        TransportNeighborhood::MoveSegment => {
            let (l, r) = random_segment(len, rng);
            let seg_len = r - l + 1;
            let pos = rng.random_range(0..=(len - seg_len));
            TransportMove::MoveSegment(l, r, pos)
        }
    })
}

pub fn enumerate(sol: &RouteSolution, neighborhood: TransportNeighborhood) -> Box<dyn Iterator<Item = TransportMove>> {
    let len = sol.len();
    match neighborhood {
        TransportNeighborhood::SwapPoints => {
            Box::new((0..len).flat_map(move |i| (i + 1..len).map(move |j| TransportMove::SwapPoints(i, j))))
        }
        TransportNeighborhood::ReverseSegment => {
            Box::new((0..len).flat_map(move |l| (l + 1..len).map(move |r| TransportMove::ReverseSegment(l, r))))
        }
        TransportNeighborhood::ShiftSegment => Box::new((0..len).flat_map(move |l| {
            (l + 1..len).flat_map(move |r| {
                let seg_len = r - l + 1;
                (1..=seg_len).map(move |positions| TransportMove::ShiftSegment(l, r, positions))
            })
        })),
        TransportNeighborhood::MoveSegment => Box::new((0..len).flat_map(move |l| {
            (l + 1..len).flat_map(move |r| {
                let remaining = len - (r - l + 1);
                (0..=remaining).map(move |pos| TransportMove::MoveSegment(l, r, pos))
            })
        })),
        TransportNeighborhood::RemovePointByIndex => Box::new((0..len).map(TransportMove::RemovePointByIndex)),
        TransportNeighborhood::RemovePointByValue => {
            let points = sol.as_slice().to_vec();
            Box::new(points.into_iter().map(TransportMove::RemovePointByValue))
        }
        TransportNeighborhood::InsertPoint => Box::new(std::iter::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol(points: &[usize]) -> RouteSolution {
        RouteSolution::new(points.to_vec(), Going::ToSchool)
    }

    #[test]
    fn insert_point_grows_the_route() {
        let (s, applied) = apply(&sol(&[0, 1]), TransportMove::InsertPoint(1, 9));
        assert!(applied);
        assert_eq!(s.as_slice(), &[0, 9, 1]);
    }

    #[test]
    fn remove_point_by_value_removes_first_occurrence_only() {
        let (s, _) = apply(&sol(&[0, 1, 0]), TransportMove::RemovePointByValue(0));
        assert_eq!(s.as_slice(), &[1, 0]);
    }

    #[test]
    fn remove_point_by_value_absent_is_identity() {
        let (s, _) = apply(&sol(&[0, 1]), TransportMove::RemovePointByValue(9));
        assert_eq!(s.as_slice(), &[0, 1]);
    }

    #[test]
    fn shift_segment_full_rotation_is_identity() {
        let input = sol(&[0, 1, 2, 3]);
        let (s, _) = apply(&input, TransportMove::ShiftSegment(0, 2, 3));
        assert_eq!(s, input);
    }

    #[test]
    fn enumerate_reverse_segment_is_complete() {
        let moves: Vec<_> = enumerate(&sol(&[0, 1, 2]), TransportNeighborhood::ReverseSegment).collect();
        assert_eq!(
            moves,
            vec![
                TransportMove::ReverseSegment(0, 1),
                TransportMove::ReverseSegment(0, 2),
                TransportMove::ReverseSegment(1, 2),
            ]
        );
    }
}
