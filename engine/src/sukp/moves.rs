use rand::{Rng, RngCore};

use super::solution::BitSolution;

/// Closed set of SUKP neighborhood operators (design note: replaces an
/// open string-keyed dispatch with an exhaustively-matched enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SukpNeighborhood {
    FlipBit,
    SwapBits,
    ReverseSegment,
    ShiftSegment,
    MoveSegment,
}

pub const ALL_NEIGHBORHOODS: [SukpNeighborhood; 5] = [
    SukpNeighborhood::FlipBit,
    SukpNeighborhood::SwapBits,
    SukpNeighborhood::ReverseSegment,
    SukpNeighborhood::ShiftSegment,
    SukpNeighborhood::MoveSegment,
];

/// A move and its parameters. `Error` is the sentinel for degenerate
/// arguments or an empty legal-neighborhood intersection; applying it is a
/// no-op. Compared by value everywhere (never by tag identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SukpMove {
    FlipBit(usize),
    SwapBits(usize, usize),
    ReverseSegment(usize, usize),
    ShiftSegment(usize, usize, usize),
    MoveSegment(usize, usize, usize),
    Error,
}

pub fn is_error(mv: SukpMove) -> bool {
    matches!(mv, SukpMove::Error)
}

/// Applies `mv` to `sol`. The second element is `false` only for `Error`.
pub fn apply(sol: &BitSolution, mv: SukpMove) -> (BitSolution, bool) {
    match mv {
        SukpMove::FlipBit(i) => {
            let mut s = sol.clone();
            s.flip(i);
            (s, true)
        }
        SukpMove::SwapBits(i, j) => {
            let mut s = sol.clone();
            let (bi, bj) = (s.get(i), s.get(j));
            s.set(i, bj);
            s.set(j, bi);
            (s, true)
        }
        SukpMove::ReverseSegment(l, r) => {
            let mut bits = sol.as_slice().to_vec();
            bits[l..=r].reverse();
            (BitSolution::new(bits), true)
        }
        SukpMove::ShiftSegment(l, r, positions) => {
            // Translates the segment: excise it, then reinsert it `positions`
            // places further along, wrapping around the remaining length.
            let mut bits = sol.as_slice().to_vec();
            let segment: Vec<bool> = bits.drain(l..=r).collect();
            let remaining_len = bits.len();
            let new_start = (l + positions) % (remaining_len + 1);
            for (offset, value) in segment.into_iter().enumerate() {
                bits.insert(new_start + offset, value);
            }
            (BitSolution::new(bits), true)
        }
        SukpMove::MoveSegment(l, r, pos) => {
            let mut bits = sol.as_slice().to_vec();
            let segment: Vec<bool> = bits.drain(l..=r).collect();
            for (offset, value) in segment.into_iter().enumerate() {
                bits.insert(pos + offset, value);
            }
            (BitSolution::new(bits), true)
        }
        SukpMove::Error => (sol.clone(), false),
    }
}

fn legal_neighborhoods(len: usize, requested: &[SukpNeighborhood]) -> Vec<SukpNeighborhood> {
    let base: &[SukpNeighborhood] = if requested.is_empty() {
        &ALL_NEIGHBORHOODS
    } else {
        requested
    };
    base.iter()
        .copied()
        .filter(|n| match n {
            SukpNeighborhood::FlipBit => len >= 1,
            _ => len >= 2,
        })
        .collect()
}

fn random_segment(len: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let l = rng.random_range(0..len - 1);
    let r = rng.random_range(l + 1..len);
    (l, r)
}

fn random_distinct_pair(len: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let a = rng.random_range(0..len);
    let mut b = rng.random_range(0..len);
    while b == a {
        b = rng.random_range(0..len);
    }
    if a < b { (a, b) } else { (b, a) }
}

/// Draws one syntactically valid move uniformly from the legal
/// intersection of `neighborhoods` (or all neighborhoods when empty) with
/// what the solution's current length admits.
pub fn random_move(
    sol: &BitSolution,
    neighborhoods: &[SukpNeighborhood],
    rng: &mut dyn RngCore,
) -> Option<SukpMove> {
    let len = sol.len();
    let legal = legal_neighborhoods(len, neighborhoods);
    if legal.is_empty() {
        return None;
    }
    let choice = legal[rng.random_range(0..legal.len())];
    Some(match choice {
        SukpNeighborhood::FlipBit => SukpMove::FlipBit(rng.random_range(0..len)),
        SukpNeighborhood::SwapBits => {
            let (i, j) = random_distinct_pair(len, rng);
            SukpMove::SwapBits(i, j)
        }
        SukpNeighborhood::ReverseSegment => {
            let (l, r) = random_segment(len, rng);
            SukpMove::ReverseSegment(l, r)
        }
        SukpNeighborhood::ShiftSegment => {
            let (l, r) = random_segment(len, rng);
            let seg_len = r - l + 1;
            let remaining = len - seg_len;
            if remaining == 0 {
                SukpMove::Error
            } else {
                let positions = rng.random_range(1..=remaining);
                SukpMove::ShiftSegment(l, r, positions)
            }
        }
        SukpNeighborhood::MoveSegment => {
            let (l, r) = random_segment(len, rng);
            let seg_len = r - l + 1;
            let pos = rng.random_range(0..=(len - seg_len));
            SukpMove::MoveSegment(l, r, pos)
        }
    })
}

/// Lazily enumerates every move of `neighborhood` applicable to a solution
/// of `sol`'s length, in lexicographic order over its parameters.
pub fn enumerate(sol: &BitSolution, neighborhood: SukpNeighborhood) -> Box<dyn Iterator<Item = SukpMove>> {
    let len = sol.len();
    match neighborhood {
        SukpNeighborhood::FlipBit => Box::new((0..len).map(SukpMove::FlipBit)),
        SukpNeighborhood::SwapBits => {
            Box::new((0..len).flat_map(move |i| (i + 1..len).map(move |j| SukpMove::SwapBits(i, j))))
        }
        SukpNeighborhood::ReverseSegment => {
            Box::new((0..len).flat_map(move |l| (l + 1..len).map(move |r| SukpMove::ReverseSegment(l, r))))
        }
        SukpNeighborhood::ShiftSegment => Box::new((0..len).flat_map(move |l| {
            (l + 1..len).flat_map(move |r| {
                let seg_len = r - l + 1;
                let remaining = len - seg_len;
                (1..=remaining).map(move |positions| SukpMove::ShiftSegment(l, r, positions))
            })
        })),
        SukpNeighborhood::MoveSegment => Box::new((0..len).flat_map(move |l| {
            (l + 1..len).flat_map(move |r| {
                let remaining = len - (r - l + 1);
                (0..=remaining).map(move |pos| SukpMove::MoveSegment(l, r, pos))
            })
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /* === Helpers === */

    fn sol(bits: &[bool]) -> BitSolution {
        BitSolution::new(bits.to_vec())
    }

    /* === Tests === */

    #[test]
    fn flip_bit_toggles_single_position() {
        let (s, applied) = apply(&sol(&[false, false]), SukpMove::FlipBit(1));
        assert!(applied);
        assert_eq!(s.as_slice(), &[false, true]);
    }

    #[test]
    fn shift_segment_translates_past_the_remainder() {
        // segment [true,false,false] (l=0, r=2) excised, the single
        // remaining bit is [true]; shifting 1 place reinserts the segment
        // after it.
        let (s, applied) = apply(&sol(&[true, false, false, true]), SukpMove::ShiftSegment(0, 2, 1));
        assert!(applied);
        assert_eq!(s.as_slice(), &[true, true, false, false]);
    }

    #[test]
    fn shift_segment_spanning_the_whole_solution_is_identity() {
        let input = sol(&[true, false, true]);
        let (s, _) = apply(&input, SukpMove::ShiftSegment(0, 2, 3));
        assert_eq!(s, input);
    }

    #[test]
    fn random_move_never_shifts_a_segment_spanning_the_whole_solution() {
        let mut rng = SmallRng::seed_from_u64(9);
        let solution = sol(&[true, false, false, true]);
        let mut saw_a_real_shift = false;
        for _ in 0..50 {
            match random_move(&solution, &[SukpNeighborhood::ShiftSegment], &mut rng) {
                Some(SukpMove::ShiftSegment(l, r, _)) => {
                    assert_ne!(r - l + 1, solution.len());
                    saw_a_real_shift = true;
                }
                Some(SukpMove::Error) | None => {}
                other => panic!("unexpected move {other:?}"),
            }
        }
        assert!(saw_a_real_shift);
    }

    #[test]
    fn enumerate_shift_segment_respects_the_remaining_length_bound() {
        let solution = sol(&[false, false, false, false]);
        let moves: Vec<_> = enumerate(&solution, SukpNeighborhood::ShiftSegment).collect();
        // l=0,r=2 (seg_len 3, remaining 1) contributes exactly one position;
        // l=0,r=3 (the whole solution, remaining 0) contributes none.
        assert!(moves.contains(&SukpMove::ShiftSegment(0, 2, 1)));
        assert!(!moves.iter().any(|m| matches!(m, SukpMove::ShiftSegment(0, 3, _))));
    }

    #[test]
    fn move_segment_reinserts_at_target() {
        let (s, _) = apply(&sol(&[true, false, false, true]), SukpMove::MoveSegment(0, 0, 2));
        assert_eq!(s.as_slice(), &[false, false, true, true]);
    }

    #[test]
    fn error_move_leaves_solution_unchanged() {
        let input = sol(&[true, false]);
        let (s, applied) = apply(&input, SukpMove::Error);
        assert!(!applied);
        assert_eq!(s, input);
    }

    #[test]
    fn random_move_on_singleton_only_flips() {
        let mut rng = SmallRng::seed_from_u64(7);
        let solution = sol(&[false]);
        for _ in 0..20 {
            let mv = random_move(&solution, &[], &mut rng).unwrap();
            assert!(matches!(mv, SukpMove::FlipBit(0)));
        }
    }

    #[test]
    fn enumerate_swap_bits_is_lexicographic_and_complete() {
        let solution = sol(&[false, false, false]);
        let moves: Vec<_> = enumerate(&solution, SukpNeighborhood::SwapBits).collect();
        assert_eq!(
            moves,
            vec![
                SukpMove::SwapBits(0, 1),
                SukpMove::SwapBits(0, 2),
                SukpMove::SwapBits(1, 2),
            ]
        );
    }
}
