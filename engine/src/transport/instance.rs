use crate::error::{InstanceError, InstanceResult};

/// A point in the grid: a school (index `< num_schools`) or a student home
/// (index `>= num_schools`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub row: i64,
    pub col: i64,
}

/// Parameters of a school-transport routing instance.
#[derive(Debug, Clone)]
pub struct TransportInstance {
    rows: i64,
    cols: i64,
    positions: Vec<Coord>,
    num_schools: usize,
    /// `school_of[t]` = school index assigned to student `t` (0-based,
    /// among the student range, not the flat point range).
    school_of: Vec<usize>,
}

impl TransportInstance {
    pub fn new(
        rows: i64,
        cols: i64,
        positions: Vec<Coord>,
        num_schools: usize,
        school_of: Vec<usize>,
    ) -> InstanceResult<Self> {
        if positions.len() != num_schools + school_of.len() {
            return Err(InstanceError::DimensionMismatch {
                what: "positions vs schools+students",
                expected: num_schools + school_of.len(),
                got: positions.len(),
            });
        }
        let mut seen = std::collections::HashSet::with_capacity(positions.len());
        for (i, p) in positions.iter().enumerate() {
            if !seen.insert((p.row, p.col)) {
                return Err(InstanceError::DuplicateCoordinate { point: i });
            }
        }
        for &s in &school_of {
            if s >= num_schools {
                return Err(InstanceError::IndexOutOfRange {
                    what: "student's assigned school",
                    index: s,
                    bound: num_schools,
                });
            }
        }
        Ok(TransportInstance {
            rows,
            cols,
            positions,
            num_schools,
            school_of,
        })
    }

    pub fn num_schools(&self) -> usize {
        self.num_schools
    }

    pub fn num_students(&self) -> usize {
        self.school_of.len()
    }

    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    pub fn is_school(&self, point: usize) -> bool {
        point < self.num_schools
    }

    pub fn position(&self, point: usize) -> Coord {
        self.positions[point]
    }

    /// Flat point index of the school assigned to student `t` (`t` is an
    /// index among students, `0..num_students`).
    pub fn school_point_of_student(&self, t: usize) -> usize {
        self.school_of[t]
    }

    /// Flat point index of student `t`.
    pub fn student_point(&self, t: usize) -> usize {
        self.num_schools + t
    }

    /// Recovers the student index from a flat point index `>= num_schools`.
    /// Fixed off-by-one: earlier revisions subtracted an extra 1.
    pub fn student_of_point(&self, point: usize) -> usize {
        point - self.num_schools
    }

    pub fn rows(&self) -> i64 {
        self.rows
    }

    pub fn cols(&self) -> i64 {
        self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_instance() -> TransportInstance {
        // 2 schools, 3 students.
        let positions = vec![
            Coord { row: 0, col: 0 },
            Coord { row: 0, col: 5 },
            Coord { row: 1, col: 0 },
            Coord { row: 1, col: 5 },
            Coord { row: 2, col: 2 },
        ];
        TransportInstance::new(10, 10, positions, 2, vec![0, 1, 0]).unwrap()
    }

    #[test]
    fn student_point_round_trips_through_student_of_point() {
        let inst = toy_instance();
        for t in 0..inst.num_students() {
            let point = inst.student_point(t);
            assert_eq!(inst.student_of_point(point), t);
        }
    }

    #[test]
    fn duplicate_coordinate_is_rejected() {
        let positions = vec![Coord { row: 0, col: 0 }, Coord { row: 0, col: 0 }];
        let res = TransportInstance::new(5, 5, positions, 1, vec![0]);
        assert!(matches!(res, Err(InstanceError::DuplicateCoordinate { .. })));
    }

    #[test]
    fn out_of_range_school_assignment_is_rejected() {
        let positions = vec![Coord { row: 0, col: 0 }, Coord { row: 1, col: 1 }];
        let res = TransportInstance::new(5, 5, positions, 1, vec![5]);
        assert!(matches!(res, Err(InstanceError::IndexOutOfRange { .. })));
    }
}
