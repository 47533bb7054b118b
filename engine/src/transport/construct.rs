use rand::seq::SliceRandom;
use rand::RngCore;

use super::instance::TransportInstance;
use super::solution::{Going, RouteSolution};

/// Uniformly interleaves students and schools while respecting the
/// precedence constraint for `going`: permute the students, then append the
/// permuted schools, so every student precedes every school (reversed for
/// the from-school direction).
pub fn create_interleaved_solution(instance: &TransportInstance, going: Going, rng: &mut dyn RngCore) -> RouteSolution {
    let mut students: Vec<usize> = (0..instance.num_students()).map(|t| instance.student_point(t)).collect();
    let mut schools: Vec<usize> = (0..instance.num_schools()).collect();
    students.shuffle(rng);
    schools.shuffle(rng);

    let points = match going {
        Going::ToSchool => {
            let mut v = students;
            v.extend(schools);
            v
        }
        Going::FromSchool => {
            let mut v = schools;
            v.extend(students);
            v
        }
    };
    RouteSolution::new(points, going)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::evaluator::is_feasible;
    use crate::transport::instance::Coord;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn toy_instance() -> TransportInstance {
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
    fn interleaved_solution_is_feasible_both_directions() {
        let inst = toy_instance();
        let mut rng = SmallRng::seed_from_u64(3);
        let to_school = create_interleaved_solution(&inst, Going::ToSchool, &mut rng);
        assert!(is_feasible(&inst, &to_school));
        let from_school = create_interleaved_solution(&inst, Going::FromSchool, &mut rng);
        assert!(is_feasible(&inst, &from_school));
    }
}
