use super::instance::TransportInstance;
use super::solution::{Going, RouteSolution};
use crate::stats::EvalCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Euclidean,
    Manhattan,
}

fn euclidean(a: super::instance::Coord, b: super::instance::Coord) -> f64 {
    (((a.row - b.row).pow(2) + (a.col - b.col).pow(2)) as f64).sqrt()
}

fn manhattan(a: super::instance::Coord, b: super::instance::Coord) -> i64 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

/// Cost of following `sol`'s sequence under both metrics at once, since the
/// caller always knows which one it wants but computing both is cheap and
/// avoids a second traversal when experiments compare metrics.
pub fn route_cost(
    instance: &TransportInstance,
    sol: &RouteSolution,
    counter: &mut EvalCounter,
) -> (f64, i64) {
    counter.tick();
    let points = sol.as_slice();
    if points.len() < 2 {
        return (0.0, 0);
    }
    let mut euclid_total = 0.0;
    let mut manhattan_total = 0;
    for w in points.windows(2) {
        let a = instance.position(w[0]);
        let b = instance.position(w[1]);
        euclid_total += euclidean(a, b);
        manhattan_total += manhattan(a, b);
    }
    (euclid_total, manhattan_total)
}

pub fn cost(instance: &TransportInstance, sol: &RouteSolution, metric: Metric, counter: &mut EvalCounter) -> f64 {
    let (e, m) = route_cost(instance, sol, counter);
    match metric {
        Metric::Euclidean => e,
        Metric::Manhattan => m as f64,
    }
}

/// A route is feasible when it visits every school and every student
/// exactly once with the right precedence between each student and their
/// school. Fixes the off-by-one of an earlier revision (`point - num_schools`,
/// not `point - num_schools - 1`).
pub fn is_feasible(instance: &TransportInstance, sol: &RouteSolution) -> bool {
    let points = sol.as_slice();
    let total = instance.num_schools() + instance.num_students();
    if points.len() != total {
        return false;
    }
    let mut seen = vec![false; total];
    for &p in points {
        if p >= total || seen[p] {
            return false;
        }
        seen[p] = true;
    }

    for point in instance.num_schools()..total {
        let t = instance.student_of_point(point);
        let school_point = instance.school_point_of_student(t);
        let student_pos = sol.position_of(point).expect("already verified present");
        let school_pos = sol.position_of(school_point).expect("already verified present");
        let precedes = match sol.going() {
            Going::ToSchool => student_pos < school_pos,
            Going::FromSchool => student_pos > school_pos,
        };
        if !precedes {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::instance::Coord;

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
    fn short_route_has_zero_cost() {
        let inst = toy_instance();
        let mut counter = EvalCounter::new();
        let sol = RouteSolution::new(vec![0], Going::ToSchool);
        assert_eq!(route_cost(&inst, &sol, &mut counter), (0.0, 0));
    }

    #[test]
    fn to_school_requires_students_before_their_school() {
        let inst = toy_instance();
        // points: student2(4), student0(2), student1(3), school0(0), school1(1);
        // every student precedes the school it is assigned to (school_of = [0, 1, 0]).
        let sol = RouteSolution::new(vec![4, 2, 3, 0, 1], Going::ToSchool);
        assert!(is_feasible(&inst, &sol));

        // swap student0 and its school0: now school0 precedes student0.
        let bad = RouteSolution::new(vec![4, 0, 3, 2, 1], Going::ToSchool);
        assert!(!is_feasible(&inst, &bad));
    }

    #[test]
    fn missing_point_is_infeasible() {
        let inst = toy_instance();
        let sol = RouteSolution::new(vec![0, 1, 2, 3], Going::ToSchool);
        assert!(!is_feasible(&inst, &sol));
    }

    #[test]
    fn last_student_is_not_spuriously_rejected() {
        // Regression test for the student-index off-by-one: the last
        // student's point must resolve to a valid school assignment.
        let inst = toy_instance();
        let last_student_point = inst.student_point(inst.num_students() - 1);
        assert_eq!(inst.student_of_point(last_student_point), inst.num_students() - 1);
    }
}
