use std::cmp::Ordering;

use ripple_core::Int;

/// Whether the objective value should be made as small or as large as possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveDirection {
    /// There is no objective; every solution is equally good.
    #[default]
    None,
    Minimise,
    Maximise,
}

/// The quality of an assignment: how much its constraints are violated and how good its objective
/// value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    violation_degree: Int,
    objective_value: Int,
    objective_direction: ObjectiveDirection,
}

impl Cost {
    pub fn new(violation_degree: Int, objective_value: Int, objective_direction: ObjectiveDirection) -> Self {
        Cost {
            violation_degree,
            objective_value,
            objective_direction,
        }
    }

    pub fn violation_degree(&self) -> Int {
        self.violation_degree
    }

    pub fn objective_value(&self) -> Int {
        self.objective_value
    }

    pub fn objective_direction(&self) -> ObjectiveDirection {
        self.objective_direction
    }

    pub fn satisfies_constraints(&self) -> bool {
        self.violation_degree == 0
    }

    /// Combines the violation and the objective value into a single number; lower is better.
    /// A maximised objective counts negatively.
    pub fn evaluate(&self, violation_weight: Int, objective_weight: Int) -> Int {
        let objective = match self.objective_direction {
            ObjectiveDirection::None => 0,
            ObjectiveDirection::Minimise => self.objective_value,
            ObjectiveDirection::Maximise => -self.objective_value,
        };
        violation_weight * self.violation_degree + objective_weight * objective
    }

    /// Lexicographic comparison: a smaller violation is always better, ties are broken by the
    /// objective.
    pub fn compare_lexicographically(&self, other: &Cost) -> Ordering {
        self.violation_degree
            .cmp(&other.violation_degree)
            .then_with(|| self.evaluate(0, 1).cmp(&other.evaluate(0, 1)))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::Cost;
    use super::ObjectiveDirection;

    #[test]
    fn maximised_objectives_count_negatively() {
        let cost = Cost::new(2, 5, ObjectiveDirection::Maximise);
        assert_eq!(cost.evaluate(3, 1), 1);
        assert_eq!(Cost::new(2, 5, ObjectiveDirection::Minimise).evaluate(3, 1), 11);
        assert_eq!(Cost::new(2, 5, ObjectiveDirection::None).evaluate(3, 1), 6);
    }

    #[test]
    fn violation_dominates_the_objective() {
        let feasible = Cost::new(0, 100, ObjectiveDirection::Minimise);
        let infeasible = Cost::new(1, 0, ObjectiveDirection::Minimise);
        assert_eq!(feasible.compare_lexicographically(&infeasible), Ordering::Less);
        assert!(feasible.satisfies_constraints());
        assert!(!infeasible.satisfies_constraints());
    }
}
