use ripple_core::basic_types::Random;
use ripple_core::engine::Solver;
use ripple_core::EngineError;
use ripple_core::Int;
use ripple_core::IntVarId;

use super::Neighbourhood;
use crate::annealing::Annealer;
use crate::assignment::Assignment;
use crate::assignment::AssignmentModifier;
use crate::basic_types::Move;
use crate::basic_types::SearchError;

/// Keeps `sum(coefficients[i] * variables[i]) == bound` satisfied, for coefficients of 1 or -1.
///
/// The initial assignment satisfies the equality, and every move changes two variables by the
/// same amount in the directions which keep the sum unchanged.
#[derive(Debug, Clone)]
pub struct IntLinEqNeighbourhood {
    coefficients: Vec<Int>,
    variables: Vec<IntVarId>,
    domains: Vec<(Int, Int)>,
    bound: Int,
}

impl IntLinEqNeighbourhood {
    pub fn new(
        coefficients: Vec<Int>,
        variables: Vec<IntVarId>,
        bound: Int,
        solver: &Solver,
    ) -> Result<Self, SearchError> {
        if coefficients.len() != variables.len() {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "{} coefficients for {} variables",
                coefficients.len(),
                variables.len()
            )));
        }
        if variables.len() < 2 {
            return Err(SearchError::InvalidNeighbourhood(
                "a linear equality neighbourhood needs at least two variables".to_owned(),
            ));
        }
        if let Some(coefficient) = coefficients.iter().find(|coefficient| coefficient.abs() != 1) {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "coefficients have to be 1 or -1, got {coefficient}"
            )));
        }

        let domains = variables
            .iter()
            .map(|&var| (solver.lower_bound(var), solver.upper_bound(var)))
            .collect();
        let neighbourhood = IntLinEqNeighbourhood {
            coefficients,
            variables,
            domains,
            bound,
        };

        let (min, max) = neighbourhood.suffix_range(0);
        if !(min..=max).contains(&bound) {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "the sum ranges over [{min}, {max}] and cannot equal {bound}"
            )));
        }
        Ok(neighbourhood)
    }

    /// The range of `coefficients[index] * variables[index]`.
    fn term_range(&self, index: usize) -> (Int, Int) {
        let (lb, ub) = self.domains[index];
        if self.coefficients[index] > 0 {
            (lb, ub)
        } else {
            (-ub, -lb)
        }
    }

    /// The range of the sum of the terms from `index` onwards.
    fn suffix_range(&self, index: usize) -> (Int, Int) {
        (index..self.variables.len())
            .map(|term| self.term_range(term))
            .fold((0, 0), |(min, max), (lb, ub)| (min + lb, max + ub))
    }

    /// A move which changes `first` and `second` by the same amount without changing the sum, if
    /// their domains leave room for one.
    fn compensating_move(
        &self,
        random: &mut dyn Random,
        assignment: &Assignment,
        first: usize,
        second: usize,
    ) -> Option<Move> {
        let (first_lb, first_ub) = self.domains[first];
        let (second_lb, second_ub) = self.domains[second];
        let first_value = assignment.value(self.variables[first]);
        let second_value = assignment.value(self.variables[second]);

        // with equal coefficients the second variable moves in the opposite direction
        let direction = if self.coefficients[first] == self.coefficients[second] {
            -1
        } else {
            1
        };
        let (second_min, second_max) = if direction < 0 {
            (second_value - second_ub, second_value - second_lb)
        } else {
            (second_lb - second_value, second_ub - second_value)
        };
        let min_delta = (first_lb - first_value).max(second_min);
        let max_delta = (first_ub - first_value).min(second_max);
        if min_delta >= max_delta {
            return None;
        }

        let mut delta = random.generate_i64_in_range(min_delta, max_delta - 1);
        if delta >= 0 {
            delta += 1;
        }
        Some(Move::new([
            (self.variables[first], first_value + delta),
            (self.variables[second], second_value + direction * delta),
        ]))
    }
}

impl Neighbourhood for IntLinEqNeighbourhood {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        let mut remaining = self.bound;
        for index in 0..self.variables.len() {
            // the term has to leave a remainder which the later terms can still reach
            let (rest_min, rest_max) = self.suffix_range(index + 1);
            let (term_min, term_max) = self.term_range(index);
            let lb = term_min.max(remaining - rest_max);
            let ub = term_max.min(remaining - rest_min);

            let term = if lb == ub {
                lb
            } else {
                random.generate_i64_in_range(lb, ub)
            };
            modifier.set(self.variables[index], self.coefficients[index] * term)?;
            remaining -= term;
        }
        Ok(())
    }

    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        // try the pairs in a random order until one of them can move
        let num_variables = self.variables.len();
        let mut order = (0..num_variables).collect::<Vec<_>>();
        for i in 0..num_variables - 1 {
            order.swap(i, random.generate_usize_in_range(i..num_variables));
            for j in i + 1..num_variables {
                order.swap(j, random.generate_usize_in_range(j..num_variables));
                if let Some(candidate) = self.compensating_move(random, assignment, order[i], order[j]) {
                    return annealer.maybe_commit(random, &candidate, assignment);
                }
            }
        }
        Ok(false)
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.variables
    }
}
