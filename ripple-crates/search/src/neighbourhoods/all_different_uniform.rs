use itertools::Itertools;
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

/// Keeps a set of variables pairwise different: they are initialised with distinct values, and a
/// move either gives one variable a value no variable takes, or swaps the values of two variables.
///
/// The neighbourhood tracks which values are in use, so the covered variables should not be
/// changed by other neighbourhoods.
#[derive(Debug, Clone)]
pub struct AllDifferentUniformNeighbourhood {
    variables: Vec<IntVarId>,
    /// The first `variables.len()` entries are the values of the variables, in order; the rest
    /// are the unused values.
    domain: Vec<Int>,
}

impl AllDifferentUniformNeighbourhood {
    /// Every variable has to be able to take every value in `domain`, and there have to be at
    /// least as many values as variables.
    pub fn new(variables: Vec<IntVarId>, domain: Vec<Int>, solver: &Solver) -> Result<Self, SearchError> {
        let domain = domain.into_iter().sorted().dedup().collect::<Vec<_>>();
        if domain.len() < variables.len() {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "{} variables cannot take distinct values out of {} values",
                variables.len(),
                domain.len()
            )));
        }

        if let (Some(&min), Some(&max)) = (domain.first(), domain.last()) {
            if let Some(&var) = variables
                .iter()
                .find(|&&var| solver.lower_bound(var) > min || solver.upper_bound(var) < max)
            {
                return Err(SearchError::InvalidNeighbourhood(format!(
                    "{var} cannot take every value in [{min}, {max}]"
                )));
            }
        }

        Ok(AllDifferentUniformNeighbourhood { variables, domain })
    }

    fn num_free_values(&self) -> usize {
        self.domain.len() - self.variables.len()
    }

    fn assign_free_value(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        let index = random.generate_usize_in_range(0..self.variables.len());
        let free = random.generate_usize_in_range(self.variables.len()..self.domain.len());

        let candidate = Move::assign(self.variables[index], self.domain[free]);
        let committed = annealer.maybe_commit(random, &candidate, assignment)?;
        if committed {
            self.domain.swap(index, free);
        }
        Ok(committed)
    }

    fn swap_values(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        let num_variables = self.variables.len();
        let first = random.generate_usize_in_range(0..num_variables);
        let second = (first + random.generate_usize_in_range(1..num_variables)) % num_variables;

        let candidate = Move::swap(
            (self.variables[first], self.domain[first]),
            (self.variables[second], self.domain[second]),
        );
        let committed = annealer.maybe_commit(random, &candidate, assignment)?;
        if committed {
            self.domain.swap(first, second);
        }
        Ok(committed)
    }
}

impl Neighbourhood for AllDifferentUniformNeighbourhood {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        for index in 0..self.variables.len() {
            let selected = random.generate_usize_in_range(index..self.domain.len());
            self.domain.swap(index, selected);
            modifier.set(self.variables[index], self.domain[index])?;
        }
        Ok(())
    }

    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        if self.variables.is_empty() {
            return Ok(false);
        }

        if self.num_free_values() > 0 {
            self.assign_free_value(random, assignment, annealer)
        } else if self.variables.len() > 1 {
            self.swap_values(random, assignment, annealer)
        } else {
            Ok(false)
        }
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::AllDifferentUniformNeighbourhood;
    use crate::basic_types::test_random::TestRandom;
    use crate::basic_types::SearchError;
    use crate::neighbourhoods::test_helpers::unconstrained;
    use crate::neighbourhoods::test_helpers::Unconstrained;
    use crate::neighbourhoods::Neighbourhood;

    fn initialised(
        domain: Vec<i64>,
        num_variables: usize,
        selections: Vec<usize>,
    ) -> (Unconstrained, AllDifferentUniformNeighbourhood) {
        let mut test = unconstrained(&vec![(1, 1, 4); num_variables]);
        let mut neighbourhood =
            AllDifferentUniformNeighbourhood::new(test.variables.clone(), domain, test.assignment.solver())
                .unwrap();

        let mut random = TestRandom {
            usizes: selections,
            ..Default::default()
        };
        test.assignment
            .assign(|modifier| neighbourhood.initialise(&mut random, modifier))
            .unwrap();
        (test, neighbourhood)
    }

    #[test]
    fn initialise_assigns_distinct_values() {
        let (test, _) = initialised(vec![1, 2, 3, 4], 3, vec![3, 1, 3]);
        // [1, 2, 3, 4] -> [4, 2, 3, 1] -> [4, 2, 3, 1] -> [4, 2, 1, 3]
        assert_eq!(test.values(), vec![4, 2, 1]);
    }

    #[test]
    fn free_values_are_assigned_when_available() {
        let (mut test, mut neighbourhood) = initialised(vec![1, 2, 3, 4], 2, vec![0, 1]);
        assert_eq!(test.values(), vec![1, 2]);

        // give the second variable the value 4, which frees up 2
        let mut random = TestRandom {
            usizes: vec![1, 3, 0, 3],
            ..Default::default()
        };
        assert!(neighbourhood
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
        assert_eq!(test.values(), vec![1, 4]);

        assert!(neighbourhood
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
        assert_eq!(test.values(), vec![2, 4]);
    }

    #[test]
    fn values_are_swapped_without_free_values() {
        let (mut test, mut neighbourhood) = initialised(vec![1, 2, 3], 3, vec![0, 1, 2]);
        assert_eq!(test.values(), vec![1, 2, 3]);

        let mut random = TestRandom {
            usizes: vec![2, 2],
            ..Default::default()
        };
        assert!(neighbourhood
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
        // the partner of 2 is (2 + 2) % 3 = 1
        assert_eq!(test.values(), vec![1, 3, 2]);
    }

    #[test]
    fn too_few_values_are_rejected() {
        let test = unconstrained(&[(1, 1, 4), (1, 1, 4), (1, 1, 4)]);
        let result =
            AllDifferentUniformNeighbourhood::new(test.variables.clone(), vec![1, 2, 2], test.assignment.solver());
        assert!(matches!(result, Err(SearchError::InvalidNeighbourhood(_))));
    }

    #[test]
    fn values_outside_a_domain_are_rejected() {
        let test = unconstrained(&[(1, 1, 4), (1, 1, 4)]);
        let result =
            AllDifferentUniformNeighbourhood::new(test.variables.clone(), vec![1, 5], test.assignment.solver());
        assert!(matches!(result, Err(SearchError::InvalidNeighbourhood(_))));
    }
}
