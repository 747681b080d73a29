use itertools::Itertools;
use log::warn;
use ripple_core::basic_types::Random;
use ripple_core::EngineError;
use ripple_core::IntVarId;

use super::Neighbourhood;
use crate::annealing::Annealer;
use crate::assignment::Assignment;
use crate::assignment::AssignmentModifier;
use crate::basic_types::SearchError;

/// Combines several neighbourhoods into one. Every move is delegated to one of them, drawn at
/// random according to a weight per neighbourhood.
///
/// By default a neighbourhood is weighted by the number of variables it covers.
#[derive(Debug)]
pub struct NeighbourhoodCombinator {
    neighbourhoods: Vec<Box<dyn Neighbourhood>>,
    weights: Vec<f64>,
    covered_variables: Vec<IntVarId>,
}

impl NeighbourhoodCombinator {
    pub fn new(neighbourhoods: Vec<Box<dyn Neighbourhood>>) -> Self {
        let weights = neighbourhoods
            .iter()
            .map(|neighbourhood| neighbourhood.covered_variables().len() as f64)
            .collect();
        Self::create(neighbourhoods, weights)
    }

    pub fn with_weights(
        neighbourhoods: Vec<Box<dyn Neighbourhood>>,
        weights: Vec<f64>,
    ) -> Result<Self, SearchError> {
        if weights.len() != neighbourhoods.len() {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "expected {} weights, got {}",
                neighbourhoods.len(),
                weights.len()
            )));
        }
        if let Some(weight) = weights
            .iter()
            .find(|weight| !weight.is_finite() || **weight < 0.0)
        {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "neighbourhood weights have to be finite and non-negative, got {weight}"
            )));
        }
        Ok(Self::create(neighbourhoods, weights))
    }

    fn create(neighbourhoods: Vec<Box<dyn Neighbourhood>>, weights: Vec<f64>) -> Self {
        if weights.iter().all(|&weight| weight == 0.0) {
            warn!("none of the {} combined neighbourhoods can be selected", neighbourhoods.len());
        }

        let covered_variables = neighbourhoods
            .iter()
            .flat_map(|neighbourhood| neighbourhood.covered_variables().iter().copied())
            .unique()
            .collect();
        NeighbourhoodCombinator {
            neighbourhoods,
            weights,
            covered_variables,
        }
    }

    pub fn add_neighbourhood(&mut self, neighbourhood: Box<dyn Neighbourhood>) {
        self.weights.push(neighbourhood.covered_variables().len() as f64);
        for &var in neighbourhood.covered_variables() {
            if !self.covered_variables.contains(&var) {
                self.covered_variables.push(var);
            }
        }
        self.neighbourhoods.push(neighbourhood);
    }
}

impl Neighbourhood for NeighbourhoodCombinator {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        self.neighbourhoods
            .iter_mut()
            .try_for_each(|neighbourhood| neighbourhood.initialise(random, modifier))
    }

    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        match random.get_weighted_choice(&self.weights) {
            Some(index) => self.neighbourhoods[index].random_move(random, assignment, annealer),
            None => Ok(false),
        }
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.covered_variables
    }
}

#[cfg(test)]
mod tests {
    use super::NeighbourhoodCombinator;
    use crate::basic_types::test_random::TestRandom;
    use crate::basic_types::SearchError;
    use crate::neighbourhoods::test_helpers::unconstrained;
    use crate::neighbourhoods::Neighbourhood;
    use crate::neighbourhoods::RandomNeighbourhood;

    #[test]
    fn moves_are_delegated_to_the_drawn_neighbourhood() {
        let mut test = unconstrained(&[(0, 0, 5), (0, 0, 5), (0, 0, 5)]);
        let solver = test.assignment.solver();
        let first = RandomNeighbourhood::new(vec![test.variables[0]], solver);
        let second = RandomNeighbourhood::new(test.variables[1..].to_vec(), solver);
        let mut combinator = NeighbourhoodCombinator::new(vec![Box::new(first), Box::new(second)]);
        assert_eq!(combinator.covered_variables(), test.variables.as_slice());

        let mut random = TestRandom {
            weighted_choices: vec![1],
            usizes: vec![1],
            integers: vec![3],
            ..Default::default()
        };
        assert!(combinator
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
        assert_eq!(test.values(), vec![0, 0, 4]);
    }

    #[test]
    fn initialise_reaches_every_neighbourhood() {
        let mut test = unconstrained(&[(0, 0, 5), (0, 0, 5)]);
        let solver = test.assignment.solver();
        let mut combinator = NeighbourhoodCombinator::new(vec![
            Box::new(RandomNeighbourhood::new(vec![test.variables[0]], solver)),
            Box::new(RandomNeighbourhood::new(vec![test.variables[1]], solver)),
        ]);

        let mut random = TestRandom {
            integers: vec![2, 5],
            ..Default::default()
        };
        test.assignment
            .assign(|modifier| combinator.initialise(&mut random, modifier))
            .unwrap();
        assert_eq!(test.values(), vec![2, 5]);
    }

    #[test]
    fn shared_variables_are_covered_once() {
        let test = unconstrained(&[(0, 0, 5), (0, 0, 5)]);
        let solver = test.assignment.solver();
        let combinator = NeighbourhoodCombinator::new(vec![
            Box::new(RandomNeighbourhood::new(test.variables.clone(), solver)),
            Box::new(RandomNeighbourhood::new(vec![test.variables[1]], solver)),
        ]);
        assert_eq!(combinator.covered_variables().len(), 2);
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        let test = unconstrained(&[(0, 0, 5)]);
        let neighbourhood = RandomNeighbourhood::new(test.variables.clone(), test.assignment.solver());

        let result = NeighbourhoodCombinator::with_weights(vec![Box::new(neighbourhood)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(SearchError::InvalidNeighbourhood(_))));
    }
}
