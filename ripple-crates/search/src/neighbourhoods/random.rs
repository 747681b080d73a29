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

/// Picks a variable uniformly at random and gives it a different value from its domain.
#[derive(Debug, Clone)]
pub struct RandomNeighbourhood {
    variables: Vec<IntVarId>,
    domains: Vec<(Int, Int)>,
}

impl RandomNeighbourhood {
    /// The domains of `variables` are read from `solver`.
    pub fn new(variables: Vec<IntVarId>, solver: &Solver) -> Self {
        let domains = variables
            .iter()
            .map(|&var| (solver.lower_bound(var), solver.upper_bound(var)))
            .collect();
        RandomNeighbourhood { variables, domains }
    }
}

impl Neighbourhood for RandomNeighbourhood {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        self.variables
            .iter()
            .zip(&self.domains)
            .try_for_each(|(&var, &(lb, ub))| modifier.set(var, random.generate_i64_in_range(lb, ub)))
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

        let index = random.generate_usize_in_range(0..self.variables.len());
        let var = self.variables[index];
        let (lb, ub) = self.domains[index];
        if lb == ub {
            return Ok(false);
        }

        // draw from the domain without the current value
        let mut value = random.generate_i64_in_range(lb, ub - 1);
        if value >= assignment.value(var) {
            value += 1;
        }
        annealer.maybe_commit(random, &Move::assign(var, value), assignment)
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.variables
    }
}
