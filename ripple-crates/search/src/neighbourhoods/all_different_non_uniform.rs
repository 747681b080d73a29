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

/// Keeps a set of variables pairwise different when every variable has its own domain.
///
/// The initial values are a random maximum matching between the variables and the values of
/// their domains. A move gives a variable a value of its domain which no variable takes, or swaps
/// the values of two variables when each value is in the domain of the other variable.
#[derive(Debug, Clone)]
pub struct AllDifferentNonUniformNeighbourhood {
    variables: Vec<IntVarId>,
    variable_order: Vec<usize>,
    domains: Vec<Vec<Int>>,
    /// `in_domain[i][v]` tells whether `offset + v` is in the domain of variable `i`.
    in_domain: Vec<Vec<bool>>,
    offset: Int,
    /// The variable taking `offset + v`, if any.
    owners: Vec<Option<usize>>,
}

impl AllDifferentNonUniformNeighbourhood {
    /// `domains[i]` lists the values `variables[i]` may take. The domains have to lie within the
    /// bounds of the variables, and the variables have to be able to take distinct values.
    pub fn new(variables: Vec<IntVarId>, domains: Vec<Vec<Int>>, solver: &Solver) -> Result<Self, SearchError> {
        if variables.len() != domains.len() {
            return Err(SearchError::InvalidNeighbourhood(format!(
                "{} domains were given for {} variables",
                domains.len(),
                variables.len()
            )));
        }
        let domains = domains
            .into_iter()
            .map(|domain| domain.into_iter().sorted().dedup().collect::<Vec<_>>())
            .collect::<Vec<_>>();

        for (&var, domain) in variables.iter().zip(domains.iter()) {
            let (Some(&min), Some(&max)) = (domain.first(), domain.last()) else {
                return Err(SearchError::InvalidNeighbourhood(format!(
                    "the domain of {var} is empty"
                )));
            };
            if min < solver.lower_bound(var) || solver.upper_bound(var) < max {
                return Err(SearchError::InvalidNeighbourhood(format!(
                    "{var} cannot take every value in [{min}, {max}]"
                )));
            }
        }

        let offset = domains.iter().filter_map(|domain| domain.first()).min().copied().unwrap_or(0);
        let num_values = domains
            .iter()
            .filter_map(|domain| domain.last())
            .max()
            .map_or(0, |&max| (max - offset + 1) as usize);
        let in_domain = domains
            .iter()
            .map(|domain| {
                let mut in_domain = vec![false; num_values];
                for &value in domain {
                    in_domain[(value - offset) as usize] = true;
                }
                in_domain
            })
            .collect();

        let mut neighbourhood = AllDifferentNonUniformNeighbourhood {
            variable_order: (0..variables.len()).collect(),
            variables,
            domains,
            in_domain,
            offset,
            owners: vec![None; num_values],
        };
        if !neighbourhood.match_variables(None) {
            return Err(SearchError::InvalidNeighbourhood(
                "the variables cannot take distinct values from their domains".to_owned(),
            ));
        }
        Ok(neighbourhood)
    }

    fn value_index(&self, value: Int) -> usize {
        (value - self.offset) as usize
    }

    /// Computes a maximum matching from scratch into `owners`, trying values and variables in a
    /// random order when `random` is given. Returns whether every variable is matched.
    fn match_variables(&mut self, mut random: Option<&mut dyn Random>) -> bool {
        let mut arcs = self
            .domains
            .iter()
            .map(|domain| domain.iter().map(|&value| self.value_index(value)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        if let Some(random) = random.as_deref_mut() {
            for variable_arcs in arcs.iter_mut() {
                shuffle(random, variable_arcs);
            }
            shuffle(random, &mut self.variable_order);
        }

        self.owners.fill(None);
        let mut visited = vec![false; self.owners.len()];
        let mut num_matched = 0;
        for &variable in self.variable_order.iter() {
            visited.fill(false);
            if augment(variable, &arcs, &mut self.owners, &mut visited) {
                num_matched += 1;
            }
        }
        num_matched == self.variables.len()
    }

    fn can_swap(&self, assignment: &Assignment, first: usize, second: usize) -> bool {
        let first_value = self.value_index(assignment.value(self.variables[first]));
        let second_value = self.value_index(assignment.value(self.variables[second]));
        self.in_domain[first][second_value] && self.in_domain[second][first_value]
    }

    fn swap_values(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
        first: usize,
        second: usize,
    ) -> Result<bool, SearchError> {
        let first_value = assignment.value(self.variables[first]);
        let second_value = assignment.value(self.variables[second]);
        let candidate = Move::swap(
            (self.variables[first], first_value),
            (self.variables[second], second_value),
        );
        let committed = annealer.maybe_commit(random, &candidate, assignment)?;
        if committed {
            let (first_index, second_index) = (self.value_index(first_value), self.value_index(second_value));
            self.owners[first_index] = Some(second);
            self.owners[second_index] = Some(first);
        }
        Ok(committed)
    }

    fn assign_value(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
        variable: usize,
        value: Int,
    ) -> Result<bool, SearchError> {
        let old_value = assignment.value(self.variables[variable]);
        let candidate = Move::assign(self.variables[variable], value);
        let committed = annealer.maybe_commit(random, &candidate, assignment)?;
        if committed {
            let (old_index, new_index) = (self.value_index(old_value), self.value_index(value));
            self.owners[old_index] = None;
            self.owners[new_index] = Some(variable);
        }
        Ok(committed)
    }
}

/// Tries to match `variable`, re-matching the owners of its values when needed.
fn augment(variable: usize, arcs: &[Vec<usize>], owners: &mut [Option<usize>], visited: &mut [bool]) -> bool {
    for &value in arcs[variable].iter() {
        if visited[value] {
            continue;
        }
        visited[value] = true;
        let is_free = match owners[value] {
            None => true,
            Some(owner) => augment(owner, arcs, owners, visited),
        };
        if is_free {
            owners[value] = Some(variable);
            return true;
        }
    }
    false
}

fn shuffle<T>(random: &mut dyn Random, elements: &mut [T]) {
    for index in 0..elements.len() {
        let selected = random.generate_usize_in_range(index..elements.len());
        elements.swap(index, selected);
    }
}

impl Neighbourhood for AllDifferentNonUniformNeighbourhood {
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        if !self.match_variables(Some(random)) {
            return Err(EngineError::InvalidArgument(
                "the variables cannot take distinct values from their domains".to_owned(),
            ));
        }
        for (value_index, owner) in self.owners.iter().enumerate() {
            if let Some(owner) = *owner {
                modifier.set(self.variables[owner], self.offset + value_index as Int)?;
            }
        }
        Ok(())
    }

    /// Visits the variables in a random order, and the values of each domain in a random order,
    /// and offers the first legal move to the annealer.
    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        for position in 0..self.variable_order.len() {
            let selected = random.generate_usize_in_range(position..self.variable_order.len());
            self.variable_order.swap(position, selected);
            let variable = self.variable_order[position];

            for index in 0..self.domains[variable].len() {
                let selected = random.generate_usize_in_range(index..self.domains[variable].len());
                self.domains[variable].swap(index, selected);
                let value = self.domains[variable][index];

                match self.owners[self.value_index(value)] {
                    Some(owner) if owner == variable => {}
                    Some(owner) => {
                        if self.can_swap(assignment, variable, owner) {
                            return self.swap_values(random, assignment, annealer, variable, owner);
                        }
                    }
                    None => return self.assign_value(random, assignment, annealer, variable, value),
                }
            }
        }
        Ok(false)
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.variables
    }
}
