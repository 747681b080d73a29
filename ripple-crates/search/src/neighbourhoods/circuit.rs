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

/// Keeps a successor array a single circuit. Nodes are numbered from 1: `variables[i]` holds the
/// node visited after node `i + 1`.
///
/// A move takes a node out of the circuit and reinserts it after another node. Variables with a
/// single value keep it.
#[derive(Debug, Clone)]
pub struct CircuitNeighbourhood {
    variables: Vec<IntVarId>,
    fixed: Vec<Option<usize>>,
}

fn to_node(index: usize) -> Int {
    index as Int + 1
}

fn to_index(node: Int) -> usize {
    (node - 1) as usize
}

impl CircuitNeighbourhood {
    /// Every variable has to be able to take every node, unless its value is fixed. Fixed
    /// successors cannot close a circuit on their own.
    pub fn new(variables: Vec<IntVarId>, solver: &Solver) -> Result<Self, SearchError> {
        let num_nodes = variables.len() as Int;
        let mut fixed = Vec::with_capacity(variables.len());
        for &var in variables.iter() {
            let (lower_bound, upper_bound) = (solver.lower_bound(var), solver.upper_bound(var));
            if lower_bound == upper_bound && (1..=num_nodes).contains(&lower_bound) {
                fixed.push(Some(to_index(lower_bound)));
            } else if lower_bound <= 1 && num_nodes <= upper_bound {
                fixed.push(None);
            } else {
                return Err(SearchError::InvalidNeighbourhood(format!(
                    "{var} cannot take every node in [1, {num_nodes}]"
                )));
            }
        }

        let mut is_target = vec![false; variables.len()];
        for &target in fixed.iter().flatten() {
            if is_target[target] {
                return Err(SearchError::InvalidNeighbourhood(format!(
                    "node {} is the fixed successor of two nodes",
                    to_node(target)
                )));
            }
            is_target[target] = true;
        }

        let neighbourhood = CircuitNeighbourhood { variables, fixed };
        let has_loop = (0..neighbourhood.variables.len())
            .any(|start| neighbourhood.end_of_fixed_path(start).is_none());
        // A loop of fixed successors is only allowed when it is the whole circuit.
        if has_loop && !neighbourhood.fixed_circuit_is_complete() {
            return Err(SearchError::InvalidNeighbourhood(
                "the fixed successors form a sub-circuit".to_owned(),
            ));
        }
        Ok(neighbourhood)
    }

    /// Follows fixed successors from `start` to the first node whose successor is free, or `None`
    /// when the fixed successors loop back before that.
    fn end_of_fixed_path(&self, start: usize) -> Option<usize> {
        let mut node = start;
        for _ in 0..=self.variables.len() {
            match self.fixed[node] {
                Some(successor) => node = successor,
                None => return Some(node),
            }
        }
        None
    }

    fn fixed_circuit_is_complete(&self) -> bool {
        let mut node = 0;
        for step in 1..=self.variables.len() {
            let Some(successor) = self.fixed[node] else {
                return false;
            };
            node = successor;
            if node == 0 {
                return step == self.variables.len();
            }
        }
        false
    }

    fn successor(&self, assignment: &Assignment, index: usize) -> usize {
        to_index(assignment.value(self.variables[index]))
    }
}

/// A uniformly drawn index in `0..num_nodes` other than `first` and `second`, which differ.
fn draw_excluding(random: &mut dyn Random, num_nodes: usize, first: usize, second: usize) -> usize {
    let mut drawn = random.generate_usize_in_range(0..num_nodes - 2);
    for excluded in [first.min(second), first.max(second)] {
        if drawn < excluded {
            return drawn;
        }
        drawn += 1;
    }
    drawn
}

impl Neighbourhood for CircuitNeighbourhood {
    /// Links the nodes into a random circuit which respects the fixed successors.
    fn initialise(
        &mut self,
        random: &mut dyn Random,
        modifier: &mut AssignmentModifier<'_>,
    ) -> Result<(), EngineError> {
        let mut available = vec![true; self.variables.len()];
        for (index, fixed) in self.fixed.iter().enumerate() {
            if let Some(successor) = *fixed {
                modifier.set(self.variables[index], to_node(successor))?;
                available[successor] = false;
            }
        }

        let mut unvisited = (0..self.variables.len())
            .filter(|&index| available[index])
            .collect::<Vec<_>>();
        if unvisited.is_empty() {
            return Ok(());
        }

        let first = random.generate_usize_in_range(0..unvisited.len());
        unvisited.swap(0, first);
        let mut current = unvisited[0];
        for position in 1..unvisited.len() {
            let selected = random.generate_usize_in_range(position..unvisited.len());
            unvisited.swap(position, selected);
            let Some(end) = self.end_of_fixed_path(current) else {
                return Err(EngineError::InvalidArgument(
                    "the fixed successors form a sub-circuit".to_owned(),
                ));
            };
            modifier.set(self.variables[end], to_node(unvisited[position]))?;
            current = unvisited[position];
        }

        let Some(end) = self.end_of_fixed_path(current) else {
            return Err(EngineError::InvalidArgument(
                "the fixed successors form a sub-circuit".to_owned(),
            ));
        };
        modifier.set(self.variables[end], to_node(unvisited[0]))
    }

    /// Picks a node `a` with successor `b`, and a third node `c`. The move turns
    /// `a -> b -> d ... c -> e` into `a -> d ... c -> b -> e`.
    fn random_move(
        &mut self,
        random: &mut dyn Random,
        assignment: &mut Assignment,
        annealer: &mut Annealer,
    ) -> Result<bool, SearchError> {
        let num_nodes = self.variables.len();
        if num_nodes < 3 {
            return Ok(false);
        }

        let node = random.generate_usize_in_range(0..num_nodes);
        let old_next = self.successor(assignment, node);
        if old_next == node {
            return Ok(false);
        }
        let new_previous = draw_excluding(random, num_nodes, node, old_next);
        if [node, old_next, new_previous]
            .iter()
            .any(|&index| self.fixed[index].is_some())
        {
            return Ok(false);
        }

        let skipped_to = self.successor(assignment, old_next);
        let new_next = self.successor(assignment, new_previous);
        let candidate = Move::new([
            (self.variables[node], to_node(skipped_to)),
            (self.variables[old_next], to_node(new_next)),
            (self.variables[new_previous], to_node(old_next)),
        ]);
        annealer.maybe_commit(random, &candidate, assignment)
    }

    fn covered_variables(&self) -> &[IntVarId] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use ripple_core::Int;

    use super::CircuitNeighbourhood;
    use crate::basic_types::test_random::TestRandom;
    use crate::basic_types::SearchError;
    use crate::neighbourhoods::test_helpers::unconstrained;
    use crate::neighbourhoods::Neighbourhood;

    fn is_single_circuit(successors: &[Int]) -> bool {
        let mut visited = vec![false; successors.len()];
        let mut node = 0;
        for _ in 0..successors.len() {
            if visited[node] {
                return false;
            }
            visited[node] = true;
            node = (successors[node] - 1) as usize;
        }
        node == 0 && visited.iter().all(|&seen| seen)
    }

    #[test]
    fn initialise_links_every_node_into_one_circuit() {
        let mut test = unconstrained(&[(1, 1, 5); 5]);
        let mut neighbourhood =
            CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver()).unwrap();
        let mut random = SmallRng::seed_from_u64(1);

        for _ in 0..100 {
            test.assignment
                .assign(|modifier| neighbourhood.initialise(&mut random, modifier))
                .unwrap();
            assert!(is_single_circuit(&test.values()), "{:?}", test.values());
        }
    }

    #[test]
    fn fixed_successors_are_kept() {
        let mut test = unconstrained(&[(3, 3, 3), (1, 1, 4), (1, 1, 4), (1, 1, 4)]);
        let mut neighbourhood =
            CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver()).unwrap();
        let mut random = SmallRng::seed_from_u64(2);
        test.assignment
            .assign(|modifier| neighbourhood.initialise(&mut random, modifier))
            .unwrap();

        for _ in 0..200 {
            let _ = neighbourhood
                .random_move(&mut random, &mut test.assignment, &mut test.annealer)
                .unwrap();
            let values = test.values();
            assert!(is_single_circuit(&values), "{values:?}");
            assert_eq!(values[0], 3);
        }
    }

    #[test]
    fn a_node_is_moved_behind_another_node() {
        let mut test = unconstrained(&[(2, 1, 4), (3, 1, 4), (4, 1, 4), (1, 1, 4)]);
        let mut neighbourhood =
            CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver()).unwrap();

        // node 1 loses its successor 2, which is reinserted after node 3
        let mut random = TestRandom {
            usizes: vec![0, 0],
            ..Default::default()
        };
        assert!(neighbourhood
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
        assert_eq!(test.values(), vec![3, 4, 2, 1]);
    }

    #[test]
    fn random_moves_keep_a_single_circuit() {
        let mut test = unconstrained(&[(1, 1, 6); 6]);
        let mut neighbourhood =
            CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver()).unwrap();
        let mut random = SmallRng::seed_from_u64(3);
        test.assignment
            .assign(|modifier| neighbourhood.initialise(&mut random, modifier))
            .unwrap();

        for _ in 0..200 {
            assert!(neighbourhood
                .random_move(&mut random, &mut test.assignment, &mut test.annealer)
                .unwrap());
            assert!(is_single_circuit(&test.values()), "{:?}", test.values());
        }
    }

    #[test]
    fn fixed_sub_circuits_are_rejected() {
        let test = unconstrained(&[(2, 2, 2), (1, 1, 1), (1, 1, 3)]);
        let result = CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver());
        assert!(matches!(result, Err(SearchError::InvalidNeighbourhood(_))));
    }

    #[test]
    fn a_completely_fixed_circuit_is_accepted() {
        let mut test = unconstrained(&[(2, 2, 2), (3, 3, 3), (1, 1, 1)]);
        let mut neighbourhood =
            CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver()).unwrap();
        let mut random = TestRandom {
            usizes: vec![0, 0],
            ..Default::default()
        };
        test.assignment
            .assign(|modifier| neighbourhood.initialise(&mut random, modifier))
            .unwrap();
        assert_eq!(test.values(), vec![2, 3, 1]);
        assert!(!neighbourhood
            .random_move(&mut random, &mut test.assignment, &mut test.annealer)
            .unwrap());
    }

    #[test]
    fn narrow_domains_are_rejected() {
        let test = unconstrained(&[(2, 1, 2), (1, 1, 3), (1, 1, 3)]);
        let result = CircuitNeighbourhood::new(test.variables.clone(), test.assignment.solver());
        assert!(matches!(result, Err(SearchError::InvalidNeighbourhood(_))));
    }
}
