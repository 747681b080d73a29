//! The driver of a local search: it lets a [`Neighbourhood`] propose moves to an [`Annealer`]
//! until the annealer is finished, and keeps the best solution it encounters. After every
//! solution the objective is tightened, so the search continues towards better solutions.
use log::debug;
use log::info;
use ripple_core::basic_types::Random;
use ripple_core::create_statistics_struct;
use ripple_core::statistics::Statistic;
use ripple_core::statistics::StatisticLogger;
use ripple_core::Int;
use ripple_core::IntVarId;

use crate::annealing::Annealer;
use crate::assignment::Assignment;
use crate::basic_types::Cost;
use crate::basic_types::ObjectiveDirection;
use crate::basic_types::SearchError;
use crate::neighbourhoods::Neighbourhood;

create_statistics_struct!(
    /// Counters of a [`LocalSearch`].
    LocalSearchStatistics {
        /// The number of moves offered to the annealer
        num_moves: u64,
        /// The number of assignments found which satisfy all constraints
        num_solutions: u64,
        /// The number of times the objective bound was tightened
        num_tightenings: u64,
});

/// The values of the search variables in an assignment which satisfies all constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    values: Vec<(IntVarId, Int)>,
    cost: Cost,
}

impl Solution {
    fn from_assignment(assignment: &Assignment) -> Self {
        Solution {
            values: assignment
                .search_variables()
                .iter()
                .map(|&var| (var, assignment.value(var)))
                .collect(),
            cost: assignment.cost(),
        }
    }

    pub fn value(&self, var: IntVarId) -> Option<Int> {
        self.values
            .iter()
            .find_map(|&(other, value)| (other == var).then_some(value))
    }

    pub fn values(&self) -> &[(IntVarId, Int)] {
        &self.values
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }
}

/// The outcome of [`LocalSearch::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// The objective reached the best value its domain allows.
    Optimal(Solution),
    /// The best solution found before the search finished.
    Satisfiable(Solution),
    /// No solution was found.
    Unknown,
}

#[derive(Debug)]
pub struct LocalSearch<N> {
    assignment: Assignment,
    neighbourhood: N,
    annealer: Annealer,
    move_limit: Option<u64>,
    statistics: LocalSearchStatistics,
}

impl<N: Neighbourhood> LocalSearch<N> {
    pub fn new(assignment: Assignment, neighbourhood: N, annealer: Annealer) -> Self {
        LocalSearch {
            assignment,
            neighbourhood,
            annealer,
            move_limit: None,
            statistics: LocalSearchStatistics::default(),
        }
    }

    /// Stops the search after `moves` moves, even if the annealer is not finished.
    pub fn with_move_limit(mut self, moves: u64) -> Self {
        self.move_limit = Some(moves);
        self
    }

    /// Initialises the assignment through the neighbourhood and anneals until the annealer is
    /// finished or an optimal solution is found. A move limit stops the search early.
    pub fn run(&mut self, random: &mut dyn Random) -> Result<SearchResult, SearchError> {
        let neighbourhood = &mut self.neighbourhood;
        self.assignment
            .assign(|modifier| neighbourhood.initialise(random, modifier))?;
        self.annealer.start(&self.assignment);
        debug!("initial cost {:?}", self.assignment.cost());

        let mut best = None;
        if self.assignment.satisfies_constraints() && self.on_solution(&mut best)? {
            return Ok(Self::finish(best, true));
        }

        let moves_per_round = self
            .annealer
            .moves_per_round(self.neighbourhood.covered_variables().len());
        while !self.annealer.is_finished() {
            self.annealer.begin_round();
            for _ in 0..moves_per_round {
                if self.move_limit_reached() {
                    let _ = self.annealer.end_round();
                    return Ok(Self::finish(best, false));
                }

                self.statistics.num_moves += 1;
                let committed =
                    self.neighbourhood
                        .random_move(random, &mut self.assignment, &mut self.annealer)?;
                if committed && self.assignment.satisfies_constraints() && self.on_solution(&mut best)? {
                    let _ = self.annealer.end_round();
                    return Ok(Self::finish(best, true));
                }
            }
            let _ = self.annealer.end_round();
        }

        Ok(Self::finish(best, false))
    }

    fn move_limit_reached(&self) -> bool {
        self.move_limit
            .is_some_and(|limit| self.statistics.num_moves >= limit)
    }

    /// Records the current assignment as the best solution and tightens the objective. Returns
    /// whether the search is done.
    fn on_solution(&mut self, best: &mut Option<Solution>) -> Result<bool, SearchError> {
        let solution = Solution::from_assignment(&self.assignment);
        self.statistics.num_solutions += 1;
        info!(
            "solution {} found with objective value {}",
            self.statistics.num_solutions,
            solution.cost().objective_value()
        );
        *best = Some(solution);

        if self.assignment.objective().direction() == ObjectiveDirection::None
            || self.assignment.objective_is_optimal()
        {
            return Ok(true);
        }

        self.assignment.tighten_objective()?;
        self.annealer.reset_best_cost(&self.assignment);
        self.statistics.num_tightenings += 1;
        Ok(false)
    }

    fn finish(best: Option<Solution>, done: bool) -> SearchResult {
        match best {
            Some(solution) if done && solution.cost().objective_direction() != ObjectiveDirection::None => {
                SearchResult::Optimal(solution)
            }
            Some(solution) => SearchResult::Satisfiable(solution),
            None => SearchResult::Unknown,
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }

    pub fn annealer(&self) -> &Annealer {
        &self.annealer
    }

    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics
            .log(statistic_logger.attach_to_prefix("local_search"));
        self.annealer
            .log_statistics(statistic_logger.attach_to_prefix("annealer"));
        self.assignment
            .solver()
            .log_statistics(statistic_logger.attach_to_prefix("engine"));
    }
}
