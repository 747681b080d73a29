use log::info;
use log::trace;
use ripple_core::basic_types::Random;
use ripple_core::create_statistics_struct;
use ripple_core::statistics::Statistic;
use ripple_core::statistics::StatisticLogger;
use ripple_core::Int;

use super::AnnealerOptions;
use super::AnnealingSchedule;
use super::AnnealingScheduleFactory;
use super::RoundStatistics;
use crate::assignment::Assignment;
use crate::basic_types::Cost;
use crate::basic_types::Move;
use crate::basic_types::SearchError;

create_statistics_struct!(
    /// Counters of the [`Annealer`] over all of its rounds.
    AnnealerStatistics {
        /// The number of completed rounds
        num_rounds: u64,
        /// The number of probed moves
        num_attempted_moves: u64,
        /// The number of committed moves
        num_accepted_moves: u64,
        /// The number of probed moves which were not committed
        num_rejected_moves: u64,
        /// The number of committed moves which lowered the cost
        num_improving_moves: u64,
        /// The number of committed moves which raised the cost
        num_uphill_moves: u64,
});

/// Decides which moves are committed using the Metropolis criterion: a move which does not make
/// the cost worse is always accepted, a move which raises the cost by `delta` is accepted with
/// probability `exp(-delta / temperature)`.
#[derive(Debug)]
pub struct Annealer {
    options: AnnealerOptions,
    schedule: Box<dyn AnnealingSchedule>,
    round: RoundStatistics,
    best_evaluation: Option<Int>,
    statistics: AnnealerStatistics,
}

impl Annealer {
    pub fn new(options: AnnealerOptions, schedule: Box<dyn AnnealingSchedule>) -> Result<Self, SearchError> {
        options.validate()?;
        Ok(Annealer {
            options,
            schedule,
            round: RoundStatistics::default(),
            best_evaluation: None,
            statistics: AnnealerStatistics::default(),
        })
    }

    pub fn with_default_schedule(options: AnnealerOptions) -> Result<Self, SearchError> {
        Self::new(options, AnnealingScheduleFactory::default_schedule()?)
    }

    /// Starts the schedule and takes the cost of `assignment` as the best cost so far.
    pub fn start(&mut self, assignment: &Assignment) {
        self.schedule.start(self.options.initial_temperature);
        self.round = RoundStatistics::default();
        self.reset_best_cost(assignment);
    }

    /// Takes the cost of `assignment` as the best cost so far, e.g. after the objective was
    /// tightened.
    pub fn reset_best_cost(&mut self, assignment: &Assignment) {
        self.best_evaluation = Some(self.evaluate(&assignment.cost()));
    }

    pub fn temperature(&self) -> f64 {
        self.schedule.temperature()
    }

    /// Whether the schedule is frozen or the round limit has been reached.
    pub fn is_finished(&self) -> bool {
        self.schedule.frozen()
            || self
                .options
                .round_limit
                .is_some_and(|limit| self.statistics.num_rounds >= limit)
    }

    /// The number of moves in a round over a neighbourhood covering `num_covered_variables`.
    pub fn moves_per_round(&self, num_covered_variables: usize) -> u64 {
        self.options.moves_per_variable * num_covered_variables.max(1) as u64
    }

    pub fn evaluate(&self, cost: &Cost) -> Int {
        cost.evaluate(self.options.violation_weight, self.options.objective_weight)
    }

    /// Whether a move which changes the cost by `delta` is accepted at the current temperature.
    pub fn accept(&mut self, random: &mut dyn Random, delta: Int) -> bool {
        if delta <= 0 {
            return true;
        }

        let temperature = self.temperature();
        if temperature <= 0.0 {
            return false;
        }
        random.generate_f64() < (-(delta as f64) / temperature).exp()
    }

    /// Probes `candidate` and commits it if it is accepted.
    pub fn maybe_commit(
        &mut self,
        random: &mut dyn Random,
        candidate: &Move,
        assignment: &mut Assignment,
    ) -> Result<bool, SearchError> {
        let current = self.evaluate(&assignment.cost());
        let probed = self.evaluate(&assignment.probe_move(candidate)?);
        let delta = probed - current;

        self.round.attempted_moves += 1;
        if delta > 0 {
            self.round.uphill_attempted_moves += 1;
        }

        if !self.accept(random, delta) {
            trace!("rejected {candidate:?} with delta {delta}");
            return Ok(false);
        }

        assignment.commit_move(candidate)?;
        trace!("committed {candidate:?} with delta {delta}");

        self.round.accepted_moves += 1;
        if delta < 0 {
            self.round.improving_moves += 1;
        } else if delta > 0 {
            self.round.uphill_accepted_moves += 1;
        }
        if self.best_evaluation.is_none_or(|best| probed < best) {
            self.best_evaluation = Some(probed);
            self.round.improved_best = true;
        }
        Ok(true)
    }

    pub fn begin_round(&mut self) {
        self.round = RoundStatistics {
            temperature: self.temperature(),
            ..Default::default()
        };
    }

    /// Finishes the round and lets the schedule pick the next temperature.
    pub fn end_round(&mut self) -> RoundStatistics {
        let round = self.round;
        self.schedule.next_round(&round);

        self.statistics.num_rounds += 1;
        self.statistics.num_attempted_moves += round.attempted_moves;
        self.statistics.num_accepted_moves += round.accepted_moves;
        self.statistics.num_rejected_moves += round.attempted_moves - round.accepted_moves;
        self.statistics.num_improving_moves += round.improving_moves;
        self.statistics.num_uphill_moves += round.uphill_accepted_moves;

        info!(
            "round {} at temperature {:.4}: accepted {}/{} moves, next temperature {:.4}",
            self.statistics.num_rounds,
            round.temperature,
            round.accepted_moves,
            round.attempted_moves,
            self.temperature(),
        );
        round
    }

    pub fn statistics(&self) -> &AnnealerStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use ripple_core::engine::Solver;
    use ripple_core::violation_invariants::Equal;
    use ripple_core::IntVarId;

    use super::Annealer;
    use crate::annealing::AnnealerOptions;
    use crate::annealing::Cooling;
    use crate::assignment::Assignment;
    use crate::basic_types::test_random::TestRandom;
    use crate::basic_types::Move;
    use crate::objective::Objective;

    /// The violation is |x - 3| and x starts at 0.
    fn distance_to_three() -> (Assignment, IntVarId) {
        let mut solver = Solver::new();
        let x = solver.make_int_var(0, 0, 10).unwrap();
        let three = solver.make_int_var(3, 3, 3).unwrap();
        let violation = solver.make_int_var(0, 0, 10).unwrap();
        let _ = solver
            .make_violation_invariant(Equal::new(violation, x, three))
            .unwrap();
        solver.close().unwrap();

        let assignment = Assignment::new(solver, violation, Objective::satisfy()).unwrap();
        (assignment, x)
    }

    fn annealer(assignment: &Assignment) -> Annealer {
        let mut annealer = Annealer::new(
            AnnealerOptions::default(),
            Box::new(Cooling::new(0.5, 2).unwrap()),
        )
        .unwrap();
        annealer.start(assignment);
        annealer
    }

    #[test]
    fn downhill_and_sideways_moves_are_always_accepted() {
        let (assignment, _) = distance_to_three();
        let mut annealer = annealer(&assignment);
        let mut random = TestRandom::default();

        assert!(annealer.accept(&mut random, -3));
        assert!(annealer.accept(&mut random, 0));
    }

    #[test]
    fn uphill_moves_follow_the_metropolis_criterion() {
        let (assignment, _) = distance_to_three();
        let mut annealer = annealer(&assignment);
        let mut random = TestRandom {
            floats: vec![0.5, 0.2],
            ..Default::default()
        };

        // exp(-1) is roughly 0.37
        assert!(!annealer.accept(&mut random, 1));
        assert!(annealer.accept(&mut random, 1));
    }

    #[test]
    fn rejected_moves_leave_the_assignment_unchanged() {
        let (mut assignment, x) = distance_to_three();
        let mut annealer = annealer(&assignment);
        assignment.commit_move(&Move::assign(x, 3)).unwrap();
        annealer.reset_best_cost(&assignment);

        let mut random = TestRandom {
            floats: vec![0.9],
            ..Default::default()
        };
        annealer.begin_round();
        assert!(!annealer
            .maybe_commit(&mut random, &Move::assign(x, 5), &mut assignment)
            .unwrap());
        assert_eq!(assignment.value(x), 3);

        let round = annealer.end_round();
        assert_eq!(round.attempted_moves, 1);
        assert_eq!(round.uphill_attempted_moves, 1);
        assert_eq!(round.accepted_moves, 0);
        assert!(!round.improved_best);
        assert_eq!(annealer.statistics().num_rejected_moves, 1);
    }

    #[test]
    fn improving_moves_are_committed_and_tracked() {
        let (mut assignment, x) = distance_to_three();
        let mut annealer = annealer(&assignment);
        let mut random = TestRandom::default();

        annealer.begin_round();
        assert!(annealer
            .maybe_commit(&mut random, &Move::assign(x, 2), &mut assignment)
            .unwrap());
        assert_eq!(assignment.value(x), 2);
        assert_eq!(assignment.cost().violation_degree(), 1);

        let round = annealer.end_round();
        assert_eq!(round.improving_moves, 1);
        assert!(round.improved_best);
        assert_eq!(annealer.statistics().num_rounds, 1);
        assert_eq!(annealer.temperature(), 0.5);
    }

    #[test]
    fn round_limit_finishes_the_annealer() {
        let (assignment, _) = distance_to_three();
        let mut annealer = Annealer::new(
            AnnealerOptions::default().with_round_limit(1),
            Box::new(Cooling::new(0.5, 100).unwrap()),
        )
        .unwrap();
        annealer.start(&assignment);
        assert!(!annealer.is_finished());

        annealer.begin_round();
        let _ = annealer.end_round();
        assert!(annealer.is_finished());
    }
}
