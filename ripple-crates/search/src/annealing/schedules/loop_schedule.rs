use super::AnnealingSchedule;
use crate::annealing::RoundStatistics;
use crate::basic_types::SearchError;

/// Restarts a schedule every time it freezes, from the temperature it froze at.
///
/// A pass of the inner schedule is futile when none of its rounds improved the best cost. The
/// loop is frozen after `maximum_consecutive_futile_rounds` futile passes in a row.
#[derive(Debug)]
pub struct Loop {
    schedule: Box<dyn AnnealingSchedule>,
    maximum_consecutive_futile_rounds: u64,
    futile_rounds: u64,
    improved_in_pass: bool,
}

impl Loop {
    pub fn new(
        schedule: Box<dyn AnnealingSchedule>,
        maximum_consecutive_futile_rounds: u64,
    ) -> Result<Self, SearchError> {
        if maximum_consecutive_futile_rounds == 0 {
            return Err(SearchError::InvalidSchedule(
                "a loop has to allow at least one futile pass".to_owned(),
            ));
        }
        Ok(Loop {
            schedule,
            maximum_consecutive_futile_rounds,
            futile_rounds: 0,
            improved_in_pass: false,
        })
    }
}

impl AnnealingSchedule for Loop {
    fn start(&mut self, initial_temperature: f64) {
        self.futile_rounds = 0;
        self.improved_in_pass = false;
        self.schedule.start(initial_temperature);
    }

    fn next_round(&mut self, statistics: &RoundStatistics) {
        self.improved_in_pass |= statistics.improved_best;
        self.schedule.next_round(statistics);

        if !self.schedule.frozen() {
            return;
        }

        if self.improved_in_pass {
            self.futile_rounds = 0;
        } else {
            self.futile_rounds += 1;
        }
        self.improved_in_pass = false;

        let temperature = self.schedule.temperature();
        self.schedule.start(temperature);
    }

    fn temperature(&self) -> f64 {
        self.schedule.temperature()
    }

    fn frozen(&self) -> bool {
        self.futile_rounds >= self.maximum_consecutive_futile_rounds
    }
}
