use super::AnnealingSchedule;
use crate::annealing::RoundStatistics;
use crate::basic_types::SearchError;

/// Runs schedules one after the other. When a schedule freezes, the next one starts from the
/// temperature the frozen one ended at. The sequence is frozen when its last schedule is.
#[derive(Debug)]
pub struct Sequence {
    schedules: Vec<Box<dyn AnnealingSchedule>>,
    active: usize,
}

impl Sequence {
    pub fn new(schedules: Vec<Box<dyn AnnealingSchedule>>) -> Result<Self, SearchError> {
        if schedules.is_empty() {
            return Err(SearchError::InvalidSchedule(
                "a sequence needs at least one schedule".to_owned(),
            ));
        }
        Ok(Sequence {
            schedules,
            active: 0,
        })
    }

    fn is_last(&self) -> bool {
        self.active + 1 == self.schedules.len()
    }
}

impl AnnealingSchedule for Sequence {
    fn start(&mut self, initial_temperature: f64) {
        self.active = 0;
        self.schedules[0].start(initial_temperature);
    }

    fn next_round(&mut self, statistics: &RoundStatistics) {
        self.schedules[self.active].next_round(statistics);

        if self.schedules[self.active].frozen() && !self.is_last() {
            let temperature = self.schedules[self.active].temperature();
            self.active += 1;
            self.schedules[self.active].start(temperature);
        }
    }

    fn temperature(&self) -> f64 {
        self.schedules[self.active].temperature()
    }

    fn frozen(&self) -> bool {
        self.is_last() && self.schedules[self.active].frozen()
    }
}
