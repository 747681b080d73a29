use super::AnnealingSchedule;
use crate::annealing::RoundStatistics;
use crate::basic_types::SearchError;

/// Geometric cooling: after every round the temperature is multiplied by `cooling_rate`.
///
/// The schedule is frozen after `successive_futile_rounds_threshold` rounds in a row did not
/// improve the best cost.
#[derive(Debug, Clone, Copy)]
pub struct Cooling {
    cooling_rate: f64,
    successive_futile_rounds_threshold: u64,
    temperature: f64,
    futile_rounds: u64,
}

impl Cooling {
    pub fn new(cooling_rate: f64, successive_futile_rounds_threshold: u64) -> Result<Self, SearchError> {
        if cooling_rate.is_nan() || cooling_rate <= 0.0 || cooling_rate >= 1.0 {
            return Err(SearchError::InvalidSchedule(format!(
                "the cooling rate has to be in (0, 1), got {cooling_rate}"
            )));
        }
        if successive_futile_rounds_threshold == 0 {
            return Err(SearchError::InvalidSchedule(
                "cooling has to allow at least one futile round".to_owned(),
            ));
        }

        Ok(Cooling {
            cooling_rate,
            successive_futile_rounds_threshold,
            temperature: 0.0,
            futile_rounds: 0,
        })
    }
}

impl AnnealingSchedule for Cooling {
    fn start(&mut self, initial_temperature: f64) {
        self.temperature = initial_temperature;
        self.futile_rounds = 0;
    }

    fn next_round(&mut self, statistics: &RoundStatistics) {
        if statistics.improved_best {
            self.futile_rounds = 0;
        } else {
            self.futile_rounds += 1;
        }
        self.temperature *= self.cooling_rate;
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn frozen(&self) -> bool {
        self.futile_rounds >= self.successive_futile_rounds_threshold
    }
}
