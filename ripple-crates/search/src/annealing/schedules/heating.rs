use super::AnnealingSchedule;
use crate::annealing::RoundStatistics;
use crate::basic_types::SearchError;

/// Raises the temperature until enough uphill moves are accepted.
///
/// After every round in which the share of accepted uphill moves stays below
/// `minimum_uphill_acceptance_ratio`, the temperature is multiplied by `heating_rate`. The
/// schedule is frozen once a round reaches the ratio.
#[derive(Debug, Clone, Copy)]
pub struct Heating {
    heating_rate: f64,
    minimum_uphill_acceptance_ratio: f64,
    temperature: f64,
    last_uphill_acceptance_ratio: f64,
}

impl Heating {
    pub fn new(heating_rate: f64, minimum_uphill_acceptance_ratio: f64) -> Result<Self, SearchError> {
        if heating_rate.is_nan() || heating_rate <= 1.0 {
            return Err(SearchError::InvalidSchedule(format!(
                "the heating rate has to be larger than 1, got {heating_rate}"
            )));
        }
        if !(0.0..=1.0).contains(&minimum_uphill_acceptance_ratio) {
            return Err(SearchError::InvalidSchedule(format!(
                "the minimum uphill acceptance ratio has to be in [0, 1], got {minimum_uphill_acceptance_ratio}"
            )));
        }

        Ok(Heating {
            heating_rate,
            minimum_uphill_acceptance_ratio,
            temperature: 0.0,
            last_uphill_acceptance_ratio: 0.0,
        })
    }
}

impl AnnealingSchedule for Heating {
    fn start(&mut self, initial_temperature: f64) {
        self.temperature = initial_temperature;
        self.last_uphill_acceptance_ratio = 0.0;
    }

    fn next_round(&mut self, statistics: &RoundStatistics) {
        self.last_uphill_acceptance_ratio = statistics.uphill_acceptance_ratio();
        if !self.frozen() {
            self.temperature *= self.heating_rate;
        }
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn frozen(&self) -> bool {
        self.last_uphill_acceptance_ratio >= self.minimum_uphill_acceptance_ratio
    }
}
