use ripple_core::Int;

use crate::basic_types::SearchError;

/// Options of the [`Annealer`](super::Annealer).
///
/// ```
/// # use ripple_search::annealing::AnnealerOptions;
/// let options = AnnealerOptions::default()
///     .with_initial_temperature(2.0)
///     .with_moves_per_variable(4)
///     .with_round_limit(100);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealerOptions {
    /// The temperature the schedule starts from.
    pub initial_temperature: f64,
    /// A round makes this many moves for every variable covered by the neighbourhood.
    pub moves_per_variable: u64,
    /// The maximum number of rounds, `None` runs until the schedule is frozen.
    pub round_limit: Option<u64>,
    /// The weight of the violation when comparing costs.
    pub violation_weight: Int,
    /// The weight of the objective when comparing costs.
    pub objective_weight: Int,
}

impl Default for AnnealerOptions {
    fn default() -> Self {
        AnnealerOptions {
            initial_temperature: 1.0,
            moves_per_variable: 1,
            round_limit: None,
            violation_weight: 1,
            objective_weight: 1,
        }
    }
}

impl AnnealerOptions {
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_moves_per_variable(mut self, moves: u64) -> Self {
        self.moves_per_variable = moves;
        self
    }

    pub fn with_round_limit(mut self, rounds: u64) -> Self {
        self.round_limit = Some(rounds);
        self
    }

    pub fn with_weights(mut self, violation_weight: Int, objective_weight: Int) -> Self {
        self.violation_weight = violation_weight;
        self.objective_weight = objective_weight;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.initial_temperature.is_nan() || self.initial_temperature <= 0.0 {
            return Err(SearchError::InvalidSchedule(format!(
                "the initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if self.moves_per_variable == 0 {
            return Err(SearchError::InvalidSchedule(
                "a round has to make at least one move per variable".to_owned(),
            ));
        }
        if self.violation_weight < 0 || self.objective_weight < 0 {
            return Err(SearchError::InvalidSchedule(format!(
                "cost weights cannot be negative, got {} and {}",
                self.violation_weight, self.objective_weight
            )));
        }
        Ok(())
    }
}
