use super::AnnealingSchedule;
use super::Cooling;
use super::Heating;
use super::Loop;
use super::Sequence;
use crate::basic_types::SearchError;

/// A description of an [`AnnealingSchedule`], which can be validated and built.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleDefinition {
    Heating {
        heating_rate: f64,
        minimum_uphill_acceptance_ratio: f64,
    },
    Cooling {
        cooling_rate: f64,
        successive_futile_rounds_threshold: u64,
    },
    Sequence(Vec<ScheduleDefinition>),
    Loop {
        schedule: Box<ScheduleDefinition>,
        maximum_consecutive_futile_rounds: u64,
    },
}

impl Default for ScheduleDefinition {
    /// Heat until 75% of the uphill moves are accepted, then cool until four rounds in a row
    /// find nothing better; repeat until five such passes were futile.
    fn default() -> Self {
        ScheduleDefinition::Loop {
            schedule: Box::new(ScheduleDefinition::Sequence(vec![
                ScheduleDefinition::Heating {
                    heating_rate: 1.2,
                    minimum_uphill_acceptance_ratio: 0.75,
                },
                ScheduleDefinition::Cooling {
                    cooling_rate: 0.99,
                    successive_futile_rounds_threshold: 4,
                },
            ])),
            maximum_consecutive_futile_rounds: 5,
        }
    }
}

impl ScheduleDefinition {
    pub fn build(&self) -> Result<Box<dyn AnnealingSchedule>, SearchError> {
        Ok(match self {
            ScheduleDefinition::Heating {
                heating_rate,
                minimum_uphill_acceptance_ratio,
            } => Box::new(Heating::new(*heating_rate, *minimum_uphill_acceptance_ratio)?),
            ScheduleDefinition::Cooling {
                cooling_rate,
                successive_futile_rounds_threshold,
            } => Box::new(Cooling::new(*cooling_rate, *successive_futile_rounds_threshold)?),
            ScheduleDefinition::Sequence(definitions) => {
                let schedules = definitions
                    .iter()
                    .map(ScheduleDefinition::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(Sequence::new(schedules)?)
            }
            ScheduleDefinition::Loop {
                schedule,
                maximum_consecutive_futile_rounds,
            } => Box::new(Loop::new(schedule.build()?, *maximum_consecutive_futile_rounds)?),
        })
    }
}

/// Creates the schedule used by the [`Annealer`](super::Annealer); the default schedule is used
/// unless a definition is given.
#[derive(Debug, Clone, Default)]
pub struct AnnealingScheduleFactory {
    definition: Option<ScheduleDefinition>,
}

impl AnnealingScheduleFactory {
    pub fn new(definition: Option<ScheduleDefinition>) -> Self {
        AnnealingScheduleFactory { definition }
    }

    pub fn create(&self) -> Result<Box<dyn AnnealingSchedule>, SearchError> {
        match &self.definition {
            Some(definition) => definition.build(),
            None => Self::default_schedule(),
        }
    }

    pub fn default_schedule() -> Result<Box<dyn AnnealingSchedule>, SearchError> {
        ScheduleDefinition::default().build()
    }
}
