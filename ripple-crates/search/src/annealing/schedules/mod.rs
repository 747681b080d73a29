mod cooling;
mod heating;
mod loop_schedule;
mod sequence;

use std::fmt::Debug;

pub use cooling::Cooling;
pub use heating::Heating;
pub use loop_schedule::Loop;
pub use sequence::Sequence;

use super::RoundStatistics;

/// Controls the temperature of the [`Annealer`](super::Annealer).
///
/// A schedule is started once with a temperature, and after every round it is told what
/// happened in that round. The annealer stops as soon as the schedule reports that it is frozen.
pub trait AnnealingSchedule: Debug {
    /// (Re)starts the schedule from `initial_temperature`.
    fn start(&mut self, initial_temperature: f64);

    /// Called after every round.
    fn next_round(&mut self, statistics: &RoundStatistics);

    fn temperature(&self) -> f64;

    /// Whether the schedule has finished.
    fn frozen(&self) -> bool;
}
