//! Simulated annealing: the [`Annealer`] decides which moves proposed by a
//! [`Neighbourhood`](crate::neighbourhoods::Neighbourhood) are committed, and an
//! [`AnnealingSchedule`] controls its temperature from one round to the next.
mod annealer;
mod annealer_options;
mod round_statistics;
mod schedule_factory;
mod schedules;

pub use annealer::*;
pub use annealer_options::*;
pub use round_statistics::*;
pub use schedule_factory::*;
pub use schedules::*;
