mod committable;
mod engine_error;
mod random;

pub use committable::*;
pub use engine_error::*;
pub use random::*;

/// The integer domain of every variable in the engine.
pub type Int = i64;

/// Identifies a move (or a commit) of the engine. Every [`Committable`] value compares its own
/// timestamp against the current one to decide whether its tentative value is live.
pub type Timestamp = u64;
