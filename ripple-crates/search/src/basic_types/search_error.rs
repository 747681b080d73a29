use ripple_core::EngineError;
use thiserror::Error;

/// Errors which can occur while setting up or running a local search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The propagation engine rejected an operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// An annealing schedule was configured with parameters it cannot run with.
    #[error("invalid annealing schedule: {0}")]
    InvalidSchedule(String),
    /// A neighbourhood was configured with variables or values it cannot work with.
    #[error("invalid neighbourhood: {0}")]
    InvalidNeighbourhood(String),
}
