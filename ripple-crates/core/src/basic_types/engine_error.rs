use thiserror::Error;

use crate::engine::IntVarId;
use crate::engine::VarId;

/// Errors which can occur when modelling with, or running, the [`Solver`](crate::engine::Solver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Model construction was attempted after the solver was closed.
    #[error("the model is closed; call `open` before adding variables or invariants")]
    SolverClosed,
    /// A move, query or commit was attempted while the model is still open.
    #[error("the model is open; call `close` before moving")]
    SolverOpen,
    /// A phase transition was requested out of order, e.g. `end_commit` without `begin_commit`.
    #[error("the engine should be {expected} but it is {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
    /// A second invariant tried to define a variable which already has a defining invariant.
    #[error("{var} is already defined by an invariant")]
    VarAlreadyDefined { var: IntVarId },
    /// The dependency graph contains a cycle through the given variable.
    #[error("the propagation graph contains a cycle through {var}")]
    CycleDetected { var: IntVarId },
    /// The solver tried to assign a variable which is defined by an invariant.
    #[error("{var} is not a search variable")]
    NotASearchVariable { var: IntVarId },
    /// Views can only be read; they have no value of their own to assign.
    #[error("{var} is a view and cannot be assigned")]
    ViewNotAllowed { var: VarId },
    /// An argument passed while modelling was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
