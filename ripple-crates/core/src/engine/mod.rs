//! The propagation engine: variables, the dependency graph and the move/probe/commit protocol.
mod context;
mod ids;
mod int_var;
mod output_to_input;
mod propagation_graph;
mod propagation_queue;
mod solver;
mod solver_statistics;
mod store;
#[cfg(test)]
pub(crate) mod test_solver;

pub use context::*;
pub use ids::*;
pub use int_var::*;
pub use output_to_input::OutputToInputMarkingMode;
pub(crate) use output_to_input::ExplorerContext;
pub(crate) use output_to_input::OutputToInputExplorer;
pub(crate) use propagation_graph::*;
pub(crate) use propagation_queue::*;
pub use solver::*;
pub use solver_statistics::*;
pub use store::*;
