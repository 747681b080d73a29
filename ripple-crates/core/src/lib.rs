//! An incremental propagation engine for constraint-based local search.
//!
//! A model is built from integer variables, [views](crate::views) over them, and
//! [invariants](crate::invariants) which define variables as functions of other variables.
//! [Violation invariants](crate::violation_invariants) measure how far a constraint is from
//! holding. Once the [`Solver`] is closed, moves assign search variables and probes or commits
//! bring the defined variables up to date, recomputing only what a move changed.
//!
//! ```
//! # use ripple_core::Solver;
//! # use ripple_core::invariants::Linear;
//! # use ripple_core::violation_invariants::NotEqual;
//! let mut solver = Solver::new();
//! let x = solver.make_int_var(2, 0, 5).unwrap();
//! let y = solver.make_int_var(3, 0, 5).unwrap();
//! let sum = solver.make_int_var(0, 0, 0).unwrap();
//! let _ = solver.make_invariant(Linear::sum(sum, [x, y])).unwrap();
//! let violation = solver.make_int_var(0, 0, 0).unwrap();
//! let _ = solver
//!     .make_violation_invariant(NotEqual::new(violation, x, y))
//!     .unwrap();
//! solver.close().unwrap();
//! assert_eq!((solver.value(sum), solver.value(violation)), (5, 0));
//!
//! // Probing a move leaves the committed values untouched.
//! solver.begin_move().unwrap();
//! solver.set_value(x, 3).unwrap();
//! solver.end_move().unwrap();
//! solver.begin_probe().unwrap();
//! solver.query(violation).unwrap();
//! solver.end_probe().unwrap();
//! assert_eq!(solver.value(violation), 1);
//! assert_eq!(solver.committed_value(violation), 0);
//! ```
#[doc(hidden)]
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod engine;
pub mod invariants;
pub mod statistics;
pub mod views;
pub mod violation_invariants;

pub use convert_case;
pub use rand;

pub use crate::basic_types::EngineError;
pub use crate::basic_types::Int;
pub use crate::basic_types::Timestamp;
pub use crate::engine::IntVarId;
pub use crate::engine::Solver;
pub use crate::engine::VarId;
