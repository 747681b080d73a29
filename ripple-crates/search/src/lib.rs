//! Local search on top of the `ripple_core` propagation engine.
//!
//! An [`Assignment`] owns a closed [`Solver`](ripple_core::Solver) together with the variable
//! holding the total violation and an [`Objective`]. A [`Neighbourhood`](neighbourhoods::Neighbourhood)
//! proposes moves, the [`Annealer`](annealing::Annealer) probes them and commits the ones it
//! accepts, and [`LocalSearch`] runs the whole loop while keeping track of the best solution.
//!
//! ```
//! # use rand::rngs::SmallRng;
//! # use rand::SeedableRng;
//! # use ripple_core::Solver;
//! # use ripple_core::violation_invariants::NotEqual;
//! # use ripple_search::annealing::Annealer;
//! # use ripple_search::annealing::AnnealerOptions;
//! # use ripple_search::neighbourhoods::RandomNeighbourhood;
//! # use ripple_search::Assignment;
//! # use ripple_search::LocalSearch;
//! # use ripple_search::Objective;
//! # use ripple_search::SearchResult;
//! let mut solver = Solver::new();
//! let x = solver.make_int_var(1, 0, 3).unwrap();
//! let y = solver.make_int_var(1, 0, 3).unwrap();
//! let violation = solver.make_int_var(0, 0, 0).unwrap();
//! let _ = solver
//!     .make_violation_invariant(NotEqual::new(violation, x, y))
//!     .unwrap();
//! solver.close().unwrap();
//!
//! let assignment = Assignment::new(solver, violation, Objective::satisfy()).unwrap();
//! let neighbourhood = RandomNeighbourhood::new(vec![x, y], assignment.solver());
//! let annealer = Annealer::with_default_schedule(AnnealerOptions::default()).unwrap();
//! let mut search = LocalSearch::new(assignment, neighbourhood, annealer).with_move_limit(1_000);
//!
//! let result = search.run(&mut SmallRng::seed_from_u64(0)).unwrap();
//! let SearchResult::Satisfiable(solution) = result else {
//!     panic!("x and y can differ")
//! };
//! assert_ne!(solution.value(x), solution.value(y));
//! ```
pub mod annealing;
mod assignment;
pub mod basic_types;
mod local_search;
pub mod neighbourhoods;
mod objective;

pub use assignment::Assignment;
pub use assignment::AssignmentModifier;
pub use basic_types::Cost;
pub use basic_types::Move;
pub use basic_types::ObjectiveDirection;
pub use basic_types::SearchError;
pub use local_search::LocalSearch;
pub use local_search::LocalSearchStatistics;
pub use local_search::SearchResult;
pub use local_search::Solution;
pub use objective::Objective;
