//! The objective of a local search. Optimisation objectives are turned into an extra violation:
//! a bound variable holds the value the objective has to improve upon, and the distance of the
//! objective to that bound is added to the total violation. Tightening the bound after a solution
//! is found pushes the search towards better solutions.
use log::debug;
use ripple_core::engine::Solver;
use ripple_core::invariants::Linear;
use ripple_core::violation_invariants::LessEqual;
use ripple_core::Int;
use ripple_core::IntVarId;
use ripple_core::VarId;

use crate::basic_types::ObjectiveDirection;
use crate::basic_types::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Satisfy,
    Minimise(VarId),
    Maximise(VarId),
}

#[derive(Debug, Clone, Copy)]
pub struct Objective {
    goal: Goal,
    bound: Option<IntVarId>,
    violation: Option<IntVarId>,
}

impl Objective {
    pub fn satisfy() -> Self {
        Self::with_goal(Goal::Satisfy)
    }

    pub fn minimise(objective: impl Into<VarId>) -> Self {
        Self::with_goal(Goal::Minimise(objective.into()))
    }

    pub fn maximise(objective: impl Into<VarId>) -> Self {
        Self::with_goal(Goal::Maximise(objective.into()))
    }

    fn with_goal(goal: Goal) -> Self {
        Objective {
            goal,
            bound: None,
            violation: None,
        }
    }

    pub fn direction(&self) -> ObjectiveDirection {
        match self.goal {
            Goal::Satisfy => ObjectiveDirection::None,
            Goal::Minimise(_) => ObjectiveDirection::Minimise,
            Goal::Maximise(_) => ObjectiveDirection::Maximise,
        }
    }

    /// The variable being optimised, if any.
    pub fn objective_var(&self) -> Option<VarId> {
        match self.goal {
            Goal::Satisfy => None,
            Goal::Minimise(var) | Goal::Maximise(var) => Some(var),
        }
    }

    /// The variable holding the value the objective has to improve upon. Only optimisation
    /// objectives have a bound, once they are registered.
    pub fn bound(&self) -> Option<IntVarId> {
        self.bound
    }

    /// The violation which includes the objective, once registered.
    pub fn violation(&self) -> Option<IntVarId> {
        self.violation
    }

    /// Adds the bound of the objective to the model and returns the variable which holds the sum
    /// of `total_violation` and the violation of the bound. A satisfaction objective adds nothing
    /// and returns `total_violation`.
    ///
    /// The solver has to be open.
    pub fn register(&mut self, solver: &mut Solver, total_violation: IntVarId) -> Result<IntVarId, SearchError> {
        let violation = match self.goal {
            Goal::Satisfy => total_violation,
            Goal::Minimise(objective) | Goal::Maximise(objective) => {
                let (lower_bound, upper_bound) = (solver.lower_bound(objective), solver.upper_bound(objective));
                let initial_bound = if self.direction() == ObjectiveDirection::Minimise {
                    upper_bound
                } else {
                    lower_bound
                };
                let bound = solver.make_int_var(initial_bound, lower_bound, upper_bound)?;
                let bound_violation = solver.make_int_var(0, 0, 0)?;
                let _ = if self.direction() == ObjectiveDirection::Minimise {
                    solver.make_violation_invariant(LessEqual::new(bound_violation, objective, bound))?
                } else {
                    solver.make_violation_invariant(LessEqual::new(bound_violation, bound, objective))?
                };

                let violation = solver.make_int_var(0, 0, 0)?;
                let _ = solver.make_invariant(Linear::sum(violation, [total_violation, bound_violation]))?;
                self.bound = Some(bound);
                violation
            }
        };
        self.violation = Some(violation);
        Ok(violation)
    }

    /// Moves the bound just past the committed value of the objective, such that the current
    /// solution becomes violating. Does nothing for a satisfaction objective, or when the bound
    /// cannot move any further.
    ///
    /// The solver has to be closed.
    pub fn tighten(&self, solver: &mut Solver) -> Result<(), SearchError> {
        let (Some(objective), Some(bound), Some(violation)) = (self.objective_var(), self.bound, self.violation) else {
            return Ok(());
        };

        let objective_value = solver.committed_value(objective);
        let target: Int = if self.direction() == ObjectiveDirection::Minimise {
            objective_value - 1
        } else {
            objective_value + 1
        };
        let new_bound = target.clamp(solver.lower_bound(bound), solver.upper_bound(bound));
        if new_bound == solver.committed_value(bound) {
            return Ok(());
        }
        debug!("Tightening the objective bound to {new_bound}");

        solver.begin_move()?;
        solver.set_value(bound, new_bound)?;
        solver.end_move()?;
        solver.begin_commit()?;
        solver.query(violation)?;
        solver.end_commit()?;
        Ok(())
    }
}
