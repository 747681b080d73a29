use ripple_core::engine::Solver;
use ripple_core::EngineError;
use ripple_core::Int;
use ripple_core::IntVarId;
use ripple_core::VarId;

use crate::basic_types::Cost;
use crate::basic_types::Move;
use crate::basic_types::ObjectiveDirection;
use crate::basic_types::SearchError;
use crate::objective::Objective;

/// Gives write access to the search variables while a move is being built.
#[derive(Debug)]
pub struct AssignmentModifier<'a> {
    solver: &'a mut Solver,
    objective_bound: Option<IntVarId>,
}

impl AssignmentModifier<'_> {
    /// Assigns `value` to `var`, replacing any earlier assignment to `var` in this move. The bound
    /// of the objective is only moved by [`Assignment::tighten_objective`].
    pub fn set(&mut self, var: IntVarId, value: Int) -> Result<(), EngineError> {
        if Some(var) == self.objective_bound {
            return Err(EngineError::NotASearchVariable { var });
        }
        self.solver.set_value(var, value)
    }
}

/// The current solution of a local search.
///
/// Values are read from the committed state of the solver. Moves are either probed, which
/// evaluates their [`Cost`] without changing the assignment, or committed.
#[derive(Debug)]
pub struct Assignment {
    solver: Solver,
    violation: VarId,
    objective: Objective,
    search_vars: Vec<IntVarId>,
}

impl Assignment {
    /// Takes ownership of a closed solver. `violation` is the variable returned by
    /// [`Objective::register`].
    pub fn new(solver: Solver, violation: impl Into<VarId>, objective: Objective) -> Result<Self, SearchError> {
        if solver.is_open() {
            return Err(EngineError::SolverOpen.into());
        }
        let search_vars = solver
            .search_vars()
            .iter()
            .copied()
            .filter(|&var| Some(var) != objective.bound())
            .collect();
        Ok(Assignment {
            solver,
            violation: violation.into(),
            objective,
            search_vars,
        })
    }

    /// Commits the move built by `modify`.
    ///
    /// ```
    /// # use ripple_core::engine::Solver;
    /// # use ripple_search::Assignment;
    /// # use ripple_search::Objective;
    /// let mut solver = Solver::new();
    /// let x = solver.make_int_var(0, 0, 9).unwrap();
    /// let violation = solver.make_int_var(0, 0, 0).unwrap();
    /// solver.close().unwrap();
    ///
    /// let mut assignment = Assignment::new(solver, violation, Objective::satisfy()).unwrap();
    /// assignment.assign(|modifier| modifier.set(x, 4)).unwrap();
    /// assert_eq!(assignment.value(x), 4);
    /// ```
    pub fn assign(
        &mut self,
        modify: impl FnOnce(&mut AssignmentModifier<'_>) -> Result<(), EngineError>,
    ) -> Result<(), SearchError> {
        self.make_move(modify)?;

        self.solver.begin_commit()?;
        self.solver.query(self.violation)?;
        if let Some(objective) = self.objective.objective_var() {
            self.solver.query(objective)?;
        }
        self.solver.end_commit()?;
        Ok(())
    }

    /// Evaluates the move built by `modify` without changing the assignment.
    pub fn probe(
        &mut self,
        modify: impl FnOnce(&mut AssignmentModifier<'_>) -> Result<(), EngineError>,
    ) -> Result<Cost, SearchError> {
        self.make_move(modify)?;

        self.solver.begin_probe()?;
        if let Some(objective) = self.objective.objective_var() {
            self.solver.query(objective)?;
        }
        self.solver.query(self.violation)?;
        self.solver.end_probe()?;

        let objective_value = self
            .objective
            .objective_var()
            .map_or(0, |objective| self.solver.current_value(objective));
        Ok(Cost::new(
            self.solver.current_value(self.violation),
            objective_value,
            self.objective.direction(),
        ))
    }

    pub fn probe_move(&mut self, candidate: &Move) -> Result<Cost, SearchError> {
        self.probe(|modifier| apply_move(modifier, candidate))
    }

    pub fn commit_move(&mut self, candidate: &Move) -> Result<(), SearchError> {
        self.assign(|modifier| apply_move(modifier, candidate))
    }

    fn make_move(
        &mut self,
        modify: impl FnOnce(&mut AssignmentModifier<'_>) -> Result<(), EngineError>,
    ) -> Result<(), SearchError> {
        self.solver.begin_move()?;
        let result = modify(&mut AssignmentModifier {
            solver: &mut self.solver,
            objective_bound: self.objective.bound(),
        });
        self.solver.end_move()?;
        result.map_err(SearchError::from)
    }

    pub fn value(&self, var: impl Into<VarId>) -> Int {
        self.solver.committed_value(var)
    }

    pub fn lower_bound(&self, var: impl Into<VarId>) -> Int {
        self.solver.lower_bound(var)
    }

    pub fn upper_bound(&self, var: impl Into<VarId>) -> Int {
        self.solver.upper_bound(var)
    }

    /// The variables a search may assign. The bound of the objective is not among them.
    pub fn search_variables(&self) -> &[IntVarId] {
        &self.search_vars
    }

    pub fn cost(&self) -> Cost {
        let objective_value = self
            .objective
            .objective_var()
            .map_or(0, |objective| self.solver.committed_value(objective));
        Cost::new(
            self.solver.committed_value(self.violation),
            objective_value,
            self.objective.direction(),
        )
    }

    pub fn satisfies_constraints(&self) -> bool {
        self.solver.committed_value(self.violation) == 0
    }

    /// Whether the objective has reached the best value its domain allows.
    pub fn objective_is_optimal(&self) -> bool {
        match self.objective.objective_var() {
            None => self.satisfies_constraints(),
            Some(objective) => {
                let value = self.solver.committed_value(objective);
                match self.objective.direction() {
                    ObjectiveDirection::Maximise => value == self.solver.upper_bound(objective),
                    _ => value == self.solver.lower_bound(objective),
                }
            }
        }
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// See [`Objective::tighten`].
    pub fn tighten_objective(&mut self) -> Result<(), SearchError> {
        self.objective.tighten(&mut self.solver)
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Gives the solver back, e.g. to read the final values of defined variables.
    pub fn into_solver(self) -> Solver {
        self.solver
    }
}

fn apply_move(modifier: &mut AssignmentModifier<'_>, candidate: &Move) -> Result<(), EngineError> {
    candidate
        .assignments()
        .iter()
        .try_for_each(|&(var, value)| modifier.set(var, value))
}
