use super::ViolationInvariant;
use crate::basic_types::EngineError;
use crate::engine::IntVarId;
use crate::engine::Solver;
use crate::engine::VarId;
use crate::views::IntView;

impl Solver {
    /// Adds the violation invariant built by `build` over a fresh violation variable, and returns
    /// a violation boolean which holds exactly when the violation is 0.
    ///
    /// ```
    /// # use ripple_core::engine::Solver;
    /// # use ripple_core::violation_invariants::LessEqual;
    /// let mut solver = Solver::new();
    /// let x = solver.make_int_var(3, 0, 9).unwrap();
    /// let y = solver.make_int_var(5, 0, 9).unwrap();
    /// let holds = solver
    ///     .make_reified(|violation| LessEqual::new(violation, x, y))
    ///     .unwrap();
    /// solver.close().unwrap();
    /// assert_eq!(solver.value(holds), 0);
    /// ```
    pub fn make_reified<I: ViolationInvariant>(
        &mut self,
        build: impl FnOnce(IntVarId) -> I,
    ) -> Result<VarId, EngineError> {
        self.make_reified_with_view(build, IntView::EqualConst(0))
    }

    /// As [`Solver::make_reified`], but the returned violation boolean holds exactly when the
    /// constraint is violated.
    pub fn make_negated<I: ViolationInvariant>(
        &mut self,
        build: impl FnOnce(IntVarId) -> I,
    ) -> Result<VarId, EngineError> {
        self.make_reified_with_view(build, IntView::NotEqualConst(0))
    }

    fn make_reified_with_view<I: ViolationInvariant>(
        &mut self,
        build: impl FnOnce(IntVarId) -> I,
        view: IntView,
    ) -> Result<VarId, EngineError> {
        let violation = self.make_int_var(0, 0, 0)?;
        let _ = self.make_violation_invariant(build(violation))?;
        self.make_int_view(violation, view)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Solver;
    use crate::violation_invariants::AllDifferent;
    use crate::violation_invariants::Equal;

    #[test]
    fn reified_boolean_follows_the_violation() {
        let mut solver = Solver::new();
        let x = solver.make_int_var(2, 0, 5).unwrap();
        let y = solver.make_int_var(4, 0, 5).unwrap();
        let equal = solver.make_reified(|violation| Equal::new(violation, x, y)).unwrap();
        let different = solver.make_negated(|violation| Equal::new(violation, x, y)).unwrap();
        solver.close().unwrap();
        assert_eq!(solver.value(equal), 1);
        assert_eq!(solver.value(different), 0);

        solver.begin_move().unwrap();
        solver.set_value(x, 4).unwrap();
        solver.end_move().unwrap();
        solver.begin_commit().unwrap();
        solver.query(equal).unwrap();
        solver.query(different).unwrap();
        solver.end_commit().unwrap();
        assert_eq!(solver.value(equal), 0);
        assert_eq!(solver.value(different), 1);
    }

    #[test]
    fn hidden_violation_is_not_a_search_variable() {
        let mut solver = Solver::new();
        let inputs = (0..3)
            .map(|value| solver.make_int_var(value, 0, 2).unwrap())
            .collect::<Vec<_>>();
        let holds = solver
            .make_reified(|violation| AllDifferent::new(violation, inputs.clone()))
            .unwrap();
        solver.close().unwrap();
        assert_eq!(solver.search_vars(), inputs.as_slice());
        assert!(!solver.is_search_var(solver.source_var(holds)));
        assert_eq!(solver.value(holds), 0);
    }
}
