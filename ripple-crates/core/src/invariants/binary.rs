use std::fmt::Debug;

use super::InputCursor;
use super::Invariant;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

/// The function of a [`BinaryInvariant`].
pub trait BinaryOperator: Debug + 'static {
    const NAME: &'static str;

    /// Called whenever the bounds of the inputs may have changed, for operators which keep
    /// state derived from them.
    fn update_state(&mut self, _x: (Int, Int), _y: (Int, Int)) {}

    fn apply(&self, x: Int, y: Int) -> Int;

    /// The bounds of [`BinaryOperator::apply`] over the given input bounds.
    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int);
}

/// `output = operator(x, y)`.
///
/// Both inputs are cheap to read, so every notification simply re-applies the operator.
#[derive(Debug)]
pub struct BinaryInvariant<Operator> {
    output: IntVarId,
    x: VarId,
    y: VarId,
    operator: Operator,
    cursor: InputCursor,
}

impl<Operator: BinaryOperator + Default> BinaryInvariant<Operator> {
    pub fn new(output: IntVarId, x: impl Into<VarId>, y: impl Into<VarId>) -> Self {
        Self::with_operator(output, x, y, Operator::default())
    }
}

impl<Operator: BinaryOperator> BinaryInvariant<Operator> {
    pub fn with_operator(output: IntVarId, x: impl Into<VarId>, y: impl Into<VarId>, operator: Operator) -> Self {
        BinaryInvariant {
            output,
            x: x.into(),
            y: y.into(),
            operator,
            cursor: InputCursor::default(),
        }
    }

    pub fn output(&self) -> IntVarId {
        self.output
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn input_bounds(&self, context: &InvariantContext<'_>) -> ((Int, Int), (Int, Int)) {
        (
            (context.lower_bound(self.x), context.upper_bound(self.x)),
            (context.lower_bound(self.y), context.upper_bound(self.y)),
        )
    }
}

impl<Operator: BinaryOperator> Invariant for BinaryInvariant<Operator> {
    fn name(&self) -> &str {
        Operator::NAME
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        registrar.register_input(self.x, LocalId::from(0))?;
        registrar.register_input(self.y, LocalId::from(1))?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let (x, y) = self.input_bounds(context);
        self.operator.update_state(x, y);
        let (lower_bound, upper_bound) = self.operator.bounds(x, y);
        context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
    }

    fn close(&mut self, _ts: Timestamp, context: &mut InvariantContext<'_>) {
        let (x, y) = self.input_bounds(context);
        self.operator.update_state(x, y);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let value = self
            .operator
            .apply(context.value(ts, self.x), context.value(ts, self.y));
        context.update_value(ts, self.output, value);
    }

    fn next_input(&mut self, ts: Timestamp, _context: &InvariantContext<'_>) -> Option<VarId> {
        self.cursor.next_in(ts, &[self.x, self.y])
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.recompute(ts, context);
    }

    fn notify_input_changed(&mut self, ts: Timestamp, _local_id: LocalId, context: &mut InvariantContext<'_>) {
        self.recompute(ts, context);
    }
}

/// The smallest and largest of a set of candidate values.
pub(crate) fn extremes(candidates: impl IntoIterator<Item = Int>) -> (Int, Int) {
    candidates
        .into_iter()
        .fold((Int::MAX, Int::MIN), |(lb, ub), value| (lb.min(value), ub.max(value)))
}

/// The values of `f` at the four corners of the input box.
pub(crate) fn corner_extremes(x: (Int, Int), y: (Int, Int), f: impl Fn(Int, Int) -> Int) -> (Int, Int) {
    extremes([f(x.0, y.0), f(x.0, y.1), f(x.1, y.0), f(x.1, y.1)])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::BinaryInvariant;
    use super::BinaryOperator;
    use crate::basic_types::Int;
    use crate::engine::Solver;
    use crate::engine::test_solver::InvariantHarness;

    /// Builds `output = op(x, y)` over the given domains.
    pub(crate) fn binary_harness<Operator: BinaryOperator + Default>(x: (Int, Int), y: (Int, Int)) -> InvariantHarness {
        let mut solver = Solver::new();
        let x_var = solver.make_int_var(x.0, x.0, x.1).unwrap();
        let y_var = solver.make_int_var(y.0, y.0, y.1).unwrap();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let invariant = solver
            .make_invariant(BinaryInvariant::<Operator>::new(output, x_var, y_var))
            .unwrap();
        InvariantHarness::new(solver, invariant, vec![x_var, y_var], vec![output])
    }

    /// Checks `op` against `expected` on every pair of inputs in the domains, and runs the
    /// generic harness checks.
    pub(crate) fn check_operator<Operator: BinaryOperator + Default>(
        x: (Int, Int),
        y: (Int, Int),
        expected: impl Fn(Int, Int) -> Int,
    ) {
        let mut harness = binary_harness::<Operator>(x, y);
        let (x_var, y_var) = (harness.inputs[0], harness.inputs[1]);
        for x_value in x.0..=x.1 {
            for y_value in y.0..=y.1 {
                harness.ts += 1;
                let ts = harness.ts;
                harness.solver.set_value_at(ts, x_var, x_value);
                harness.solver.set_value_at(ts, y_var, y_value);
                harness.solver.recompute_invariant(ts, harness.invariant);
                assert_eq!(
                    harness.output_values(),
                    vec![expected(x_value, y_value)],
                    "{}({x_value}, {y_value})",
                    Operator::NAME
                );
            }
        }
        harness.check_all();
    }
}
