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

/// `output = if condition == 0 { then } else { otherwise }`, where the condition is a violation
/// boolean.
#[derive(Debug)]
pub struct IfThenElse {
    output: IntVarId,
    condition: VarId,
    then: VarId,
    otherwise: VarId,
    cursor: InputCursor,
}

impl IfThenElse {
    pub fn new(
        output: IntVarId,
        condition: impl Into<VarId>,
        then: impl Into<VarId>,
        otherwise: impl Into<VarId>,
    ) -> Self {
        IfThenElse {
            output,
            condition: condition.into(),
            then: then.into(),
            otherwise: otherwise.into(),
            cursor: InputCursor::default(),
        }
    }

    fn branch(&self, ts: Timestamp, context: &InvariantContext<'_>) -> VarId {
        if context.value(ts, self.condition) == 0 {
            self.then
        } else {
            self.otherwise
        }
    }

    fn write_output(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let value = context.value(ts, self.branch(ts, context));
        context.update_value(ts, self.output, value);
    }
}

impl Invariant for IfThenElse {
    fn name(&self) -> &str {
        "IfThenElse"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        registrar.register_input(self.condition, LocalId::from(0))?;
        registrar.register_input(self.then, LocalId::from(1))?;
        registrar.register_input(self.otherwise, LocalId::from(2))?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let can_hold = context.lower_bound(self.condition) <= 0;
        let can_fail = context.upper_bound(self.condition) != 0;
        let branches = [(can_hold, self.then), (can_fail, self.otherwise)];
        let (lower_bound, upper_bound) = branches
            .iter()
            .filter(|(possible, _)| *possible)
            .map(|&(_, branch)| (context.lower_bound(branch), context.upper_bound(branch)))
            .fold((Int::MAX, Int::MIN), |(lb, ub), (branch_lb, branch_ub)| {
                (lb.min(branch_lb), ub.max(branch_ub))
            });
        context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn next_input(&mut self, ts: Timestamp, context: &InvariantContext<'_>) -> Option<VarId> {
        match self.cursor.next_index(ts, 2)? {
            0 => Some(self.condition),
            _ => Some(self.branch(ts, context)),
        }
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        let changed = match local_id.unpack() {
            0 => self.condition,
            1 => self.then,
            _ => self.otherwise,
        };
        if changed == self.condition || changed == self.branch(ts, context) {
            self.write_output(ts, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IfThenElse;
    use crate::basic_types::Int;
    use crate::engine::Solver;
    use crate::engine::test_solver::InvariantHarness;

    fn branch_harness(condition: (Int, Int), then: (Int, Int), otherwise: (Int, Int)) -> InvariantHarness {
        let mut solver = Solver::new();
        let inputs = [condition, then, otherwise]
            .iter()
            .map(|&(lb, ub)| solver.make_int_var(lb, lb, ub).unwrap())
            .collect::<Vec<_>>();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let invariant = solver
            .make_invariant(IfThenElse::new(output, inputs[0], inputs[1], inputs[2]))
            .unwrap();
        InvariantHarness::new(solver, invariant, inputs, vec![output])
    }

    #[test]
    fn the_condition_selects_the_branch() {
        let mut harness = branch_harness((0, 1), (10, 20), (30, 40));
        assert_eq!(harness.output_values(), vec![10]);

        harness.ts += 1;
        let ts = harness.ts;
        harness.solver.set_value_at(ts, harness.inputs[2], 35);
        harness.solver.notify_invariant(ts, harness.invariant, 2);
        assert_eq!(harness.output_values(), vec![10]);

        harness.solver.set_value_at(ts, harness.inputs[0], 1);
        harness.solver.notify_invariant(ts, harness.invariant, 0);
        assert_eq!(harness.output_values(), vec![35]);
    }

    #[test]
    fn bounds_depend_on_which_branches_are_reachable() {
        let harness = branch_harness((0, 1), (10, 20), (30, 40));
        let output = harness.outputs[0];
        assert_eq!((harness.solver.lower_bound(output), harness.solver.upper_bound(output)), (10, 40));

        let harness = branch_harness((1, 3), (10, 20), (30, 40));
        let output = harness.outputs[0];
        assert_eq!((harness.solver.lower_bound(output), harness.solver.upper_bound(output)), (30, 40));
    }

    #[test]
    fn incremental_updates_match_recomputation() {
        branch_harness((0, 2), (-5, 5), (0, 9)).check_all();
    }
}
