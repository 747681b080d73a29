use super::register_inputs;
use super::require_inputs;
use super::to_var_ids;
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

/// Maps `index - offset` into `0..len`, clamping out of range indices to the nearest end.
pub(crate) fn clamped_index(index: Int, offset: Int, len: usize) -> usize {
    (index - offset).clamp(0, len as Int - 1) as usize
}

/// `output = array[index - offset]` over an array of variables.
///
/// Only the selected element matters, so output-to-input propagation visits the index and then
/// that element alone. The array elements have local ids `0..n` and the index has local id `n`.
#[derive(Debug)]
pub struct ElementVar {
    output: IntVarId,
    index: VarId,
    array: Vec<VarId>,
    offset: Int,
    cursor: InputCursor,
}

impl ElementVar {
    pub fn new<Var: Into<VarId>>(
        output: IntVarId,
        index: impl Into<VarId>,
        array: impl IntoIterator<Item = Var>,
        offset: Int,
    ) -> Self {
        ElementVar {
            output,
            index: index.into(),
            array: to_var_ids(array),
            offset,
            cursor: InputCursor::default(),
        }
    }

    fn selected(&self, ts: Timestamp, context: &InvariantContext<'_>) -> usize {
        clamped_index(context.value(ts, self.index), self.offset, self.array.len())
    }

    fn write_output(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let element = self.array[self.selected(ts, context)];
        let value = context.value(ts, element);
        context.update_value(ts, self.output, value);
    }
}

impl Invariant for ElementVar {
    fn name(&self) -> &str {
        "ElementVar"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        require_inputs("ElementVar", &self.array)?;
        register_inputs(registrar, &self.array)?;
        registrar.register_input(self.index, LocalId::from(self.array.len() as u32))?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let first = clamped_index(context.lower_bound(self.index), self.offset, self.array.len());
        let last = clamped_index(context.upper_bound(self.index), self.offset, self.array.len());
        let lower_bound = self.array[first..=last]
            .iter()
            .map(|&element| context.lower_bound(element))
            .min();
        let upper_bound = self.array[first..=last]
            .iter()
            .map(|&element| context.upper_bound(element))
            .max();
        if let (Some(lower_bound), Some(upper_bound)) = (lower_bound, upper_bound) {
            context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
        }
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn next_input(&mut self, ts: Timestamp, context: &InvariantContext<'_>) -> Option<VarId> {
        match self.cursor.next_index(ts, 2)? {
            0 => Some(self.index),
            _ => Some(self.array[self.selected(ts, context)]),
        }
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.write_output(ts, context);
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        let local_id = local_id.unpack() as usize;
        if local_id == self.array.len() || local_id == self.selected(ts, context) {
            self.write_output(ts, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ElementVar;
    use crate::basic_types::Int;
    use crate::engine::Solver;
    use crate::engine::VarId;
    use crate::engine::test_solver::InvariantHarness;

    fn harness(index: (Int, Int), offset: Int, domains: &[(Int, Int)]) -> InvariantHarness {
        let mut solver = Solver::new();
        let mut inputs = domains
            .iter()
            .map(|&(lb, ub)| solver.make_int_var(lb, lb, ub).unwrap())
            .collect::<Vec<_>>();
        let index = solver.make_int_var(index.0, index.0, index.1).unwrap();
        let output = solver.make_int_var(0, 0, 0).unwrap();
        let invariant = solver
            .make_invariant(ElementVar::new(output, index, inputs.clone(), offset))
            .unwrap();
        inputs.push(index);
        InvariantHarness::new(solver, invariant, inputs, vec![output])
    }

    #[test]
    fn only_the_selected_element_affects_the_output() {
        let mut harness = harness((1, 3), 1, &[(0, 9), (10, 19), (20, 29)]);
        assert_eq!(harness.output_values(), vec![0]);
        let index = harness.inputs[3];

        harness.ts += 1;
        let ts = harness.ts;
        harness.solver.set_value_at(ts, harness.inputs[1], 15);
        harness.solver.notify_invariant(ts, harness.invariant, 1);
        assert_eq!(harness.output_values(), vec![0]);

        harness.solver.set_value_at(ts, index, 2);
        harness.solver.notify_invariant(ts, harness.invariant, 3);
        assert_eq!(harness.output_values(), vec![15]);
    }

    #[test]
    fn indices_out_of_range_are_clamped() {
        let mut harness = harness((-5, 10), 0, &[(1, 1), (2, 2), (3, 3)]);
        let index = harness.inputs[3];
        for (value, expected) in [(-5, 1), (0, 1), (2, 3), (10, 3)] {
            harness.ts += 1;
            let ts = harness.ts;
            harness.solver.set_value_at(ts, index, value);
            harness.solver.notify_invariant(ts, harness.invariant, 3);
            assert_eq!(harness.output_values(), vec![expected]);
        }
    }

    #[test]
    fn bounds_cover_the_reachable_elements() {
        let harness = harness((1, 2), 0, &[(-100, 100), (0, 4), (3, 9)]);
        let output = harness.outputs[0];
        assert_eq!((harness.solver.lower_bound(output), harness.solver.upper_bound(output)), (0, 9));
    }

    #[test]
    fn next_input_visits_the_index_and_then_the_selected_element() {
        let mut harness = harness((0, 2), 0, &[(0, 9), (0, 9), (0, 9)]);
        let expected: Vec<VarId> = vec![harness.inputs[3].into(), harness.inputs[0].into()];
        assert_eq!(harness.enumerate_inputs(), expected);
    }

    #[test]
    fn incremental_updates_match_recomputation() {
        let mut harness = harness((-1, 4), 0, &[(0, 3), (-2, 2), (5, 7), (1, 1)]);
        harness.check_all();
    }
}
