use super::register_inputs;
use super::to_var_ids;
use super::InputCursor;
use super::Invariant;
use crate::basic_types::CommittableInt;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

/// `output = |{i : inputs[i] == needle}|` for a constant needle.
#[derive(Debug)]
pub struct CountConst {
    output: IntVarId,
    needle: Int,
    inputs: Vec<VarId>,
    local_values: Vec<CommittableInt>,
    cursor: InputCursor,
}

impl CountConst {
    pub fn new<Var: Into<VarId>>(output: IntVarId, needle: Int, inputs: impl IntoIterator<Item = Var>) -> Self {
        let inputs = to_var_ids(inputs);
        CountConst {
            output,
            needle,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            cursor: InputCursor::default(),
        }
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        let delta = Int::from(new_value == self.needle) - Int::from(old_value == self.needle);
        if delta != 0 {
            context.inc_value(ts, self.output, delta);
        }
    }
}

impl Invariant for CountConst {
    fn name(&self) -> &str {
        "CountConst"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let (lower_bound, upper_bound) =
            self.inputs
                .iter()
                .fold((0, 0), |(fixed, possible), &input| {
                    let (lb, ub) = (context.lower_bound(input), context.upper_bound(input));
                    (
                        fixed + Int::from(lb == self.needle && ub == self.needle),
                        possible + Int::from(lb <= self.needle && self.needle <= ub),
                    )
                });
        context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let mut count = 0;
        for (index, &input) in self.inputs.iter().enumerate() {
            let value = context.value(ts, input);
            self.local_values[index].set_value(ts, value);
            count += Int::from(value == self.needle);
        }
        context.update_value(ts, self.output, count);
    }

    fn next_input(&mut self, ts: Timestamp, _context: &InvariantContext<'_>) -> Option<VarId> {
        self.cursor.next_in(ts, &self.inputs)
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        if let Some(index) = self.cursor.current(ts) {
            self.update_input(ts, index, context);
        }
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        self.update_input(ts, local_id.unpack() as usize, context);
    }

    fn commit(&mut self, ts: Timestamp, _context: &mut InvariantContext<'_>) {
        for local_value in self.local_values.iter_mut() {
            local_value.commit_if(ts);
        }
    }
}
