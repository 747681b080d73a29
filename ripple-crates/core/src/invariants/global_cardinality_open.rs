use super::register_inputs;
use super::to_var_ids;
use super::InputCursor;
use super::Invariant;
use crate::basic_types::CommittableInt;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::HashMap;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

/// `outputs[j] = |{i : inputs[i] == cover[j]}|`. Values outside of the cover are not counted.
#[derive(Debug)]
pub struct GlobalCardinalityOpen {
    outputs: Vec<IntVarId>,
    cover: Vec<Int>,
    cover_index: HashMap<Int, usize>,
    inputs: Vec<VarId>,
    local_values: Vec<CommittableInt>,
    cursor: InputCursor,
}

impl GlobalCardinalityOpen {
    pub fn new<Var: Into<VarId>>(
        outputs: Vec<IntVarId>,
        cover: Vec<Int>,
        inputs: impl IntoIterator<Item = Var>,
    ) -> Self {
        let inputs = to_var_ids(inputs);
        let cover_index = cover
            .iter()
            .enumerate()
            .map(|(index, &value)| (value, index))
            .collect();
        GlobalCardinalityOpen {
            outputs,
            cover,
            cover_index,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            cursor: InputCursor::default(),
        }
    }

    fn change_count(&self, ts: Timestamp, value: Int, delta: Int, context: &mut InvariantContext<'_>) {
        if let Some(&index) = self.cover_index.get(&value) {
            context.inc_value(ts, self.outputs[index], delta);
        }
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        self.change_count(ts, old_value, -1, context);
        self.change_count(ts, new_value, 1, context);
    }
}

impl Invariant for GlobalCardinalityOpen {
    fn name(&self) -> &str {
        "GlobalCardinalityOpen"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        if self.cover.len() != self.outputs.len() {
            return Err(EngineError::InvalidArgument(format!(
                "GlobalCardinalityOpen has {} cover values for {} outputs",
                self.cover.len(),
                self.outputs.len()
            )));
        }
        if self.cover_index.len() != self.cover.len() {
            return Err(EngineError::InvalidArgument(
                "the cover of GlobalCardinalityOpen contains duplicates".to_owned(),
            ));
        }
        register_inputs(registrar, &self.inputs)?;
        self.outputs
            .iter()
            .try_for_each(|&output| registrar.register_defined_var(output))
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        for (&output, &value) in self.outputs.iter().zip(self.cover.iter()) {
            let (fixed, possible) = self.inputs.iter().fold((0, 0), |(fixed, possible), &input| {
                let (lb, ub) = (context.lower_bound(input), context.upper_bound(input));
                (
                    fixed + Int::from(lb == value && ub == value),
                    possible + Int::from(lb <= value && value <= ub),
                )
            });
            context.update_bounds(output, fixed, possible, widen_only);
        }
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let mut counts = vec![0; self.outputs.len()];
        for (index, &input) in self.inputs.iter().enumerate() {
            let value = context.value(ts, input);
            self.local_values[index].set_value(ts, value);
            if let Some(&cover_index) = self.cover_index.get(&value) {
                counts[cover_index] += 1;
            }
        }
        for (&output, count) in self.outputs.iter().zip(counts) {
            context.update_value(ts, output, count);
        }
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
