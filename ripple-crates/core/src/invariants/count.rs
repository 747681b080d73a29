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

/// `output = |{i : inputs[i] == needle}|` where the needle is a variable.
///
/// The invariant counts the occurrences of every value in the combined domain of the inputs, so
/// that a change of the needle only needs a lookup. The inputs have local ids `0..n` and the
/// needle has local id `n`.
#[derive(Debug)]
pub struct Count {
    output: IntVarId,
    needle: VarId,
    inputs: Vec<VarId>,
    local_values: Vec<CommittableInt>,
    counts: Vec<CommittableInt>,
    offset: Int,
    cursor: InputCursor,
}

impl Count {
    pub fn new<Var: Into<VarId>>(
        output: IntVarId,
        needle: impl Into<VarId>,
        inputs: impl IntoIterator<Item = Var>,
    ) -> Self {
        let inputs = to_var_ids(inputs);
        Count {
            output,
            needle: needle.into(),
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            counts: Vec::new(),
            offset: 0,
            cursor: InputCursor::default(),
        }
    }

    fn count_slot(&self, value: Int) -> Option<usize> {
        usize::try_from(value - self.offset)
            .ok()
            .filter(|&slot| slot < self.counts.len())
    }

    fn count(&self, ts: Timestamp, value: Int) -> Int {
        self.count_slot(value)
            .map_or(0, |slot| self.counts[slot].value(ts))
    }

    fn write_output(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let needle = context.value(ts, self.needle);
        context.update_value(ts, self.output, self.count(ts, needle));
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        if let Some(slot) = self.count_slot(old_value) {
            let _ = self.counts[slot].inc_value(ts, -1);
        }
        if let Some(slot) = self.count_slot(new_value) {
            let _ = self.counts[slot].inc_value(ts, 1);
        }
        self.write_output(ts, context);
    }

    fn notify(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        if index < self.inputs.len() {
            self.update_input(ts, index, context);
        } else {
            self.write_output(ts, context);
        }
    }
}

impl Invariant for Count {
    fn name(&self) -> &str {
        "Count"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        register_inputs(registrar, &self.inputs)?;
        registrar.register_input(self.needle, LocalId::from(self.inputs.len() as u32))?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        context.update_bounds(self.output, 0, self.inputs.len() as Int, widen_only);
    }

    fn close(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let lower_bound = self
            .inputs
            .iter()
            .map(|&input| context.lower_bound(input))
            .min();
        let upper_bound = self
            .inputs
            .iter()
            .map(|&input| context.upper_bound(input))
            .max();
        let (Some(lower_bound), Some(upper_bound)) = (lower_bound, upper_bound) else {
            self.counts.clear();
            return;
        };
        self.offset = lower_bound;
        self.counts = vec![CommittableInt::new(ts, 0); (upper_bound - lower_bound + 1) as usize];
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        for count in self.counts.iter_mut() {
            count.set_value(ts, 0);
        }
        for index in 0..self.inputs.len() {
            let value = context.value(ts, self.inputs[index]);
            self.local_values[index].set_value(ts, value);
            if let Some(slot) = self.count_slot(value) {
                let _ = self.counts[slot].inc_value(ts, 1);
            }
        }
        self.write_output(ts, context);
    }

    fn next_input(&mut self, ts: Timestamp, _context: &InvariantContext<'_>) -> Option<VarId> {
        let index = self.cursor.next_index(ts, self.inputs.len() + 1)?;
        Some(self.inputs.get(index).copied().unwrap_or(self.needle))
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        if let Some(index) = self.cursor.current(ts) {
            self.notify(ts, index, context);
        }
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        self.notify(ts, local_id.unpack() as usize, context);
    }

    fn commit(&mut self, ts: Timestamp, _context: &mut InvariantContext<'_>) {
        for value in self.local_values.iter_mut().chain(self.counts.iter_mut()) {
            value.commit_if(ts);
        }
    }
}
