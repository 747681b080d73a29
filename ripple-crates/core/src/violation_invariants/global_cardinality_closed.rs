use super::ViolationInvariant;
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
use crate::invariants::register_inputs;
use crate::invariants::to_var_ids;
use crate::invariants::InputCursor;
use crate::invariants::Invariant;

/// Every input takes a value of the cover and `outputs[j]` counts the inputs equal to `cover[j]`.
///
/// The violation is the number of inputs whose value is outside of the cover.
#[derive(Debug)]
pub struct GlobalCardinalityClosed {
    violation: IntVarId,
    outputs: Vec<IntVarId>,
    cover: Vec<Int>,
    cover_index: HashMap<Int, usize>,
    inputs: Vec<VarId>,
    local_values: Vec<CommittableInt>,
    cursor: InputCursor,
}

impl GlobalCardinalityClosed {
    pub fn new<Var: Into<VarId>>(
        violation: IntVarId,
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
        GlobalCardinalityClosed {
            violation,
            outputs,
            cover,
            cover_index,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            cursor: InputCursor::default(),
        }
    }

    /// Changes the count of `value` and returns the change of the violation.
    fn change_count(&self, ts: Timestamp, value: Int, delta: Int, context: &mut InvariantContext<'_>) -> Int {
        match self.cover_index.get(&value) {
            Some(&index) => {
                context.inc_value(ts, self.outputs[index], delta);
                0
            }
            None => delta,
        }
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        let delta = self.change_count(ts, old_value, -1, context) + self.change_count(ts, new_value, 1, context);
        if delta != 0 {
            context.inc_value(ts, self.violation, delta);
        }
    }
}

impl Invariant for GlobalCardinalityClosed {
    fn name(&self) -> &str {
        "GlobalCardinalityClosed"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        if self.cover.len() != self.outputs.len() {
            return Err(EngineError::InvalidArgument(format!(
                "GlobalCardinalityClosed has {} cover values for {} outputs",
                self.cover.len(),
                self.outputs.len()
            )));
        }
        if self.cover_index.len() != self.cover.len() {
            return Err(EngineError::InvalidArgument(
                "the cover of GlobalCardinalityClosed contains duplicates".to_owned(),
            ));
        }
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.violation)?;
        self.outputs
            .iter()
            .try_for_each(|&output| registrar.register_defined_var(output))
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let (mut must_violate, mut may_violate) = (0, 0);
        for &input in self.inputs.iter() {
            let (lb, ub) = (context.lower_bound(input), context.upper_bound(input));
            let covered = self.cover.iter().filter(|&&value| lb <= value && value <= ub).count() as Int;
            must_violate += Int::from(covered == 0);
            may_violate += Int::from(covered < ub - lb + 1);
        }
        context.update_bounds(self.violation, must_violate, may_violate, widen_only);

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
        let mut violation = 0;
        for (index, &input) in self.inputs.iter().enumerate() {
            let value = context.value(ts, input);
            self.local_values[index].set_value(ts, value);
            match self.cover_index.get(&value) {
                Some(&cover_index) => counts[cover_index] += 1,
                None => violation += 1,
            }
        }
        context.update_value(ts, self.violation, violation);
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

impl ViolationInvariant for GlobalCardinalityClosed {
    fn violation_id(&self) -> IntVarId {
        self.violation
    }
}
