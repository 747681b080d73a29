use super::ViolationInvariant;
use crate::basic_types::CommittableInt;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::HashSet;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;
use crate::invariants::register_inputs;
use crate::invariants::to_var_ids;
use crate::invariants::InputCursor;
use crate::invariants::Invariant;

/// Occurrence counts of the values in a fixed range, one [`CommittableInt`] per value.
#[derive(Debug, Default)]
pub(crate) struct ValueCounts {
    counts: Vec<CommittableInt>,
    offset: Int,
}

impl ValueCounts {
    /// Covers every value in the bounds of `inputs`.
    pub(crate) fn for_inputs(ts: Timestamp, inputs: &[VarId], context: &InvariantContext<'_>) -> Self {
        let lower_bound = inputs.iter().map(|&input| context.lower_bound(input)).min();
        let upper_bound = inputs.iter().map(|&input| context.upper_bound(input)).max();
        match (lower_bound, upper_bound) {
            (Some(lower_bound), Some(upper_bound)) => ValueCounts {
                counts: vec![CommittableInt::new(ts, 0); (upper_bound - lower_bound + 1) as usize],
                offset: lower_bound,
            },
            _ => ValueCounts::default(),
        }
    }

    fn slot(&self, value: Int) -> Option<usize> {
        usize::try_from(value - self.offset)
            .ok()
            .filter(|&slot| slot < self.counts.len())
    }

    pub(crate) fn reset(&mut self, ts: Timestamp) {
        for count in self.counts.iter_mut() {
            count.set_value(ts, 0);
        }
    }

    /// Adds `delta` to the count of `value` and returns the new count.
    pub(crate) fn add(&mut self, ts: Timestamp, value: Int, delta: Int) -> Int {
        match self.slot(value) {
            Some(slot) => self.counts[slot].inc_value(ts, delta),
            None => 0,
        }
    }

    pub(crate) fn commit_if(&mut self, ts: Timestamp) {
        for count in self.counts.iter_mut() {
            count.commit_if(ts);
        }
    }
}

/// Every input takes a different value, except for the ignored values which may occur any number
/// of times.
///
/// The violation is the number of inputs which would have to change: for every value, its number
/// of occurrences beyond the first.
#[derive(Debug)]
pub struct AllDifferent {
    violation: IntVarId,
    inputs: Vec<VarId>,
    ignored: HashSet<Int>,
    local_values: Vec<CommittableInt>,
    counts: ValueCounts,
    cursor: InputCursor,
}

impl AllDifferent {
    pub fn new<Var: Into<VarId>>(violation: IntVarId, inputs: impl IntoIterator<Item = Var>) -> Self {
        Self::with_ignored(violation, inputs, HashSet::default())
    }

    pub(crate) fn with_ignored<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        ignored: HashSet<Int>,
    ) -> Self {
        let inputs = to_var_ids(inputs);
        AllDifferent {
            violation,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            ignored,
            counts: ValueCounts::default(),
            cursor: InputCursor::default(),
        }
    }

    /// Adds an occurrence of `value` and returns the change of the violation.
    fn increase(&mut self, ts: Timestamp, value: Int) -> Int {
        if self.ignored.contains(&value) {
            return 0;
        }
        Int::from(self.counts.add(ts, value, 1) > 1)
    }

    /// Removes an occurrence of `value` and returns the change of the violation.
    fn decrease(&mut self, ts: Timestamp, value: Int) -> Int {
        if self.ignored.contains(&value) {
            return 0;
        }
        -Int::from(self.counts.add(ts, value, -1) > 0)
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        let delta = self.decrease(ts, old_value) + self.increase(ts, new_value);
        if delta != 0 {
            context.inc_value(ts, self.violation, delta);
        }
    }
}

impl Invariant for AllDifferent {
    fn name(&self) -> &str {
        if self.ignored.is_empty() {
            "AllDifferent"
        } else {
            "AllDifferentExcept"
        }
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.violation)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let upper_bound = self.inputs.len().saturating_sub(1) as Int;
        context.update_bounds(self.violation, 0, upper_bound, widen_only);
    }

    fn close(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.counts = ValueCounts::for_inputs(ts, &self.inputs, context);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        self.counts.reset(ts);
        let mut violation = 0;
        for index in 0..self.inputs.len() {
            let value = context.value(ts, self.inputs[index]);
            self.local_values[index].set_value(ts, value);
            violation += self.increase(ts, value);
        }
        context.update_value(ts, self.violation, violation);
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
        self.counts.commit_if(ts);
    }
}

impl ViolationInvariant for AllDifferent {
    fn violation_id(&self) -> IntVarId {
        self.violation
    }
}
