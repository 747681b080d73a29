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

/// The number of occurrences of every `cover[j]` among the inputs lies in `[lower[j], upper[j]]`.
///
/// The shortage is the number of occurrences missing to reach the lower bounds and the excess is
/// the number of occurrences above the upper bounds. A closed cardinality constraint also counts
/// every input outside of the cover as excess. The violation is `max(shortage, excess)`.
#[derive(Debug)]
pub struct GlobalCardinalityConst {
    violation: IntVarId,
    inputs: Vec<VarId>,
    cover: Vec<Int>,
    lower: Vec<Int>,
    upper: Vec<Int>,
    closed: bool,
    cover_index: HashMap<Int, usize>,
    local_values: Vec<CommittableInt>,
    counts: Vec<CommittableInt>,
    shortage: CommittableInt,
    excess: CommittableInt,
    cursor: InputCursor,
}

impl GlobalCardinalityConst {
    /// Values outside of the cover are unrestricted.
    pub fn open<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        cover: Vec<Int>,
        lower: Vec<Int>,
        upper: Vec<Int>,
    ) -> Self {
        Self::new(violation, inputs, cover, lower, upper, false)
    }

    /// Every input has to take a value of the cover.
    pub fn closed<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        cover: Vec<Int>,
        lower: Vec<Int>,
        upper: Vec<Int>,
    ) -> Self {
        Self::new(violation, inputs, cover, lower, upper, true)
    }

    /// The number of occurrences of `cover[j]` is exactly `counts[j]`.
    pub fn exact<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        cover: Vec<Int>,
        counts: Vec<Int>,
        closed: bool,
    ) -> Self {
        Self::new(violation, inputs, cover, counts.clone(), counts, closed)
    }

    fn new<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        cover: Vec<Int>,
        lower: Vec<Int>,
        upper: Vec<Int>,
        closed: bool,
    ) -> Self {
        let inputs = to_var_ids(inputs);
        let cover_index = cover
            .iter()
            .enumerate()
            .map(|(index, &value)| (value, index))
            .collect();
        GlobalCardinalityConst {
            violation,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            counts: vec![CommittableInt::new(0, 0); cover.len()],
            cover,
            lower,
            upper,
            closed,
            cover_index,
            shortage: CommittableInt::new(0, 0),
            excess: CommittableInt::new(0, 0),
            cursor: InputCursor::default(),
        }
    }

    fn shortage_of(&self, index: usize, count: Int) -> Int {
        (self.lower[index] - count).max(0)
    }

    fn excess_of(&self, index: usize, count: Int) -> Int {
        (count - self.upper[index]).max(0)
    }

    /// Changes the count of `value` by `delta` and returns the changes of the shortage and the
    /// excess.
    fn change_count(&mut self, ts: Timestamp, value: Int, delta: Int) -> (Int, Int) {
        let Some(&index) = self.cover_index.get(&value) else {
            return (0, if self.closed { delta } else { 0 });
        };
        let old_count = self.counts[index].value(ts);
        let new_count = self.counts[index].inc_value(ts, delta);
        (
            self.shortage_of(index, new_count) - self.shortage_of(index, old_count),
            self.excess_of(index, new_count) - self.excess_of(index, old_count),
        )
    }

    fn write_violation(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let violation = self.shortage.value(ts).max(self.excess.value(ts));
        context.update_value(ts, self.violation, violation);
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        let (removed_shortage, removed_excess) = self.change_count(ts, old_value, -1);
        let (added_shortage, added_excess) = self.change_count(ts, new_value, 1);
        let _ = self.shortage.inc_value(ts, removed_shortage + added_shortage);
        let _ = self.excess.inc_value(ts, removed_excess + added_excess);
        self.write_violation(ts, context);
    }
}

impl Invariant for GlobalCardinalityConst {
    fn name(&self) -> &str {
        if self.closed {
            "GlobalCardinalityClosedConst"
        } else {
            "GlobalCardinalityConst"
        }
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        if self.lower.len() != self.cover.len() || self.upper.len() != self.cover.len() {
            return Err(EngineError::InvalidArgument(format!(
                "{} needs one lower and one upper bound for each of its {} cover values",
                self.name(),
                self.cover.len()
            )));
        }
        if self.cover_index.len() != self.cover.len() {
            return Err(EngineError::InvalidArgument(format!(
                "the cover of {} contains duplicates",
                self.name()
            )));
        }
        if self
            .lower
            .iter()
            .zip(self.upper.iter())
            .any(|(&lower, &upper)| lower < 0 || lower > upper)
        {
            return Err(EngineError::InvalidArgument(format!(
                "{} has a cardinality range which is negative or empty",
                self.name()
            )));
        }
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.violation)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let total_shortage = self.lower.iter().sum::<Int>();
        let upper_bound = total_shortage.max(self.inputs.len() as Int);
        context.update_bounds(self.violation, 0, upper_bound, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let mut counts = vec![0; self.cover.len()];
        let mut outside = 0;
        for (index, &input) in self.inputs.iter().enumerate() {
            let value = context.value(ts, input);
            self.local_values[index].set_value(ts, value);
            match self.cover_index.get(&value) {
                Some(&cover_index) => counts[cover_index] += 1,
                None => outside += 1,
            }
        }

        let mut shortage = 0;
        let mut excess = if self.closed { outside } else { 0 };
        for (index, count) in counts.into_iter().enumerate() {
            self.counts[index].set_value(ts, count);
            shortage += self.shortage_of(index, count);
            excess += self.excess_of(index, count);
        }
        self.shortage.set_value(ts, shortage);
        self.excess.set_value(ts, excess);
        self.write_violation(ts, context);
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
        for value in self.local_values.iter_mut().chain(self.counts.iter_mut()) {
            value.commit_if(ts);
        }
        self.shortage.commit_if(ts);
        self.excess.commit_if(ts);
    }
}

impl ViolationInvariant for GlobalCardinalityConst {
    fn violation_id(&self) -> IntVarId {
        self.violation
    }
}
