use super::ViolationInvariant;
use crate::basic_types::CommittableInt;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;
use crate::invariants::register_inputs;
use crate::invariants::to_var_ids;
use crate::invariants::InputCursor;
use crate::invariants::Invariant;

/// All violation booleans in `inputs` have the same truth value. The violation is the number of
/// inputs in the minority, `min(#true, #false)`.
#[derive(Debug)]
pub struct BoolAllEqual {
    violation: IntVarId,
    inputs: Vec<VarId>,
    local_holds: Vec<CommittableInt>,
    num_true: CommittableInt,
    cursor: InputCursor,
}

fn holds(value: Int) -> Int {
    Int::from(value == 0)
}

impl BoolAllEqual {
    pub fn new<Var: Into<VarId>>(violation: IntVarId, inputs: impl IntoIterator<Item = Var>) -> Self {
        let inputs = to_var_ids(inputs);
        BoolAllEqual {
            violation,
            local_holds: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            num_true: CommittableInt::new(0, 0),
            cursor: InputCursor::default(),
        }
    }

    fn write_violation(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let num_true = self.num_true.value(ts);
        let num_false = self.inputs.len() as Int - num_true;
        context.update_value(ts, self.violation, num_true.min(num_false));
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_holds = holds(context.value(ts, self.inputs[index]));
        let old_holds = self.local_holds[index].value(ts);
        if new_holds == old_holds {
            return;
        }
        self.local_holds[index].set_value(ts, new_holds);
        let _ = self.num_true.inc_value(ts, new_holds - old_holds);
        self.write_violation(ts, context);
    }
}

impl Invariant for BoolAllEqual {
    fn name(&self) -> &str {
        "BoolAllEqual"
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.violation)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        context.update_bounds(self.violation, 0, self.inputs.len() as Int / 2, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let mut num_true = 0;
        for (local_holds, &input) in self.local_holds.iter_mut().zip(self.inputs.iter()) {
            let input_holds = holds(context.value(ts, input));
            local_holds.set_value(ts, input_holds);
            num_true += input_holds;
        }
        self.num_true.set_value(ts, num_true);
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
        for local_holds in self.local_holds.iter_mut() {
            local_holds.commit_if(ts);
        }
        self.num_true.commit_if(ts);
    }
}

impl ViolationInvariant for BoolAllEqual {
    fn violation_id(&self) -> IntVarId {
        self.violation
    }
}
