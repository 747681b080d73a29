use std::fmt::Debug;
use std::marker::PhantomData;

use super::register_inputs;
use super::require_inputs;
use super::to_var_ids;
use super::InputCursor;
use super::Invariant;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::PriorityList;
use crate::engine::IntVarId;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

/// Selects which end of the [`PriorityList`] an [`ArrayExtremum`] reports.
pub trait Extremum: Debug + 'static {
    const NAME: &'static str;

    fn select(list: &PriorityList, ts: Timestamp) -> Option<Int>;

    fn combine(left: Int, right: Int) -> Int;
}

#[derive(Debug, Clone, Copy)]
pub struct Maximum;

impl Extremum for Maximum {
    const NAME: &'static str = "MaxSparse";

    fn select(list: &PriorityList, ts: Timestamp) -> Option<Int> {
        list.max_priority(ts)
    }

    fn combine(left: Int, right: Int) -> Int {
        left.max(right)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Minimum;

impl Extremum for Minimum {
    const NAME: &'static str = "MinSparse";

    fn select(list: &PriorityList, ts: Timestamp) -> Option<Int> {
        list.min_priority(ts)
    }

    fn combine(left: Int, right: Int) -> Int {
        left.min(right)
    }
}

/// `output = max(inputs)`
pub type MaxSparse = ArrayExtremum<Maximum>;

/// `output = min(inputs)`
pub type MinSparse = ArrayExtremum<Minimum>;

/// The largest or smallest of a non-empty array of inputs.
///
/// The inputs are kept in a [`PriorityList`] ordered by value, so a change only moves the changed
/// input within the list and the extremum is read off one of its ends.
#[derive(Debug)]
pub struct ArrayExtremum<E> {
    output: IntVarId,
    inputs: Vec<VarId>,
    list: PriorityList,
    cursor: InputCursor,
    extremum: PhantomData<E>,
}

impl<E: Extremum> ArrayExtremum<E> {
    pub fn new<Var: Into<VarId>>(output: IntVarId, inputs: impl IntoIterator<Item = Var>) -> Self {
        let inputs = to_var_ids(inputs);
        ArrayExtremum {
            output,
            list: PriorityList::new(0, inputs.len()),
            inputs,
            cursor: InputCursor::default(),
            extremum: PhantomData,
        }
    }

    fn update_input(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        self.list
            .update_priority(ts, index, context.value(ts, self.inputs[index]));
        self.write_output(ts, context);
    }

    fn write_output(&self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        if let Some(value) = E::select(&self.list, ts) {
            context.update_value(ts, self.output, value);
        }
    }
}

impl<E: Extremum> Invariant for ArrayExtremum<E> {
    fn name(&self) -> &str {
        E::NAME
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        require_inputs(E::NAME, &self.inputs)?;
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let bounds = self
            .inputs
            .iter()
            .map(|&input| (context.lower_bound(input), context.upper_bound(input)))
            .reduce(|(lb, ub), (input_lb, input_ub)| (E::combine(lb, input_lb), E::combine(ub, input_ub)));
        if let Some((lower_bound, upper_bound)) = bounds {
            context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
        }
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        for (index, &input) in self.inputs.iter().enumerate() {
            self.list.update_priority(ts, index, context.value(ts, input));
        }
        self.write_output(ts, context);
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
        self.list.commit_if(ts);
    }
}
