use std::fmt::Debug;
use std::marker::PhantomData;

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

/// How an input contributes to a [`WeightedSum`] before it is multiplied by its coefficient.
pub trait LinearTerm: Debug + 'static {
    const NAME: &'static str;

    fn term(value: Int) -> Int;

    fn term_bounds(lower_bound: Int, upper_bound: Int) -> (Int, Int);
}

/// The input itself.
#[derive(Debug, Clone, Copy)]
pub struct IntTerm;

impl LinearTerm for IntTerm {
    const NAME: &'static str = "Linear";

    fn term(value: Int) -> Int {
        value
    }

    fn term_bounds(lower_bound: Int, upper_bound: Int) -> (Int, Int) {
        (lower_bound, upper_bound)
    }
}

/// `output = sum(coefficients[i] * inputs[i])`
pub type Linear = WeightedSum<IntTerm>;

/// `output = sum(coefficients[i] * term(inputs[i]))`.
///
/// The invariant keeps its own copy of every input, so that a change of one input moves the
/// output by the difference of that input alone.
#[derive(Debug)]
pub struct WeightedSum<Term> {
    output: IntVarId,
    coefficients: Vec<Int>,
    inputs: Vec<VarId>,
    local_values: Vec<CommittableInt>,
    cursor: InputCursor,
    term: PhantomData<Term>,
}

impl<Term: LinearTerm> WeightedSum<Term> {
    /// The lengths of `coefficients` and `inputs` are checked when the invariant is added to the
    /// engine.
    pub fn new<Var: Into<VarId>>(
        output: IntVarId,
        coefficients: Vec<Int>,
        inputs: impl IntoIterator<Item = Var>,
    ) -> Self {
        let inputs = to_var_ids(inputs);
        WeightedSum {
            output,
            coefficients,
            local_values: vec![CommittableInt::new(0, 0); inputs.len()],
            inputs,
            cursor: InputCursor::default(),
            term: PhantomData,
        }
    }

    /// Every coefficient is one.
    pub fn sum<Var: Into<VarId>>(output: IntVarId, inputs: impl IntoIterator<Item = Var>) -> Self {
        let inputs = to_var_ids(inputs);
        Self::new(output, vec![1; inputs.len()], inputs)
    }

    pub fn coefficients(&self) -> &[Int] {
        &self.coefficients
    }

    pub fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    fn update_term(&mut self, ts: Timestamp, index: usize, context: &mut InvariantContext<'_>) {
        let new_value = context.value(ts, self.inputs[index]);
        let old_value = self.local_values[index].value(ts);
        if new_value == old_value {
            return;
        }
        self.local_values[index].set_value(ts, new_value);
        let delta = self.coefficients[index] * (Term::term(new_value) - Term::term(old_value));
        context.inc_value(ts, self.output, delta);
    }
}

impl<Term: LinearTerm> Invariant for WeightedSum<Term> {
    fn name(&self) -> &str {
        Term::NAME
    }

    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError> {
        if self.coefficients.len() != self.inputs.len() {
            return Err(EngineError::InvalidArgument(format!(
                "{} has {} coefficients for {} inputs",
                Term::NAME,
                self.coefficients.len(),
                self.inputs.len()
            )));
        }
        register_inputs(registrar, &self.inputs)?;
        registrar.register_defined_var(self.output)
    }

    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>) {
        let (lower_bound, upper_bound) = self
            .coefficients
            .iter()
            .zip(self.inputs.iter())
            .map(|(&coefficient, &input)| {
                let (lb, ub) = Term::term_bounds(context.lower_bound(input), context.upper_bound(input));
                let (lb, ub) = (coefficient * lb, coefficient * ub);
                (lb.min(ub), lb.max(ub))
            })
            .fold((0, 0), |(lb, ub), (term_lb, term_ub)| (lb + term_lb, ub + term_ub));
        context.update_bounds(self.output, lower_bound, upper_bound, widen_only);
    }

    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        let mut sum = 0;
        for (index, &input) in self.inputs.iter().enumerate() {
            let value = context.value(ts, input);
            self.local_values[index].set_value(ts, value);
            sum += self.coefficients[index] * Term::term(value);
        }
        context.update_value(ts, self.output, sum);
    }

    fn next_input(&mut self, ts: Timestamp, _context: &InvariantContext<'_>) -> Option<VarId> {
        self.cursor.next_in(ts, &self.inputs)
    }

    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>) {
        if let Some(index) = self.cursor.current(ts) {
            self.update_term(ts, index, context);
        }
    }

    fn notify_input_changed(&mut self, ts: Timestamp, local_id: LocalId, context: &mut InvariantContext<'_>) {
        self.update_term(ts, local_id.unpack() as usize, context);
    }

    fn commit(&mut self, ts: Timestamp, _context: &mut InvariantContext<'_>) {
        for local_value in self.local_values.iter_mut() {
            local_value.commit_if(ts);
        }
    }
}
