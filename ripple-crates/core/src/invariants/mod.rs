//! Invariants maintain one or more defined variables as a function of their inputs.
//!
//! An invariant is added to the [`Solver`] with [`Solver::make_invariant`]. From then on the
//! engine is responsible for calling it:
//! - [`Invariant::register_vars`] once, to declare inputs and defined variables;
//! - [`Invariant::update_bounds`] whenever the bounds of the defined variables should be
//!   (re)computed from the bounds of the inputs;
//! - [`Invariant::close`] and [`Invariant::recompute`] when the model is closed;
//! - [`Invariant::notify_input_changed`] for every changed input during input-to-output
//!   propagation, or [`Invariant::next_input`] and [`Invariant::notify_current_input_changed`]
//!   during output-to-input propagation;
//! - [`Invariant::commit`] when a move is committed.
//!
//! Every incremental update must leave the defined variables with the values a
//! [`Invariant::recompute`] would produce.
mod abs_diff;
pub(crate) mod binary;
mod binary_max_min;
mod bool_and_or;
mod bool_linear;
mod bool_xor;
mod count;
mod count_const;
mod element_2d;
mod element_var;
mod exists_for_all;
mod global_cardinality_open;
mod if_then_else;
mod int_div;
mod linear;
mod max_min_sparse;
mod modulo;
mod plus_minus;
mod pow;
mod times;

use std::fmt::Debug;

pub use abs_diff::*;
pub use binary::*;
pub use binary_max_min::*;
pub use bool_and_or::*;
pub use bool_linear::*;
pub use bool_xor::*;
pub use count::*;
pub use count_const::*;
use downcast_rs::Downcast;
use downcast_rs::impl_downcast;
pub use element_2d::*;
pub use element_var::*;
pub use exists_for_all::*;
pub use global_cardinality_open::*;
pub use if_then_else::*;
pub use int_div::*;
pub use linear::*;
pub use max_min_sparse::*;
pub use modulo::*;
pub use plus_minus::*;
pub use pow::*;
pub use times::*;

use crate::basic_types::CommittableInt;
use crate::basic_types::EngineError;
use crate::basic_types::Timestamp;
#[cfg(doc)]
use crate::engine::Solver;
use crate::engine::InvariantContext;
use crate::engine::InvariantRegistrar;
use crate::engine::LocalId;
use crate::engine::VarId;

// Needed to inspect a concrete invariant behind a `Box<dyn Invariant>`.
impl_downcast!(Invariant);

pub trait Invariant: Downcast + Debug {
    /// Return the name of the invariant, used when logging.
    fn name(&self) -> &str;

    /// Declares the inputs and the defined variables of the invariant.
    ///
    /// Every input is registered with a [`LocalId`]; that id is what
    /// [`Invariant::notify_input_changed`] receives when the input changes. Registering a defined
    /// variable which is already defined by another invariant fails.
    fn register_vars(&mut self, registrar: &mut InvariantRegistrar<'_>) -> Result<(), EngineError>;

    /// Computes the bounds of the defined variables from the bounds of the inputs.
    ///
    /// With `widen_only` the current bounds are only ever extended, never narrowed.
    fn update_bounds(&mut self, widen_only: bool, context: &mut InvariantContext<'_>);

    /// Called when the model is closed, before the first [`Invariant::recompute`]. Invariants
    /// which size internal structures after the bounds of their inputs do so here.
    fn close(&mut self, _ts: Timestamp, _context: &mut InvariantContext<'_>) {}

    /// Recomputes the defined variables from scratch.
    fn recompute(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>);

    /// Steps through the inputs during output-to-input propagation. Returns [`None`] when every
    /// input has been visited at `ts`.
    fn next_input(&mut self, ts: Timestamp, context: &InvariantContext<'_>) -> Option<VarId>;

    /// Reports that the input last returned by [`Invariant::next_input`] changed.
    fn notify_current_input_changed(&mut self, ts: Timestamp, context: &mut InvariantContext<'_>);

    /// Reports that the input registered with `local_id` changed.
    ///
    /// Notifying twice for the same change at the same timestamp must be harmless: the engine
    /// does so when a probed move is committed.
    fn notify_input_changed(
        &mut self,
        ts: Timestamp,
        local_id: LocalId,
        context: &mut InvariantContext<'_>,
    );

    /// Commits the internal state written at `ts`. Called at least once for every commit in
    /// which the invariant was notified; it must be idempotent.
    fn commit(&mut self, _ts: Timestamp, _context: &mut InvariantContext<'_>) {}
}

/// The position of an invariant in its list of inputs during output-to-input propagation.
///
/// The cursor is never committed, so every timestamp starts again at the first input.
#[derive(Debug, Clone, Copy)]
pub struct InputCursor {
    state: CommittableInt,
}

impl Default for InputCursor {
    fn default() -> Self {
        InputCursor {
            state: CommittableInt::new(0, -1),
        }
    }
}

impl InputCursor {
    /// Advances to the next index in `0..len`.
    pub fn next_index(&mut self, ts: Timestamp, len: usize) -> Option<usize> {
        let current = self.state.value(ts);
        if current >= len as i64 {
            return None;
        }
        let next = self.state.inc_value(ts, 1);
        (next < len as i64).then_some(next as usize)
    }

    /// Advances over `inputs`.
    pub fn next_in(&mut self, ts: Timestamp, inputs: &[VarId]) -> Option<VarId> {
        self.next_index(ts, inputs.len()).map(|index| inputs[index])
    }

    /// The index returned by the last call to [`InputCursor::next_index`] at `ts`.
    pub fn current(&self, ts: Timestamp) -> Option<usize> {
        let current = self.state.value(ts);
        (current >= 0).then_some(current as usize)
    }
}

/// Converts anything which identifies variables into the input list of an invariant.
pub(crate) fn to_var_ids<V: Into<VarId>>(vars: impl IntoIterator<Item = V>) -> Vec<VarId> {
    vars.into_iter().map(Into::into).collect()
}

/// Registers `inputs` with local ids `0..inputs.len()`.
pub(crate) fn register_inputs(
    registrar: &mut InvariantRegistrar<'_>,
    inputs: &[VarId],
) -> Result<(), EngineError> {
    inputs
        .iter()
        .enumerate()
        .try_for_each(|(index, &input)| registrar.register_input(input, LocalId::from(index as u32)))
}

pub(crate) fn require_inputs(name: &str, inputs: &[VarId]) -> Result<(), EngineError> {
    if inputs.is_empty() {
        Err(EngineError::InvalidArgument(format!(
            "{name} needs at least one input"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InputCursor;

    #[test]
    fn cursor_restarts_at_every_timestamp() {
        let mut cursor = InputCursor::default();
        assert_eq!(cursor.next_index(1, 2), Some(0));
        assert_eq!(cursor.current(1), Some(0));
        assert_eq!(cursor.next_index(1, 2), Some(1));
        assert_eq!(cursor.next_index(1, 2), None);
        assert_eq!(cursor.next_index(1, 2), None);

        assert_eq!(cursor.current(2), None);
        assert_eq!(cursor.next_index(2, 2), Some(0));
    }

    #[test]
    fn cursor_over_no_inputs_is_exhausted() {
        let mut cursor = InputCursor::default();
        assert_eq!(cursor.next_index(1, 0), None);
        assert_eq!(cursor.next_index(1, 0), None);
    }
}
