use super::IntVarId;
use super::InvariantId;
use super::LocalId;
use super::PropagationGraph;
use super::Store;
use super::VarId;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::ripple_assert_moderate;
#[cfg(doc)]
use crate::invariants::Invariant;

/// The view an [`Invariant`] gets of the engine while it computes: it can read every variable and
/// view, and write the variables it defines.
#[derive(Debug)]
pub struct InvariantContext<'a> {
    store: &'a mut Store,
    defined_vars: &'a [IntVarId],
}

impl<'a> InvariantContext<'a> {
    pub(crate) fn new(store: &'a mut Store, defined_vars: &'a [IntVarId]) -> Self {
        InvariantContext {
            store,
            defined_vars,
        }
    }

    fn assert_defined(&self, var: IntVarId) {
        ripple_assert_moderate!(
            self.defined_vars.contains(&var),
            "{var} is written by an invariant which does not define it"
        );
    }

    pub fn value(&self, ts: Timestamp, var: impl Into<VarId>) -> Int {
        self.store.value(ts, var.into())
    }

    pub fn committed_value(&self, var: impl Into<VarId>) -> Int {
        self.store.committed_value(var.into())
    }

    pub fn lower_bound(&self, var: impl Into<VarId>) -> Int {
        self.store.lower_bound(var.into())
    }

    pub fn upper_bound(&self, var: impl Into<VarId>) -> Int {
        self.store.upper_bound(var.into())
    }

    pub fn has_changed(&self, ts: Timestamp, var: impl Into<VarId>) -> bool {
        let var = var.into();
        self.store.value(ts, var) != self.store.committed_value(var)
    }

    /// Writes the value of a variable defined by the calling invariant.
    pub fn update_value(&mut self, ts: Timestamp, var: IntVarId, value: Int) {
        self.assert_defined(var);
        self.store.int_var_mut(var).set_value(ts, value);
    }

    /// Adds `delta` to a variable defined by the calling invariant.
    pub fn inc_value(&mut self, ts: Timestamp, var: IntVarId, delta: Int) {
        self.assert_defined(var);
        let _ = self.store.int_var_mut(var).inc_value(ts, delta);
    }

    /// Sets the bounds of a variable defined by the calling invariant; see
    /// [`Invariant::update_bounds`] for the meaning of `widen_only`.
    pub fn update_bounds(&mut self, var: IntVarId, lower_bound: Int, upper_bound: Int, widen_only: bool) {
        self.assert_defined(var);
        self.store
            .int_var_mut(var)
            .update_bounds(lower_bound, upper_bound, widen_only);
    }
}

/// Collects the inputs and defined variables of an invariant while it is being added to the
/// engine. Nothing reaches the propagation graph unless the whole registration succeeds.
#[derive(Debug)]
pub struct InvariantRegistrar<'a> {
    invariant_id: InvariantId,
    store: &'a Store,
    inputs: Vec<(IntVarId, LocalId)>,
    defined_vars: Vec<IntVarId>,
}

impl<'a> InvariantRegistrar<'a> {
    pub(crate) fn new(invariant_id: InvariantId, store: &'a Store) -> Self {
        InvariantRegistrar {
            invariant_id,
            store,
            inputs: Vec::new(),
            defined_vars: Vec::new(),
        }
    }

    pub fn invariant_id(&self) -> InvariantId {
        self.invariant_id
    }

    /// Registers that the invariant reads `var`. Changes to `var` are reported to the invariant
    /// with `local_id`. Views are followed to the variable they are computed from.
    pub fn register_input(&mut self, var: impl Into<VarId>, local_id: LocalId) -> Result<(), EngineError> {
        let var = var.into();
        if !self.store.contains(var) {
            return Err(EngineError::InvalidArgument(format!(
                "{var} does not exist in the engine"
            )));
        }
        self.inputs.push((self.store.source_var(var), local_id));
        Ok(())
    }

    /// Registers that the invariant is the only writer of `var`.
    pub fn register_defined_var(&mut self, var: IntVarId) -> Result<(), EngineError> {
        if !self.store.contains(var.into()) {
            return Err(EngineError::InvalidArgument(format!(
                "{var} does not exist in the engine"
            )));
        }
        if self.defined_vars.contains(&var) {
            return Err(EngineError::VarAlreadyDefined { var });
        }
        self.defined_vars.push(var);
        Ok(())
    }

    /// Moves the collected registrations into the graph.
    pub(crate) fn apply(self, graph: &mut PropagationGraph) -> Result<(), EngineError> {
        if let Some(&var) = self
            .defined_vars
            .iter()
            .find(|&&var| graph.defining_invariant(var).is_some())
        {
            return Err(EngineError::VarAlreadyDefined { var });
        }

        graph.register_invariant(self.invariant_id);
        for (var, local_id) in self.inputs {
            graph.register_input(self.invariant_id, var, local_id);
        }
        for var in self.defined_vars {
            graph.register_defined_var(self.invariant_id, var);
        }
        Ok(())
    }
}
