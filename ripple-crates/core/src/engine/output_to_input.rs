use super::IntVarId;
use super::InvariantContext;
use super::InvariantId;
use super::PropagationGraph;
use super::Store;
use crate::basic_types::Timestamp;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::invariants::Invariant;
use crate::ripple_assert_simple;

/// Which variables output-to-input propagation may skip because they cannot have changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputToInputMarkingMode {
    /// Every input is visited.
    #[default]
    None,
    /// When closing, every variable remembers the search variables it depends on. An input is
    /// visited when one of those search variables was modified in the current move.
    OutputToInputStatic,
    /// Before every probe, the variables reachable from the modified search variables are
    /// marked and only those are visited.
    InputToOutputExploration,
}

/// Demand driven propagation: starting from the queried variables, the explorer walks from
/// defined variables to the inputs of their defining invariants, and notifies an invariant when
/// one of its inputs turns out to have changed.
#[derive(Debug, Default)]
pub(crate) struct OutputToInputExplorer {
    marking_mode: OutputToInputMarkingMode,
    var_stack: Vec<IntVarId>,
    invariant_stack: Vec<InvariantId>,
    var_computed_at: KeyedVec<IntVarId, Option<Timestamp>>,
    invariant_is_on_stack: KeyedVec<InvariantId, bool>,
    search_var_ancestors: KeyedVec<IntVarId, HashSet<IntVarId>>,
    on_propagation_path: KeyedVec<IntVarId, bool>,
}

#[derive(Debug)]
pub(crate) struct ExplorerContext<'a> {
    pub(crate) graph: &'a PropagationGraph,
    pub(crate) invariants: &'a mut KeyedVec<InvariantId, Box<dyn Invariant>>,
    pub(crate) store: &'a mut Store,
    pub(crate) modified_search_vars: &'a HashSet<IntVarId>,
}

impl OutputToInputExplorer {
    pub(crate) fn register_var(&mut self, var: IntVarId) {
        self.var_computed_at.accomodate(var, None);
    }

    pub(crate) fn register_invariant(&mut self, invariant: InvariantId) {
        self.invariant_is_on_stack.accomodate(invariant, false);
    }

    pub(crate) fn close(&mut self, marking_mode: OutputToInputMarkingMode, graph: &PropagationGraph) {
        self.marking_mode = marking_mode;
        self.search_var_ancestors = KeyedVec::default();
        self.on_propagation_path = KeyedVec::default();
        self.var_computed_at.fill(None);
        self.clear_registered_vars();

        match marking_mode {
            OutputToInputMarkingMode::None => {}
            OutputToInputMarkingMode::OutputToInputStatic => self.mark_search_var_ancestors(graph),
            OutputToInputMarkingMode::InputToOutputExploration => {
                self.on_propagation_path.accomodate(
                    IntVarId::from(graph.num_vars().saturating_sub(1) as u32),
                    false,
                );
            }
        }
    }

    /// Registers a variable whose value is requested by the current probe.
    pub(crate) fn register_for_propagation(&mut self, var: IntVarId) {
        self.var_stack.push(var);
    }

    pub(crate) fn clear_registered_vars(&mut self) {
        self.var_stack.clear();
    }

    fn mark_search_var_ancestors(&mut self, graph: &PropagationGraph) {
        for _ in 0..graph.num_vars() {
            let _ = self.search_var_ancestors.push(HashSet::default());
        }

        let mut visited: KeyedVec<IntVarId, bool> = KeyedVec::default();
        visited.accomodate(IntVarId::from(graph.num_vars().saturating_sub(1) as u32), false);
        let mut stack = Vec::new();
        for &search_var in graph.search_vars() {
            visited.fill(false);

            stack.push(search_var);
            visited[search_var] = true;

            while let Some(var) = stack.pop() {
                let _ = self.search_var_ancestors[var].insert(search_var);
                for arc in graph.outgoing_arcs(var) {
                    for &defined in graph.defined_vars(arc.invariant) {
                        if !visited[defined] {
                            visited[defined] = true;
                            stack.push(defined);
                        }
                    }
                }
            }
        }
    }

    fn mark_propagation_paths(&mut self, graph: &PropagationGraph, modified: &HashSet<IntVarId>) {
        self.on_propagation_path.fill(false);

        let mut stack = Vec::new();
        for &modified_var in modified.iter() {
            if self.on_propagation_path[modified_var] {
                continue;
            }
            self.on_propagation_path[modified_var] = true;
            stack.push(modified_var);

            while let Some(var) = stack.pop() {
                for arc in graph.outgoing_arcs(var) {
                    for &defined in graph.defined_vars(arc.invariant) {
                        if !self.on_propagation_path[defined] {
                            self.on_propagation_path[defined] = true;
                            stack.push(defined);
                        }
                    }
                }
            }
        }
    }

    fn is_marked(&self, var: IntVarId, modified: &HashSet<IntVarId>) -> bool {
        match self.marking_mode {
            OutputToInputMarkingMode::None => true,
            OutputToInputMarkingMode::OutputToInputStatic => modified
                .iter()
                .any(|search_var| self.search_var_ancestors[var].contains(search_var)),
            OutputToInputMarkingMode::InputToOutputExploration => self.on_propagation_path[var],
        }
    }

    fn is_computed(&self, ts: Timestamp, var: IntVarId) -> bool {
        self.var_computed_at[var] == Some(ts)
    }

    fn set_computed(&mut self, ts: Timestamp, var: IntVarId) {
        self.var_computed_at[var] = Some(ts);
    }

    /// Finds the next marked input of `invariant` and pushes it onto the variable stack. Returns
    /// false once the inputs of the invariant are exhausted.
    fn push_next_input(&mut self, ts: Timestamp, invariant: InvariantId, context: &mut ExplorerContext<'_>) -> bool {
        loop {
            let next = {
                let invariant_context =
                    InvariantContext::new(context.store, context.graph.defined_vars(invariant));
                context.invariants[invariant].next_input(ts, &invariant_context)
            };
            let Some(input) = next else {
                return false;
            };
            let source = context.store.source_var(input);
            if self.is_marked(source, context.modified_search_vars) {
                self.var_stack.push(source);
                return true;
            }
        }
    }

    fn expand_invariant(&mut self, ts: Timestamp, invariant: InvariantId, context: &mut ExplorerContext<'_>) {
        ripple_assert_simple!(
            !self.invariant_is_on_stack[invariant],
            "the propagation graph is acyclic"
        );
        if self.push_next_input(ts, invariant, context) {
            self.invariant_stack.push(invariant);
            self.invariant_is_on_stack[invariant] = true;
        }
    }

    /// Brings every registered variable up to date at `ts`.
    pub(crate) fn propagate(&mut self, ts: Timestamp, mut context: ExplorerContext<'_>) -> u64 {
        if self.marking_mode == OutputToInputMarkingMode::InputToOutputExploration {
            self.mark_propagation_paths(context.graph, context.modified_search_vars);
        }

        // Unmarked variables cannot have changed, so they are up to date already.
        let mut registered = std::mem::take(&mut self.var_stack);
        registered.retain(|&var| {
            let marked = self.is_marked(var, context.modified_search_vars);
            if !marked {
                self.set_computed(ts, var);
            }
            marked
        });
        self.var_stack = registered;

        let mut num_notifications = 0;
        while let Some(&var) = self.var_stack.last() {
            if !self.is_computed(ts, var) {
                // Mark first: expanding may push nothing.
                self.set_computed(ts, var);
                if let Some(invariant) = context.graph.defining_invariant(var) {
                    self.expand_invariant(ts, invariant, &mut context);
                }
                continue;
            }

            let _ = self.var_stack.pop();
            let Some(&invariant) = self.invariant_stack.last() else {
                continue;
            };

            if context.store.int_var(var).has_changed(ts) {
                let mut invariant_context =
                    InvariantContext::new(context.store, context.graph.defined_vars(invariant));
                context.invariants[invariant].notify_current_input_changed(ts, &mut invariant_context);
                num_notifications += 1;
            }

            if !self.push_next_input(ts, invariant, &mut context) {
                for &defined in context.graph.defined_vars(invariant) {
                    self.set_computed(ts, defined);
                }
                let _ = self.invariant_stack.pop();
                self.invariant_is_on_stack[invariant] = false;
            }
        }

        self.clear_registered_vars();
        num_notifications
    }
}
