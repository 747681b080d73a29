use std::collections::BTreeSet;

use log::debug;
use log::trace;

use super::EngineStatistics;
use super::ExplorerContext;
use super::IntVar;
use super::IntVarId;
use super::InvariantContext;
use super::InvariantId;
use super::InvariantRegistrar;
use super::OutputToInputExplorer;
use super::OutputToInputMarkingMode;
use super::PropagationGraph;
use super::PropagationQueue;
use super::Store;
use super::VarId;
use crate::basic_types::EngineError;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::invariants::Invariant;
use crate::ripple_assert_eq_simple;
use crate::ripple_assert_extreme;
use crate::ripple_assert_moderate;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::views::IntView;
use crate::violation_invariants::ViolationInvariant;

/// How a probe brings the queried variables up to date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropagationMode {
    /// Every change is pushed from the modified search variables towards all of their
    /// dependants, in topological order.
    #[default]
    InputToOutput,
    /// Only the queried variables are brought up to date, by pulling from their inputs. See
    /// [`OutputToInputMarkingMode`] for how unchanged parts of the graph are skipped.
    OutputToInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolverState {
    Idle,
    Move,
    Probe,
    Commit,
    Processing,
}

impl SolverState {
    fn describe(self) -> &'static str {
        match self {
            SolverState::Idle => "idle",
            SolverState::Move => "in a move",
            SolverState::Probe => "in a probe",
            SolverState::Commit => "in a commit",
            SolverState::Processing => "propagating",
        }
    }
}

/// The propagation engine.
///
/// A solver starts out open. While open, variables, views and invariants are added. Closing the
/// solver orders the graph topologically and computes every defined variable. Afterwards the
/// search variables are changed in moves:
///
/// ```text
/// begin_move, set_value*, end_move
/// begin_probe, query*, end_probe     (evaluate the move, read with `value`)
/// begin_commit, query*, end_commit   (make the move durable)
/// ```
///
/// A move which is not committed has no lasting effect: the next `begin_move` starts from the
/// committed state again.
#[derive(Debug)]
pub struct Solver {
    is_open: bool,
    state: SolverState,
    current_timestamp: Timestamp,
    propagation_mode: PropagationMode,
    marking_mode: OutputToInputMarkingMode,
    pub(super) store: Store,
    pub(super) invariants: KeyedVec<InvariantId, Box<dyn Invariant>>,
    pub(super) graph: PropagationGraph,
    queue: PropagationQueue,
    explorer: OutputToInputExplorer,
    modified_search_vars: HashSet<IntVarId>,
    statistics: EngineStatistics,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            is_open: true,
            state: SolverState::Idle,
            current_timestamp: 0,
            propagation_mode: PropagationMode::default(),
            marking_mode: OutputToInputMarkingMode::default(),
            store: Store::default(),
            invariants: KeyedVec::default(),
            graph: PropagationGraph::default(),
            queue: PropagationQueue::default(),
            explorer: OutputToInputExplorer::default(),
            modified_search_vars: HashSet::default(),
            statistics: EngineStatistics::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_timestamp(&self) -> Timestamp {
        self.current_timestamp
    }

    pub fn propagation_mode(&self) -> PropagationMode {
        self.propagation_mode
    }

    pub fn output_to_input_marking_mode(&self) -> OutputToInputMarkingMode {
        self.marking_mode
    }

    pub fn set_propagation_mode(&mut self, mode: PropagationMode) -> Result<(), EngineError> {
        self.expect_open()?;
        self.propagation_mode = mode;
        Ok(())
    }

    pub fn set_output_to_input_marking_mode(
        &mut self,
        mode: OutputToInputMarkingMode,
    ) -> Result<(), EngineError> {
        self.expect_open()?;
        self.marking_mode = mode;
        Ok(())
    }

    pub fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }

    fn expect_open(&self) -> Result<(), EngineError> {
        if self.is_open {
            Ok(())
        } else {
            Err(EngineError::SolverClosed)
        }
    }

    fn expect_closed(&self) -> Result<(), EngineError> {
        if self.is_open {
            Err(EngineError::SolverOpen)
        } else {
            Ok(())
        }
    }

    fn expect_state(&self, expected: SolverState) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected: expected.describe(),
                actual: self.state.describe(),
            })
        }
    }

    fn expect_var(&self, var: VarId) -> Result<(), EngineError> {
        if self.store.contains(var) {
            Ok(())
        } else {
            Err(EngineError::InvalidArgument(format!(
                "{var} does not exist in the engine"
            )))
        }
    }

    /// Reopens a closed solver so that the model can be extended.
    pub fn open(&mut self) -> Result<(), EngineError> {
        if self.is_open {
            return Err(EngineError::SolverOpen);
        }
        self.expect_state(SolverState::Idle)?;
        self.is_open = true;
        Ok(())
    }

    /// Freezes the model, orders it topologically and computes the value of every defined
    /// variable from the search variables.
    ///
    /// A cycle in the model is reported as [`EngineError::CycleDetected`]; the solver then stays
    /// open.
    pub fn close(&mut self) -> Result<(), EngineError> {
        self.expect_open()?;
        self.graph.close()?;

        self.is_open = false;
        self.current_timestamp += 1;
        let ts = self.current_timestamp;

        self.queue.clear();
        self.modified_search_vars.clear();
        self.explorer.close(self.marking_mode, &self.graph);

        for invariant_id in self.invariants.keys() {
            self.invariants[invariant_id].close(
                ts,
                &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(invariant_id)),
            );
        }
        self.propagate_on_close();

        debug!(
            "Closed the model with {} variables, {} views and {} invariants ({} search variables)",
            self.store.num_int_vars(),
            self.store.num_views(),
            self.invariants.len(),
            self.graph.search_vars().len(),
        );
        Ok(())
    }

    fn propagate_on_close(&mut self) {
        let ts = self.current_timestamp;
        let mut computed = vec![false; self.invariants.len()];

        for &var in self.graph.topological_order() {
            let Some(invariant_id) = self.graph.defining_invariant(var) else {
                continue;
            };
            if computed[invariant_id.index()] {
                continue;
            }
            computed[invariant_id.index()] = true;

            let mut context = InvariantContext::new(&mut self.store, self.graph.defined_vars(invariant_id));
            let invariant = &mut self.invariants[invariant_id];
            invariant.recompute(ts, &mut context);
            invariant.commit(ts, &mut context);
            self.statistics.num_recomputations += 1;
        }

        for &var in self.graph.topological_order() {
            self.store.int_var_mut(var).commit_if(ts);
        }
    }

    /// Widens the bounds of every defined variable such that they cover every value the
    /// variable can take. Invariants are visited in the order of how many of their inputs still
    /// have bounds that are not final.
    pub fn compute_bounds(&mut self) -> Result<(), EngineError> {
        self.expect_open()?;

        let mut remaining_inputs = self
            .invariants
            .keys()
            .map(|invariant| self.graph.input_vars(invariant).len() as i64)
            .collect::<Vec<_>>();
        for var in self.store.int_var_ids() {
            if self.graph.is_search_var(var) {
                for arc in self.graph.outgoing_arcs(var) {
                    remaining_inputs[arc.invariant.index()] -= 1;
                }
            }
        }

        let mut queue = self
            .invariants
            .keys()
            .map(|invariant| (remaining_inputs[invariant.index()], invariant))
            .collect::<BTreeSet<_>>();
        let mut processed = vec![false; self.invariants.len()];

        while let Some((_, invariant_id)) = queue.pop_first() {
            processed[invariant_id.index()] = true;
            self.invariants[invariant_id].update_bounds(
                true,
                &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(invariant_id)),
            );

            for defined in self.graph.defined_vars(invariant_id).to_vec() {
                for arc in self.graph.outgoing_arcs(defined) {
                    let listener = arc.invariant.index();
                    if processed[listener] {
                        continue;
                    }
                    let _ = queue.remove(&(remaining_inputs[listener], arc.invariant));
                    remaining_inputs[listener] -= 1;
                    let _ = queue.insert((remaining_inputs[listener], arc.invariant));
                }
            }
        }
        Ok(())
    }

    /// Creates a search variable with the given initial value and bounds.
    pub fn make_int_var(
        &mut self,
        initial_value: Int,
        lower_bound: Int,
        upper_bound: Int,
    ) -> Result<IntVarId, EngineError> {
        self.expect_open()?;
        if lower_bound > upper_bound {
            return Err(EngineError::InvalidArgument(format!(
                "the domain [{lower_bound}, {upper_bound}] is empty"
            )));
        }
        if initial_value < lower_bound || upper_bound < initial_value {
            return Err(EngineError::InvalidArgument(format!(
                "the initial value {initial_value} is outside of [{lower_bound}, {upper_bound}]"
            )));
        }

        let id = self.store.create_int_var(IntVar::new(
            self.current_timestamp,
            initial_value,
            lower_bound,
            upper_bound,
        ));
        self.graph.register_var(id);
        self.explorer.register_var(id);
        Ok(id)
    }

    /// Creates a view over `parent`.
    pub fn make_int_view(&mut self, parent: impl Into<VarId>, view: IntView) -> Result<VarId, EngineError> {
        self.expect_open()?;
        let parent = parent.into();
        self.expect_var(parent)?;
        let view = view.validated()?;
        Ok(VarId::View(self.store.create_view(parent, view)))
    }

    /// Adds an invariant to the model. It registers its inputs and defined variables, and the
    /// bounds of the defined variables are set from the bounds of the inputs.
    pub fn make_invariant<I: Invariant>(&mut self, mut invariant: I) -> Result<InvariantId, EngineError> {
        self.expect_open()?;

        let id = self.invariants.next_key();
        let mut registrar = InvariantRegistrar::new(id, &self.store);
        invariant.register_vars(&mut registrar)?;
        registrar.apply(&mut self.graph)?;
        self.queue.register_invariant(id);
        self.explorer.register_invariant(id);

        invariant.update_bounds(
            false,
            &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(id)),
        );
        trace!("Added invariant {id} ({})", invariant.name());

        let pushed = self.invariants.push(Box::new(invariant));
        ripple_assert_eq_simple!(pushed, id);
        Ok(id)
    }

    /// Adds a violation invariant, see [`Solver::make_invariant`].
    pub fn make_violation_invariant<I: ViolationInvariant>(
        &mut self,
        invariant: I,
    ) -> Result<InvariantId, EngineError> {
        let violation = invariant.violation_id();
        let id = self.make_invariant(invariant)?;
        ripple_assert_moderate!(
            self.store.int_var(violation).lower_bound() >= 0,
            "violations are never negative"
        );
        Ok(id)
    }

    pub fn begin_move(&mut self) -> Result<(), EngineError> {
        self.expect_closed()?;
        self.expect_state(SolverState::Idle)?;

        self.current_timestamp += 1;
        self.queue.clear();
        self.modified_search_vars.clear();
        self.statistics.num_moves += 1;
        self.state = SolverState::Move;
        Ok(())
    }

    /// Assigns a search variable during a move. The value has to lie within the bounds of the
    /// variable.
    pub fn set_value(&mut self, var: impl Into<VarId>, value: Int) -> Result<(), EngineError> {
        self.expect_state(SolverState::Move)?;
        let var = var.into();
        self.expect_var(var)?;
        let VarId::Var(id) = var else {
            return Err(EngineError::ViewNotAllowed { var });
        };
        if !self.graph.is_search_var(id) {
            return Err(EngineError::NotASearchVariable { var: id });
        }

        let ts = self.current_timestamp;
        let int_var = self.store.int_var_mut(id);
        if !int_var.in_domain(value) {
            return Err(EngineError::InvalidArgument(format!(
                "the value {value} of {id} is outside of [{}, {}]",
                int_var.lower_bound(),
                int_var.upper_bound()
            )));
        }
        int_var.set_value(ts, value);
        if int_var.has_changed(ts) {
            let _ = self.modified_search_vars.insert(id);
        } else {
            let _ = self.modified_search_vars.remove(&id);
        }
        Ok(())
    }

    pub fn end_move(&mut self) -> Result<(), EngineError> {
        self.expect_state(SolverState::Move)?;
        self.state = SolverState::Idle;
        Ok(())
    }

    pub fn begin_probe(&mut self) -> Result<(), EngineError> {
        self.expect_closed()?;
        self.expect_state(SolverState::Idle)?;
        self.statistics.num_probes += 1;
        self.state = SolverState::Probe;
        Ok(())
    }

    /// Marks a variable as one whose value is read after the current probe or commit.
    pub fn query(&mut self, var: impl Into<VarId>) -> Result<(), EngineError> {
        self.expect_closed()?;
        if !matches!(self.state, SolverState::Probe | SolverState::Commit) {
            return Err(EngineError::InvalidState {
                expected: "in a probe or a commit",
                actual: self.state.describe(),
            });
        }
        let var = var.into();
        self.expect_var(var)?;

        if self.propagation_mode == PropagationMode::OutputToInput {
            self.explorer
                .register_for_propagation(self.store.source_var(var));
        }
        Ok(())
    }

    pub fn end_probe(&mut self) -> Result<(), EngineError> {
        self.expect_state(SolverState::Probe)?;
        self.state = SolverState::Processing;

        match self.propagation_mode {
            PropagationMode::InputToOutput => self.propagate(false),
            PropagationMode::OutputToInput => {
                let num_notifications = self.explorer.propagate(
                    self.current_timestamp,
                    ExplorerContext {
                        graph: &self.graph,
                        invariants: &mut self.invariants,
                        store: &mut self.store,
                        modified_search_vars: &self.modified_search_vars,
                    },
                );
                self.statistics.num_notifications += num_notifications;
            }
        }

        trace!("Probed move at timestamp {}", self.current_timestamp);
        self.state = SolverState::Idle;
        Ok(())
    }

    pub fn begin_commit(&mut self) -> Result<(), EngineError> {
        self.expect_closed()?;
        self.expect_state(SolverState::Idle)?;

        self.explorer.clear_registered_vars();
        self.statistics.num_commits += 1;
        self.state = SolverState::Commit;
        Ok(())
    }

    /// Commits the current move, always propagating from inputs to outputs.
    pub fn end_commit(&mut self) -> Result<(), EngineError> {
        self.expect_state(SolverState::Commit)?;
        self.state = SolverState::Processing;

        self.propagate(true);
        ripple_assert_extreme!(self
            .graph
            .topological_order()
            .iter()
            .all(|&var| !self.store.int_var(var).has_changed(self.current_timestamp)));

        trace!("Committed move at timestamp {}", self.current_timestamp);
        self.state = SolverState::Idle;
        Ok(())
    }

    /// Same as [`Solver::begin_probe`].
    pub fn begin_query(&mut self) -> Result<(), EngineError> {
        self.begin_probe()
    }

    /// Same as [`Solver::end_probe`].
    pub fn end_query(&mut self) -> Result<(), EngineError> {
        self.end_probe()
    }

    /// Notifies the readers of every variable that changed at the current timestamp, starting
    /// from the modified search variables. A commit also commits every visited invariant and
    /// variable.
    fn propagate(&mut self, commit: bool) {
        let ts = self.current_timestamp;
        let mut changed_vars = self.modified_search_vars.iter().copied().collect::<Vec<_>>();

        for &var in changed_vars.iter() {
            self.enqueue_readers(var);
        }

        while let Some((invariant_id, changed_inputs)) = self.queue.pop() {
            let invariant = &mut self.invariants[invariant_id];
            let mut context = InvariantContext::new(&mut self.store, self.graph.defined_vars(invariant_id));
            for local_id in changed_inputs {
                invariant.notify_input_changed(ts, local_id, &mut context);
                self.statistics.num_notifications += 1;
            }
            if commit {
                invariant.commit(ts, &mut context);
            }

            for defined in self.graph.defined_vars(invariant_id).to_vec() {
                if self.store.int_var(defined).has_changed(ts) {
                    changed_vars.push(defined);
                    self.enqueue_readers(defined);
                }
            }
        }

        // Nothing is committed before every reader has been notified.
        if commit {
            for var in changed_vars {
                self.store.int_var_mut(var).commit_if(ts);
            }
        }
    }

    fn enqueue_readers(&mut self, var: IntVarId) {
        for arc in self.graph.outgoing_arcs(var) {
            self.queue
                .enqueue(arc.invariant, self.graph.priority(arc.invariant), arc.local_id);
        }
    }

    /// The value of `var` at the current timestamp: the probed value after a probe, the
    /// committed value otherwise.
    pub fn value(&self, var: impl Into<VarId>) -> Int {
        self.store.value(self.current_timestamp, var.into())
    }

    /// Same as [`Solver::value`].
    pub fn current_value(&self, var: impl Into<VarId>) -> Int {
        self.value(var)
    }

    /// Same as [`Solver::value`].
    pub fn get_new_value(&self, var: impl Into<VarId>) -> Int {
        self.value(var)
    }

    pub fn committed_value(&self, var: impl Into<VarId>) -> Int {
        self.store.committed_value(var.into())
    }

    /// Same as [`Solver::committed_value`].
    pub fn get_committed_value(&self, var: impl Into<VarId>) -> Int {
        self.committed_value(var)
    }

    pub fn lower_bound(&self, var: impl Into<VarId>) -> Int {
        self.store.lower_bound(var.into())
    }

    pub fn upper_bound(&self, var: impl Into<VarId>) -> Int {
        self.store.upper_bound(var.into())
    }

    /// The variables without a defining invariant, as of the last [`Solver::close`].
    pub fn search_vars(&self) -> &[IntVarId] {
        self.graph.search_vars()
    }

    pub fn is_search_var(&self, var: IntVarId) -> bool {
        self.graph.is_search_var(var)
    }

    pub fn defining_invariant(&self, var: IntVarId) -> Option<InvariantId> {
        self.graph.defining_invariant(var)
    }

    /// The variable a view is ultimately computed from; a variable is its own source.
    pub fn source_var(&self, var: impl Into<VarId>) -> IntVarId {
        self.store.source_var(var.into())
    }

    pub fn num_vars(&self) -> usize {
        self.store.num_int_vars()
    }

    pub fn num_views(&self) -> usize {
        self.store.num_views()
    }

    pub fn num_invariants(&self) -> usize {
        self.invariants.len()
    }

    /// Looks up an invariant as its concrete type.
    pub fn invariant<I: Invariant>(&self, id: InvariantId) -> Option<&I> {
        self.invariants.get(id)?.downcast_ref::<I>()
    }
}
