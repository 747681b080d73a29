//! Drives invariants by hand, outside of the move protocol, so that their incremental updates
//! can be compared with a full recomputation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::IntVarId;
use super::InvariantContext;
use super::InvariantId;
use super::LocalId;
use super::Solver;
use super::VarId;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;

impl Solver {
    pub(crate) fn set_value_at(&mut self, ts: Timestamp, var: IntVarId, value: Int) {
        self.store.int_var_mut(var).set_value(ts, value);
    }

    pub(crate) fn value_at(&self, ts: Timestamp, var: impl Into<VarId>) -> Int {
        self.store.value(ts, var.into())
    }

    pub(crate) fn recompute_invariant(&mut self, ts: Timestamp, id: InvariantId) {
        self.invariants[id].recompute(ts, &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(id)));
    }

    pub(crate) fn notify_invariant(&mut self, ts: Timestamp, id: InvariantId, local_id: u32) {
        self.invariants[id].notify_input_changed(
            ts,
            LocalId::from(local_id),
            &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(id)),
        );
    }

    pub(crate) fn next_input_of(&mut self, ts: Timestamp, id: InvariantId) -> Option<VarId> {
        self.invariants[id].next_input(ts, &InvariantContext::new(&mut self.store, self.graph.defined_vars(id)))
    }

    pub(crate) fn notify_current_input_of(&mut self, ts: Timestamp, id: InvariantId) {
        self.invariants[id].notify_current_input_changed(ts, &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(id)));
    }

    /// Commits the invariant and every variable written at `ts`.
    pub(crate) fn commit_all_at(&mut self, ts: Timestamp, id: InvariantId) {
        self.invariants[id].commit(ts, &mut InvariantContext::new(&mut self.store, self.graph.defined_vars(id)));
        let vars = self.store.int_var_ids().collect::<Vec<_>>();
        for var in vars {
            self.store.int_var_mut(var).commit_if(ts);
        }
    }
}

/// A closed solver with one invariant under test. `inputs` lists the input variables in the order
/// of their local ids.
#[derive(Debug)]
pub(crate) struct InvariantHarness {
    pub(crate) solver: Solver,
    pub(crate) invariant: InvariantId,
    pub(crate) inputs: Vec<IntVarId>,
    pub(crate) outputs: Vec<IntVarId>,
    pub(crate) ts: Timestamp,
    rng: SmallRng,
}

impl InvariantHarness {
    pub(crate) fn new(
        mut solver: Solver,
        invariant: InvariantId,
        inputs: Vec<IntVarId>,
        outputs: Vec<IntVarId>,
    ) -> Self {
        if solver.is_open() {
            solver.close().expect("the model under test is valid");
        }
        let ts = solver.current_timestamp();
        InvariantHarness {
            solver,
            invariant,
            inputs,
            outputs,
            ts,
            rng: SmallRng::seed_from_u64(42),
        }
    }

    pub(crate) fn output_values(&self) -> Vec<Int> {
        self.outputs
            .iter()
            .map(|&output| self.solver.value_at(self.ts, output))
            .collect()
    }

    /// Starts a new timestamp and assigns random values to some of the inputs. Returns the local
    /// ids of the inputs which were assigned.
    fn randomise_some_inputs(&mut self) -> Vec<usize> {
        self.ts += 1;
        let count = self.rng.gen_range(1..=self.inputs.len().min(3));
        let mut changed = Vec::new();
        for _ in 0..count {
            let index = self.rng.gen_range(0..self.inputs.len());
            if changed.contains(&index) {
                continue;
            }
            let input = self.inputs[index];
            let value = self
                .rng
                .gen_range(self.solver.lower_bound(input)..=self.solver.upper_bound(input));
            self.solver.set_value_at(self.ts, input, value);
            changed.push(index);
        }
        changed
    }

    fn recomputed_values(&mut self) -> Vec<Int> {
        self.solver.recompute_invariant(self.ts, self.invariant);
        self.output_values()
    }

    fn maybe_commit(&mut self) {
        if self.rng.gen_bool(0.5) {
            self.solver.commit_all_at(self.ts, self.invariant);
        }
    }

    /// Every incremental update must agree with a recomputation from scratch.
    pub(crate) fn check_notify_matches_recompute(&mut self, iterations: usize) {
        for _ in 0..iterations {
            let changed = self.randomise_some_inputs();
            for &index in changed.iter() {
                self.solver.notify_invariant(self.ts, self.invariant, index as u32);
            }
            let incremental = self.output_values();
            assert_eq!(incremental, self.recomputed_values(), "after changing {changed:?}");
            self.maybe_commit();
        }
    }

    /// Output-to-input propagation must agree with a recomputation from scratch.
    pub(crate) fn check_output_to_input_matches_recompute(&mut self, iterations: usize) {
        for _ in 0..iterations {
            let changed = self.randomise_some_inputs();
            while let Some(input) = self.solver.next_input_of(self.ts, self.invariant) {
                let source = self.solver.source_var(input);
                if self.solver.value_at(self.ts, source) != self.solver.committed_value(source) {
                    self.solver.notify_current_input_of(self.ts, self.invariant);
                }
            }
            let incremental = self.output_values();
            assert_eq!(incremental, self.recomputed_values(), "after changing {changed:?}");
            self.maybe_commit();
        }
    }

    /// Every output stays within its bounds, whatever the inputs are.
    pub(crate) fn check_bounds(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.ts += 1;
            for index in 0..self.inputs.len() {
                let input = self.inputs[index];
                let value = self
                    .rng
                    .gen_range(self.solver.lower_bound(input)..=self.solver.upper_bound(input));
                self.solver.set_value_at(self.ts, input, value);
            }
            for (output, value) in self.outputs.clone().into_iter().zip(self.recomputed_values()) {
                let lb = self.solver.lower_bound(output);
                let ub = self.solver.upper_bound(output);
                assert!(lb <= value && value <= ub, "{value} not in [{lb}, {ub}]");
            }
        }
    }

    /// The inputs as enumerated by `next_input` at a fresh timestamp.
    pub(crate) fn enumerate_inputs(&mut self) -> Vec<VarId> {
        self.ts += 1;
        std::iter::from_fn(|| self.solver.next_input_of(self.ts, self.invariant)).collect()
    }

    /// Runs the three checks above.
    pub(crate) fn check_all(&mut self) {
        self.check_bounds(100);
        self.check_notify_matches_recompute(200);
        self.check_output_to_input_matches_recompute(200);
    }
}
