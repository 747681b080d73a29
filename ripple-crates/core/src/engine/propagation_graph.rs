use std::collections::VecDeque;

use super::IntVarId;
use super::InvariantId;
use super::LocalId;
use crate::basic_types::EngineError;
use crate::containers::KeyedVec;
use crate::ripple_assert_moderate;

/// An edge from a variable to an invariant which reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutgoingArc {
    pub(crate) invariant: InvariantId,
    pub(crate) local_id: LocalId,
}

/// The bipartite dependency graph between variables and invariants.
///
/// Views never appear in the graph; an invariant reading a view depends on the variable at the
/// root of the view.
#[derive(Debug, Default)]
pub(crate) struct PropagationGraph {
    defining_invariant: KeyedVec<IntVarId, Option<InvariantId>>,
    outgoing_arcs: KeyedVec<IntVarId, Vec<OutgoingArc>>,
    defined_vars: KeyedVec<InvariantId, Vec<IntVarId>>,
    input_vars: KeyedVec<InvariantId, Vec<IntVarId>>,
    /// The index of each variable in `topological_order`.
    position: KeyedVec<IntVarId, u32>,
    /// The smallest position among the defined variables of each invariant.
    priority: KeyedVec<InvariantId, u32>,
    topological_order: Vec<IntVarId>,
    search_vars: Vec<IntVarId>,
}

impl PropagationGraph {
    pub(crate) fn register_var(&mut self, var: IntVarId) {
        ripple_assert_moderate!(var.unpack() as usize == self.defining_invariant.len());
        let _ = self.defining_invariant.push(None);
        let _ = self.outgoing_arcs.push(Vec::new());
        let _ = self.position.push(u32::MAX);
    }

    pub(crate) fn register_invariant(&mut self, invariant: InvariantId) {
        ripple_assert_moderate!(invariant.unpack() as usize == self.defined_vars.len());
        let _ = self.defined_vars.push(Vec::new());
        let _ = self.input_vars.push(Vec::new());
        let _ = self.priority.push(u32::MAX);
    }

    pub(crate) fn register_input(&mut self, invariant: InvariantId, var: IntVarId, local_id: LocalId) {
        self.outgoing_arcs[var].push(OutgoingArc {
            invariant,
            local_id,
        });
        self.input_vars[invariant].push(var);
    }

    pub(crate) fn register_defined_var(&mut self, invariant: InvariantId, var: IntVarId) {
        ripple_assert_moderate!(self.defining_invariant[var].is_none());
        self.defining_invariant[var] = Some(invariant);
        self.defined_vars[invariant].push(var);
    }

    pub(crate) fn num_vars(&self) -> usize {
        self.defining_invariant.len()
    }

    pub(crate) fn defining_invariant(&self, var: IntVarId) -> Option<InvariantId> {
        self.defining_invariant[var]
    }

    pub(crate) fn defined_vars(&self, invariant: InvariantId) -> &[IntVarId] {
        &self.defined_vars[invariant]
    }

    pub(crate) fn input_vars(&self, invariant: InvariantId) -> &[IntVarId] {
        &self.input_vars[invariant]
    }

    pub(crate) fn outgoing_arcs(&self, var: IntVarId) -> &[OutgoingArc] {
        &self.outgoing_arcs[var]
    }

    pub(crate) fn position(&self, var: IntVarId) -> u32 {
        self.position[var]
    }

    /// Orders invariants such that an invariant comes before every invariant reading one of its
    /// defined variables.
    pub(crate) fn priority(&self, invariant: InvariantId) -> u32 {
        self.priority[invariant]
    }

    pub(crate) fn topological_order(&self) -> &[IntVarId] {
        &self.topological_order
    }

    pub(crate) fn search_vars(&self) -> &[IntVarId] {
        &self.search_vars
    }

    pub(crate) fn is_search_var(&self, var: IntVarId) -> bool {
        self.defining_invariant[var].is_none()
    }

    /// Orders the variables such that every invariant reads only variables which come before all
    /// of the variables it defines.
    pub(crate) fn close(&mut self) -> Result<(), EngineError> {
        let mut in_degree: KeyedVec<IntVarId, usize> = KeyedVec::default();
        for var in self.defining_invariant.keys() {
            let degree = self.defining_invariant[var]
                .map_or(0, |invariant| self.input_vars[invariant].len());
            let _ = in_degree.push(degree);
        }

        let mut ready = in_degree
            .keys()
            .filter(|&var| in_degree[var] == 0)
            .collect::<VecDeque<_>>();

        self.topological_order.clear();
        while let Some(var) = ready.pop_front() {
            self.position[var] = self.topological_order.len() as u32;
            self.topological_order.push(var);

            for arc in self.outgoing_arcs[var].iter() {
                for &defined in self.defined_vars[arc.invariant].iter() {
                    in_degree[defined] -= 1;
                    if in_degree[defined] == 0 {
                        ready.push_back(defined);
                    }
                }
            }
        }

        if let Some(var) = in_degree.keys().find(|&var| in_degree[var] > 0) {
            return Err(EngineError::CycleDetected { var });
        }

        for invariant in self.defined_vars.keys() {
            self.priority[invariant] = self.defined_vars[invariant]
                .iter()
                .map(|&var| self.position[var])
                .min()
                .unwrap_or(u32::MAX);
        }

        self.search_vars = self
            .defining_invariant
            .keys()
            .filter(|&var| self.is_search_var(var))
            .collect();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PropagationGraph;
    use crate::basic_types::EngineError;
    use crate::engine::IntVarId;
    use crate::engine::InvariantId;
    use crate::engine::LocalId;

    fn graph_with_vars(num_vars: u32) -> PropagationGraph {
        let mut graph = PropagationGraph::default();
        for var in 0..num_vars {
            graph.register_var(IntVarId::from(var));
        }
        graph
    }

    #[test]
    fn defined_vars_come_after_their_inputs() {
        // 2 = f(0, 1), 3 = g(2, 0)
        let mut graph = graph_with_vars(4);
        let f = InvariantId::from(0);
        let g = InvariantId::from(1);
        graph.register_invariant(f);
        graph.register_input(f, IntVarId::from(0), LocalId::from(0));
        graph.register_input(f, IntVarId::from(1), LocalId::from(1));
        graph.register_defined_var(f, IntVarId::from(2));
        graph.register_invariant(g);
        graph.register_input(g, IntVarId::from(2), LocalId::from(0));
        graph.register_input(g, IntVarId::from(0), LocalId::from(1));
        graph.register_defined_var(g, IntVarId::from(3));

        graph.close().expect("acyclic graph");

        let position = |var| graph.position(IntVarId::from(var));
        assert!(position(0) < position(2));
        assert!(position(1) < position(2));
        assert!(position(2) < position(3));
        assert!(graph.priority(f) < graph.priority(g));
        assert_eq!(graph.search_vars(), &[IntVarId::from(0), IntVarId::from(1)]);
    }

    #[test]
    fn cycles_are_reported() {
        // 1 = f(0, 2), 2 = g(1)
        let mut graph = graph_with_vars(3);
        let f = InvariantId::from(0);
        let g = InvariantId::from(1);
        graph.register_invariant(f);
        graph.register_input(f, IntVarId::from(0), LocalId::from(0));
        graph.register_input(f, IntVarId::from(2), LocalId::from(1));
        graph.register_defined_var(f, IntVarId::from(1));
        graph.register_invariant(g);
        graph.register_input(g, IntVarId::from(1), LocalId::from(0));
        graph.register_defined_var(g, IntVarId::from(2));

        assert_eq!(
            graph.close(),
            Err(EngineError::CycleDetected {
                var: IntVarId::from(1)
            })
        );
    }
}
