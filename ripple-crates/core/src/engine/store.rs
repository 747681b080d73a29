use super::IntVar;
use super::IntVarId;
use super::VarId;
use super::ViewId;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::containers::KeyedVec;
use crate::views::IntView;

#[derive(Debug, Clone)]
struct ViewEntry {
    parent: VarId,
    view: IntView,
}

/// Owns the stored variables and the views of the engine, and resolves reads through views.
#[derive(Debug, Default)]
pub struct Store {
    int_vars: KeyedVec<IntVarId, IntVar>,
    views: KeyedVec<ViewId, ViewEntry>,
}

impl Store {
    pub(crate) fn create_int_var(&mut self, var: IntVar) -> IntVarId {
        self.int_vars.push(var)
    }

    pub(crate) fn create_view(&mut self, parent: VarId, view: IntView) -> ViewId {
        self.views.push(ViewEntry { parent, view })
    }

    pub fn num_int_vars(&self) -> usize {
        self.int_vars.len()
    }

    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    pub fn contains(&self, var: VarId) -> bool {
        match var {
            VarId::Var(id) => self.int_vars.get(id).is_some(),
            VarId::View(id) => self.views.get(id).is_some(),
        }
    }

    pub fn int_var(&self, id: IntVarId) -> &IntVar {
        &self.int_vars[id]
    }

    pub(crate) fn int_var_mut(&mut self, id: IntVarId) -> &mut IntVar {
        &mut self.int_vars[id]
    }

    pub(crate) fn int_var_ids(&self) -> impl Iterator<Item = IntVarId> {
        self.int_vars.keys()
    }

    /// The stored variable at the root of a chain of views.
    pub fn source_var(&self, var: VarId) -> IntVarId {
        let mut current = var;
        loop {
            match current {
                VarId::Var(id) => return id,
                VarId::View(id) => current = self.views[id].parent,
            }
        }
    }

    pub fn value(&self, ts: Timestamp, var: VarId) -> Int {
        match var {
            VarId::Var(id) => self.int_vars[id].value(ts),
            VarId::View(id) => {
                let entry = &self.views[id];
                entry.view.apply(self.value(ts, entry.parent))
            }
        }
    }

    pub fn committed_value(&self, var: VarId) -> Int {
        match var {
            VarId::Var(id) => self.int_vars[id].committed_value(),
            VarId::View(id) => {
                let entry = &self.views[id];
                entry.view.apply(self.committed_value(entry.parent))
            }
        }
    }

    pub fn bounds(&self, var: VarId) -> (Int, Int) {
        match var {
            VarId::Var(id) => {
                let int_var = &self.int_vars[id];
                (int_var.lower_bound(), int_var.upper_bound())
            }
            VarId::View(id) => {
                let entry = &self.views[id];
                let (lower_bound, upper_bound) = self.bounds(entry.parent);
                entry.view.bounds(lower_bound, upper_bound)
            }
        }
    }

    pub fn lower_bound(&self, var: VarId) -> Int {
        self.bounds(var).0
    }

    pub fn upper_bound(&self, var: VarId) -> Int {
        self.bounds(var).1
    }
}
