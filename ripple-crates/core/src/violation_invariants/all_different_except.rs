use super::AllDifferent;
use crate::basic_types::Int;
use crate::engine::IntVarId;
use crate::engine::VarId;

/// [`AllDifferent`] where the ignored values may be shared by any number of inputs.
pub type AllDifferentExcept = AllDifferent;

impl AllDifferent {
    pub fn except<Var: Into<VarId>>(
        violation: IntVarId,
        inputs: impl IntoIterator<Item = Var>,
        ignored: impl IntoIterator<Item = Int>,
    ) -> Self {
        Self::with_ignored(violation, inputs, ignored.into_iter().collect())
    }
}
