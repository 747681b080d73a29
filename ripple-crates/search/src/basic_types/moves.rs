use ripple_core::Int;
use ripple_core::IntVarId;

/// A set of assignments to search variables which is probed or committed as a whole.
///
/// When a variable occurs more than once, the last assignment wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Move {
    assignments: Vec<(IntVarId, Int)>,
}

impl Move {
    pub fn new(assignments: impl IntoIterator<Item = (IntVarId, Int)>) -> Self {
        Move {
            assignments: assignments.into_iter().collect(),
        }
    }

    pub fn assign(var: IntVarId, value: Int) -> Self {
        Move {
            assignments: vec![(var, value)],
        }
    }

    /// Exchanges the current values of two variables.
    pub fn swap(first: (IntVarId, Int), second: (IntVarId, Int)) -> Self {
        Move {
            assignments: vec![(first.0, second.1), (second.0, first.1)],
        }
    }

    pub fn assignments(&self) -> &[(IntVarId, Int)] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
