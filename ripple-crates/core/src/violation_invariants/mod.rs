//! Violation invariants define a variable which measures how far their constraint is from being
//! satisfied. A violation of 0 means that the constraint holds; a violation is never negative.
//!
//! Invariants in this module are added with [`Solver::make_violation_invariant`]. A constraint can
//! be turned into a violation boolean with [`Solver::make_reified`].
mod all_different;
mod all_different_except;
mod bool_all_equal;
mod bool_equal;
mod bool_less_equal;
mod bool_less_than;
mod bool_xor;
mod equal;
mod global_cardinality_closed;
mod global_cardinality_const;
mod less_equal;
mod less_than;
mod not_equal;
mod pow_domain;
mod reify;

pub use all_different::*;
pub use all_different_except::*;
pub use bool_all_equal::*;
pub use bool_equal::*;
pub use bool_less_equal::*;
pub use bool_less_than::*;
pub use bool_xor::*;
pub use equal::*;
pub use global_cardinality_closed::*;
pub use global_cardinality_const::*;
pub use less_equal::*;
pub use less_than::*;
pub use not_equal::*;
pub use pow_domain::*;

#[cfg(doc)]
use crate::engine::Solver;
use crate::engine::IntVarId;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;
use crate::invariants::Invariant;

pub trait ViolationInvariant: Invariant {
    /// The variable holding the violation of the constraint.
    fn violation_id(&self) -> IntVarId;
}

/// A [`BinaryOperator`] whose result is a violation.
pub trait BinaryViolation: BinaryOperator {}

impl<Operator: BinaryViolation> ViolationInvariant for BinaryInvariant<Operator> {
    fn violation_id(&self) -> IntVarId {
        self.output()
    }
}
