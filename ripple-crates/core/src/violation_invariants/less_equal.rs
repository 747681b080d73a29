use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `x <= y`, violated by `x - y`.
pub type LessEqual = BinaryInvariant<LessEqualViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct LessEqualViolation;

impl BinaryOperator for LessEqualViolation {
    const NAME: &'static str = "LessEqual";

    fn apply(&self, x: Int, y: Int) -> Int {
        (x - y).max(0)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        ((x.0 - y.1).max(0), (x.1 - y.0).max(0))
    }
}

impl BinaryViolation for LessEqualViolation {}
