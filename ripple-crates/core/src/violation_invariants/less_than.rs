use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `x < y`, violated by `x - y + 1`.
pub type LessThan = BinaryInvariant<LessThanViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct LessThanViolation;

impl BinaryOperator for LessThanViolation {
    const NAME: &'static str = "LessThan";

    fn apply(&self, x: Int, y: Int) -> Int {
        (x - y + 1).max(0)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        ((x.0 - y.1 + 1).max(0), (x.1 - y.0 + 1).max(0))
    }
}

impl BinaryViolation for LessThanViolation {}
