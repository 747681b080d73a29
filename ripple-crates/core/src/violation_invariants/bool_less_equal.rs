use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// Implication between violation booleans: when `x` holds, `y` holds.
pub type BoolLessEqual = BinaryInvariant<BoolLessEqualViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolLessEqualViolation;

impl BinaryOperator for BoolLessEqualViolation {
    const NAME: &'static str = "BoolLessEqual";

    fn apply(&self, x: Int, y: Int) -> Int {
        Int::from(x == 0 && y != 0)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        let must_violate = x == (0, 0) && (y.0 > 0 || y.1 < 0);
        (Int::from(must_violate), 1)
    }
}

impl BinaryViolation for BoolLessEqualViolation {}
