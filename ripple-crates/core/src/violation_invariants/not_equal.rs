use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `x != y`, with violation 1 when the two are equal.
pub type NotEqual = BinaryInvariant<NotEqualViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct NotEqualViolation;

impl BinaryOperator for NotEqualViolation {
    const NAME: &'static str = "NotEqual";

    fn apply(&self, x: Int, y: Int) -> Int {
        Int::from(x == y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        if x.1 < y.0 || y.1 < x.0 {
            (0, 0)
        } else if x.0 == x.1 && x == y {
            (1, 1)
        } else {
            (0, 1)
        }
    }
}

impl BinaryViolation for NotEqualViolation {}
