use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::AbsDiffOperator;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `x == y`, violated by the distance between the two.
pub type Equal = BinaryInvariant<EqualViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct EqualViolation;

impl BinaryOperator for EqualViolation {
    const NAME: &'static str = "Equal";

    fn apply(&self, x: Int, y: Int) -> Int {
        AbsDiffOperator.apply(x, y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        AbsDiffOperator.bounds(x, y)
    }
}

impl BinaryViolation for EqualViolation {}
