use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `x < y` over violation booleans ordered false < true: `x` is false and `y` holds.
///
/// The violation counts how far each side is from the required value: a violated `y` contributes
/// its own violation and a holding `x` contributes 1.
pub type BoolLessThan = BinaryInvariant<BoolLessThanViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolLessThanViolation;

impl BinaryOperator for BoolLessThanViolation {
    const NAME: &'static str = "BoolLessThan";

    fn apply(&self, x: Int, y: Int) -> Int {
        Int::from(x == 0) + y
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        let x_holds = x == (0, 0);
        let x_can_hold = x.0 <= 0 && 0 <= x.1;
        (Int::from(x_holds) + y.0, Int::from(x_can_hold) + y.1)
    }
}

impl BinaryViolation for BoolLessThanViolation {}
