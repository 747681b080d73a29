use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// Exclusive or of two violation booleans: 0 (true) iff exactly one input is 0.
pub type BoolXor = BinaryInvariant<BoolXorOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolXorOperator;

impl BinaryOperator for BoolXorOperator {
    const NAME: &'static str = "BoolXor";

    fn apply(&self, x: Int, y: Int) -> Int {
        Int::from((x == 0) == (y == 0))
    }

    fn bounds(&self, _x: (Int, Int), _y: (Int, Int)) -> (Int, Int) {
        (0, 1)
    }
}
