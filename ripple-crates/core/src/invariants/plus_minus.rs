use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = x + y`
pub type Plus = BinaryInvariant<PlusOperator>;

/// `output = x - y`
pub type Minus = BinaryInvariant<MinusOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct PlusOperator;

impl BinaryOperator for PlusOperator {
    const NAME: &'static str = "Plus";

    fn apply(&self, x: Int, y: Int) -> Int {
        x + y
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0 + y.0, x.1 + y.1)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MinusOperator;

impl BinaryOperator for MinusOperator {
    const NAME: &'static str = "Minus";

    fn apply(&self, x: Int, y: Int) -> Int {
        x - y
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0 - y.1, x.1 - y.0)
    }
}
