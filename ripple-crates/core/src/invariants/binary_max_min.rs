use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = max(x, y)`
pub type BinaryMax = BinaryInvariant<BinaryMaxOperator>;

/// `output = min(x, y)`
pub type BinaryMin = BinaryInvariant<BinaryMinOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryMaxOperator;

impl BinaryOperator for BinaryMaxOperator {
    const NAME: &'static str = "BinaryMax";

    fn apply(&self, x: Int, y: Int) -> Int {
        x.max(y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0.max(y.0), x.1.max(y.1))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryMinOperator;

impl BinaryOperator for BinaryMinOperator {
    const NAME: &'static str = "BinaryMin";

    fn apply(&self, x: Int, y: Int) -> Int {
        x.min(y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0.min(y.0), x.1.min(y.1))
    }
}
