use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// Conjunction of two violation booleans: the output is 0 (true) iff both inputs are 0, and
/// otherwise the largest violation.
pub type BoolAnd = BinaryInvariant<BoolAndOperator>;

/// Disjunction of two violation booleans: the output is the smallest violation.
pub type BoolOr = BinaryInvariant<BoolOrOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolAndOperator;

impl BinaryOperator for BoolAndOperator {
    const NAME: &'static str = "BoolAnd";

    fn apply(&self, x: Int, y: Int) -> Int {
        x.max(y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0.max(y.0), x.1.max(y.1))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolOrOperator;

impl BinaryOperator for BoolOrOperator {
    const NAME: &'static str = "BoolOr";

    fn apply(&self, x: Int, y: Int) -> Int {
        x.min(y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        (x.0.min(y.0), x.1.min(y.1))
    }
}
