use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = |x - y|`
pub type AbsDiff = BinaryInvariant<AbsDiffOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct AbsDiffOperator;

impl BinaryOperator for AbsDiffOperator {
    const NAME: &'static str = "AbsDiff";

    fn apply(&self, x: Int, y: Int) -> Int {
        (x - y).abs()
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        let lower_bound = if x.1 < y.0 {
            y.0 - x.1
        } else if y.1 < x.0 {
            x.0 - y.1
        } else {
            0
        };
        let upper_bound = (x.1 - y.0).abs().max((y.1 - x.0).abs());
        (lower_bound, upper_bound)
    }
}
