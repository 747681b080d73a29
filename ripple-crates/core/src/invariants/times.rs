use super::binary::corner_extremes;
use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = x * y`
pub type Times = BinaryInvariant<TimesOperator>;

#[derive(Debug, Default, Clone, Copy)]
pub struct TimesOperator;

impl BinaryOperator for TimesOperator {
    const NAME: &'static str = "Times";

    fn apply(&self, x: Int, y: Int) -> Int {
        x * y
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        corner_extremes(x, y, |x, y| x * y)
    }
}
