use super::LinearTerm;
use super::WeightedSum;
use crate::basic_types::Int;

/// A violation boolean read as 1 when it holds and 0 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct BoolTerm;

impl LinearTerm for BoolTerm {
    const NAME: &'static str = "BoolLinear";

    fn term(value: Int) -> Int {
        Int::from(value == 0)
    }

    fn term_bounds(lower_bound: Int, upper_bound: Int) -> (Int, Int) {
        if lower_bound > 0 {
            (0, 0)
        } else if upper_bound == 0 {
            (1, 1)
        } else {
            (0, 1)
        }
    }
}

/// `output = sum(coefficients[i] * (inputs[i] == 0))`: a weighted count of the inputs which
/// hold.
pub type BoolLinear = WeightedSum<BoolTerm>;
