use super::int_div::zero_replacement;
use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = x mod |y|`, where the result takes the sign of `x`.
///
/// A zero denominator is replaced in the same way as for [`super::IntDiv`].
pub type Mod = BinaryInvariant<ModOperator>;

#[derive(Debug, Clone, Copy)]
pub struct ModOperator {
    zero_replacement: Int,
}

impl Default for ModOperator {
    fn default() -> Self {
        ModOperator { zero_replacement: 1 }
    }
}

impl BinaryOperator for ModOperator {
    const NAME: &'static str = "Mod";

    fn update_state(&mut self, _x: (Int, Int), y: (Int, Int)) {
        self.zero_replacement = zero_replacement(y);
    }

    fn apply(&self, x: Int, y: Int) -> Int {
        let denominator = if y == 0 { self.zero_replacement } else { y };
        x % denominator.abs()
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        let largest_denominator = y.0.abs().max(y.1.abs()).max(1);
        let largest_remainder = largest_denominator - 1;
        let lower_bound = if x.0 >= 0 {
            0
        } else {
            x.0.max(-largest_remainder)
        };
        let upper_bound = if x.1 <= 0 {
            0
        } else {
            x.1.min(largest_remainder)
        };
        (lower_bound, upper_bound)
    }
}
