use super::binary::extremes;
use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = x / y`, rounding towards zero.
///
/// Division by zero is avoided by dividing by 1 instead, or by -1 when the denominator can only be
/// non-positive.
pub type IntDiv = BinaryInvariant<IntDivOperator>;

#[derive(Debug, Clone, Copy)]
pub struct IntDivOperator {
    zero_replacement: Int,
}

impl Default for IntDivOperator {
    fn default() -> Self {
        IntDivOperator { zero_replacement: 1 }
    }
}

/// The value a zero denominator is replaced with.
pub(crate) fn zero_replacement(denominator: (Int, Int)) -> Int {
    if denominator.1 > 0 {
        1
    } else {
        -1
    }
}

/// The denominators which produce the extreme quotients over the given denominator bounds.
pub(crate) fn extreme_denominators(denominator: (Int, Int), replacement: Int) -> Vec<Int> {
    let (lb, ub) = denominator;
    let mut denominators = vec![lb, ub];
    if lb <= 0 && 0 <= ub {
        denominators.push(replacement);
    }
    if lb <= 1 && 1 <= ub {
        denominators.push(1);
    }
    if lb <= -1 && -1 <= ub {
        denominators.push(-1);
    }
    denominators.retain(|&denominator| denominator != 0);
    denominators
}

impl IntDivOperator {
    fn denominator(&self, y: Int) -> Int {
        if y == 0 {
            self.zero_replacement
        } else {
            y
        }
    }
}

impl BinaryOperator for IntDivOperator {
    const NAME: &'static str = "IntDiv";

    fn update_state(&mut self, _x: (Int, Int), y: (Int, Int)) {
        self.zero_replacement = zero_replacement(y);
    }

    fn apply(&self, x: Int, y: Int) -> Int {
        x / self.denominator(y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        let denominators = extreme_denominators(y, zero_replacement(y));
        extremes(
            denominators
                .iter()
                .flat_map(|&denominator| [x.0 / denominator, x.1 / denominator]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::IntDivOperator;
    use crate::invariants::binary::tests::check_operator;
    use crate::invariants::binary::tests::binary_harness;

    #[test]
    fn division_truncates() {
        check_operator::<IntDivOperator>((-9, 9), (1, 4), |x, y| x / y);
        check_operator::<IntDivOperator>((-9, 9), (-4, -1), |x, y| x / y);
    }

    #[test]
    fn zero_denominator_is_replaced_by_one_when_positive_denominators_exist() {
        check_operator::<IntDivOperator>((-5, 5), (-2, 3), |x, y| {
            if y == 0 {
                x
            } else {
                x / y
            }
        });
    }

    #[test]
    fn zero_denominator_is_replaced_by_minus_one_when_only_non_positive_denominators_exist() {
        check_operator::<IntDivOperator>((-5, 5), (-3, 0), |x, y| {
            if y == 0 {
                -x
            } else {
                x / y
            }
        });
    }

    #[test]
    fn bounds_of_division_are_tight() {
        let harness = binary_harness::<IntDivOperator>((-20, 15), (-4, 5));
        let output = harness.outputs[0];
        assert_eq!(harness.solver.lower_bound(output), -20);
        assert_eq!(harness.solver.upper_bound(output), 20);

        let harness = binary_harness::<IntDivOperator>((10, 20), (2, 5));
        let output = harness.outputs[0];
        assert_eq!(harness.solver.lower_bound(output), 2);
        assert_eq!(harness.solver.upper_bound(output), 10);
    }
}
