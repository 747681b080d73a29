use itertools::iproduct;

use super::binary::extremes;
use super::BinaryInvariant;
use super::BinaryOperator;
use crate::basic_types::Int;

/// `output = base ^ exponent`.
///
/// A negative exponent yields the integer part of the result: 0 for bases of magnitude at least
/// two. `0 ^ e` with `e < 0` is computed with the base replaced by 1, or by -1 when the base can
/// only be non-positive. Results which do not fit an [`Int`] saturate.
pub type Pow = BinaryInvariant<PowOperator>;

#[derive(Debug, Clone, Copy)]
pub struct PowOperator {
    zero_replacement: Int,
}

impl Default for PowOperator {
    fn default() -> Self {
        PowOperator { zero_replacement: 1 }
    }
}

impl PowOperator {
    fn for_base(base: (Int, Int)) -> Self {
        PowOperator {
            zero_replacement: if base.0 < 0 && base.1 <= 0 { -1 } else { 1 },
        }
    }
}

/// `(-1) ^ exponent`
fn alternating(exponent: Int) -> Int {
    if exponent % 2 == 0 {
        1
    } else {
        -1
    }
}

pub(crate) fn saturating_pow(base: Int, exponent: Int) -> Int {
    match base {
        0 if exponent == 0 => 1,
        0 | 1 => base,
        -1 => alternating(exponent),
        _ => {
            let saturated = if base < 0 && exponent % 2 != 0 {
                Int::MIN
            } else {
                Int::MAX
            };
            usize::try_from(exponent)
                .ok()
                .and_then(|exponent| num::checked_pow(base, exponent))
                .unwrap_or(saturated)
        }
    }
}

impl BinaryOperator for PowOperator {
    const NAME: &'static str = "Pow";

    fn update_state(&mut self, x: (Int, Int), _y: (Int, Int)) {
        *self = PowOperator::for_base(x);
    }

    fn apply(&self, base: Int, exponent: Int) -> Int {
        if exponent >= 0 {
            return saturating_pow(base, exponent);
        }
        match base {
            0 if self.zero_replacement == 1 => 1,
            0 => alternating(exponent),
            1 => 1,
            -1 => alternating(exponent),
            _ => 0,
        }
    }

    fn bounds(&self, base: (Int, Int), exponent: (Int, Int)) -> (Int, Int) {
        // Over a fixed exponent the extremes are at the ends of the base domain or at the bases
        // of magnitude at most one. Over a fixed base they are at the ends of the exponent domain,
        // at their neighbours (for the sign), or around zero.
        let bases = [base.0, base.1, -1, 0, 1]
            .into_iter()
            .filter(|value| base.0 <= *value && *value <= base.1);
        let exponents = [
            exponent.0,
            exponent.0 + 1,
            exponent.1 - 1,
            exponent.1,
            -2,
            -1,
            0,
            1,
        ]
        .into_iter()
        .filter(|value| exponent.0 <= *value && *value <= exponent.1)
        .collect::<Vec<_>>();

        let operator = PowOperator::for_base(base);
        extremes(iproduct!(bases, exponents).map(|(b, e)| operator.apply(b, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::saturating_pow;
    use super::PowOperator;
    use crate::basic_types::Int;
    use crate::invariants::binary::tests::check_operator;
    use crate::invariants::binary::tests::binary_harness;
    use crate::invariants::BinaryOperator;

    fn reference(base: Int, exponent: Int, zero_replacement: Int) -> Int {
        if exponent >= 0 {
            return base.pow(exponent as u32);
        }
        let base = if base == 0 { zero_replacement } else { base };
        match base {
            1 => 1,
            -1 => {
                if exponent % 2 == 0 {
                    1
                } else {
                    -1
                }
            }
            _ => 0,
        }
    }

    #[test]
    fn powers_with_non_negative_exponents() {
        let operator = PowOperator::default();
        assert_eq!(operator.apply(2, 3), 8);
        assert_eq!(operator.apply(-2, 3), -8);
        assert_eq!(operator.apply(-2, 2), 4);
        assert_eq!(operator.apply(0, 0), 1);
        assert_eq!(operator.apply(7, 0), 1);
    }

    #[test]
    fn negative_exponents_keep_the_integer_part() {
        let operator = PowOperator::default();
        assert_eq!(operator.apply(2, -1), 0);
        assert_eq!(operator.apply(1, -3), 1);
        assert_eq!(operator.apply(-1, -3), -1);
        assert_eq!(operator.apply(-1, -2), 1);
        assert_eq!(operator.apply(0, -1), 1);
    }

    #[test]
    fn zero_base_is_replaced_by_minus_one_for_non_positive_bases() {
        let harness = binary_harness::<PowOperator>((-2, 0), (-3, 2));
        let operator = harness
            .solver
            .invariant::<super::Pow>(harness.invariant)
            .unwrap()
            .operator();
        assert_eq!(operator.apply(0, -1), -1);
        assert_eq!(operator.apply(0, -2), 1);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(saturating_pow(10, 40), Int::MAX);
        assert_eq!(saturating_pow(-10, 41), Int::MIN);
        assert_eq!(saturating_pow(-10, 40), Int::MAX);
    }

    #[test]
    fn pow_matches_reference_over_mixed_signs() {
        check_operator::<PowOperator>((-3, 3), (-2, 4), |b, e| reference(b, e, 1));
        check_operator::<PowOperator>((-3, 0), (-3, 3), |b, e| reference(b, e, -1));
        check_operator::<PowOperator>((2, 5), (-1, 3), |b, e| reference(b, e, 1));
    }

    #[test]
    fn bounds_of_pow_cover_the_negative_base_parities() {
        let harness = binary_harness::<PowOperator>((-3, 2), (0, 3));
        let output = harness.outputs[0];
        assert_eq!(harness.solver.lower_bound(output), -27);
        assert_eq!(harness.solver.upper_bound(output), 9);
    }
}
