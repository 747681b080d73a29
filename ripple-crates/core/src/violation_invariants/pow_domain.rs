use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// `base ^ exponent` is defined: the base is not 0 or the exponent is not negative.
pub type PowDomain = BinaryInvariant<PowDomainViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct PowDomainViolation;

impl BinaryOperator for PowDomainViolation {
    const NAME: &'static str = "PowDomain";

    fn apply(&self, base: Int, exponent: Int) -> Int {
        Int::from(base == 0 && exponent < 0)
    }

    fn bounds(&self, base: (Int, Int), exponent: (Int, Int)) -> (Int, Int) {
        let can_violate = base.0 <= 0 && 0 <= base.1 && exponent.0 < 0;
        let must_violate = base == (0, 0) && exponent.1 < 0;
        (Int::from(must_violate), Int::from(can_violate))
    }
}

impl BinaryViolation for PowDomainViolation {}

#[cfg(test)]
mod tests {
    use super::PowDomainViolation;
    use crate::invariants::binary::tests::check_operator;

    #[test]
    fn zero_to_a_negative_power_violates() {
        check_operator::<PowDomainViolation>((-2, 2), (-3, 3), |b, e| i64::from(b == 0 && e < 0));
        check_operator::<PowDomainViolation>((0, 0), (-3, -1), |_, _| 1);
    }
}
