use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;

/// Two violation booleans agree: either both hold or neither does.
pub type BoolEqual = BinaryInvariant<BoolEqualViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolEqualViolation;

impl BinaryOperator for BoolEqualViolation {
    const NAME: &'static str = "BoolEqual";

    fn apply(&self, x: Int, y: Int) -> Int {
        Int::from((x == 0) != (y == 0))
    }

    fn bounds(&self, _x: (Int, Int), _y: (Int, Int)) -> (Int, Int) {
        (0, 1)
    }
}

impl BinaryViolation for BoolEqualViolation {}

#[cfg(test)]
mod tests {
    use super::BoolEqualViolation;
    use crate::invariants::binary::tests::check_operator;

    #[test]
    fn disagreeing_booleans_violate() {
        check_operator::<BoolEqualViolation>((0, 3), (0, 2), |x, y| i64::from((x == 0) != (y == 0)));
    }
}
