use super::BinaryViolation;
use crate::basic_types::Int;
use crate::invariants::BinaryInvariant;
use crate::invariants::BinaryOperator;
use crate::invariants::BoolXorOperator;

/// Exactly one of two violation booleans holds.
pub type BoolXor = BinaryInvariant<BoolXorViolation>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BoolXorViolation;

impl BinaryOperator for BoolXorViolation {
    const NAME: &'static str = "BoolXorViolation";

    fn apply(&self, x: Int, y: Int) -> Int {
        BoolXorOperator.apply(x, y)
    }

    fn bounds(&self, x: (Int, Int), y: (Int, Int)) -> (Int, Int) {
        BoolXorOperator.bounds(x, y)
    }
}

impl BinaryViolation for BoolXorViolation {}

#[cfg(test)]
mod tests {
    use super::BoolXorViolation;
    use crate::invariants::binary::tests::check_operator;

    #[test]
    fn holds_when_exactly_one_holds() {
        check_operator::<BoolXorViolation>((0, 2), (0, 2), |x, y| i64::from((x == 0) == (y == 0)));
    }
}
