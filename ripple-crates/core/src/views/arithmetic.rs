use crate::basic_types::Int;

/// Truncating remainder against `|denominator|`; the result has the sign of `value`.
pub(super) fn modulo(value: Int, denominator: Int) -> Int {
    value % denominator.abs()
}

pub(super) fn scalar_bounds(lower_bound: Int, upper_bound: Int, factor: Int) -> (Int, Int) {
    if factor >= 0 {
        (lower_bound * factor, upper_bound * factor)
    } else {
        (upper_bound * factor, lower_bound * factor)
    }
}

pub(super) fn abs_bounds(lower_bound: Int, upper_bound: Int) -> (Int, Int) {
    if lower_bound >= 0 {
        (lower_bound, upper_bound)
    } else if upper_bound <= 0 {
        (-upper_bound, -lower_bound)
    } else {
        (0, upper_bound.max(-lower_bound))
    }
}

pub(super) fn modulo_bounds(lower_bound: Int, upper_bound: Int, denominator: Int) -> (Int, Int) {
    let denominator = denominator.abs();

    if lower_bound >= 0 {
        non_negative_modulo_bounds(lower_bound, upper_bound, denominator)
    } else if upper_bound <= 0 {
        let (lb, ub) = non_negative_modulo_bounds(-upper_bound, -lower_bound, denominator);
        (-ub, -lb)
    } else {
        (
            lower_bound.max(-(denominator - 1)),
            upper_bound.min(denominator - 1),
        )
    }
}

fn non_negative_modulo_bounds(lower_bound: Int, upper_bound: Int, denominator: Int) -> (Int, Int) {
    let low = lower_bound % denominator;
    let high = upper_bound % denominator;
    if upper_bound - lower_bound < denominator && low <= high {
        (low, high)
    } else {
        (0, denominator - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::super::IntView;
    use super::super::tests::assert_bounds_are_sound;

    #[test]
    fn mod_view_truncates_towards_zero() {
        let view = IntView::Mod(5);
        let values = (-7..=7).map(|value| view.apply(value)).collect::<Vec<_>>();
        assert_eq!(
            values,
            vec![-2, -1, 0, -4, -3, -2, -1, 0, 1, 2, 3, 4, 0, 1, 2]
        );
    }

    #[test]
    fn mod_view_uses_denominator_magnitude() {
        assert_eq!(IntView::Mod(-5).apply(7), 2);
        assert_eq!(IntView::Mod(-5).apply(-7), -2);
    }

    #[test]
    fn mod_view_bounds_of_non_negative_parent_are_within_denominator() {
        assert_eq!(IntView::Mod(5).bounds(0, 100), (0, 4));
        assert_eq!(IntView::Mod(5).bounds(6, 8), (1, 3));
        assert_eq!(IntView::Mod(5).bounds(3, 6), (0, 4));
        assert_eq!(IntView::Mod(5).bounds(-100, -6), (-4, 0));
    }

    #[test]
    fn scalar_with_negative_factor_swaps_bounds() {
        assert_eq!(IntView::Scalar(-2).bounds(-1, 3), (-6, 2));
        assert_bounds_are_sound(&IntView::Scalar(-2), -1, 3);
    }

    #[test]
    fn abs_bounds_straddling_zero_start_at_zero() {
        assert_eq!(IntView::Abs.bounds(-4, 2), (0, 4));
        assert_eq!(IntView::Abs.bounds(-4, -2), (2, 4));
    }
}
