use crate::basic_types::Int;

/// Encodes whether a relation holds as a violation: 0 when it holds, 1 otherwise.
pub(crate) fn violation(holds: bool) -> Int {
    Int::from(!holds)
}

/// Bounds of a view which reads `when_equal` if the parent equals `k` and `otherwise` if not.
pub(super) fn equality_bounds(
    lower_bound: Int,
    upper_bound: Int,
    k: Int,
    when_equal: Int,
    otherwise: Int,
) -> (Int, Int) {
    if lower_bound == k && upper_bound == k {
        (when_equal, when_equal)
    } else if k < lower_bound || upper_bound < k {
        (otherwise, otherwise)
    } else {
        (when_equal.min(otherwise), when_equal.max(otherwise))
    }
}
