//! Views are variables whose value is a fixed function of a single parent. They are never stored
//! and never registered in the propagation graph: every read goes through the parent.
mod arithmetic;
mod boolean;
mod lookup;

use crate::basic_types::EngineError;
use crate::basic_types::Int;

/// The function a view applies to the value of its parent.
///
/// Boolean readings follow the violation convention: 0 means the relation holds and any other
/// value means it does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntView {
    /// `parent + offset`
    Offset(Int),
    /// `parent * factor`
    Scalar(Int),
    /// `|parent|`
    Abs,
    /// `parent % |denominator|`, with the sign of the parent.
    Mod(Int),
    /// `max(parent, k)`
    IntMax(Int),
    /// `min(parent, k)`
    IntMin(Int),
    /// 0 if `parent == k`, otherwise 1.
    EqualConst(Int),
    /// 1 if `parent == k`, otherwise 0.
    NotEqualConst(Int),
    /// `max(0, parent - k)`, the violation of `parent <= k`.
    LessEqualConst(Int),
    /// `max(0, k - parent)`, the violation of `parent >= k`.
    GreaterEqualConst(Int),
    /// Turns a violation boolean into a 0/1 integer: true (0) becomes 1.
    Bool2Int,
    /// Turns a 0/1 integer into a violation boolean: 1 becomes true (0).
    Int2Bool,
    /// Negates a violation boolean.
    BoolNot,
    /// `then_value` if the parent is true (0), otherwise `else_value`.
    IfThenElseConst { then_value: Int, else_value: Int },
    /// `values[parent - offset]`, with the index clamped to the array.
    ElementConst { values: Vec<Int>, offset: Int },
    /// The distance from the parent to the closest of a set of intervals.
    InDomain(Vec<(Int, Int)>),
    /// 0 if the parent is one of the values, otherwise 1.
    InSparseDomain(Vec<Int>),
}

impl IntView {
    /// Checks the construction parameters and brings them into the form the view expects.
    pub(crate) fn validated(self) -> Result<IntView, EngineError> {
        match self {
            IntView::Mod(0) => Err(EngineError::InvalidArgument(
                "the denominator of a mod view cannot be zero".to_owned(),
            )),
            IntView::ElementConst { values, .. } if values.is_empty() => Err(
                EngineError::InvalidArgument("an element view needs at least one value".to_owned()),
            ),
            IntView::InDomain(intervals) => lookup::normalise_intervals(intervals).map(IntView::InDomain),
            IntView::InSparseDomain(values) => {
                lookup::normalise_values(values).map(IntView::InSparseDomain)
            }
            view => Ok(view),
        }
    }

    /// The value of the view given the value of its parent.
    pub fn apply(&self, parent: Int) -> Int {
        match self {
            IntView::Offset(offset) => parent + offset,
            IntView::Scalar(factor) => parent * factor,
            IntView::Abs => parent.abs(),
            IntView::Mod(denominator) => arithmetic::modulo(parent, *denominator),
            IntView::IntMax(k) => parent.max(*k),
            IntView::IntMin(k) => parent.min(*k),
            IntView::LessEqualConst(k) => (parent - k).max(0),
            IntView::GreaterEqualConst(k) => (k - parent).max(0),
            IntView::EqualConst(k) => boolean::violation(parent == *k),
            IntView::NotEqualConst(k) => boolean::violation(parent != *k),
            IntView::Bool2Int | IntView::BoolNot => Int::from(parent == 0),
            IntView::Int2Bool => boolean::violation(parent == 1),
            IntView::IfThenElseConst {
                then_value,
                else_value,
            } => {
                if parent == 0 {
                    *then_value
                } else {
                    *else_value
                }
            }
            IntView::ElementConst { values, offset } => lookup::element(values, *offset, parent),
            IntView::InDomain(intervals) => lookup::interval_distance(intervals, parent),
            IntView::InSparseDomain(values) => {
                boolean::violation(values.binary_search(&parent).is_ok())
            }
        }
    }

    /// The bounds of the view given the bounds of its parent.
    pub fn bounds(&self, lower_bound: Int, upper_bound: Int) -> (Int, Int) {
        match self {
            IntView::Offset(offset) => (lower_bound + offset, upper_bound + offset),
            IntView::Scalar(factor) => arithmetic::scalar_bounds(lower_bound, upper_bound, *factor),
            IntView::Abs => arithmetic::abs_bounds(lower_bound, upper_bound),
            IntView::Mod(denominator) => {
                arithmetic::modulo_bounds(lower_bound, upper_bound, *denominator)
            }
            IntView::IntMax(k) => (lower_bound.max(*k), upper_bound.max(*k)),
            IntView::IntMin(k) => (lower_bound.min(*k), upper_bound.min(*k)),
            IntView::LessEqualConst(k) => ((lower_bound - k).max(0), (upper_bound - k).max(0)),
            IntView::GreaterEqualConst(k) => ((k - upper_bound).max(0), (k - lower_bound).max(0)),
            IntView::EqualConst(k) => boolean::equality_bounds(lower_bound, upper_bound, *k, 0, 1),
            IntView::NotEqualConst(k) => {
                boolean::equality_bounds(lower_bound, upper_bound, *k, 1, 0)
            }
            IntView::Bool2Int | IntView::BoolNot => {
                boolean::equality_bounds(lower_bound, upper_bound, 0, 1, 0)
            }
            IntView::Int2Bool => boolean::equality_bounds(lower_bound, upper_bound, 1, 0, 1),
            IntView::IfThenElseConst {
                then_value,
                else_value,
            } => boolean::equality_bounds(lower_bound, upper_bound, 0, *then_value, *else_value),
            IntView::ElementConst { values, offset } => {
                lookup::element_bounds(values, *offset, lower_bound, upper_bound)
            }
            IntView::InDomain(intervals) => {
                lookup::interval_distance_bounds(intervals, lower_bound, upper_bound)
            }
            IntView::InSparseDomain(values) => {
                lookup::sparse_domain_bounds(values, lower_bound, upper_bound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IntView;
    use crate::basic_types::EngineError;
    use crate::basic_types::Int;

    /// Checks that every value of the view over `[lb, ub]` lies within the computed bounds.
    pub(super) fn assert_bounds_are_sound(view: &IntView, lb: Int, ub: Int) {
        let (view_lb, view_ub) = view.bounds(lb, ub);
        for parent in lb..=ub {
            let value = view.apply(parent);
            assert!(
                view_lb <= value && value <= view_ub,
                "{view:?} over [{lb}, {ub}]: {value} not in [{view_lb}, {view_ub}]"
            );
        }
    }

    #[test]
    fn zero_mod_denominator_is_rejected() {
        assert!(matches!(
            IntView::Mod(0).validated(),
            Err(EngineError::InvalidArgument(_))
        ));
        assert_eq!(IntView::Mod(-3).validated(), Ok(IntView::Mod(-3)));
    }

    #[test]
    fn empty_element_view_is_rejected() {
        let view = IntView::ElementConst {
            values: vec![],
            offset: 0,
        };
        assert!(view.validated().is_err());
    }

    #[test]
    fn simple_views_apply_their_function() {
        assert_eq!(IntView::Offset(3).apply(4), 7);
        assert_eq!(IntView::Scalar(-2).apply(4), -8);
        assert_eq!(IntView::Abs.apply(-4), 4);
        assert_eq!(IntView::IntMax(2).apply(-4), 2);
        assert_eq!(IntView::IntMin(2).apply(-4), -4);
        assert_eq!(IntView::LessEqualConst(3).apply(5), 2);
        assert_eq!(IntView::LessEqualConst(3).apply(1), 0);
        assert_eq!(IntView::GreaterEqualConst(3).apply(1), 2);
    }

    #[test]
    fn bounds_of_every_view_are_sound() {
        let views = [
            IntView::Offset(-3),
            IntView::Scalar(3),
            IntView::Scalar(-3),
            IntView::Abs,
            IntView::Mod(4),
            IntView::Mod(-4),
            IntView::IntMax(1),
            IntView::IntMin(1),
            IntView::EqualConst(2),
            IntView::NotEqualConst(2),
            IntView::LessEqualConst(1),
            IntView::GreaterEqualConst(1),
            IntView::Bool2Int,
            IntView::Int2Bool,
            IntView::BoolNot,
            IntView::IfThenElseConst {
                then_value: 7,
                else_value: -7,
            },
            IntView::ElementConst {
                values: vec![5, -1, 3, 9],
                offset: 1,
            },
            IntView::InDomain(vec![(-6, -4), (0, 1), (8, 12)]),
            IntView::InSparseDomain(vec![-2, 3, 4]),
        ];

        for view in views {
            for lb in -9..=9 {
                for ub in lb..=9 {
                    assert_bounds_are_sound(&view, lb, ub);
                }
            }
        }
    }
}
