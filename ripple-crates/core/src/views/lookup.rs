use itertools::Itertools;

use crate::basic_types::EngineError;
use crate::basic_types::Int;

fn clamped_index(length: usize, offset: Int, parent: Int) -> usize {
    let last = length as Int - 1;
    (parent - offset).clamp(0, last) as usize
}

pub(super) fn element(values: &[Int], offset: Int, parent: Int) -> Int {
    values[clamped_index(values.len(), offset, parent)]
}

pub(super) fn element_bounds(
    values: &[Int],
    offset: Int,
    lower_bound: Int,
    upper_bound: Int,
) -> (Int, Int) {
    let first = clamped_index(values.len(), offset, lower_bound);
    let last = clamped_index(values.len(), offset, upper_bound);
    values[first..=last]
        .iter()
        .minmax()
        .into_option()
        .map(|(min, max)| (*min, *max))
        .unwrap_or((values[first], values[first]))
}

/// Sorts the intervals and merges overlapping or adjacent ones.
pub(super) fn normalise_intervals(mut intervals: Vec<(Int, Int)>) -> Result<Vec<(Int, Int)>, EngineError> {
    if intervals.is_empty() {
        return Err(EngineError::InvalidArgument(
            "a domain view needs at least one interval".to_owned(),
        ));
    }
    if let Some((lb, ub)) = intervals.iter().find(|(lb, ub)| lb > ub) {
        return Err(EngineError::InvalidArgument(format!(
            "the interval [{lb}, {ub}] is empty"
        )));
    }

    intervals.sort_unstable();
    let merged = intervals
        .into_iter()
        .coalesce(|(lb_1, ub_1), (lb_2, ub_2)| {
            if lb_2 <= ub_1 + 1 {
                Ok((lb_1, ub_1.max(ub_2)))
            } else {
                Err(((lb_1, ub_1), (lb_2, ub_2)))
            }
        })
        .collect();
    Ok(merged)
}

pub(super) fn normalise_values(mut values: Vec<Int>) -> Result<Vec<Int>, EngineError> {
    if values.is_empty() {
        return Err(EngineError::InvalidArgument(
            "a sparse domain view needs at least one value".to_owned(),
        ));
    }
    values.sort_unstable();
    values.dedup();
    Ok(values)
}

pub(super) fn interval_distance(intervals: &[(Int, Int)], value: Int) -> Int {
    intervals
        .iter()
        .map(|&(lb, ub)| (lb - value).max(value - ub).max(0))
        .min()
        .unwrap_or(0)
}

pub(super) fn interval_distance_bounds(
    intervals: &[(Int, Int)],
    lower_bound: Int,
    upper_bound: Int,
) -> (Int, Int) {
    let intersects = intervals
        .iter()
        .any(|&(lb, ub)| lb <= upper_bound && lower_bound <= ub);

    let at_lower = interval_distance(intervals, lower_bound);
    let at_upper = interval_distance(intervals, upper_bound);

    let min = if intersects { 0 } else { at_lower.min(at_upper) };

    // Between two intervals the distance peaks in the middle of the gap.
    let gap_peaks = intervals
        .iter()
        .tuple_windows()
        .map(|(&(_, end), &(start, _))| end + (start - end) / 2)
        .filter(|&middle| lower_bound <= middle && middle <= upper_bound)
        .map(|middle| interval_distance(intervals, middle));
    let max = gap_peaks.fold(at_lower.max(at_upper), Int::max);

    (min, max)
}

pub(super) fn sparse_domain_bounds(values: &[Int], lower_bound: Int, upper_bound: Int) -> (Int, Int) {
    let start = values.partition_point(|&value| value < lower_bound);
    let end = values.partition_point(|&value| value <= upper_bound);
    let contained = (end - start) as Int;

    if contained == 0 {
        (1, 1)
    } else if contained == upper_bound - lower_bound + 1 {
        (0, 0)
    } else {
        (0, 1)
    }
}
