use crate::basic_types::CommittableInt;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;

/// A stored integer variable: a [`CommittableInt`] with bounds.
///
/// Bounds are not timestamped; they only change while the model is built or while bounds are
/// being computed.
#[derive(Debug, Clone, Copy)]
pub struct IntVar {
    value: CommittableInt,
    lower_bound: Int,
    upper_bound: Int,
}

impl IntVar {
    pub(crate) fn new(ts: Timestamp, initial_value: Int, lower_bound: Int, upper_bound: Int) -> Self {
        IntVar {
            value: CommittableInt::new(ts, initial_value),
            lower_bound,
            upper_bound,
        }
    }

    pub fn value(&self, ts: Timestamp) -> Int {
        self.value.value(ts)
    }

    pub fn committed_value(&self) -> Int {
        self.value.committed_value()
    }

    pub fn tmp_timestamp(&self) -> Timestamp {
        self.value.tmp_timestamp()
    }

    pub fn has_changed(&self, ts: Timestamp) -> bool {
        self.value.has_changed(ts)
    }

    pub fn lower_bound(&self) -> Int {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> Int {
        self.upper_bound
    }

    pub fn in_domain(&self, value: Int) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }

    pub(crate) fn set_value(&mut self, ts: Timestamp, value: Int) {
        self.value.set_value(ts, value);
    }

    pub(crate) fn inc_value(&mut self, ts: Timestamp, delta: Int) -> Int {
        self.value.inc_value(ts, delta)
    }

    pub(crate) fn commit_if(&mut self, ts: Timestamp) {
        self.value.commit_if(ts);
    }

    /// Sets the bounds to `[lower_bound, upper_bound]`, or to the union of the old and new
    /// interval when `widen_only` is set.
    pub(crate) fn update_bounds(&mut self, lower_bound: Int, upper_bound: Int, widen_only: bool) {
        if widen_only {
            self.lower_bound = self.lower_bound.min(lower_bound);
            self.upper_bound = self.upper_bound.max(upper_bound);
        } else {
            self.lower_bound = lower_bound;
            self.upper_bound = upper_bound;
        }
    }
}
