use super::Int;
use super::Timestamp;
use crate::ripple_assert_moderate;

/// A value with a committed part and a tentative part that is only visible at the timestamp it was
/// written at.
///
/// Writing at a new timestamp silently discards the tentative value of an older timestamp, so
/// nothing has to be rolled back when a move is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committable<T: Copy + PartialEq> {
    committed: T,
    tmp: T,
    tmp_timestamp: Timestamp,
}

/// The most common [`Committable`].
pub type CommittableInt = Committable<Int>;

impl<T: Copy + PartialEq> Committable<T> {
    pub fn new(ts: Timestamp, value: T) -> Self {
        Self {
            committed: value,
            tmp: value,
            tmp_timestamp: ts,
        }
    }

    /// The value as seen at `ts`.
    pub fn value(&self, ts: Timestamp) -> T {
        if ts == self.tmp_timestamp {
            self.tmp
        } else {
            self.committed
        }
    }

    pub fn committed_value(&self) -> T {
        self.committed
    }

    pub fn tmp_timestamp(&self) -> Timestamp {
        self.tmp_timestamp
    }

    pub fn has_changed(&self, ts: Timestamp) -> bool {
        self.committed != self.value(ts)
    }

    pub fn set_value(&mut self, ts: Timestamp, value: T) {
        ripple_assert_moderate!(
            ts >= self.tmp_timestamp,
            "timestamps only move forward ({ts} < {})",
            self.tmp_timestamp
        );
        self.tmp_timestamp = ts;
        self.tmp = value;
    }

    /// Commits only when the tentative value was written at `ts`.
    pub fn commit_if(&mut self, ts: Timestamp) {
        if self.tmp_timestamp == ts {
            self.committed = self.tmp;
        }
    }
}

impl Committable<Int> {
    /// Adds `delta` to the value at `ts` and returns the new value.
    pub fn inc_value(&mut self, ts: Timestamp, delta: Int) -> Int {
        let value = self.value(ts) + delta;
        self.set_value(ts, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tentative_value_is_only_visible_at_its_timestamp() {
        let mut value = CommittableInt::new(0, 3);
        value.set_value(1, 7);

        assert_eq!(value.value(1), 7);
        assert_eq!(value.value(2), 3);
        assert!(value.has_changed(1));
        assert!(!value.has_changed(2));
    }

    #[test]
    fn commit_if_ignores_other_timestamps() {
        let mut value = CommittableInt::new(0, 3);
        value.set_value(1, 7);

        value.commit_if(2);
        assert_eq!(value.committed_value(), 3);

        value.commit_if(1);
        assert_eq!(value.committed_value(), 7);
        assert!(!value.has_changed(1));
    }

    #[test]
    fn increments_accumulate_within_a_timestamp() {
        let mut value = CommittableInt::new(0, 10);
        assert_eq!(value.inc_value(1, 5), 15);
        assert_eq!(value.inc_value(1, -2), 13);

        // A new timestamp starts again from the committed value.
        assert_eq!(value.inc_value(2, 1), 11);
    }

}
