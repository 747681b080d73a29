use crate::basic_types::Committable;
use crate::basic_types::CommittableInt;
use crate::basic_types::Int;
use crate::basic_types::Timestamp;
use crate::ripple_assert_extreme;
use crate::ripple_assert_simple;

#[derive(Debug, Clone, Copy)]
struct Node {
    prev: Committable<Option<usize>>,
    next: Committable<Option<usize>>,
    priority: CommittableInt,
}

/// A doubly linked list over a fixed set of elements, kept sorted by priority from head (lowest)
/// to tail (highest).
///
/// Every link is a [`Committable`], so changes made during a probe disappear on the next
/// timestamp unless they are committed with [`PriorityList::commit_if`].
#[derive(Debug, Clone)]
pub struct PriorityList {
    nodes: Vec<Node>,
    head: Committable<Option<usize>>,
    tail: Committable<Option<usize>>,
}

impl PriorityList {
    /// Creates a list of `size` elements which all have priority 0.
    pub fn new(ts: Timestamp, size: usize) -> Self {
        let nodes = (0..size)
            .map(|index| Node {
                prev: Committable::new(ts, index.checked_sub(1)),
                next: Committable::new(ts, (index + 1 < size).then_some(index + 1)),
                priority: CommittableInt::new(ts, 0),
            })
            .collect();

        PriorityList {
            nodes,
            head: Committable::new(ts, (size > 0).then_some(0)),
            tail: Committable::new(ts, size.checked_sub(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn priority(&self, ts: Timestamp, index: usize) -> Int {
        self.nodes[index].priority.value(ts)
    }

    /// The element with the lowest priority, if the list is not empty.
    pub fn min_element(&self, ts: Timestamp) -> Option<usize> {
        self.head.value(ts)
    }

    /// The element with the highest priority, if the list is not empty.
    pub fn max_element(&self, ts: Timestamp) -> Option<usize> {
        self.tail.value(ts)
    }

    pub fn min_priority(&self, ts: Timestamp) -> Option<Int> {
        self.min_element(ts).map(|index| self.priority(ts, index))
    }

    pub fn max_priority(&self, ts: Timestamp) -> Option<Int> {
        self.max_element(ts).map(|index| self.priority(ts, index))
    }

    pub fn update_priority(&mut self, ts: Timestamp, index: usize, priority: Int) {
        let old_priority = self.nodes[index].priority.value(ts);
        if old_priority == priority {
            return;
        }
        self.nodes[index].priority.set_value(ts, priority);

        if self.nodes.len() == 1 {
            return;
        }

        let old_prev = self.nodes[index].prev.value(ts);
        let old_next = self.nodes[index].next.value(ts);
        self.unlink(ts, index);

        // The list holds at least one other element, so head and tail are set.
        let (Some(head), Some(tail)) = (self.head.value(ts), self.tail.value(ts)) else {
            return;
        };

        if priority <= self.priority(ts, head) {
            self.link_between(ts, index, None, Some(head));
        } else if priority >= self.priority(ts, tail) {
            self.link_between(ts, index, Some(tail), None);
        } else if priority > old_priority {
            // Walk towards the tail from where the element used to be; the tail has a higher
            // priority so the walk stops before falling off the list.
            let mut current = old_next.unwrap_or(head);
            while self.priority(ts, current) < priority {
                match self.nodes[current].next.value(ts) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            let prev = self.nodes[current].prev.value(ts);
            self.link_between(ts, index, prev, Some(current));
        } else {
            let mut current = old_prev.unwrap_or(tail);
            while self.priority(ts, current) > priority {
                match self.nodes[current].prev.value(ts) {
                    Some(prev) => current = prev,
                    None => break,
                }
            }
            let next = self.nodes[current].next.value(ts);
            self.link_between(ts, index, Some(current), next);
        }

        ripple_assert_extreme!(self.is_sorted(ts));
    }

    /// Commits every node and the list ends that were written at `ts`.
    pub fn commit_if(&mut self, ts: Timestamp) {
        for node in self.nodes.iter_mut() {
            node.prev.commit_if(ts);
            node.next.commit_if(ts);
            node.priority.commit_if(ts);
        }
        self.head.commit_if(ts);
        self.tail.commit_if(ts);
    }

    fn unlink(&mut self, ts: Timestamp, index: usize) {
        let prev = self.nodes[index].prev.value(ts);
        let next = self.nodes[index].next.value(ts);

        match prev {
            Some(prev) => self.nodes[prev].next.set_value(ts, next),
            None => self.head.set_value(ts, next),
        }
        match next {
            Some(next) => self.nodes[next].prev.set_value(ts, prev),
            None => self.tail.set_value(ts, prev),
        }
        self.nodes[index].prev.set_value(ts, None);
        self.nodes[index].next.set_value(ts, None);
    }

    fn link_between(
        &mut self,
        ts: Timestamp,
        index: usize,
        prev: Option<usize>,
        next: Option<usize>,
    ) {
        ripple_assert_simple!(prev != Some(index) && next != Some(index));

        self.nodes[index].prev.set_value(ts, prev);
        self.nodes[index].next.set_value(ts, next);
        match prev {
            Some(prev) => self.nodes[prev].next.set_value(ts, Some(index)),
            None => self.head.set_value(ts, Some(index)),
        }
        match next {
            Some(next) => self.nodes[next].prev.set_value(ts, Some(index)),
            None => self.tail.set_value(ts, Some(index)),
        }
    }

    /// Walks the list from head to tail.
    pub fn iter(&self, ts: Timestamp) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head.value(ts), move |&index| {
            self.nodes[index].next.value(ts)
        })
    }

    fn is_sorted(&self, ts: Timestamp) -> bool {
        let order = self.iter(ts).collect::<Vec<_>>();
        order.len() == self.nodes.len()
            && order
                .windows(2)
                .all(|pair| self.priority(ts, pair[0]) <= self.priority(ts, pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::PriorityList;

    #[test]
    fn fresh_list_has_zero_priorities_in_index_order() {
        let list = PriorityList::new(0, 4);
        assert_eq!(list.iter(0).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(list.min_priority(0), Some(0));
        assert_eq!(list.max_priority(0), Some(0));
    }

    #[test]
    fn moving_the_tail_to_the_front_updates_both_ends() {
        let mut list = PriorityList::new(0, 3);
        list.update_priority(1, 0, 1);
        list.update_priority(1, 1, 2);
        list.update_priority(1, 2, 3);
        assert_eq!(list.iter(1).collect::<Vec<_>>(), vec![0, 1, 2]);

        list.update_priority(1, 2, -1);
        assert_eq!(list.iter(1).collect::<Vec<_>>(), vec![2, 0, 1]);
        assert_eq!(list.max_element(1), Some(1));
        assert_eq!(list.min_priority(1), Some(-1));
        assert_eq!(list.max_priority(1), Some(2));
    }

    #[test]
    fn uncommitted_updates_vanish_at_the_next_timestamp() {
        let mut list = PriorityList::new(0, 3);
        list.update_priority(1, 1, 10);
        list.commit_if(1);

        list.update_priority(2, 0, 20);
        assert_eq!(list.max_element(2), Some(0));

        assert_eq!(list.max_element(3), Some(1));
        assert_eq!(list.max_priority(3), Some(10));
        assert_eq!(list.iter(3).collect::<Vec<_>>(), vec![0, 2, 1]);
    }

    #[test]
    fn random_updates_keep_the_list_sorted() {
        let mut rng = SmallRng::seed_from_u64(1234);
        let size = 12;
        let mut list = PriorityList::new(0, size);
        let mut priorities = vec![0; size];

        for ts in 1..200 {
            for _ in 0..5 {
                let index = rng.gen_range(0..size);
                let priority = rng.gen_range(-20..20);
                list.update_priority(ts, index, priority);
                priorities[index] = priority;

                let order = list.iter(ts).collect::<Vec<_>>();
                assert_eq!(order.len(), size);
                assert!(order
                    .windows(2)
                    .all(|pair| priorities[pair[0]] <= priorities[pair[1]]));
                assert_eq!(list.min_priority(ts), priorities.iter().min().copied());
                assert_eq!(list.max_priority(ts), priorities.iter().max().copied());
            }
            list.commit_if(ts);
        }
    }
}
