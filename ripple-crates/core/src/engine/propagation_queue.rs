use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::InvariantId;
use super::LocalId;
use crate::containers::KeyedVec;

/// The invariants which still have to be notified, together with the inputs that changed for
/// each of them. Invariants are popped by their priority, which is smaller than the priority of
/// every invariant reading one of their defined variables. When an invariant is popped, all of
/// its inputs therefore hold their final value.
#[derive(Debug, Default)]
pub(crate) struct PropagationQueue {
    heap: BinaryHeap<Reverse<(u32, InvariantId)>>,
    changed_inputs: KeyedVec<InvariantId, Vec<LocalId>>,
}

impl PropagationQueue {
    pub(crate) fn register_invariant(&mut self, invariant: InvariantId) {
        self.changed_inputs.accomodate(invariant, Vec::new());
    }

    /// Records that the input `local_id` of `invariant` changed.
    pub(crate) fn enqueue(&mut self, invariant: InvariantId, priority: u32, local_id: LocalId) {
        let changed_inputs = &mut self.changed_inputs[invariant];
        if changed_inputs.is_empty() {
            self.heap.push(Reverse((priority, invariant)));
        }
        if !changed_inputs.contains(&local_id) {
            changed_inputs.push(local_id);
        }
    }

    /// Pops the invariant with the smallest priority and the inputs that changed for it.
    pub(crate) fn pop(&mut self) -> Option<(InvariantId, Vec<LocalId>)> {
        let Reverse((_, invariant)) = self.heap.pop()?;
        Some((invariant, std::mem::take(&mut self.changed_inputs[invariant])))
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse((_, invariant))) = self.heap.pop() {
            self.changed_inputs[invariant].clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PropagationQueue;
    use crate::engine::InvariantId;
    use crate::engine::LocalId;

    fn queue_with_invariants(num_invariants: u32) -> PropagationQueue {
        let mut queue = PropagationQueue::default();
        for invariant in 0..num_invariants {
            queue.register_invariant(InvariantId::from(invariant));
        }
        queue
    }

    #[test]
    fn test_ordering() {
        let mut queue = queue_with_invariants(5);

        queue.enqueue(InvariantId::from(1), 3, LocalId::from(0));
        queue.enqueue(InvariantId::from(0), 1, LocalId::from(0));
        queue.enqueue(InvariantId::from(3), 4, LocalId::from(0));
        queue.enqueue(InvariantId::from(4), 0, LocalId::from(0));

        let popped = std::iter::from_fn(|| queue.pop())
            .map(|(invariant, _)| invariant)
            .collect::<Vec<_>>();
        assert_eq!(popped, [4, 0, 1, 3].map(InvariantId::from).to_vec());
    }

    #[test]
    fn changed_inputs_are_collected_once_per_invariant() {
        let mut queue = queue_with_invariants(2);

        queue.enqueue(InvariantId::from(1), 2, LocalId::from(3));
        queue.enqueue(InvariantId::from(1), 2, LocalId::from(0));
        queue.enqueue(InvariantId::from(1), 2, LocalId::from(3));

        assert_eq!(
            queue.pop(),
            Some((InvariantId::from(1), vec![LocalId::from(3), LocalId::from(0)]))
        );
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn popped_invariants_can_be_enqueued_again() {
        let mut queue = queue_with_invariants(1);

        queue.enqueue(InvariantId::from(0), 0, LocalId::from(0));
        assert!(queue.pop().is_some());
        queue.enqueue(InvariantId::from(0), 0, LocalId::from(1));

        queue.clear();
        assert_eq!(queue.pop(), None);
        queue.enqueue(InvariantId::from(0), 0, LocalId::from(2));
        assert_eq!(queue.pop(), Some((InvariantId::from(0), vec![LocalId::from(2)])));
    }
}
