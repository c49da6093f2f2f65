use std::collections::VecDeque;

use enum_map::EnumMap;

use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::pumpkin_assert_moderate;

/// The propagators waiting to be called. Higher priorities are served first; within a priority
/// the order is first-in first-out. A propagator is in the queue at most once.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropagatorQueue {
    queues: EnumMap<Priority, VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        propagator_id.0 < self.is_enqueued.len() as u32 && self.is_enqueued[propagator_id]
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if self.is_propagator_enqueued(propagator_id) {
            return;
        }
        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;
        self.queues[priority].push_back(propagator_id);

        pumpkin_assert_moderate!(
            self.num_enqueued == self.queues.values().map(VecDeque::len).sum::<usize>()
        );
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator_id = self
            .queues
            .values_mut()
            .find_map(|queue| queue.pop_front())?;
        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;
        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        for (_, queue) in self.queues.iter_mut() {
            for propagator_id in queue.drain(..) {
                self.is_enqueued[propagator_id] = false;
            }
        }
        self.num_enqueued = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::PropagatorQueue;
    use crate::propagation::Priority;
    use crate::propagation::PropagatorId;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(1), Priority::Low);
        queue.enqueue_propagator(PropagatorId(0), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(3), Priority::High);
        queue.enqueue_propagator(PropagatorId(4), Priority::Low);

        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn a_propagator_is_enqueued_at_most_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(2), Priority::Low);
        queue.enqueue_propagator(PropagatorId(2), Priority::High);

        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert!(queue.is_empty());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn cleared_propagators_can_be_enqueued_again() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::High);
        queue.enqueue_propagator(PropagatorId(1), Priority::VeryLow);

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.is_propagator_enqueued(PropagatorId(0)));

        queue.enqueue_propagator(PropagatorId(1), Priority::Medium);
        assert_eq!(Some(PropagatorId(1)), queue.pop());
    }
}
