use enumset::EnumSet;
use enumset::EnumSetType;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// While a propagator runs, the changes it performs are captured as events in the event sink.
/// When the propagator finishes, the event sink is drained to notify all the propagators that
/// subscribe to those events.
///
/// The event sink will ensure duplicate events are ignored until the next drain.
#[derive(Debug, Clone)]
pub(crate) struct EventSink<Key, Event: EnumSetType> {
    present: KeyedVec<Key, EnumSet<Event>>,
    events: Vec<(Event, Key)>,
}

impl<Key, Event: EnumSetType> Default for EventSink<Key, Event> {
    fn default() -> Self {
        EventSink {
            present: KeyedVec::default(),
            events: Vec::default(),
        }
    }
}

impl<Key: StorageKey + Copy, Event: EnumSetType> EventSink<Key, Event> {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, event: Event, key: Key) {
        let elem = &mut self.present[key];

        if elem.contains(event) {
            return;
        }

        let _ = elem.insert(event);
        self.events.push((event, key));
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (Event, Key)> + '_ {
        self.events.drain(..).inspect(|&(event, key)| {
            let _ = self.present[key].remove(event);
        })
    }

    pub(crate) fn clear(&mut self) {
        let _ = self.drain().count();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::notifications::GraphDomainEvent;

    #[test]
    fn the_default_sink_is_empty() {
        let mut sink: EventSink<usize, GraphDomainEvent> = EventSink::default();

        let events = sink.drain().collect::<Vec<_>>();
        assert!(events.is_empty());
    }

    #[test]
    fn a_captured_event_is_observed_in_the_drain() {
        let mut sink = EventSink::default();
        sink.grow();
        sink.grow();

        sink.event_occurred(GraphDomainEvent::AddArc, 0_usize);
        sink.event_occurred(GraphDomainEvent::RemoveNode, 1_usize);

        let events = sink.drain().collect::<Vec<_>>();

        assert_eq!(
            events,
            vec![
                (GraphDomainEvent::AddArc, 0),
                (GraphDomainEvent::RemoveNode, 1)
            ]
        );
    }

    #[test]
    fn duplicate_events_are_ignored() {
        let mut sink = EventSink::default();
        sink.grow();

        sink.event_occurred(GraphDomainEvent::AddArc, 0_usize);
        sink.event_occurred(GraphDomainEvent::AddArc, 0_usize);

        let events = sink.drain().collect::<Vec<_>>();

        assert_eq!(events.len(), 1);
    }

    #[test]
    fn after_draining_the_event_sink_is_empty() {
        let mut sink = EventSink::default();
        sink.grow();

        sink.event_occurred(GraphDomainEvent::AddNode, 0_usize);
        let _ = sink.drain().collect::<Vec<_>>();
        assert!(sink.is_empty());

        sink.event_occurred(GraphDomainEvent::AddNode, 0_usize);
        assert!(!sink.is_empty());
    }
}
