use enum_map::EnumArray;
use enum_map::EnumMap;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::propagation::PropagatorVarId;

/// For every variable of one kind, the propagators watching each kind of event.
#[derive(Debug)]
pub(crate) struct WatchList<Key, Event>
where
    Event: EnumArray<Vec<PropagatorVarId>>,
{
    watchers: KeyedVec<Key, EnumMap<Event, Vec<PropagatorVarId>>>,
}

impl<Key, Event> Default for WatchList<Key, Event>
where
    Event: EnumArray<Vec<PropagatorVarId>>,
{
    fn default() -> Self {
        WatchList {
            watchers: KeyedVec::default(),
        }
    }
}

impl<Key, Event> WatchList<Key, Event>
where
    Key: StorageKey,
    Event: EnumSetType + EnumArray<Vec<PropagatorVarId>>,
{
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(EnumMap::default());
    }

    pub(crate) fn watch_all(
        &mut self,
        key: Key,
        events: EnumSet<Event>,
        propagator_var: PropagatorVarId,
    ) {
        let watcher = &mut self.watchers[key];

        for event in events {
            let event_watchers = &mut watcher[event];
            if !event_watchers.contains(&propagator_var) {
                event_watchers.push(propagator_var);
            }
        }
    }

    pub(crate) fn get_affected_propagators(&self, event: Event, key: Key) -> &[PropagatorVarId] {
        &self.watchers[key][event]
    }
}
