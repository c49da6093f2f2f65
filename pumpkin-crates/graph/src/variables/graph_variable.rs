use super::Watchable;
use crate::containers::StorageKey;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;

/// A graph variable; the handle to a [`GraphDomain`] stored in the state.
///
/// [`GraphDomain`]: crate::graph::GraphDomain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphVariable {
    id: u32,
}

impl Watchable for GraphVariable {
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: DomainEvents) {
        watchers.watch_graph(*self, events);
    }
}

impl StorageKey for GraphVariable {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        GraphVariable { id: index as u32 }
    }
}
