use super::Watchable;
use crate::containers::StorageKey;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;

/// A set variable over the universe `0..n`, described by a kernel and an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetVariable {
    id: u32,
}

impl Watchable for SetVariable {
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: DomainEvents) {
        watchers.watch_set(*self, events);
    }
}

impl StorageKey for SetVariable {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        SetVariable { id: index as u32 }
    }
}
