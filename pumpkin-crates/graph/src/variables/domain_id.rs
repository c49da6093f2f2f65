use super::Watchable;
use crate::containers::StorageKey;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;

/// A bounded integer variable; it is simply the id which links to a domain (hence the name).
#[derive(Clone, PartialEq, Eq, Copy, Hash)]
pub struct DomainId {
    pub id: u32,
}

impl DomainId {
    pub fn new(id: u32) -> Self {
        DomainId { id }
    }
}

impl Watchable for DomainId {
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: DomainEvents) {
        watchers.watch_int(*self, events);
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl std::fmt::Debug for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
