use super::DomainId;
use super::Watchable;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;

/// A Boolean variable, represented by a 0-1 integer domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    domain: DomainId,
}

impl Literal {
    /// Creates a new literal wrapping the provided [`DomainId`].
    ///
    /// Note: the provided `domain` should have a domain between 0 and 1.
    pub fn new(domain: DomainId) -> Literal {
        Literal { domain }
    }

    pub fn get_domain(&self) -> DomainId {
        self.domain
    }
}

impl Watchable for Literal {
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: DomainEvents) {
        watchers.watch_int(self.domain, events);
    }
}
