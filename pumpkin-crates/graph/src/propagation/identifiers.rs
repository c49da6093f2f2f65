use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// Identifies a propagator in the [`State`]; it is the index of the propagator in the store.
///
/// [`State`]: crate::engine::State
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct PropagatorId(pub(crate) u32);

impl Display for PropagatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "propagator #{}", self.0)
    }
}

impl StorageKey for PropagatorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        PropagatorId(index as u32)
    }
}

/// The name a propagator gives to one of its variables when registering for its events; it is
/// handed back in [`Propagator::notify`].
///
/// [`Propagator::notify`]: crate::propagation::Propagator::notify
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "local #{}", self.0)
    }
}

/// A registration: the variable `variable` of propagator `propagator`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) struct PropagatorVarId {
    pub(crate) propagator: PropagatorId,
    pub(crate) variable: LocalId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_displayed_with_their_kind() {
        assert_eq!(PropagatorId(3).to_string(), "propagator #3");
        assert_eq!(LocalId::from(1).to_string(), "local #1");
    }
}
