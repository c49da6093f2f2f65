use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// Owns every propagator of a [`State`], indexed by [`PropagatorId`].
///
/// [`State`]: crate::State
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

/// A [`PropagatorId`] which remembers the concrete type of the propagator, so that the propagator
/// can be retrieved from the [`State`] after it was posted.
///
/// [`State`]: crate::State
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The handle the next inserted propagator will receive; constructors need their id before
    /// the propagator exists.
    pub(crate) fn next_handle<P>(&self) -> PropagatorHandle<P> {
        PropagatorHandle::new(self.propagators.next_key())
    }

    pub(crate) fn insert<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        PropagatorHandle::new(self.propagators.push(Box::new(propagator)))
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    pub(crate) fn iter_propagators_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    /// Returns `None` if the stored propagator is not a `P`, which only happens for handles taken
    /// from another state.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        if handle.id.index() < self.num_propagators() {
            self[handle.id].downcast_ref()
        } else {
            None
        }
    }

    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        if handle.id.index() < self.num_propagators() {
            self[handle.id].downcast_mut()
        } else {
            None
        }
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, id: PropagatorId) -> &Self::Output {
        self.propagators[id].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, id: PropagatorId) -> &mut Self::Output {
        self.propagators[id].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter_propagators().map(|propagator| propagator.name()))
            .finish()
    }
}
