use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Identifiers which are dense indices into a [`KeyedVec`].
pub trait StorageKey: Clone {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

/// A vector which is indexed by a typed key, so that for example a [`PropagatorId`] cannot be used
/// to look up a graph domain.
///
/// [`PropagatorId`]: crate::propagation::PropagatorId
pub struct KeyedVec<Key, Value> {
    elements: Vec<Value>,
    key: PhantomData<fn(Key)>,
}

impl<Key, Value: Debug> Debug for KeyedVec<Key, Value> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            key: PhantomData,
        }
    }
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The key the next pushed value will receive.
    pub fn next_key(&self) -> Key {
        Key::create_from_index(self.elements.len())
    }

    /// Appends `value` and returns its key.
    pub fn push(&mut self, value: Value) -> Key {
        let key = self.next_key();
        self.elements.push(value);
        key
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &'_ mut Value> {
        self.elements.iter_mut()
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grows the vector with `filler` until `key` is a valid index.
    pub(crate) fn accomodate(&mut self, key: Key, filler: Value) {
        let required = key.index() + 1;
        if self.elements.len() < required {
            self.elements.resize(required, filler);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.elements[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_next_key_is_the_key_of_the_next_push() {
        let mut propagators: KeyedVec<usize, &str> = KeyedVec::default();
        let _ = propagators.push("connected");

        let expected = propagators.next_key();
        let key = propagators.push("acyclic");

        assert_eq!(expected, key);
        assert_eq!(propagators[key], "acyclic");
    }

    #[test]
    fn accomodate_never_shrinks() {
        let mut enqueued: KeyedVec<usize, bool> = KeyedVec::default();
        enqueued.accomodate(4, true);
        enqueued.accomodate(1, false);

        assert_eq!(enqueued.len(), 5);
        assert!(enqueued[4]);
    }
}
