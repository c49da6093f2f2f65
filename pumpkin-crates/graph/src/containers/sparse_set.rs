/// A set over the universe `0..capacity` based on "Sparse-Sets for Domain Implementation - Le
/// Clément et al. (2013)".
///
/// It provides O(1) insertion, removal and membership tests and O(|S|) traversal. Removing an
/// element swaps it with the last element of the dense part, so the iteration order is not
/// stable under removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseSet {
    /// The number of elements which are currently in the set.
    size: usize,
    /// `dense[..size]` are the elements of the set.
    dense: Vec<usize>,
    /// The position of each value of the universe in `dense`.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Creates an empty set over `0..capacity`.
    pub fn new_empty(capacity: usize) -> Self {
        SparseSet {
            size: 0,
            dense: (0..capacity).collect(),
            sparse: (0..capacity).collect(),
        }
    }

    /// Creates a set containing every value of `0..capacity`.
    pub fn new_full(capacity: usize) -> Self {
        SparseSet {
            size: capacity,
            dense: (0..capacity).collect(),
            sparse: (0..capacity).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.dense.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains(&self, value: usize) -> bool {
        value < self.sparse.len() && self.sparse[value] < self.size
    }

    /// Returns the element stored at the provided position of the dense part.
    pub fn get(&self, position: usize) -> usize {
        self.dense[position]
    }

    /// Inserts `value`, returning whether it was absent.
    pub fn insert(&mut self, value: usize) -> bool {
        if self.contains(value) {
            return false;
        }
        let position = self.sparse[value];
        self.swap(position, self.size);
        self.size += 1;
        true
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove(&mut self, value: usize) -> bool {
        if !self.contains(value) {
            return false;
        }
        self.size -= 1;
        self.swap(self.sparse[value], self.size);
        true
    }

    pub fn clear(&mut self) {
        self.size = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dense[..self.size].iter().copied()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.dense.swap(i, j);
        self.sparse[self.dense[i]] = i;
        self.sparse[self.dense[j]] = j;
    }
}
