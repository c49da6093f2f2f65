use crate::containers::StorageKey;

/// A reversible integer cell; its value is restored when the [`State`] backtracks.
///
/// [`State`]: crate::engine::State
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
