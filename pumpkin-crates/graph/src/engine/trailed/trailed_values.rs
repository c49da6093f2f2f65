use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The current values of all [`TrailedInteger`]s, together with the undo log to restore them.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    values: KeyedVec<TrailedInteger, i64>,
    /// Each entry holds a cell and the value it had before it was overwritten.
    undo_log: Trail<(TrailedInteger, i64)>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn read(&self, cell: TrailedInteger) -> i64 {
        self.values[cell]
    }

    pub(crate) fn assign(&mut self, cell: TrailedInteger, value: i64) {
        let previous = std::mem::replace(&mut self.values[cell], value);
        if previous != value {
            self.undo_log.push((cell, previous));
        }
    }

    pub(crate) fn add_assign(&mut self, cell: TrailedInteger, addition: i64) {
        self.assign(cell, self.read(cell) + addition);
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.undo_log.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        for (cell, previous) in self.undo_log.synchronise(checkpoint) {
            self.values[cell] = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_checkpoint_restores_its_own_value() {
        let mut values = TrailedValues::default();
        let cursor = values.grow(0);

        values.new_checkpoint();
        values.add_assign(cursor, 5);
        values.add_assign(cursor, 5);
        values.new_checkpoint();
        values.assign(cursor, 11);
        assert_eq!(values.read(cursor), 11);

        values.synchronise(1);
        assert_eq!(values.read(cursor), 10);
        values.synchronise(0);
        assert_eq!(values.read(cursor), 0);
    }

    #[test]
    fn rewriting_the_same_value_leaves_no_undo_entry() {
        let mut values = TrailedValues::default();
        let size = values.grow(3);
        let other = values.grow(7);

        values.new_checkpoint();
        values.assign(size, 3);
        assert!(values.undo_log.is_empty());

        values.assign(size, 4);
        values.assign(other, 8);
        values.synchronise(0);

        assert_eq!(values.read(size), 3);
        assert_eq!(values.read(other), 7);
    }
}
