use crate::engine::TrailedInteger;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::ReadDomains;

/// The outcome of connecting two path extremities with an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMerge {
    /// Both extremities were the ends of the same path, which is now closed into a cycle of
    /// `size` nodes.
    Closed { size: usize },
    /// Two paths were joined into a path from `first` to `last` of `size` nodes.
    Merged {
        first: usize,
        last: usize,
        size: usize,
    },
}

/// A forest of simple paths over the nodes of a graph, stored in trailed integers.
///
/// For the two extremities of every path, `end` refers to the other extremity and `size` holds
/// the number of nodes on the path; the values of interior nodes are stale. Initially every node
/// is a path on its own. For directed graphs the arc `(i, j)` is merged with `i` the last node
/// of a path and `j` the first node of another.
#[derive(Debug, Clone)]
pub struct PathExtremities {
    end: Box<[TrailedInteger]>,
    size: Box<[TrailedInteger]>,
}

impl PathExtremities {
    pub fn new(context: &mut impl ManipulateTrailedValues, num_nodes: usize) -> Self {
        PathExtremities {
            end: (0..num_nodes)
                .map(|node| context.new_trailed_integer(node as i64))
                .collect(),
            size: (0..num_nodes)
                .map(|_| context.new_trailed_integer(1))
                .collect(),
        }
    }

    /// The other extremity of the path which ends in `node`.
    pub fn end_of(&self, context: &impl ReadDomains, node: usize) -> usize {
        context.value(self.end[node]) as usize
    }

    /// The number of nodes on the path which ends in `node`.
    pub fn size_of(&self, context: &impl ReadDomains, node: usize) -> usize {
        context.value(self.size[node]) as usize
    }

    /// Connects the extremity `from` with the extremity `to`.
    pub fn merge(
        &self,
        context: &mut impl ManipulateTrailedValues,
        from: usize,
        to: usize,
    ) -> PathMerge {
        let first = self.end_of(&*context, from);
        let last = self.end_of(&*context, to);

        if first == to {
            return PathMerge::Closed {
                size: self.size_of(&*context, from),
            };
        }

        let size = self.size_of(&*context, from) + self.size_of(&*context, to);
        context.assign(self.end[first], last as i64);
        context.assign(self.end[last], first as i64);
        context.assign(self.size[first], size as i64);
        context.assign(self.size[last], size as i64);

        PathMerge::Merged { first, last, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::propagation::PropagatorConstructorContext;
    use crate::propagation::PropagatorId;

    #[test]
    fn merging_joins_paths_and_detects_closure() {
        let mut state = State::default();
        let mut context = PropagatorConstructorContext::new(PropagatorId(0), &mut state);
        let paths = PathExtremities::new(&mut context, 4);

        assert_eq!(
            paths.merge(&mut context, 0, 1),
            PathMerge::Merged {
                first: 0,
                last: 1,
                size: 2
            }
        );
        assert_eq!(
            paths.merge(&mut context, 1, 2),
            PathMerge::Merged {
                first: 0,
                last: 2,
                size: 3
            }
        );
        assert_eq!(paths.end_of(&context, 2), 0);
        assert_eq!(paths.merge(&mut context, 2, 0), PathMerge::Closed { size: 3 });
    }

    #[test]
    fn merges_are_undone_on_backtrack() {
        let mut state = State::default();
        let paths = {
            let mut context = PropagatorConstructorContext::new(PropagatorId(0), &mut state);
            PathExtremities::new(&mut context, 3)
        };

        state.new_checkpoint();
        {
            let mut context = PropagatorConstructorContext::new(PropagatorId(0), &mut state);
            let _ = paths.merge(&mut context, 0, 2);
        }
        state.restore_to(0);

        let context = PropagatorConstructorContext::new(PropagatorId(0), &mut state);
        assert_eq!(paths.end_of(&context, 0), 0);
        assert_eq!(paths.size_of(&context, 2), 1);
    }
}
