use super::GraphChange;
use super::GraphTrailEntry;
use crate::engine::TrailedInteger;
use crate::engine::notifications::GraphDomainEvent;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// Tracks which changes of a graph variable a propagator has consumed.
///
/// The event trail of the [`GraphDomain`] is the log; the monitor only keeps a trailed cursor
/// into it. A propagator calls [`GraphDeltaMonitor::freeze`] to capture the changes since its
/// last consumption, replays them, and commits the window with [`GraphDeltaMonitor::unfreeze`].
/// Changes made by the propagator itself while the window is frozen appear in the next window.
///
/// [`GraphDomain`]: crate::graph::GraphDomain
#[derive(Debug, Clone, Copy)]
pub struct GraphDeltaMonitor {
    graph: GraphVariable,
    cursor: TrailedInteger,
}

impl GraphDeltaMonitor {
    /// Creates a monitor which only reports changes made from now on.
    pub fn new(context: &mut impl ManipulateTrailedValues, graph: GraphVariable) -> Self {
        let start = context.graph_domain(graph).trail_len();
        let cursor = context.new_trailed_integer(start as i64);
        GraphDeltaMonitor { graph, cursor }
    }

    pub fn graph(&self) -> GraphVariable {
        self.graph
    }

    /// The position of the cursor; a cursor created at a deeper checkpoint than the current one
    /// is clamped to the trail.
    fn position(&self, context: &impl ReadDomains) -> usize {
        let cursor = usize::try_from(context.value(self.cursor)).unwrap_or(0);
        cursor.min(context.graph_domain(self.graph).trail_len())
    }

    /// Captures the changes that happened since the last [`GraphDeltaMonitor::unfreeze`].
    pub fn freeze(&self, context: &impl ReadDomains) -> GraphDelta {
        let start = self.position(context);
        let domain = context.graph_domain(self.graph);
        let end = domain.trail_len();

        GraphDelta {
            graph: self.graph,
            start,
            end,
            entries: domain.trail_entries(start, end).to_vec(),
        }
    }

    /// Marks the changes of `delta` as consumed.
    pub fn unfreeze(&self, context: &mut impl ManipulateTrailedValues, delta: GraphDelta) {
        pumpkin_assert_simple!(delta.graph == self.graph);
        pumpkin_assert_simple!(
            self.position(&*context) == delta.start,
            "the frozen window should start at the cursor of the monitor"
        );
        context.assign(self.cursor, delta.end as i64);
    }

    /// Skips all changes made up to now; used when a propagator performs a full propagation.
    pub fn catch_up(&self, context: &mut impl ManipulateTrailedValues) {
        let end = context.graph_domain(self.graph).trail_len();
        context.assign(self.cursor, end as i64);
    }
}

/// A frozen window of changes of one graph variable, in the order in which they happened.
#[derive(Debug, Clone)]
pub struct GraphDelta {
    graph: GraphVariable,
    start: usize,
    end: usize,
    entries: Vec<GraphTrailEntry>,
}

impl GraphDelta {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[GraphTrailEntry] {
        &self.entries
    }

    /// Whether an event of the given kind is part of this window.
    pub fn contains(&self, event: GraphDomainEvent) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.change.event() == event)
    }

    /// The nodes affected by events of kind `event`, which is either
    /// [`GraphDomainEvent::AddNode`] or [`GraphDomainEvent::RemoveNode`].
    pub fn nodes(&self, event: GraphDomainEvent) -> impl Iterator<Item = usize> + '_ {
        pumpkin_assert_simple!(matches!(
            event,
            GraphDomainEvent::AddNode | GraphDomainEvent::RemoveNode
        ));
        self.entries
            .iter()
            .filter_map(move |entry| match entry.change {
                GraphChange::AddNode(node) if event == GraphDomainEvent::AddNode => Some(node),
                GraphChange::RemoveNode(node) if event == GraphDomainEvent::RemoveNode => {
                    Some(node)
                }
                _ => None,
            })
    }

    /// The arcs affected by events of kind `event`, which is either
    /// [`GraphDomainEvent::AddArc`] or [`GraphDomainEvent::RemoveArc`].
    pub fn arcs(&self, event: GraphDomainEvent) -> impl Iterator<Item = (usize, usize)> + '_ {
        pumpkin_assert_simple!(matches!(
            event,
            GraphDomainEvent::AddArc | GraphDomainEvent::RemoveArc
        ));
        self.entries
            .iter()
            .filter_map(move |entry| match entry.change {
                GraphChange::AddArc(from, to) if event == GraphDomainEvent::AddArc => {
                    Some((from, to))
                }
                GraphChange::RemoveArc(from, to) if event == GraphDomainEvent::RemoveArc => {
                    Some((from, to))
                }
                _ => None,
            })
    }

    /// Calls `f` for every node event of kind `event`; stops at the first error.
    pub fn for_each_node<E>(
        &self,
        event: GraphDomainEvent,
        mut f: impl FnMut(usize) -> Result<(), E>,
    ) -> Result<(), E> {
        self.nodes(event).try_for_each(|node| f(node))
    }

    /// Calls `f` for every arc event of kind `event`; stops at the first error.
    pub fn for_each_arc<E>(
        &self,
        event: GraphDomainEvent,
        mut f: impl FnMut(usize, usize) -> Result<(), E>,
    ) -> Result<(), E> {
        self.arcs(event).try_for_each(|(from, to)| f(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;
    use crate::propagation::PropagatorConstructorContext;
    use crate::propagation::PropagatorId;

    fn monitor_for(state: &mut State, graph: GraphVariable) -> GraphDeltaMonitor {
        let mut context = PropagatorConstructorContext::new(PropagatorId(0), state);
        GraphDeltaMonitor::new(&mut context, graph)
    }

    fn consume(state: &mut State, monitor: GraphDeltaMonitor) -> GraphDelta {
        let mut context = PropagatorConstructorContext::new(PropagatorId(0), state);
        let delta = monitor.freeze(&context);
        monitor.unfreeze(&mut context, delta.clone());
        delta
    }

    fn complete_graph(state: &mut State) -> GraphVariable {
        state
            .new_graph_variable(Graph::new(4, false), Graph::complete(4, false))
            .expect("valid domain")
    }

    #[test]
    fn events_are_replayed_in_order_of_occurrence() {
        let mut state = State::default();
        let graph = complete_graph(&mut state);
        let monitor = monitor_for(&mut state, graph);

        let _ = state.enforce_arc(graph, 2, 1).expect("arc is potential");
        let _ = state.remove_arc(graph, 0, 3).expect("arc is not mandatory");

        let delta = consume(&mut state, monitor);
        assert_eq!(
            delta.nodes(GraphDomainEvent::AddNode).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(
            delta.arcs(GraphDomainEvent::AddArc).collect::<Vec<_>>(),
            vec![(1, 2)]
        );
        assert_eq!(
            delta.arcs(GraphDomainEvent::RemoveArc).collect::<Vec<_>>(),
            vec![(0, 3)]
        );
    }

    #[test]
    fn consumed_events_are_not_replayed() {
        let mut state = State::default();
        let graph = complete_graph(&mut state);
        let monitor = monitor_for(&mut state, graph);

        let _ = state.remove_node(graph, 3).expect("node is not mandatory");
        let first = consume(&mut state, monitor);
        assert!(first.contains(GraphDomainEvent::RemoveNode));

        let second = consume(&mut state, monitor);
        assert!(second.is_empty());
    }

    #[test]
    fn backtracking_restores_the_cursor() {
        let mut state = State::default();
        let graph = complete_graph(&mut state);
        let monitor = monitor_for(&mut state, graph);

        state.new_checkpoint();
        let _ = state.enforce_node(graph, 0).expect("node is potential");
        let _ = consume(&mut state, monitor);

        state.restore_to(0);
        let _ = state.enforce_node(graph, 1).expect("node is potential");

        let delta = consume(&mut state, monitor);
        assert_eq!(
            delta.nodes(GraphDomainEvent::AddNode).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn for_each_stops_at_the_first_error() {
        let mut state = State::default();
        let graph = complete_graph(&mut state);
        let monitor = monitor_for(&mut state, graph);

        let _ = state.remove_node(graph, 0).expect("node is not mandatory");
        let delta = consume(&mut state, monitor);

        let mut visited = 0;
        let result = delta.for_each_arc(GraphDomainEvent::RemoveArc, |_, _| {
            visited += 1;
            Err(())
        });
        assert!(result.is_err());
        assert_eq!(visited, 1);
    }
}
