//! Delivery of domain events to the propagators which subscribed to them.
mod domain_events;
mod event_sink;
mod watch_list;

pub use domain_events::*;
pub(crate) use event_sink::EventSink;
pub(crate) use watch_list::WatchList;

use crate::engine::Assignments;
use crate::engine::PropagatorQueue;
use crate::engine::TrailedValues;
use crate::propagation::EnqueueDecision;
use crate::propagation::NotificationContext;
use crate::propagation::PropagatorVarId;
use crate::propagation::store::PropagatorStore;
use crate::variables::DomainId;
use crate::variables::GraphVariable;
use crate::variables::SetVariable;

/// Keeps track of which propagators watch which variables, and of the events which have not yet
/// been delivered.
#[derive(Debug, Default)]
pub(crate) struct NotificationEngine {
    int_watchers: WatchList<DomainId, IntDomainEvent>,
    set_watchers: WatchList<SetVariable, SetDomainEvent>,
    graph_watchers: WatchList<GraphVariable, GraphDomainEvent>,
    int_events: EventSink<DomainId, IntDomainEvent>,
    set_events: EventSink<SetVariable, SetDomainEvent>,
    graph_events: EventSink<GraphVariable, GraphDomainEvent>,
}

impl NotificationEngine {
    pub(crate) fn grow_int(&mut self) {
        self.int_watchers.grow();
        self.int_events.grow();
    }

    pub(crate) fn grow_set(&mut self) {
        self.set_watchers.grow();
        self.set_events.grow();
    }

    pub(crate) fn grow_graph(&mut self) {
        self.graph_watchers.grow();
        self.graph_events.grow();
    }

    pub(crate) fn int_event_occurred(&mut self, event: IntDomainEvent, domain: DomainId) {
        self.int_events.event_occurred(event, domain);
    }

    pub(crate) fn set_event_occurred(&mut self, event: SetDomainEvent, set: SetVariable) {
        self.set_events.event_occurred(event, set);
    }

    pub(crate) fn graph_event_occurred(&mut self, event: GraphDomainEvent, graph: GraphVariable) {
        self.graph_events.event_occurred(event, graph);
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.int_events.is_empty() || !self.set_events.is_empty() || !self.graph_events.is_empty()
    }

    /// Drops the undelivered events, used when backtracking.
    pub(crate) fn clear_events(&mut self) {
        self.int_events.clear();
        self.set_events.clear();
        self.graph_events.clear();
    }

    /// Calls [`Propagator::notify`] for every propagator watching an event which occurred since
    /// the last call, and enqueues the propagators which ask for it.
    ///
    /// [`Propagator::notify`]: crate::propagation::Propagator::notify
    pub(crate) fn notify_propagators_about_domain_events(
        &mut self,
        assignments: &Assignments,
        trailed_values: &mut TrailedValues,
        propagators: &mut PropagatorStore,
        propagator_queue: &mut PropagatorQueue,
    ) {
        let mut notify = |propagator_var: PropagatorVarId, event: DomainEvent| {
            let propagator = &mut propagators[propagator_var.propagator];
            let context = NotificationContext::new(trailed_values, assignments);

            if propagator.notify(context, propagator_var.variable, event)
                == EnqueueDecision::Enqueue
            {
                let priority = propagator.priority();
                propagator_queue.enqueue_propagator(propagator_var.propagator, priority);
            }
        };

        let int_events = self.int_events.drain().collect::<Vec<_>>();
        for (event, domain) in int_events {
            for &propagator_var in self.int_watchers.get_affected_propagators(event, domain) {
                notify(propagator_var, DomainEvent::Int(event));
            }
        }

        let set_events = self.set_events.drain().collect::<Vec<_>>();
        for (event, set) in set_events {
            for &propagator_var in self.set_watchers.get_affected_propagators(event, set) {
                notify(propagator_var, DomainEvent::Set(event));
            }
        }

        let graph_events = self.graph_events.drain().collect::<Vec<_>>();
        for (event, graph) in graph_events {
            for &propagator_var in self.graph_watchers.get_affected_propagators(event, graph) {
                notify(propagator_var, DomainEvent::Graph(event));
            }
        }
    }
}

/// Used to register a propagator for notifications about events to a particular variable.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    notification_engine: &'a mut NotificationEngine,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(
        propagator_var: PropagatorVarId,
        notification_engine: &'a mut NotificationEngine,
    ) -> Self {
        Watchers {
            propagator_var,
            notification_engine,
        }
    }

    pub(crate) fn watch_int(&mut self, domain: DomainId, events: DomainEvents) {
        self.notification_engine
            .int_watchers
            .watch_all(domain, events.int_events(), self.propagator_var);
    }

    pub(crate) fn watch_set(&mut self, set: SetVariable, events: DomainEvents) {
        self.notification_engine
            .set_watchers
            .watch_all(set, events.set_events(), self.propagator_var);
    }

    pub(crate) fn watch_graph(&mut self, graph: GraphVariable, events: DomainEvents) {
        self.notification_engine
            .graph_watchers
            .watch_all(graph, events.graph_events(), self.propagator_var);
    }
}
