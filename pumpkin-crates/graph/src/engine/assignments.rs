use thiserror::Error;

use super::SetDomain;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::notifications::NotificationEngine;
use crate::graph::Graph;
use crate::graph::GraphDomain;
use crate::propagation::PropagatorId;
use crate::pumpkin_assert_simple;
use crate::variables::DomainId;
use crate::variables::GraphVariable;
use crate::variables::SetVariable;

/// A domain operation would have left a variable without any value.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("the domain became empty")]
pub struct EmptyDomain;

#[derive(Debug, Clone, Copy)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
}

#[derive(Debug, Clone, Copy)]
struct IntegerChange {
    domain: DomainId,
    old_lower_bound: i32,
    old_upper_bound: i32,
}

/// The domains of all variables.
///
/// Integer variables share one trail; set and graph domains carry their own trail, which doubles
/// as their event log.
#[derive(Debug, Default)]
pub struct Assignments {
    integer_domains: KeyedVec<DomainId, IntegerDomain>,
    integer_trail: Trail<IntegerChange>,
    set_domains: KeyedVec<SetVariable, SetDomain>,
    graph_domains: KeyedVec<GraphVariable, GraphDomain>,
}

impl Assignments {
    pub(crate) fn get_checkpoint(&self) -> usize {
        self.integer_trail.get_checkpoint()
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.integer_domains.len() + self.set_domains.len() + self.graph_domains.len()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.integer_trail.new_checkpoint();
        self.set_domains
            .iter_mut()
            .for_each(|domain| domain.new_checkpoint());
        self.graph_domains
            .iter_mut()
            .for_each(|domain| domain.new_checkpoint());
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        pumpkin_assert_simple!(checkpoint < self.get_checkpoint());

        let Assignments {
            integer_domains,
            integer_trail,
            ..
        } = self;
        for change in integer_trail.synchronise(checkpoint) {
            let domain = &mut integer_domains[change.domain];
            domain.lower_bound = change.old_lower_bound;
            domain.upper_bound = change.old_upper_bound;
        }

        self.set_domains
            .iter_mut()
            .for_each(|domain| domain.synchronise(checkpoint));
        self.graph_domains
            .iter_mut()
            .for_each(|domain| domain.synchronise(checkpoint));
    }
}

/// Integer domains.
impl Assignments {
    pub(crate) fn grow_int(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        pumpkin_assert_simple!(lower_bound <= upper_bound, "Cannot create an empty domain.");
        self.integer_domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
        })
    }

    pub(crate) fn get_lower_bound(&self, domain: DomainId) -> i32 {
        self.integer_domains[domain].lower_bound
    }

    pub(crate) fn get_upper_bound(&self, domain: DomainId) -> i32 {
        self.integer_domains[domain].upper_bound
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        self.get_lower_bound(domain) == self.get_upper_bound(domain)
    }

    fn record_int(&mut self, domain: DomainId) {
        let current = self.integer_domains[domain];
        self.integer_trail.push(IntegerChange {
            domain,
            old_lower_bound: current.lower_bound,
            old_upper_bound: current.upper_bound,
        });
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        value: i32,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        if value <= self.get_lower_bound(domain) {
            return Ok(false);
        }
        if value > self.get_upper_bound(domain) {
            return Err(EmptyDomain);
        }

        self.record_int(domain);
        self.integer_domains[domain].lower_bound = value;

        notification_engine.int_event_occurred(IntDomainEvent::LowerBound, domain);
        if self.is_fixed(domain) {
            notification_engine.int_event_occurred(IntDomainEvent::Assign, domain);
        }
        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        value: i32,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        if value >= self.get_upper_bound(domain) {
            return Ok(false);
        }
        if value < self.get_lower_bound(domain) {
            return Err(EmptyDomain);
        }

        self.record_int(domain);
        self.integer_domains[domain].upper_bound = value;

        notification_engine.int_event_occurred(IntDomainEvent::UpperBound, domain);
        if self.is_fixed(domain) {
            notification_engine.int_event_occurred(IntDomainEvent::Assign, domain);
        }
        Ok(true)
    }
}

/// Set domains.
impl Assignments {
    pub(crate) fn grow_set(
        &mut self,
        universe: usize,
        kernel: &[usize],
        envelope: &[usize],
    ) -> Result<SetVariable, ConstraintOperationError> {
        let domain = SetDomain::new(universe, kernel, envelope, self.get_checkpoint())?;
        Ok(self.set_domains.push(domain))
    }

    pub(crate) fn set_domain(&self, set: SetVariable) -> &SetDomain {
        &self.set_domains[set]
    }

    fn publish_set_events(
        &self,
        set: SetVariable,
        trail_len_before: usize,
        notification_engine: &mut NotificationEngine,
    ) {
        let domain = &self.set_domains[set];
        for index in trail_len_before..domain.trail_len() {
            notification_engine.set_event_occurred(domain.trail_entry(index).event(), set);
        }
    }

    pub(crate) fn enforce_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        let before = self.set_domains[set].trail_len();
        let result = self.set_domains[set].enforce(value);
        self.publish_set_events(set, before, notification_engine);
        result
    }

    pub(crate) fn remove_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        let before = self.set_domains[set].trail_len();
        let result = self.set_domains[set].remove(value);
        self.publish_set_events(set, before, notification_engine);
        result
    }
}

/// Graph domains.
impl Assignments {
    pub(crate) fn grow_graph(
        &mut self,
        kernel: Graph,
        envelope: Graph,
    ) -> Result<GraphVariable, ConstraintOperationError> {
        let domain = GraphDomain::new(kernel, envelope, self.get_checkpoint())?;
        Ok(self.graph_domains.push(domain))
    }

    pub(crate) fn graph_domain(&self, graph: GraphVariable) -> &GraphDomain {
        &self.graph_domains[graph]
    }

    fn publish_graph_events(
        &self,
        graph: GraphVariable,
        trail_len_before: usize,
        notification_engine: &mut NotificationEngine,
    ) {
        let domain = &self.graph_domains[graph];
        for entry in domain.trail_entries(trail_len_before, domain.trail_len()) {
            notification_engine.graph_event_occurred(entry.change.event(), graph);
        }
    }

    fn modify_graph(
        &mut self,
        graph: GraphVariable,
        notification_engine: &mut NotificationEngine,
        operation: impl FnOnce(&mut GraphDomain) -> Result<bool, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        let before = self.graph_domains[graph].trail_len();
        let result = operation(&mut self.graph_domains[graph]);
        self.publish_graph_events(graph, before, notification_engine);
        result
    }

    pub(crate) fn enforce_node(
        &mut self,
        graph: GraphVariable,
        node: usize,
        cause: Option<PropagatorId>,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        self.modify_graph(graph, notification_engine, |domain| {
            domain.enforce_node(node, cause)
        })
    }

    pub(crate) fn remove_node(
        &mut self,
        graph: GraphVariable,
        node: usize,
        cause: Option<PropagatorId>,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        self.modify_graph(graph, notification_engine, |domain| {
            domain.remove_node(node, cause)
        })
    }

    pub(crate) fn enforce_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
        cause: Option<PropagatorId>,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        self.modify_graph(graph, notification_engine, |domain| {
            domain.enforce_arc(from, to, cause)
        })
    }

    pub(crate) fn remove_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
        cause: Option<PropagatorId>,
        notification_engine: &mut NotificationEngine,
    ) -> Result<bool, EmptyDomain> {
        self.modify_graph(graph, notification_engine, |domain| {
            domain.remove_arc(from, to, cause)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Assignments, NotificationEngine) {
        (Assignments::default(), NotificationEngine::default())
    }

    #[test]
    fn bounds_are_restored_on_synchronise() {
        let (mut assignments, mut notification_engine) = setup();
        let domain = assignments.grow_int(0, 10);
        notification_engine.grow_int();

        assignments.new_checkpoint();
        let _ = assignments.tighten_lower_bound(domain, 3, &mut notification_engine);
        let _ = assignments.tighten_upper_bound(domain, 5, &mut notification_engine);
        assert_eq!(assignments.get_lower_bound(domain), 3);
        assert_eq!(assignments.get_upper_bound(domain), 5);

        assignments.synchronise(0);
        assert_eq!(assignments.get_lower_bound(domain), 0);
        assert_eq!(assignments.get_upper_bound(domain), 10);
    }

    #[test]
    fn crossing_bounds_is_an_empty_domain() {
        let (mut assignments, mut notification_engine) = setup();
        let domain = assignments.grow_int(0, 10);
        notification_engine.grow_int();

        let result = assignments.tighten_lower_bound(domain, 11, &mut notification_engine);
        assert_eq!(result, Err(EmptyDomain));
        assert_eq!(assignments.get_lower_bound(domain), 0);
    }

    #[test]
    fn graph_created_at_a_checkpoint_can_be_restored_to_it() {
        let (mut assignments, mut notification_engine) = setup();
        assignments.new_checkpoint();

        let graph = assignments
            .grow_graph(Graph::new(3, false), Graph::complete(3, false))
            .expect("valid graph");
        notification_engine.grow_graph();

        assignments.new_checkpoint();
        let _ = assignments.enforce_arc(graph, 0, 1, None, &mut notification_engine);
        assignments.synchronise(1);

        assert!(!assignments.graph_domain(graph).is_mandatory_arc(0, 1));
        assert!(notification_engine.has_pending_events());
    }
}
