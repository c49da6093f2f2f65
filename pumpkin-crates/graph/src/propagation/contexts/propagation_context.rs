use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::SetDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::engine::notifications::NotificationEngine;
use crate::graph::GraphDomain;
use crate::propagation::Domains;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorId;
use crate::variables::DomainId;
use crate::variables::GraphVariable;
use crate::variables::Literal;
use crate::variables::SetVariable;

/// Provided to the propagator when it is notified of a domain event.
///
/// The domains can be read, and trailed values can be modified, but domains cannot be changed.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    pub(crate) trailed_values: &'a mut TrailedValues,
    pub(crate) assignments: &'a Assignments,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(trailed_values: &'a mut TrailedValues, assignments: &'a Assignments) -> Self {
        Self {
            trailed_values,
            assignments,
        }
    }

    /// Get the current domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }
}

/// Provided to the propagator when it is called to propagate.
///
/// It is used to read the domains and trailed values, and to change domains. Every change made
/// through the context is attributed to the propagator owning it.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) trailed_values: &'a mut TrailedValues,
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) notification_engine: &'a mut NotificationEngine,
    pub(crate) propagator_id: PropagatorId,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        trailed_values: &'a mut TrailedValues,
        assignments: &'a mut Assignments,
        notification_engine: &'a mut NotificationEngine,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagationContext {
            trailed_values,
            assignments,
            notification_engine,
            propagator_id,
        }
    }

    /// Get the current domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    /// Reborrow the current context to a new value with a shorter lifetime. Should be used when
    /// passing `Self` to another function that takes ownership, but the value is still needed
    /// afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            trailed_values: self.trailed_values,
            assignments: self.assignments,
            notification_engine: self.notification_engine,
            propagator_id: self.propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}

/// Integer and Boolean domain changes.
impl PropagationContext<'_> {
    pub fn set_lower_bound(&mut self, var: DomainId, bound: i32) -> Result<bool, EmptyDomain> {
        self.assignments
            .tighten_lower_bound(var, bound, self.notification_engine)
    }

    pub fn set_upper_bound(&mut self, var: DomainId, bound: i32) -> Result<bool, EmptyDomain> {
        self.assignments
            .tighten_upper_bound(var, bound, self.notification_engine)
    }

    /// Fixes the literal to the provided truth value.
    pub fn assign_literal(&mut self, literal: Literal, value: bool) -> Result<bool, EmptyDomain> {
        if value {
            self.set_lower_bound(literal.get_domain(), 1)
        } else {
            self.set_upper_bound(literal.get_domain(), 0)
        }
    }
}

/// Set domain changes.
impl PropagationContext<'_> {
    pub fn enforce_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .enforce_set_value(set, value, self.notification_engine)
    }

    pub fn remove_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .remove_set_value(set, value, self.notification_engine)
    }
}

/// Graph domain changes.
impl PropagationContext<'_> {
    pub fn enforce_node(&mut self, graph: GraphVariable, node: usize) -> Result<bool, EmptyDomain> {
        self.assignments.enforce_node(
            graph,
            node,
            Some(self.propagator_id),
            self.notification_engine,
        )
    }

    pub fn remove_node(&mut self, graph: GraphVariable, node: usize) -> Result<bool, EmptyDomain> {
        self.assignments.remove_node(
            graph,
            node,
            Some(self.propagator_id),
            self.notification_engine,
        )
    }

    pub fn enforce_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments.enforce_arc(
            graph,
            from,
            to,
            Some(self.propagator_id),
            self.notification_engine,
        )
    }

    pub fn remove_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments.remove_arc(
            graph,
            from,
            to,
            Some(self.propagator_id),
            self.notification_engine,
        )
    }
}

/// A trait which defines common methods for retrieving the [`Assignments`] and the
/// [`TrailedValues`] from the structure which implements this trait.
pub trait HasAssignments {
    /// Returns the stored [`Assignments`].
    fn assignments(&self) -> &Assignments;

    /// Returns the stored [`TrailedValues`].
    fn trailed_values(&self) -> &TrailedValues;
}

/// Structures which can modify the [`TrailedValues`].
pub trait HasTrailedValues: HasAssignments {
    fn trailed_values_mut(&mut self) -> &mut TrailedValues;
}

mod private {
    use super::*;

    impl HasAssignments for NotificationContext<'_> {
        fn assignments(&self) -> &Assignments {
            self.assignments
        }

        fn trailed_values(&self) -> &TrailedValues {
            self.trailed_values
        }
    }

    impl HasTrailedValues for NotificationContext<'_> {
        fn trailed_values_mut(&mut self) -> &mut TrailedValues {
            self.trailed_values
        }
    }

    impl HasAssignments for PropagationContext<'_> {
        fn assignments(&self) -> &Assignments {
            self.assignments
        }

        fn trailed_values(&self) -> &TrailedValues {
            self.trailed_values
        }
    }

    impl HasTrailedValues for PropagationContext<'_> {
        fn trailed_values_mut(&mut self) -> &mut TrailedValues {
            self.trailed_values
        }
    }
}

/// Creation and modification of [`TrailedInteger`]s.
pub trait ManipulateTrailedValues: HasTrailedValues {
    fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values_mut().grow(initial_value)
    }

    fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values_mut()
            .add_assign(trailed_integer, addition);
    }

    fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values_mut().assign(trailed_integer, value);
    }
}

impl<T: HasTrailedValues> ManipulateTrailedValues for T {}

/// Read access to the domains of all variable kinds.
pub trait ReadDomains: HasAssignments {
    fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_lower_bound(var)
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_upper_bound(var)
    }

    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments().is_fixed(var)
    }

    /// The truth value of the literal, or [`None`] if it is unassigned.
    fn literal_value(&self, literal: Literal) -> Option<bool> {
        let domain = literal.get_domain();
        if !self.is_fixed(domain) {
            None
        } else {
            Some(self.lower_bound(domain) == 1)
        }
    }

    fn set_domain(&self, set: SetVariable) -> &SetDomain {
        self.assignments().set_domain(set)
    }

    fn graph_domain(&self, graph: GraphVariable) -> &GraphDomain {
        self.assignments().graph_domain(graph)
    }

    fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values().read(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}
