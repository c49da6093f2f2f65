use log::trace;
use thiserror::Error;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::create_statistics_struct;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::PropagatorQueue;
use crate::engine::SetDomain;
use crate::engine::TrailedValues;
use crate::engine::notifications::NotificationEngine;
use crate::graph::Graph;
use crate::graph::GraphDomain;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::store::PropagatorStore;
use crate::pumpkin_assert_eq_simple;
use crate::pumpkin_assert_simple;
use crate::statistics::StatisticLogger;
use crate::statistics::log_statistic;
use crate::variables::DomainId;
use crate::variables::GraphVariable;
use crate::variables::Literal;
use crate::variables::SetVariable;

/// The [`State`] is the container of variables and propagators.
///
/// It provides the operations a search procedure needs: creating variables, adding propagators,
/// making decisions, creating checkpoints, restoring to them, and propagating to a fixed point.
#[derive(Debug, Default)]
pub struct State {
    /// The list of propagators; propagators live here and are queried when events (domain changes)
    /// happen.
    pub(crate) propagators: PropagatorStore,
    /// The domains of all variables.
    pub(crate) assignments: Assignments,
    /// Keep track of trailed values (i.e. values which automatically backtrack).
    pub(crate) trailed_values: TrailedValues,
    /// Dictates the order in which propagators will be called to propagate.
    pub(crate) propagator_queue: PropagatorQueue,
    /// Component responsible for providing notifications for changes to the domains of variables.
    pub(crate) notification_engine: NotificationEngine,

    statistics: StateStatistics,
}

create_statistics_struct!(StateStatistics {
    num_propagators_called: usize,
    num_conflicts: usize,
    num_checkpoints: usize,
    num_restores: usize,
});

/// The conflict returned by [`State::propagate_to_fixed_point`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{propagator} failed: {inconsistency}")]
pub struct Conflict {
    /// The propagator which detected the conflict.
    pub propagator: PropagatorId,
    /// What went wrong.
    pub inconsistency: Inconsistency,
}

impl State {
    /// Logs the counters of the state; if `verbose` is true the statistics of every propagator are
    /// logged as well.
    pub fn log_statistics(&self, verbose: bool) {
        log_statistic("variables", self.assignments.num_domains());
        log_statistic("propagators", self.propagators.num_propagators());
        log_statistic("failures", self.statistics.num_conflicts);
        log_statistic("propagations", self.statistics.num_propagators_called);
        if verbose {
            log_statistic("checkpoints", self.statistics.num_checkpoints);
            log_statistic("restores", self.statistics.num_restores);
            for (index, propagator) in self.propagators.iter_propagators().enumerate() {
                propagator.log_statistics(StatisticLogger::new([
                    propagator.name(),
                    "number",
                    index.to_string().as_str(),
                ]));
            }
        }
    }
}

/// Operations to create variables.
///
/// Creation of variables is not influenced by the current checkpoint of the state. If a variable
/// is created at a non-zero checkpoint, then it will _not_ 'disappear' when backtracking past the
/// checkpoint where it was created.
impl State {
    /// Creates a new interval variable with the given lower and upper bound.
    pub fn new_interval_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let domain_id = self.assignments.grow_int(lower_bound, upper_bound);
        self.notification_engine.grow_int();
        domain_id
    }

    /// Creates a new Boolean (0-1) variable.
    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_interval_variable(0, 1))
    }

    /// Creates a set variable over the universe `0..universe`.
    pub fn new_set_variable(
        &mut self,
        universe: usize,
        kernel: &[usize],
        envelope: &[usize],
    ) -> Result<SetVariable, ConstraintOperationError> {
        let set = self.assignments.grow_set(universe, kernel, envelope)?;
        self.notification_engine.grow_set();
        Ok(set)
    }

    /// Creates a graph variable with the given kernel and envelope.
    ///
    /// Both graphs should be over the same number of nodes, have the same orientation, and the
    /// kernel should be a subgraph of the envelope.
    pub fn new_graph_variable(
        &mut self,
        kernel: Graph,
        envelope: Graph,
    ) -> Result<GraphVariable, ConstraintOperationError> {
        let graph = self.assignments.grow_graph(kernel, envelope)?;
        self.notification_engine.grow_graph();
        Ok(graph)
    }
}

/// Operations to retrieve information about values.
impl State {
    /// Returns the lower-bound of the given `variable`.
    pub fn lower_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_lower_bound(variable)
    }

    /// Returns the upper-bound of the given `variable`.
    pub fn upper_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_upper_bound(variable)
    }

    /// If the given `variable` is fixed, then [`Some`] containing the assigned value is
    /// returned. Otherwise, [`None`] is returned.
    pub fn fixed_value(&self, variable: DomainId) -> Option<i32> {
        self.assignments
            .is_fixed(variable)
            .then(|| self.lower_bound(variable))
    }

    /// Returns the truth value of the provided [`Literal`], or [`None`] if it is unassigned.
    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.fixed_value(literal.get_domain()).map(|value| value == 1)
    }

    pub fn set_domain(&self, set: SetVariable) -> &SetDomain {
        self.assignments.set_domain(set)
    }

    pub fn graph_domain(&self, graph: GraphVariable) -> &GraphDomain {
        self.assignments.graph_domain(graph)
    }

    /// A read-only view of all domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.trailed_values)
    }

    /// Returns the number of created checkpoints.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }
}

/// Operations for adding and retrieving propagators.
impl State {
    /// Add a new propagator to the [`State`]. The constructor for that propagator should
    /// subscribe to the appropriate domain events so that the propagator is called when
    /// necessary.
    ///
    /// While the propagator is added to the queue for propagation, this function does _not_
    /// trigger a round of propagation. An explicit call to [`State::propagate_to_fixed_point`] is
    /// necessary to run the new propagator for the first time.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let expected_handle: PropagatorHandle<Constructor::PropagatorImpl> =
            self.propagators.next_handle();
        let constructor_context =
            PropagatorConstructorContext::new(expected_handle.propagator_id(), self);
        let propagator = constructor.create(constructor_context);
        let priority = propagator.priority();

        let handle = self.propagators.insert(propagator);
        pumpkin_assert_eq_simple!(handle.propagator_id(), expected_handle.propagator_id());

        self.propagator_queue
            .enqueue_propagator(handle.propagator_id(), priority);

        handle
    }

    /// Get a reference to the propagator identified by the given handle.
    ///
    /// For an exclusive reference, use [`State::get_propagator_mut`].
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    /// The entailment status of the constraint behind the given propagator.
    pub fn is_entailed<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Entailment {
        self.propagators[handle.propagator_id()].is_entailed(self.domains())
    }
}

/// Decisions.
///
/// Each decision returns `true` if a domain changed, and `false` if it was already implied. If a
/// domain would become empty, an [`EmptyDomain`] error is returned.
///
/// Decisions do _not_ perform any propagation; for that an explicit call to
/// [`State::propagate_to_fixed_point`] is required. A call to [`State::restore_to`] that goes past
/// the checkpoint at which a decision was made undoes it.
impl State {
    pub fn enforce_node(&mut self, graph: GraphVariable, node: usize) -> Result<bool, EmptyDomain> {
        self.assignments
            .enforce_node(graph, node, None, &mut self.notification_engine)
    }

    pub fn remove_node(&mut self, graph: GraphVariable, node: usize) -> Result<bool, EmptyDomain> {
        self.assignments
            .remove_node(graph, node, None, &mut self.notification_engine)
    }

    pub fn enforce_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .enforce_arc(graph, from, to, None, &mut self.notification_engine)
    }

    pub fn remove_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .remove_arc(graph, from, to, None, &mut self.notification_engine)
    }

    pub fn post_lower_bound(
        &mut self,
        variable: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .tighten_lower_bound(variable, bound, &mut self.notification_engine)
    }

    pub fn post_upper_bound(
        &mut self,
        variable: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .tighten_upper_bound(variable, bound, &mut self.notification_engine)
    }

    pub fn set_literal(&mut self, literal: Literal, value: bool) -> Result<bool, EmptyDomain> {
        if value {
            self.post_lower_bound(literal.get_domain(), 1)
        } else {
            self.post_upper_bound(literal.get_domain(), 0)
        }
    }

    pub fn enforce_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .enforce_set_value(set, value, &mut self.notification_engine)
    }

    pub fn remove_set_value(
        &mut self,
        set: SetVariable,
        value: usize,
    ) -> Result<bool, EmptyDomain> {
        self.assignments
            .remove_set_value(set, value, &mut self.notification_engine)
    }
}

/// Checkpoints and propagation.
impl State {
    /// Create a checkpoint of the current [`State`], that can be returned to with
    /// [`State::restore_to`].
    ///
    /// If the state is not at fixed-point, then this method will panic.
    pub fn new_checkpoint(&mut self) {
        pumpkin_assert_simple!(
            self.propagator_queue.is_empty(),
            "Can only create a new checkpoint when all propagation has occurred"
        );
        self.statistics.num_checkpoints += 1;
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    /// Restore to the given checkpoint.
    ///
    /// If the provided checkpoint is equal to the current checkpoint, this is a no-op. If
    /// the provided checkpoint is larger than the current checkpoint, this method will
    /// panic.
    pub fn restore_to(&mut self, checkpoint: usize) {
        pumpkin_assert_simple!(checkpoint <= self.get_checkpoint());

        if checkpoint == self.get_checkpoint() {
            self.propagator_queue.clear();
            self.notification_engine.clear_events();
            return;
        }

        self.statistics.num_restores += 1;
        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);

        self.propagator_queue.clear();
        self.notification_engine.clear_events();

        for propagator in self.propagators.iter_propagators_mut() {
            let domains = Domains::new(&self.assignments, &self.trailed_values);
            propagator.synchronise(domains);
        }
    }

    /// Performs a single call to [`Propagator::propagate`] for the propagator with the provided
    /// [`PropagatorId`], and notifies the propagators watching the changes it made.
    fn propagate(&mut self, propagator_id: PropagatorId) -> Result<(), Conflict> {
        self.statistics.num_propagators_called += 1;

        let propagation_status = {
            let propagator = &mut self.propagators[propagator_id];
            let context = PropagationContext::new(
                &mut self.trailed_values,
                &mut self.assignments,
                &mut self.notification_engine,
                propagator_id,
            );
            propagator.propagate(context)
        };

        match propagation_status {
            Ok(()) => {
                self.notification_engine
                    .notify_propagators_about_domain_events(
                        &self.assignments,
                        &mut self.trailed_values,
                        &mut self.propagators,
                        &mut self.propagator_queue,
                    );
                Ok(())
            }
            Err(inconsistency) => {
                self.statistics.num_conflicts += 1;
                trace!(
                    "{} ({propagator_id}) detected a conflict: {inconsistency}",
                    self.propagators[propagator_id].name()
                );
                Err(Conflict {
                    propagator: propagator_id,
                    inconsistency,
                })
            }
        }
    }

    /// Performs fixed-point propagation using the propagators defined in the [`State`].
    ///
    /// The decisions and added propagators cause propagators to be enqueued when the events that
    /// they have subscribed to are triggered. As propagation causes more changes to be made, more
    /// propagators are enqueued. This continues until applying all (enqueued) propagators leads to
    /// no more domain changes.
    ///
    /// Once the [`State`] is conflicting, then the only operation that is defined is
    /// [`State::restore_to`]. All other operations and queries on the state are unspecified.
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Conflict> {
        // The initial domain events are due to the decisions.
        self.notification_engine
            .notify_propagators_about_domain_events(
                &self.assignments,
                &mut self.trailed_values,
                &mut self.propagators,
                &mut self.propagator_queue,
            );

        while let Some(propagator_id) = self.propagator_queue.pop() {
            self.propagate(propagator_id)?;
        }

        Ok(())
    }
}
