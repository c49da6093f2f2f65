use downcast_rs::Downcast;
use downcast_rs::impl_downcast;
use enum_map::Enum;

use super::Domains;
use super::LocalId;
use super::NotificationContext;
use super::PropagationContext;
use crate::basic_types::PropagationStatusCP;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::notifications::DomainEvent;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
use crate::statistics::StatisticLogger;

// We need this to cast from `Box<dyn Propagator>` to a concrete propagator; rust inherently does
// not allow downcasting from the trait definition to its concrete type.
impl_downcast!(Propagator);

/// All propagators implement the [`Propagator`] trait.
///
/// A propagator is created by a [`PropagatorConstructor`], which registers the variables and
/// events the propagator is interested in. Afterwards the state calls [`Propagator::notify`] for
/// every subscribed event, and [`Propagator::propagate`] when the propagator is popped from the
/// queue.
///
/// Propagators which need to backtrack their internal state either keep that state in trailed
/// integers, or rebuild it in [`Propagator::synchronise`].
pub trait Propagator: Downcast {
    /// Return the name of the propagator, this is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Propagate the current domains.
    ///
    /// Returns `Ok(())` when no conflict was detected; any deduction which would empty a domain
    /// is reported as an [`Inconsistency`].
    ///
    /// [`Inconsistency`]: crate::basic_types::Inconsistency
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP;

    /// Called when an event happens to one of the variables the propagator is subscribed to. It
    /// indicates whether the provided event should cause the propagator to be enqueued.
    ///
    /// The [`LocalId`] is the one the variable was registered with.
    fn notify(
        &mut self,
        _context: NotificationContext,
        _local_id: LocalId,
        _event: DomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to update its internal data structures
    /// given the new variable domains.
    fn synchronise(&mut self, _domains: Domains) {}

    /// Returns the priority of the propagator represented as an integer. Lower values mean higher
    /// priority and the priority determines the order in which propagators will be asked to
    /// propagate.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Whether the constraint is satisfied by every completion of the current domains
    /// ([`Entailment::True`]), violated by every completion ([`Entailment::False`]), or neither.
    ///
    /// Propagators which return [`Entailment::Undefined`] unconditionally only filter, and cannot
    /// be reified.
    fn is_entailed(&self, _domains: Domains) -> Entailment {
        Entailment::Undefined
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The entailment status of a constraint with respect to the current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    True,
    False,
    Undefined,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority. Within
/// a priority, propagators are called in the order in which they were enqueued.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, Enum)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        ((*self) as u8).partial_cmp(&((*other) as u8))
    }
}
