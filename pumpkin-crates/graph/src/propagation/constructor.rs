use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::Assignments;
use crate::engine::State;
use crate::engine::TrailedValues;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;
use crate::propagation::HasAssignments;
use crate::propagation::HasTrailedValues;
use crate::variables::Watchable;

/// Turns the arguments of a constraint into a [`Propagator`], which is then owned by the
/// [`State`].
///
/// While creating the propagator, the constructor subscribes it to the events of its variables
/// and allocates its trailed state, such as a
/// [`GraphDeltaMonitor`](crate::graph::GraphDeltaMonitor).
pub trait PropagatorConstructor {
    type PropagatorImpl: Propagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// Gives a [`PropagatorConstructor`] access to the [`State`] while the propagator is built.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    propagator_id: PropagatorId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
        }
    }

    /// The domains at the moment the propagator is posted.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.state.assignments, &self.state.trailed_values)
    }

    /// The id the propagator will receive once it is stored.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Calls [`Propagator::notify`] with `local_id` whenever one of `events` happens on `var`.
    ///
    /// A propagator should give each of its variables a distinct [`LocalId`].
    pub fn register(&mut self, var: impl Watchable, events: DomainEvents, local_id: LocalId) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };
        let mut watchers = Watchers::new(propagator_var, &mut self.state.notification_engine);
        var.watch_all(&mut watchers, events);
    }
}

mod private {
    use super::*;

    impl HasAssignments for PropagatorConstructorContext<'_> {
        fn assignments(&self) -> &Assignments {
            &self.state.assignments
        }

        fn trailed_values(&self) -> &TrailedValues {
            &self.state.trailed_values
        }
    }

    impl HasTrailedValues for PropagatorConstructorContext<'_> {
        fn trailed_values_mut(&mut self) -> &mut TrailedValues {
            &mut self.state.trailed_values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ManipulateTrailedValues;
    use crate::propagation::ReadDomains;

    #[test]
    fn constructors_see_the_posting_state() {
        let mut state = State::default();
        let x = state.new_interval_variable(2, 10);

        let mut context = PropagatorConstructorContext::new(PropagatorId(3), &mut state);
        let counter = context.new_trailed_integer(5);

        assert_eq!(context.propagator_id(), PropagatorId(3));
        assert_eq!(context.domains().lower_bound(x), 2);
        assert_eq!(context.domains().upper_bound(x), 10);
        assert_eq!(state.trailed_values.read(counter), 5);
    }
}
