//! The state of the solver: the domains of all variables, the propagators, and the machinery to
//! propagate them to a fixed point and to backtrack.
mod assignments;
pub(crate) mod notifications;
mod propagator_queue;
mod set_domain;
mod state;
mod trailed;

pub use assignments::Assignments;
pub use assignments::EmptyDomain;
pub(crate) use propagator_queue::PropagatorQueue;
pub use set_domain::SetDomain;
pub use state::Conflict;
pub use state::State;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
