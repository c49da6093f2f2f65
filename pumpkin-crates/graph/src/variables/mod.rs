//! The variables the graph propagators operate on.
mod domain_id;
mod graph_variable;
mod literal;
mod set_variable;

pub use domain_id::DomainId;
pub use graph_variable::GraphVariable;
pub use literal::Literal;
pub use set_variable::SetVariable;

use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;

/// A variable which propagators can subscribe to.
pub trait Watchable: Copy + std::fmt::Debug {
    /// Subscribe the propagator behind `watchers` to the given events of this variable.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: DomainEvents);
}
