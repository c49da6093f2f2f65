//! Bounds on the number of arcs incident to every node.
//!
//! [`NodeDegreeAtLeastArgs`] and [`NodeDegreeAtMostArgs`] bound the degrees by constants, either
//! re-checking every node on each call ([`DegreePropagation::Coarse`]) or only the nodes touched
//! by the changes since the previous call ([`DegreePropagation::Incremental`]).
//! [`NodeDegreeVariableArgs`] ties the degree of every node to an integer variable.
mod at_least;
mod at_most;
mod variable;

pub use at_least::NodeDegreeAtLeastArgs;
pub use at_least::NodeDegreeAtLeastPropagator;
pub use at_most::NodeDegreeAtMostArgs;
pub use at_most::NodeDegreeAtMostPropagator;
pub use variable::NodeDegreeVariableArgs;
pub use variable::NodeDegreeVariablePropagator;

use crate::graph::IncidentSet;

/// How the constant degree propagators find the nodes to filter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DegreePropagation {
    /// Every potential node is checked on every call.
    Coarse,
    /// Only the nodes affected by the changes since the last call are checked.
    #[default]
    Incremental,
}

/// The nodes whose incident set changes when `arc` is enforced or removed.
fn affected_nodes(
    incident_set: IncidentSet,
    directed: bool,
    arc: (usize, usize),
) -> impl Iterator<Item = usize> {
    let owner = incident_set.owner(arc);
    let other = if owner == arc.0 { arc.1 } else { arc.0 };
    std::iter::once(owner).chain((!directed && other != owner).then_some(other))
}
