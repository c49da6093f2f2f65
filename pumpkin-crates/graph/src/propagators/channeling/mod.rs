//! Propagators which keep Boolean and set variables in line with the kernel and envelope of a
//! graph variable. Each one copies membership both ways: a fixed literal or a set value decides
//! the corresponding node or arc, and a decided node or arc fixes the literal or set value.
mod arc_bool;
mod neighbor_bools;
mod neighbor_set;
mod node_bools;
mod node_set;

pub use arc_bool::ArcBoolChannelArgs;
pub use arc_bool::ArcBoolChannelPropagator;
pub use neighbor_bools::NeighborBoolsChannelArgs;
pub use neighbor_bools::NeighborBoolsChannelPropagator;
pub use neighbor_set::NeighborSetChannelArgs;
pub use neighbor_set::NeighborSetChannelPropagator;
pub use node_bools::NodeBoolsChannelArgs;
pub use node_bools::NodeBoolsChannelPropagator;
pub use node_set::NodeSetChannelArgs;
pub use node_set::NodeSetChannelPropagator;

use crate::engine::EmptyDomain;
use crate::engine::SetDomain;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;
use crate::variables::Literal;

/// Whether an element (node, arc or set value) is decided in a kernel/envelope domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Membership {
    Mandatory,
    Optional,
    Absent,
}

impl Membership {
    fn of(mandatory: bool, potential: bool) -> Membership {
        if mandatory {
            Membership::Mandatory
        } else if potential {
            Membership::Optional
        } else {
            Membership::Absent
        }
    }

    fn of_value(domain: &SetDomain, value: usize) -> Membership {
        Membership::of(domain.kernel().contains(value), domain.envelope().contains(value))
    }

    /// The truth value this membership implies, if it is decided.
    fn decided(self) -> Option<bool> {
        match self {
            Membership::Mandatory => Some(true),
            Membership::Optional => None,
            Membership::Absent => Some(false),
        }
    }

    /// Compares two views of the same element.
    fn entailment(self, other: Membership) -> Entailment {
        match (self.decided(), other.decided()) {
            (Some(left), Some(right)) if left != right => Entailment::False,
            (Some(_), Some(_)) => Entailment::True,
            _ => Entailment::Undefined,
        }
    }
}

/// Fixes `literal` to the decided membership of its element.
fn fix_literal(
    context: &mut PropagationContext,
    literal: Literal,
    membership: Membership,
) -> Result<(), EmptyDomain> {
    if let Some(value) = membership.decided() {
        let _ = context.assign_literal(literal, value)?;
    }
    Ok(())
}

/// The membership a literal expresses.
fn literal_membership(domains: &Domains, literal: Literal) -> Membership {
    match domains.literal_value(literal) {
        Some(true) => Membership::Mandatory,
        Some(false) => Membership::Absent,
        None => Membership::Optional,
    }
}

/// Combines the entailment of independent elements.
fn combine(statuses: impl IntoIterator<Item = Entailment>) -> Entailment {
    let mut result = Entailment::True;
    for status in statuses {
        match status {
            Entailment::False => return Entailment::False,
            Entailment::Undefined => result = Entailment::Undefined,
            Entailment::True => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_views_are_not_entailed() {
        assert_eq!(
            Membership::Mandatory.entailment(Membership::Absent),
            Entailment::False
        );
        assert_eq!(
            Membership::Absent.entailment(Membership::Absent),
            Entailment::True
        );
        assert_eq!(
            Membership::Optional.entailment(Membership::Mandatory),
            Entailment::Undefined
        );
    }

    #[test]
    fn one_violated_element_falsifies_the_whole() {
        assert_eq!(
            combine([Entailment::True, Entailment::Undefined]),
            Entailment::Undefined
        );
        assert_eq!(
            combine([Entailment::Undefined, Entailment::False]),
            Entailment::False
        );
        assert_eq!(combine([]), Entailment::True);
    }
}
