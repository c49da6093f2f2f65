use super::GraphDomain;
use crate::containers::SparseSet;
use crate::engine::EmptyDomain;
use crate::propagation::PropagationContext;
use crate::variables::GraphVariable;

/// Which side of a node is considered when reasoning about its incident arcs.
///
/// For undirected graphs both variants address the neighbours of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentSet {
    /// The successors of the node (neighbours when undirected).
    SuccOrNeigh,
    /// The predecessors of the node (neighbours when undirected).
    PredOrNeigh,
}

impl IncidentSet {
    /// The incident nodes of `node` in the kernel.
    pub fn mandatory_set<'a>(&self, domain: &'a GraphDomain, node: usize) -> &'a SparseSet {
        match self {
            IncidentSet::SuccOrNeigh => domain.mandatory_successors_of(node),
            IncidentSet::PredOrNeigh => domain.mandatory_predecessors_of(node),
        }
    }

    /// The incident nodes of `node` in the envelope.
    pub fn potential_set<'a>(&self, domain: &'a GraphDomain, node: usize) -> &'a SparseSet {
        match self {
            IncidentSet::SuccOrNeigh => domain.potential_successors_of(node),
            IncidentSet::PredOrNeigh => domain.potential_predecessors_of(node),
        }
    }

    /// The arc connecting `node` with the incident node `other`.
    pub fn arc(&self, node: usize, other: usize) -> (usize, usize) {
        match self {
            IncidentSet::SuccOrNeigh => (node, other),
            IncidentSet::PredOrNeigh => (other, node),
        }
    }

    /// The endpoint of `arc` whose incident set contains the other endpoint.
    pub fn owner(&self, arc: (usize, usize)) -> usize {
        match self {
            IncidentSet::SuccOrNeigh => arc.0,
            IncidentSet::PredOrNeigh => arc.1,
        }
    }

    pub fn enforce(
        &self,
        context: &mut PropagationContext,
        graph: GraphVariable,
        node: usize,
        other: usize,
    ) -> Result<bool, EmptyDomain> {
        let (from, to) = self.arc(node, other);
        context.enforce_arc(graph, from, to)
    }

    pub fn remove(
        &self,
        context: &mut PropagationContext,
        graph: GraphVariable,
        node: usize,
        other: usize,
    ) -> Result<bool, EmptyDomain> {
        let (from, to) = self.arc(node, other);
        context.remove_arc(graph, from, to)
    }
}
