use super::Membership;
use super::combine;
use super::fix_literal;
use super::literal_membership;
use crate::basic_types::PropagationStatusCP;
use crate::graph::GraphDomain;
use crate::graph::IncidentSet;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;
use crate::variables::Literal;

/// `literals[i][j]` is true if and only if `j` is in the incident set of `i` in the final graph:
/// the arc `(i, j)` for successors, `(j, i)` for predecessors.
#[derive(Clone, Debug)]
pub struct NeighborBoolsChannelArgs {
    pub graph: GraphVariable,
    pub incident_set: IncidentSet,
    pub literals: Vec<Vec<Literal>>,
}

impl PropagatorConstructor for NeighborBoolsChannelArgs {
    type PropagatorImpl = NeighborBoolsChannelPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let num_nodes = context.graph_domain(self.graph).num_nodes();
        pumpkin_assert_simple!(
            self.literals.len() == num_nodes
                && self.literals.iter().all(|row| row.len() == num_nodes),
            "a square matrix of literals is required"
        );
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        for (index, &literal) in self.literals.iter().flatten().enumerate() {
            context.register(literal, DomainEvents::ANY_INT, LocalId::from(index as u32 + 1));
        }

        NeighborBoolsChannelPropagator {
            graph: self.graph,
            incident_set: self.incident_set,
            literals: self.literals,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NeighborBoolsChannelPropagator {
    graph: GraphVariable,
    incident_set: IncidentSet,
    literals: Vec<Vec<Literal>>,
}

impl NeighborBoolsChannelPropagator {
    fn membership(&self, domain: &GraphDomain, node: usize, other: usize) -> Membership {
        Membership::of(
            self.incident_set.mandatory_set(domain, node).contains(other),
            self.incident_set.potential_set(domain, node).contains(other),
        )
    }
}

impl Propagator for NeighborBoolsChannelPropagator {
    fn name(&self) -> &str {
        "NeighborBoolsChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for node in 0..self.literals.len() {
            for other in 0..self.literals.len() {
                let literal = self.literals[node][other];
                match context.literal_value(literal) {
                    Some(true) => {
                        let _ = self
                            .incident_set
                            .enforce(&mut context, self.graph, node, other)?;
                    }
                    Some(false) => {
                        let _ = self
                            .incident_set
                            .remove(&mut context, self.graph, node, other)?;
                    }
                    None => {
                        let membership =
                            self.membership(context.graph_domain(self.graph), node, other);
                        fix_literal(&mut context, literal, membership)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        combine(self.literals.iter().enumerate().flat_map(|(node, row)| {
            row.iter().enumerate().map(move |(other, &literal)| (node, other, literal))
        }).map(|(node, other, literal)| {
            self.membership(domain, node, other)
                .entailment(literal_membership(&domains, literal))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    fn literal_matrix(state: &mut State, num_nodes: usize) -> Vec<Vec<Literal>> {
        (0..num_nodes)
            .map(|_| (0..num_nodes).map(|_| state.new_literal()).collect())
            .collect()
    }

    #[test]
    fn predecessor_literals_follow_incoming_arcs() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let literals = literal_matrix(&mut state, 3);
        let _ = state.add_propagator(NeighborBoolsChannelArgs {
            graph,
            incident_set: IncidentSet::PredOrNeigh,
            literals: literals.clone(),
        });
        state.propagate_to_fixed_point().expect("no conflict");

        // Loops are absent from the complete envelope.
        assert_eq!(state.literal_value(literals[1][1]), Some(false));

        let _ = state.enforce_arc(graph, 0, 2).expect("potential arc");
        let _ = state.set_literal(literals[0][1], true).expect("unassigned");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.literal_value(literals[2][0]), Some(true));
        assert_eq!(state.literal_value(literals[0][2]), None);
        assert!(state.graph_domain(graph).is_mandatory_arc(1, 0));
    }

    #[test]
    fn undirected_literals_are_symmetric() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, false), Graph::complete(3, false))
            .expect("valid domain");
        let literals = literal_matrix(&mut state, 3);
        let _ = state.add_propagator(NeighborBoolsChannelArgs {
            graph,
            incident_set: IncidentSet::SuccOrNeigh,
            literals: literals.clone(),
        });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.set_literal(literals[1][2], false).expect("unassigned");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.literal_value(literals[2][1]), Some(false));
    }
}
