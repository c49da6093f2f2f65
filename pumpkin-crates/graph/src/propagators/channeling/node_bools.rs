use super::Membership;
use super::combine;
use super::fix_literal;
use super::literal_membership;
use crate::basic_types::PropagationStatusCP;
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

/// `node_literals[i]` is true if and only if node `i` is part of the final graph.
#[derive(Clone, Debug)]
pub struct NodeBoolsChannelArgs {
    pub graph: GraphVariable,
    pub node_literals: Vec<Literal>,
}

impl PropagatorConstructor for NodeBoolsChannelArgs {
    type PropagatorImpl = NodeBoolsChannelPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            self.node_literals.len() == context.graph_domain(self.graph).num_nodes(),
            "one literal per node is required"
        );
        context.register(self.graph, DomainEvents::NODES, LocalId::from(0));
        for (index, &literal) in self.node_literals.iter().enumerate() {
            context.register(literal, DomainEvents::ANY_INT, LocalId::from(index as u32 + 1));
        }

        NodeBoolsChannelPropagator {
            graph: self.graph,
            node_literals: self.node_literals.into_boxed_slice(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeBoolsChannelPropagator {
    graph: GraphVariable,
    node_literals: Box<[Literal]>,
}

impl Propagator for NodeBoolsChannelPropagator {
    fn name(&self) -> &str {
        "NodeBoolsChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for (node, &literal) in self.node_literals.iter().enumerate() {
            match context.literal_value(literal) {
                Some(true) => {
                    let _ = context.enforce_node(self.graph, node)?;
                }
                Some(false) => {
                    let _ = context.remove_node(self.graph, node)?;
                }
                None => {
                    let domain = context.graph_domain(self.graph);
                    let membership = Membership::of(
                        domain.is_mandatory_node(node),
                        domain.is_potential_node(node),
                    );
                    fix_literal(&mut context, literal, membership)?;
                }
            }
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        combine(self.node_literals.iter().enumerate().map(|(node, &literal)| {
            Membership::of(domain.is_mandatory_node(node), domain.is_potential_node(node))
                .entailment(literal_membership(&domains, literal))
        }))
    }
}
