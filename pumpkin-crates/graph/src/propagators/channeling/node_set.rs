use super::Membership;
use super::combine;
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
use crate::variables::SetVariable;

/// The set variable `nodes` equals the node set of the final graph.
#[derive(Clone, Copy, Debug)]
pub struct NodeSetChannelArgs {
    pub graph: GraphVariable,
    pub nodes: SetVariable,
}

impl PropagatorConstructor for NodeSetChannelArgs {
    type PropagatorImpl = NodeSetChannelPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            context.set_domain(self.nodes).universe()
                == context.graph_domain(self.graph).num_nodes(),
            "the set ranges over the nodes of the graph"
        );
        context.register(self.graph, DomainEvents::NODES, LocalId::from(0));
        context.register(self.nodes, DomainEvents::ANY_SET, LocalId::from(1));
        NodeSetChannelPropagator {
            graph: self.graph,
            nodes: self.nodes,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeSetChannelPropagator {
    graph: GraphVariable,
    nodes: SetVariable,
}

impl Propagator for NodeSetChannelPropagator {
    fn name(&self) -> &str {
        "NodeSetChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let set = context.set_domain(self.nodes);
        let graph = context.graph_domain(self.graph);

        let to_enforce = set
            .kernel()
            .iter()
            .filter(|&node| !graph.is_mandatory_node(node))
            .collect::<Vec<_>>();
        let to_remove = graph
            .potential_nodes()
            .iter()
            .filter(|&node| !set.envelope().contains(node))
            .collect::<Vec<_>>();
        let values_to_enforce = graph
            .mandatory_nodes()
            .iter()
            .filter(|&node| !set.kernel().contains(node))
            .collect::<Vec<_>>();
        let values_to_remove = set
            .envelope()
            .iter()
            .filter(|&node| !graph.is_potential_node(node))
            .collect::<Vec<_>>();

        for node in to_enforce {
            let _ = context.enforce_node(self.graph, node)?;
        }
        for node in to_remove {
            let _ = context.remove_node(self.graph, node)?;
        }
        for node in values_to_enforce {
            let _ = context.enforce_set_value(self.nodes, node)?;
        }
        for node in values_to_remove {
            let _ = context.remove_set_value(self.nodes, node)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let set = domains.set_domain(self.nodes);
        let graph = domains.graph_domain(self.graph);
        combine((0..graph.num_nodes()).map(|node| {
            Membership::of(graph.is_mandatory_node(node), graph.is_potential_node(node))
                .entailment(Membership::of_value(set, node))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    #[test]
    fn the_set_and_the_node_set_coincide() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(4, false), Graph::complete(4, false))
            .expect("valid domain");
        let nodes = state
            .new_set_variable(4, &[1], &[0, 1, 2])
            .expect("valid domain");
        let handle = state.add_propagator(NodeSetChannelArgs { graph, nodes });
        state.propagate_to_fixed_point().expect("no conflict");

        let domain = state.graph_domain(graph);
        assert!(domain.is_mandatory_node(1));
        assert!(!domain.is_potential_node(3));

        let _ = state.enforce_arc(graph, 0, 2).expect("potential arc");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.set_domain(nodes).kernel().len(), 3);
        assert_eq!(state.is_entailed(handle), Entailment::True);
    }
}
