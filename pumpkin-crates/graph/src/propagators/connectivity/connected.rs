use crate::algorithms::ConnectivityFinder;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
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
use crate::variables::GraphVariable;

/// The final graph is non-empty and consists of a single connected component. Arc directions are
/// ignored.
#[derive(Clone, Copy, Debug)]
pub struct ConnectedArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for ConnectedArgs {
    type PropagatorImpl = ConnectedPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::NODES_REMOVE_ARC, LocalId::from(0));
        ConnectedPropagator {
            graph: self.graph,
            finder: ConnectivityFinder::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConnectedPropagator {
    graph: GraphVariable,
    finder: ConnectivityFinder,
}

impl Propagator for ConnectedPropagator {
    fn name(&self) -> &str {
        "Connected"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if domain.potential_nodes().is_empty() {
            return Err(PropagatorConflict::new("an empty graph is not connected").into());
        }
        let Some(anchor) = domain.mandatory_nodes().iter().next() else {
            return Ok(());
        };

        self.finder.find_all_components(domain.envelope());
        let component = self.finder.cc_of_node(anchor);
        if domain
            .mandatory_nodes()
            .iter()
            .any(|node| self.finder.cc_of_node(node) != component)
        {
            return Err(PropagatorConflict::new("mandatory nodes in different components").into());
        }

        let unreachable = domain
            .potential_nodes()
            .iter()
            .filter(|&node| self.finder.cc_of_node(node) != component)
            .collect::<Vec<_>>();
        for node in unreachable {
            let _ = context.remove_node(self.graph, node)?;
        }

        let domain = context.graph_domain(self.graph);
        let weights = (0..domain.num_nodes())
            .map(|node| i64::from(domain.is_mandatory_node(node)))
            .collect::<Vec<_>>();
        self.finder.find_isthmuses(domain.envelope(), &weights);
        let isthmuses = self.finder.isthmuses().to_vec();
        for (from, to) in isthmuses {
            let _ = context.enforce_arc(self.graph, from, to)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        if domain.potential_nodes().is_empty() {
            return Entailment::False;
        }
        let mut finder = ConnectivityFinder::default();
        finder.find_all_components(domain.envelope());
        let components_with_mandatory_nodes = (0..finder.num_cc())
            .filter(|&cc| {
                finder
                    .nodes_of_cc(cc)
                    .any(|node| domain.is_mandatory_node(node))
            })
            .count();

        if components_with_mandatory_nodes > 1 {
            Entailment::False
        } else if domain.is_instantiated() {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    /// A path `0 - 1 - 2` and the edge `3 - 4`.
    fn envelope() -> Graph {
        let mut envelope = Graph::new(5, false);
        let _ = envelope.add_arc(0, 1);
        let _ = envelope.add_arc(1, 2);
        let _ = envelope.add_arc(3, 4);
        envelope
    }

    #[test]
    fn nodes_out_of_reach_are_removed_and_bridges_enforced() {
        let mut state = State::default();
        let mut kernel = Graph::new(5, false);
        let _ = kernel.add_node(0);
        let _ = kernel.add_node(2);
        let graph = state
            .new_graph_variable(kernel, envelope())
            .expect("valid domain");
        let _ = state.add_propagator(ConnectedArgs { graph });
        state.propagate_to_fixed_point().expect("no conflict");

        let domain = state.graph_domain(graph);
        assert!(domain.is_mandatory_arc(0, 1));
        assert!(domain.is_mandatory_arc(1, 2));
        assert!(!domain.is_potential_node(3));
        assert!(domain.is_instantiated());
    }

    #[test]
    fn mandatory_nodes_in_different_components_are_a_conflict() {
        let mut state = State::default();
        let mut kernel = Graph::new(5, false);
        let _ = kernel.add_node(0);
        let _ = kernel.add_node(4);
        let graph = state
            .new_graph_variable(kernel, envelope())
            .expect("valid domain");
        let _ = state.add_propagator(ConnectedArgs { graph });

        assert!(state.propagate_to_fixed_point().is_err());
    }

    #[test]
    fn cycles_have_no_bridges() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::with_all_nodes(4, false), Graph::complete(4, false))
            .expect("valid domain");
        let _ = state.add_propagator(ConnectedArgs { graph });
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.graph_domain(graph).kernel().num_arcs(), 0);
    }

    #[test]
    fn removing_the_last_isolated_node_is_a_conflict() {
        let mut state = State::default();
        let mut envelope = Graph::new(3, false);
        let _ = envelope.add_node(1);
        let graph = state
            .new_graph_variable(Graph::new(3, false), envelope)
            .expect("valid domain");
        let handle = state.add_propagator(ConnectedArgs { graph });
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(state.is_entailed(handle), Entailment::Undefined);

        let _ = state.remove_node(graph, 1).expect("not mandatory");
        assert!(state.propagate_to_fixed_point().is_err());
    }
}
