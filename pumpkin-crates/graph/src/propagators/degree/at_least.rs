use super::DegreePropagation;
use super::affected_nodes;
use crate::basic_types::PropagationStatusCP;
use crate::engine::TrailedInteger;
use crate::engine::notifications::GraphDomainEvent;
use crate::graph::GraphDeltaMonitor;
use crate::graph::IncidentSet;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// Every node of the final graph has at least `degrees[i]` incident arcs on the given side.
#[derive(Clone, Debug)]
pub struct NodeDegreeAtLeastArgs {
    pub graph: GraphVariable,
    pub incident_set: IncidentSet,
    pub degrees: Vec<usize>,
    pub propagation: DegreePropagation,
}

impl PropagatorConstructor for NodeDegreeAtLeastArgs {
    type PropagatorImpl = NodeDegreeAtLeastPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            self.degrees.len() == context.graph_domain(self.graph).num_nodes(),
            "one degree per node is required"
        );
        context.register(self.graph, DomainEvents::ADD_NODE_REMOVE_ARC, LocalId::from(0));

        let monitor = match self.propagation {
            DegreePropagation::Coarse => None,
            DegreePropagation::Incremental => {
                Some(GraphDeltaMonitor::new(&mut context, self.graph))
            }
        };
        NodeDegreeAtLeastPropagator {
            graph: self.graph,
            incident_set: self.incident_set,
            degrees: self.degrees.into_boxed_slice(),
            monitor,
            initialised: context.new_trailed_integer(0),
        }
    }
}

/// A node whose potential degree drops below its minimum is removed; once it equals the minimum,
/// all remaining potential arcs of a mandatory node are enforced.
#[derive(Clone, Debug)]
pub struct NodeDegreeAtLeastPropagator {
    graph: GraphVariable,
    incident_set: IncidentSet,
    degrees: Box<[usize]>,
    monitor: Option<GraphDeltaMonitor>,
    initialised: TrailedInteger,
}

impl NodeDegreeAtLeastPropagator {
    fn filter_node(&self, context: &mut PropagationContext, node: usize) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if !domain.is_potential_node(node) {
            return Ok(());
        }
        let potential = self.incident_set.potential_set(domain, node);
        let required = self.degrees[node];

        if potential.len() < required {
            let _ = context.remove_node(self.graph, node)?;
        } else if potential.len() == required
            && domain.is_mandatory_node(node)
            && self.incident_set.mandatory_set(domain, node).len() < required
        {
            let others = potential.iter().collect::<Vec<_>>();
            for other in others {
                let _ = self.incident_set.enforce(context, self.graph, node, other)?;
            }
        }
        Ok(())
    }

    fn filter_all(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        let nodes = context
            .graph_domain(self.graph)
            .potential_nodes()
            .iter()
            .collect::<Vec<_>>();
        for node in nodes {
            self.filter_node(context, node)?;
        }
        Ok(())
    }
}

impl Propagator for NodeDegreeAtLeastPropagator {
    fn name(&self) -> &str {
        "NodeDegreeAtLeast"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let Some(monitor) = self.monitor else {
            return self.filter_all(&mut context);
        };
        if context.value(self.initialised) == 0 {
            monitor.catch_up(&mut context);
            context.assign(self.initialised, 1);
            return self.filter_all(&mut context);
        }

        let directed = context.graph_domain(self.graph).is_directed();
        let delta = monitor.freeze(&context);
        for node in delta.nodes(GraphDomainEvent::AddNode) {
            self.filter_node(&mut context, node)?;
        }
        for arc in delta.arcs(GraphDomainEvent::RemoveArc) {
            for node in affected_nodes(self.incident_set, directed, arc) {
                self.filter_node(&mut context, node)?;
            }
        }
        monitor.unfreeze(&mut context, delta);
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let nodes = domain.potential_nodes();
        if nodes.iter().all(|node| {
            self.incident_set.mandatory_set(domain, node).len() >= self.degrees[node]
        }) {
            Entailment::True
        } else if domain.mandatory_nodes().iter().any(|node| {
            self.incident_set.potential_set(domain, node).len() < self.degrees[node]
        }) {
            Entailment::False
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

    fn args(
        graph: GraphVariable,
        degree: usize,
        propagation: DegreePropagation,
    ) -> NodeDegreeAtLeastArgs {
        NodeDegreeAtLeastArgs {
            graph,
            incident_set: IncidentSet::SuccOrNeigh,
            degrees: vec![degree; 5],
            propagation,
        }
    }

    #[test]
    fn the_last_potential_arcs_of_a_mandatory_node_are_enforced() {
        for propagation in [DegreePropagation::Coarse, DegreePropagation::Incremental] {
            let mut state = State::default();
            let graph = state
                .new_graph_variable(Graph::with_all_nodes(5, false), Graph::complete(5, false))
                .expect("valid domain");
            let _ = state.add_propagator(args(graph, 2, propagation));
            state.propagate_to_fixed_point().expect("no conflict");

            let _ = state.remove_arc(graph, 0, 1).expect("not mandatory");
            let _ = state.remove_arc(graph, 0, 2).expect("not mandatory");
            state.propagate_to_fixed_point().expect("no conflict");

            let domain = state.graph_domain(graph);
            assert!(domain.is_mandatory_arc(0, 3));
            assert!(domain.is_mandatory_arc(0, 4));
        }
    }

    #[test]
    fn optional_nodes_without_enough_arcs_are_removed() {
        let mut state = State::default();
        let mut envelope = Graph::new(5, false);
        for (from, to) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4)] {
            let _ = envelope.add_arc(from, to);
        }
        let graph = state
            .new_graph_variable(Graph::new(5, false), envelope)
            .expect("valid domain");
        let _ = state.add_propagator(args(graph, 2, DegreePropagation::Incremental));
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(!state.graph_domain(graph).is_potential_node(4));
        assert_eq!(state.graph_domain(graph).potential_nodes().len(), 4);
    }

    #[test]
    fn mandatory_nodes_without_enough_arcs_are_conflicts() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::with_all_nodes(5, false), Graph::complete(5, false))
            .expect("valid domain");
        let _ = state.add_propagator(args(graph, 3, DegreePropagation::Incremental));
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(state.graph_domain(graph).kernel().num_arcs(), 0);

        let _ = state.remove_arc(graph, 0, 1).expect("not mandatory");
        let _ = state.remove_arc(graph, 0, 2).expect("not mandatory");
        assert!(state.propagate_to_fixed_point().is_err());
    }

    #[test]
    fn a_cycle_over_all_nodes_satisfies_a_minimum_of_two() {
        let mut state = State::default();
        let mut cycle = Graph::with_all_nodes(5, false);
        for node in 0..5 {
            let _ = cycle.add_arc(node, (node + 1) % 5);
        }
        let graph = state
            .new_graph_variable(cycle.clone(), cycle)
            .expect("valid domain");
        let handle = state.add_propagator(args(graph, 2, DegreePropagation::Coarse));

        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(state.is_entailed(handle), Entailment::True);
    }
}
