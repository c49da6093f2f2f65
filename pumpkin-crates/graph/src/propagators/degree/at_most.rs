use super::DegreePropagation;
use super::affected_nodes;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
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

/// Every node has at most `degrees[i]` incident arcs on the given side.
#[derive(Clone, Debug)]
pub struct NodeDegreeAtMostArgs {
    pub graph: GraphVariable,
    pub incident_set: IncidentSet,
    pub degrees: Vec<usize>,
    pub propagation: DegreePropagation,
}

impl PropagatorConstructor for NodeDegreeAtMostArgs {
    type PropagatorImpl = NodeDegreeAtMostPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            self.degrees.len() == context.graph_domain(self.graph).num_nodes(),
            "one degree per node is required"
        );
        context.register(self.graph, DomainEvents::ADD_ARC, LocalId::from(0));

        let monitor = match self.propagation {
            DegreePropagation::Coarse => None,
            DegreePropagation::Incremental => {
                Some(GraphDeltaMonitor::new(&mut context, self.graph))
            }
        };
        NodeDegreeAtMostPropagator {
            graph: self.graph,
            incident_set: self.incident_set,
            degrees: self.degrees.into_boxed_slice(),
            monitor,
            initialised: context.new_trailed_integer(0),
        }
    }
}

/// Once the mandatory degree of a node reaches its maximum, all its other potential arcs are
/// removed.
#[derive(Clone, Debug)]
pub struct NodeDegreeAtMostPropagator {
    graph: GraphVariable,
    incident_set: IncidentSet,
    degrees: Box<[usize]>,
    monitor: Option<GraphDeltaMonitor>,
    initialised: TrailedInteger,
}

impl NodeDegreeAtMostPropagator {
    fn filter_node(&self, context: &mut PropagationContext, node: usize) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if !domain.is_potential_node(node) {
            return Ok(());
        }
        let mandatory = self.incident_set.mandatory_set(domain, node);
        let potential = self.incident_set.potential_set(domain, node);
        let maximum = self.degrees[node];

        if mandatory.len() > maximum {
            return Err(PropagatorConflict::new("a node has too many mandatory arcs").into());
        }
        if mandatory.len() == maximum && potential.len() > maximum {
            let optional = potential
                .iter()
                .filter(|&other| !mandatory.contains(other))
                .collect::<Vec<_>>();
            for other in optional {
                let _ = self.incident_set.remove(context, self.graph, node, other)?;
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

impl Propagator for NodeDegreeAtMostPropagator {
    fn name(&self) -> &str {
        "NodeDegreeAtMost"
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
        for arc in delta.arcs(GraphDomainEvent::AddArc) {
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
        if nodes.iter().any(|node| {
            self.incident_set.mandatory_set(domain, node).len() > self.degrees[node]
        }) {
            Entailment::False
        } else if nodes.iter().all(|node| {
            self.incident_set.potential_set(domain, node).len() <= self.degrees[node]
        }) {
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

    #[test]
    fn saturated_nodes_lose_their_optional_arcs() {
        for propagation in [DegreePropagation::Coarse, DegreePropagation::Incremental] {
            let mut state = State::default();
            let graph = state
                .new_graph_variable(Graph::new(4, true), Graph::complete(4, true))
                .expect("valid domain");
            let _ = state.add_propagator(NodeDegreeAtMostArgs {
                graph,
                incident_set: IncidentSet::PredOrNeigh,
                degrees: vec![1; 4],
                propagation,
            });
            state.propagate_to_fixed_point().expect("no conflict");

            let _ = state.enforce_arc(graph, 0, 2).expect("potential");
            state.propagate_to_fixed_point().expect("no conflict");

            let domain = state.graph_domain(graph);
            assert!(!domain.is_potential_arc(1, 2));
            assert!(!domain.is_potential_arc(3, 2));
            assert!(domain.is_potential_arc(0, 1));
        }
    }

    #[test]
    fn exceeding_the_maximum_is_a_conflict() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(4, false), Graph::complete(4, false))
            .expect("valid domain");
        let _ = state.add_propagator(NodeDegreeAtMostArgs {
            graph,
            incident_set: IncidentSet::SuccOrNeigh,
            degrees: vec![1; 4],
            propagation: DegreePropagation::Incremental,
        });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.enforce_arc(graph, 0, 1).expect("potential");
        let _ = state.enforce_arc(graph, 0, 2).expect("potential");
        assert!(state.propagate_to_fixed_point().is_err());
    }

    #[test]
    fn a_matching_is_entailed() {
        let mut state = State::default();
        let mut envelope = Graph::with_all_nodes(4, false);
        let _ = envelope.add_arc(0, 1);
        let _ = envelope.add_arc(2, 3);
        let graph = state
            .new_graph_variable(Graph::new(4, false), envelope)
            .expect("valid domain");
        let handle = state.add_propagator(NodeDegreeAtMostArgs {
            graph,
            incident_set: IncidentSet::SuccOrNeigh,
            degrees: vec![1; 4],
            propagation: DegreePropagation::Coarse,
        });

        assert_eq!(state.is_entailed(handle), Entailment::True);
    }
}
