use crate::basic_types::PropagationStatusCP;
use crate::engine::TrailedInteger;
use crate::graph::GraphChange;
use crate::graph::GraphDeltaMonitor;
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

/// The final `subgraph` is a subgraph of the final `supergraph`. Both variables range over the
/// same nodes and have the same orientation.
#[derive(Clone, Copy, Debug)]
pub struct InclusionArgs {
    pub subgraph: GraphVariable,
    pub supergraph: GraphVariable,
}

impl PropagatorConstructor for InclusionArgs {
    type PropagatorImpl = InclusionPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let sub = context.graph_domain(self.subgraph);
        let sup = context.graph_domain(self.supergraph);
        pumpkin_assert_simple!(
            sub.num_nodes() == sup.num_nodes() && sub.is_directed() == sup.is_directed(),
            "included graphs need the same nodes and orientation"
        );

        context.register(self.subgraph, DomainEvents::KERNEL, LocalId::from(0));
        context.register(self.supergraph, DomainEvents::ENVELOPE, LocalId::from(1));

        InclusionPropagator {
            subgraph: self.subgraph,
            supergraph: self.supergraph,
            sub_monitor: GraphDeltaMonitor::new(&mut context, self.subgraph),
            sup_monitor: GraphDeltaMonitor::new(&mut context, self.supergraph),
            initialised: context.new_trailed_integer(0),
        }
    }
}

/// Copies the kernel of the subgraph into the supergraph, and the removals from the envelope of
/// the supergraph into the subgraph.
#[derive(Clone, Debug)]
pub struct InclusionPropagator {
    subgraph: GraphVariable,
    supergraph: GraphVariable,
    sub_monitor: GraphDeltaMonitor,
    sup_monitor: GraphDeltaMonitor,
    initialised: TrailedInteger,
}

impl InclusionPropagator {
    fn propagate_from_scratch(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        let sub = context.graph_domain(self.subgraph);
        let mandatory_nodes = sub.mandatory_nodes().iter().collect::<Vec<_>>();
        let mandatory_arcs = sub.kernel().arcs().collect::<Vec<_>>();
        for node in mandatory_nodes {
            let _ = context.enforce_node(self.supergraph, node)?;
        }
        for (from, to) in mandatory_arcs {
            let _ = context.enforce_arc(self.supergraph, from, to)?;
        }

        let sub = context.graph_domain(self.subgraph);
        let sup = context.graph_domain(self.supergraph);
        let excluded_arcs = sub
            .envelope()
            .arcs()
            .filter(|&(from, to)| !sup.is_potential_arc(from, to))
            .collect::<Vec<_>>();
        let excluded_nodes = sub
            .potential_nodes()
            .iter()
            .filter(|&node| !sup.is_potential_node(node))
            .collect::<Vec<_>>();
        for (from, to) in excluded_arcs {
            let _ = context.remove_arc(self.subgraph, from, to)?;
        }
        for node in excluded_nodes {
            let _ = context.remove_node(self.subgraph, node)?;
        }
        Ok(())
    }
}

impl Propagator for InclusionPropagator {
    fn name(&self) -> &str {
        "Inclusion"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.value(self.initialised) == 0 {
            self.sub_monitor.catch_up(&mut context);
            self.sup_monitor.catch_up(&mut context);
            context.assign(self.initialised, 1);
            return self.propagate_from_scratch(&mut context);
        }

        let sub_delta = self.sub_monitor.freeze(&context);
        for entry in sub_delta.entries() {
            match entry.change {
                GraphChange::AddNode(node) => {
                    let _ = context.enforce_node(self.supergraph, node)?;
                }
                GraphChange::AddArc(from, to) => {
                    let _ = context.enforce_arc(self.supergraph, from, to)?;
                }
                GraphChange::RemoveNode(_) | GraphChange::RemoveArc(_, _) => {}
            }
        }
        self.sub_monitor.unfreeze(&mut context, sub_delta);

        let sup_delta = self.sup_monitor.freeze(&context);
        for entry in sup_delta.entries() {
            match entry.change {
                GraphChange::RemoveNode(node) => {
                    let _ = context.remove_node(self.subgraph, node)?;
                }
                GraphChange::RemoveArc(from, to) => {
                    let _ = context.remove_arc(self.subgraph, from, to)?;
                }
                GraphChange::AddNode(_) | GraphChange::AddArc(_, _) => {}
            }
        }
        self.sup_monitor.unfreeze(&mut context, sup_delta);
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let sub = domains.graph_domain(self.subgraph);
        let sup = domains.graph_domain(self.supergraph);

        if !sub.kernel().is_subgraph_of(sup.envelope()) {
            Entailment::False
        } else if sub.envelope().is_subgraph_of(sup.kernel()) {
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
    fn membership_flows_in_both_directions() {
        let mut state = State::default();
        let subgraph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let supergraph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let _ = state.add_propagator(InclusionArgs {
            subgraph,
            supergraph,
        });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.enforce_arc(subgraph, 0, 1).expect("potential arc");
        let _ = state.remove_node(supergraph, 2).expect("optional node");
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.graph_domain(supergraph).is_mandatory_arc(0, 1));
        assert!(!state.graph_domain(subgraph).is_potential_node(2));
        assert!(!state.graph_domain(subgraph).is_potential_arc(1, 2));
    }

    #[test]
    fn initial_domains_are_aligned() {
        let mut state = State::default();
        let mut kernel = Graph::new(3, false);
        let _ = kernel.add_arc(0, 1);
        let subgraph = state
            .new_graph_variable(kernel, Graph::complete(3, false))
            .expect("valid domain");
        let mut envelope = Graph::new(3, false);
        let _ = envelope.add_arc(0, 1);
        let _ = envelope.add_arc(1, 2);
        let supergraph = state
            .new_graph_variable(Graph::new(3, false), envelope)
            .expect("valid domain");
        let handle = state.add_propagator(InclusionArgs {
            subgraph,
            supergraph,
        });
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.graph_domain(supergraph).is_mandatory_arc(0, 1));
        assert!(!state.graph_domain(subgraph).is_potential_arc(0, 2));
        assert_eq!(state.is_entailed(handle), Entailment::Undefined);
    }

    #[test]
    fn a_mandatory_arc_missing_from_the_supergraph_is_a_conflict() {
        let mut state = State::default();
        let mut kernel = Graph::new(2, true);
        let _ = kernel.add_arc(0, 1);
        let subgraph = state
            .new_graph_variable(kernel, Graph::complete(2, true))
            .expect("valid domain");
        let supergraph = state
            .new_graph_variable(Graph::new(2, true), Graph::with_all_nodes(2, true))
            .expect("valid domain");
        let _ = state.add_propagator(InclusionArgs {
            subgraph,
            supergraph,
        });

        assert!(state.propagate_to_fixed_point().is_err());
    }
}
