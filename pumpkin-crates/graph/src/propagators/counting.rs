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
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// `num_nodes` equals the number of nodes of the final graph.
#[derive(Clone, Copy, Debug)]
pub struct NbNodesArgs {
    pub graph: GraphVariable,
    pub num_nodes: DomainId,
}

/// `num_arcs` equals the number of arcs of the final graph; an undirected edge counts once.
#[derive(Clone, Copy, Debug)]
pub struct NbArcsArgs {
    pub graph: GraphVariable,
    pub num_arcs: DomainId,
}

/// What is counted by a [`CountingPropagator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Counted {
    Nodes,
    Arcs,
}

impl PropagatorConstructor for NbNodesArgs {
    type PropagatorImpl = CountingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::NODES, LocalId::from(0));
        context.register(self.num_nodes, DomainEvents::BOUNDS, LocalId::from(1));
        CountingPropagator {
            graph: self.graph,
            count: self.num_nodes,
            counted: Counted::Nodes,
        }
    }
}

impl PropagatorConstructor for NbArcsArgs {
    type PropagatorImpl = CountingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        context.register(self.num_arcs, DomainEvents::BOUNDS, LocalId::from(1));
        CountingPropagator {
            graph: self.graph,
            count: self.num_arcs,
            counted: Counted::Arcs,
        }
    }
}

/// Bounds the count by the kernel and the envelope. When a bound is reached, the remaining
/// elements are all removed or all enforced.
#[derive(Clone, Debug)]
pub struct CountingPropagator {
    graph: GraphVariable,
    count: DomainId,
    counted: Counted,
}

impl CountingPropagator {
    fn bounds(&self, domains: &impl ReadDomains) -> (usize, usize) {
        let domain = domains.graph_domain(self.graph);
        match self.counted {
            Counted::Nodes => (domain.kernel().node_count(), domain.envelope().node_count()),
            Counted::Arcs => (domain.kernel().num_arcs(), domain.envelope().num_arcs()),
        }
    }
}

impl Propagator for CountingPropagator {
    fn name(&self) -> &str {
        match self.counted {
            Counted::Nodes => "NbNodes",
            Counted::Arcs => "NbArcs",
        }
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let (minimum, maximum) = self.bounds(&context);
        let _ = context.set_lower_bound(self.count, minimum as i32)?;
        let _ = context.set_upper_bound(self.count, maximum as i32)?;
        let lower_bound = context.lower_bound(self.count) as usize;
        let upper_bound = context.upper_bound(self.count) as usize;

        if minimum == maximum {
            return Ok(());
        }

        let domain = context.graph_domain(self.graph);
        match self.counted {
            Counted::Nodes => {
                let undecided = domain
                    .potential_nodes()
                    .iter()
                    .filter(|&node| !domain.is_mandatory_node(node))
                    .collect::<Vec<_>>();
                if upper_bound == minimum {
                    for node in undecided {
                        let _ = context.remove_node(self.graph, node)?;
                    }
                } else if lower_bound == maximum {
                    for node in undecided {
                        let _ = context.enforce_node(self.graph, node)?;
                    }
                }
            }
            Counted::Arcs => {
                let undecided = domain
                    .envelope()
                    .arcs()
                    .filter(|&(from, to)| !domain.is_mandatory_arc(from, to))
                    .collect::<Vec<_>>();
                if upper_bound == minimum {
                    for (from, to) in undecided {
                        let _ = context.remove_arc(self.graph, from, to)?;
                    }
                } else if lower_bound == maximum {
                    for (from, to) in undecided {
                        let _ = context.enforce_arc(self.graph, from, to)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let (minimum, maximum) = self.bounds(&domains);
        let lower_bound = domains.lower_bound(self.count);
        let upper_bound = domains.upper_bound(self.count);

        if upper_bound < 0
            || minimum > upper_bound as usize
            || maximum < lower_bound.max(0) as usize
        {
            Entailment::False
        } else if minimum == maximum && lower_bound == upper_bound {
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
    fn node_count_bounds_follow_the_graph() {
        let mut state = State::default();
        let mut kernel = Graph::new(4, false);
        let _ = kernel.add_node(1);
        let graph = state
            .new_graph_variable(kernel, Graph::complete(4, false))
            .expect("valid domain");
        let num_nodes = state.new_interval_variable(0, 10);
        let _ = state.add_propagator(NbNodesArgs { graph, num_nodes });
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.lower_bound(num_nodes), 1);
        assert_eq!(state.upper_bound(num_nodes), 4);
    }

    #[test]
    fn a_saturated_node_count_removes_the_optional_nodes() {
        let mut state = State::default();
        let mut kernel = Graph::new(4, false);
        let _ = kernel.add_arc(0, 1);
        let graph = state
            .new_graph_variable(kernel, Graph::complete(4, false))
            .expect("valid domain");
        let num_nodes = state.new_interval_variable(0, 2);
        let _ = state.add_propagator(NbNodesArgs { graph, num_nodes });
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.graph_domain(graph).is_instantiated());
    }

    #[test]
    fn an_arc_count_at_the_envelope_enforces_every_arc() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let num_arcs = state.new_interval_variable(6, 10);
        let _ = state.add_propagator(NbArcsArgs { graph, num_arcs });
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.graph_domain(graph).is_instantiated());
        assert_eq!(state.upper_bound(num_arcs), 6);
    }

    #[test]
    fn negative_count_bounds_are_judged_against_the_graph() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, false), Graph::complete(3, false))
            .expect("valid domain");
        let feasible = state.new_interval_variable(-2, 1);
        let infeasible = state.new_interval_variable(-3, -1);
        let feasible_handle = state.add_propagator(NbArcsArgs {
            graph,
            num_arcs: feasible,
        });
        let infeasible_handle = state.add_propagator(NbArcsArgs {
            graph,
            num_arcs: infeasible,
        });

        assert_eq!(state.is_entailed(feasible_handle), Entailment::Undefined);
        assert_eq!(state.is_entailed(infeasible_handle), Entailment::False);
    }
}
