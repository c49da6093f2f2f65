use fixedbitset::FixedBitSet;

use crate::algorithms::StrongConnectivityFinder;
use crate::basic_types::PropagationStatusCP;
use crate::graph::Graph;
use crate::graph::GraphDomain;
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
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// The final directed graph has exactly `num_components` strongly connected components.
#[derive(Clone, Copy, Debug)]
pub struct NbStronglyConnectedComponentsArgs {
    pub graph: GraphVariable,
    pub num_components: DomainId,
}

impl PropagatorConstructor for NbStronglyConnectedComponentsArgs {
    type PropagatorImpl = NbStronglyConnectedComponentsPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            context.graph_domain(self.graph).is_directed(),
            "strongly connected components are defined on directed graphs"
        );
        context.register(self.graph, DomainEvents::ANY_GRAPH, LocalId::from(0));
        context.register(self.num_components, DomainEvents::BOUNDS, LocalId::from(1));

        NbStronglyConnectedComponentsPropagator {
            graph: self.graph,
            num_components: self.num_components,
            finder: StrongConnectivityFinder::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NbStronglyConnectedComponentsPropagator {
    graph: GraphVariable,
    num_components: DomainId,
    finder: StrongConnectivityFinder,
}

impl NbStronglyConnectedComponentsPropagator {
    /// Returns the minimum and maximum number of components; afterwards the finder holds the
    /// components of the envelope.
    fn compute_bounds(
        finder: &mut StrongConnectivityFinder,
        domain: &GraphDomain,
    ) -> (usize, usize) {
        finder.find_all_sccs(domain.kernel());
        let num_optional = domain.potential_nodes().len() - domain.mandatory_nodes().len();
        let maximum = finder.num_scc() + num_optional;

        finder.find_all_sccs(domain.envelope());
        let minimum = (0..finder.num_scc())
            .filter(|&scc| {
                finder
                    .nodes_of_scc(scc)
                    .any(|node| domain.is_mandatory_node(node))
            })
            .count();

        (minimum, maximum)
    }

    /// For every component of `kernel`, the components reachable from it. Relies on the
    /// components being numbered in reverse topological order.
    fn reachable_components(finder: &StrongConnectivityFinder, kernel: &Graph) -> Vec<FixedBitSet> {
        let num_scc = finder.num_scc();
        let mut reachable: Vec<FixedBitSet> = Vec::with_capacity(num_scc);
        for scc in 0..num_scc {
            let mut reach = FixedBitSet::with_capacity(num_scc);
            reach.insert(scc);
            for node in finder.nodes_of_scc(scc) {
                for successor in kernel.successors_of(node).iter() {
                    match finder.scc_of_node(successor) {
                        Some(other) if other < scc => reach.union_with(&reachable[other]),
                        _ => {}
                    }
                }
            }
            reachable.push(reach);
        }
        reachable
    }
}

impl Propagator for NbStronglyConnectedComponentsPropagator {
    fn name(&self) -> &str {
        "NbStronglyConnectedComponents"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let (minimum, maximum) = Self::compute_bounds(&mut self.finder, domain);

        let _ = context.set_lower_bound(self.num_components, minimum as i32)?;
        let _ = context.set_upper_bound(self.num_components, maximum as i32)?;
        let lower_bound = context.lower_bound(self.num_components) as usize;
        let upper_bound = context.upper_bound(self.num_components) as usize;

        if upper_bound == minimum {
            // Nodes in an envelope component without mandatory nodes would form extra components.
            let domain = context.graph_domain(self.graph);
            let superfluous = (0..self.finder.num_scc())
                .filter(|&scc| {
                    self.finder
                        .nodes_of_scc(scc)
                        .all(|node| !domain.is_mandatory_node(node))
                })
                .flat_map(|scc| self.finder.nodes_of_scc(scc))
                .collect::<Vec<_>>();
            for node in superfluous {
                let _ = context.remove_node(self.graph, node)?;
            }
        }

        if lower_bound == maximum {
            // Every node is part of the graph, and no arc may merge two kernel components.
            let optional = context
                .graph_domain(self.graph)
                .potential_nodes()
                .iter()
                .collect::<Vec<_>>();
            for node in optional {
                let _ = context.enforce_node(self.graph, node)?;
            }

            let domain = context.graph_domain(self.graph);
            self.finder.find_all_sccs(domain.kernel());
            let reachable = Self::reachable_components(&self.finder, domain.kernel());
            let merging = domain
                .envelope()
                .arcs()
                .filter(|&(from, to)| !domain.is_mandatory_arc(from, to))
                .filter(|&(from, to)| {
                    match (self.finder.scc_of_node(from), self.finder.scc_of_node(to)) {
                        (Some(source), Some(target)) => {
                            source != target && reachable[target].contains(source)
                        }
                        _ => false,
                    }
                })
                .collect::<Vec<_>>();
            for (from, to) in merging {
                let _ = context.remove_arc(self.graph, from, to)?;
            }
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let mut finder = StrongConnectivityFinder::default();
        let (minimum, maximum) = Self::compute_bounds(&mut finder, domain);
        let lower_bound = domains.lower_bound(self.num_components);
        let upper_bound = domains.upper_bound(self.num_components);

        if upper_bound < 0
            || minimum > upper_bound as usize
            || maximum < lower_bound.max(0) as usize
        {
            Entailment::False
        } else if domain.is_instantiated() && lower_bound == upper_bound {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
