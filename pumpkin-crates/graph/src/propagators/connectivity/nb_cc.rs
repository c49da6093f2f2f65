use crate::algorithms::ConnectivityFinder;
use crate::basic_types::PropagationStatusCP;
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
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// The final graph has exactly `num_components` connected components. Arc directions are
/// ignored.
#[derive(Clone, Copy, Debug)]
pub struct NbConnectedComponentsArgs {
    pub graph: GraphVariable,
    pub num_components: DomainId,
}

impl PropagatorConstructor for NbConnectedComponentsArgs {
    type PropagatorImpl = NbConnectedComponentsPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::ANY_GRAPH, LocalId::from(0));
        context.register(self.num_components, DomainEvents::BOUNDS, LocalId::from(1));

        NbConnectedComponentsPropagator {
            graph: self.graph,
            num_components: self.num_components,
            finder: ConnectivityFinder::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NbConnectedComponentsPropagator {
    graph: GraphVariable,
    num_components: DomainId,
    finder: ConnectivityFinder,
}

/// The bounds on the number of components of any graph within the domain, together with the
/// tables of the envelope components.
#[derive(Debug)]
struct ComponentBounds {
    minimum: usize,
    maximum: usize,
    /// For every envelope component, whether it contains a mandatory node.
    has_mandatory_node: Vec<bool>,
}

impl NbConnectedComponentsPropagator {
    /// Every envelope component holding a mandatory node yields at least one component; at best
    /// every kernel component stays apart and every optional node is a component on its own.
    fn compute_bounds(finder: &mut ConnectivityFinder, domain: &GraphDomain) -> ComponentBounds {
        finder.find_all_components(domain.kernel());
        let num_optional = domain.potential_nodes().len() - domain.mandatory_nodes().len();
        let maximum = finder.num_cc() + num_optional;

        finder.find_all_components(domain.envelope());
        let mut has_mandatory_node = vec![false; finder.num_cc()];
        for node in domain.mandatory_nodes().iter() {
            if let Some(cc) = finder.cc_of_node(node) {
                has_mandatory_node[cc] = true;
            }
        }
        let minimum = has_mandatory_node.iter().filter(|&&has| has).count();

        ComponentBounds {
            minimum,
            maximum,
            has_mandatory_node,
        }
    }
}

impl Propagator for NbConnectedComponentsPropagator {
    fn name(&self) -> &str {
        "NbConnectedComponents"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let bounds = Self::compute_bounds(&mut self.finder, domain);

        let _ = context.set_lower_bound(self.num_components, bounds.minimum as i32)?;
        let _ = context.set_upper_bound(self.num_components, bounds.maximum as i32)?;
        let lower_bound = context.lower_bound(self.num_components) as usize;
        let upper_bound = context.upper_bound(self.num_components) as usize;

        if upper_bound == bounds.minimum {
            // Components without a mandatory node would add to the count, and the mandatory
            // nodes of a component have to stay together.
            let domain = context.graph_domain(self.graph);
            let superfluous = domain
                .potential_nodes()
                .iter()
                .filter(|&node| {
                    self.finder
                        .cc_of_node(node)
                        .is_some_and(|cc| !bounds.has_mandatory_node[cc])
                })
                .collect::<Vec<_>>();
            for node in superfluous {
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
        }

        if lower_bound == bounds.maximum {
            // Every optional node is a component on its own, and no two kernel components merge.
            let optional = context
                .graph_domain(self.graph)
                .potential_nodes()
                .iter()
                .collect::<Vec<_>>();
            for node in optional {
                let _ = context.enforce_node(self.graph, node)?;
            }

            let domain = context.graph_domain(self.graph);
            self.finder.find_all_components(domain.kernel());
            let merging = domain
                .envelope()
                .arcs()
                .filter(|&(from, to)| self.finder.cc_of_node(from) != self.finder.cc_of_node(to))
                .collect::<Vec<_>>();
            for (from, to) in merging {
                let _ = context.remove_arc(self.graph, from, to)?;
            }
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let mut finder = ConnectivityFinder::default();
        let bounds = Self::compute_bounds(&mut finder, domain);
        let lower_bound = domains.lower_bound(self.num_components);
        let upper_bound = domains.upper_bound(self.num_components);

        if upper_bound < 0
            || bounds.minimum > upper_bound as usize
            || bounds.maximum < lower_bound.max(0) as usize
        {
            Entailment::False
        } else if domain.is_instantiated() && lower_bound == upper_bound {
            // Both bounds coincide with the number of components of the final graph.
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
