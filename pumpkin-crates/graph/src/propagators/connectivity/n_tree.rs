use crate::algorithms::StrongConnectivityFinder;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::propagation::DomainEvents;
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

/// The directed graph spans every node and forms `num_trees` anti-arborescences: every node
/// points towards a root, and the roots are the nodes with a loop.
///
/// That every node has exactly one successor is left to a degree constraint; this propagator only
/// reasons about the number of roots.
#[derive(Clone, Copy, Debug)]
pub struct NTreeArgs {
    pub graph: GraphVariable,
    pub num_trees: DomainId,
}

impl PropagatorConstructor for NTreeArgs {
    type PropagatorImpl = NTreePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            context.graph_domain(self.graph).is_directed(),
            "anti-arborescences are defined on directed graphs"
        );
        context.register(self.graph, DomainEvents::ANY_GRAPH, LocalId::from(0));
        context.register(self.num_trees, DomainEvents::BOUNDS, LocalId::from(1));

        NTreePropagator {
            graph: self.graph,
            num_trees: self.num_trees,
            finder: StrongConnectivityFinder::default(),
        }
    }
}

/// Every sink component of the envelope needs a root of its own, and only potential loops can
/// become roots.
#[derive(Clone, Debug)]
pub struct NTreePropagator {
    graph: GraphVariable,
    num_trees: DomainId,
    finder: StrongConnectivityFinder,
}

impl Propagator for NTreePropagator {
    fn name(&self) -> &str {
        "NTree"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let optional = context
            .graph_domain(self.graph)
            .potential_nodes()
            .iter()
            .collect::<Vec<_>>();
        for node in optional {
            let _ = context.enforce_node(self.graph, node)?;
        }

        let domain = context.graph_domain(self.graph);
        self.finder.find_all_sccs(domain.envelope());

        let mut num_sinks = 0;
        for scc in 0..self.finder.num_scc() {
            if !self.finder.is_sink_scc(scc) {
                continue;
            }
            num_sinks += 1;
            if !self
                .finder
                .nodes_of_scc(scc)
                .any(|node| domain.is_potential_arc(node, node))
            {
                return Err(PropagatorConflict::new("a sink component contains a root").into());
            }
        }
        let potential_roots = domain
            .potential_nodes()
            .iter()
            .filter(|&node| domain.is_potential_arc(node, node))
            .collect::<Vec<_>>();
        let num_mandatory_roots = potential_roots
            .iter()
            .filter(|&&node| domain.is_mandatory_arc(node, node))
            .count();

        let minimum = num_sinks.max(num_mandatory_roots);
        let _ = context.set_lower_bound(self.num_trees, minimum as i32)?;
        let _ = context.set_upper_bound(self.num_trees, potential_roots.len() as i32)?;
        let lower_bound = context.lower_bound(self.num_trees) as usize;
        let upper_bound = context.upper_bound(self.num_trees) as usize;

        if lower_bound == potential_roots.len() {
            for &node in &potential_roots {
                let _ = context.enforce_arc(self.graph, node, node)?;
            }
            return Ok(());
        }
        if upper_bound == num_mandatory_roots {
            for &node in &potential_roots {
                if !context.graph_domain(self.graph).is_mandatory_arc(node, node) {
                    let _ = context.remove_arc(self.graph, node, node)?;
                }
            }
        } else if upper_bound == num_sinks {
            // Every root lies in a sink component.
            for &node in &potential_roots {
                let in_sink = self
                    .finder
                    .scc_of_node(node)
                    .is_some_and(|scc| self.finder.is_sink_scc(scc));
                if !in_sink {
                    let _ = context.remove_arc(self.graph, node, node)?;
                }
            }
        }
        Ok(())
    }
}
