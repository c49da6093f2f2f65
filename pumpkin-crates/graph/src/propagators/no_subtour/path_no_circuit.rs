use crate::algorithms::PathExtremities;
use crate::algorithms::PathMerge;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::TrailedInteger;
use crate::engine::notifications::GraphDomainEvent;
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

/// The mandatory arcs of a directed graph form node-disjoint simple paths: every node has at most
/// one mandatory successor and predecessor, and no circuit is ever closed.
#[derive(Clone, Copy, Debug)]
pub struct PathNoCircuitArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for PathNoCircuitArgs {
    type PropagatorImpl = PathNoCircuitPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            context.graph_domain(self.graph).is_directed(),
            "paths are defined on directed graphs"
        );
        context.register(self.graph, DomainEvents::ADD_ARC, LocalId::from(0));

        let num_nodes = context.graph_domain(self.graph).num_nodes();
        PathNoCircuitPropagator {
            graph: self.graph,
            monitor: GraphDeltaMonitor::new(&mut context, self.graph),
            paths: PathExtremities::new(&mut context, num_nodes),
            initialised: context.new_trailed_integer(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PathNoCircuitPropagator {
    graph: GraphVariable,
    monitor: GraphDeltaMonitor,
    paths: PathExtremities,
    initialised: TrailedInteger,
}

impl PathNoCircuitPropagator {
    fn on_arc_enforced(
        &self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
    ) -> PropagationStatusCP {
        if from == to {
            return Err(PropagatorConflict::new("a mandatory loop is a circuit").into());
        }

        let domain = context.graph_domain(self.graph);
        if domain.mandatory_successors_of(from).len() > 1
            || domain.mandatory_predecessors_of(to).len() > 1
        {
            return Err(PropagatorConflict::new("two mandatory arcs leave or enter a node").into());
        }

        match self.paths.merge(context, from, to) {
            PathMerge::Closed { .. } => {
                Err(PropagatorConflict::new("the mandatory arcs close a circuit").into())
            }
            PathMerge::Merged { first, last, .. } => {
                let _ = context.remove_arc(self.graph, last, first)?;
                Ok(())
            }
        }
    }

    fn propagate_from_scratch(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        self.monitor.catch_up(context);
        context.assign(self.initialised, 1);

        let domain = context.graph_domain(self.graph);
        let loops = domain
            .potential_nodes()
            .iter()
            .filter(|&node| domain.is_potential_arc(node, node))
            .collect::<Vec<_>>();
        let arcs = domain.kernel().arcs().collect::<Vec<_>>();

        for node in loops {
            let _ = context.remove_arc(self.graph, node, node)?;
        }
        for (from, to) in arcs {
            self.on_arc_enforced(context, from, to)?;
        }
        Ok(())
    }
}

impl Propagator for PathNoCircuitPropagator {
    fn name(&self) -> &str {
        "PathNoCircuit"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.value(self.initialised) == 0 {
            return self.propagate_from_scratch(&mut context);
        }

        let delta = self.monitor.freeze(&context);
        for (from, to) in delta.arcs(GraphDomainEvent::AddArc) {
            self.on_arc_enforced(&mut context, from, to)?;
        }
        self.monitor.unfreeze(&mut context, delta);
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let kernel = domain.kernel();
        let within_degree = kernel
            .nodes()
            .iter()
            .all(|node| kernel.out_degree(node) <= 1 && kernel.in_degree(node) <= 1);
        if !within_degree || kernel.arcs().any(|(from, to)| from == to) {
            return Entailment::False;
        }

        // With at most one successor per node, a circuit is found by following successors.
        let num_nodes = domain.num_nodes();
        let mut visited = vec![false; num_nodes];
        for start in kernel.nodes().iter() {
            if visited[start] || kernel.in_degree(start) != 0 {
                continue;
            }
            let mut current = start;
            loop {
                visited[current] = true;
                match kernel.successors_of(current).iter().next() {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        let has_circuit = kernel
            .nodes()
            .iter()
            .any(|node| !visited[node] && kernel.out_degree(node) == 1);
        if has_circuit {
            return Entailment::False;
        }

        if domain.is_instantiated() {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
