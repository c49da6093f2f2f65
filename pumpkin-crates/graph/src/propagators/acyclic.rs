use fixedbitset::FixedBitSet;

use crate::algorithms::ConnectivityFinder;
use crate::algorithms::StrongConnectivityFinder;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::TrailedInteger;
use crate::engine::notifications::GraphDomainEvent;
use crate::graph::Graph;
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
use crate::variables::GraphVariable;

/// The graph contains no cycle: a directed acyclic graph, or a forest if the graph is undirected.
#[derive(Clone, Copy, Debug)]
pub struct AcyclicArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for AcyclicArgs {
    type PropagatorImpl = AcyclicPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::ADD_ARC, LocalId::from(0));

        let num_nodes = context.graph_domain(self.graph).num_nodes();
        AcyclicPropagator {
            graph: self.graph,
            monitor: GraphDeltaMonitor::new(&mut context, self.graph),
            initialised: context.new_trailed_integer(0),
            forward: FixedBitSet::with_capacity(num_nodes),
            backward: FixedBitSet::with_capacity(num_nodes),
            stack: Vec::with_capacity(num_nodes),
        }
    }
}

/// Removes every potential arc which would close a cycle with the mandatory arcs, each time an
/// arc is enforced.
#[derive(Clone, Debug)]
pub struct AcyclicPropagator {
    graph: GraphVariable,
    monitor: GraphDeltaMonitor,
    initialised: TrailedInteger,

    forward: FixedBitSet,
    backward: FixedBitSet,
    stack: Vec<usize>,
}

impl AcyclicPropagator {
    /// Marks in `visited` every node reachable from `start` through mandatory arcs, following
    /// successors if `forward` and predecessors otherwise.
    fn mark_reachable(
        kernel: &Graph,
        start: usize,
        forward: bool,
        visited: &mut FixedBitSet,
        stack: &mut Vec<usize>,
    ) {
        visited.clear();
        stack.clear();
        visited.insert(start);
        stack.push(start);

        while let Some(node) = stack.pop() {
            let next = if forward {
                kernel.successors_of(node)
            } else {
                kernel.predecessors_of(node)
            };
            for other in next.iter() {
                if !visited.put(other) {
                    stack.push(other);
                }
            }
        }
    }

    fn on_arc_enforced(
        &mut self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
    ) -> PropagationStatusCP {
        if from == to {
            return Err(PropagatorConflict::new("a mandatory loop is a cycle").into());
        }
        let domain = context.graph_domain(self.graph);
        let kernel = domain.kernel();

        let mut to_remove = Vec::new();
        if domain.is_directed() {
            Self::mark_reachable(kernel, to, true, &mut self.forward, &mut self.stack);
            if self.forward.contains(from) {
                return Err(PropagatorConflict::new("the mandatory arcs contain a cycle").into());
            }
            Self::mark_reachable(kernel, from, false, &mut self.backward, &mut self.stack);

            // An arc from a node after the enforced arc to a node before it closes a cycle.
            for x in self.forward.ones() {
                for y in domain.potential_successors_of(x).iter() {
                    if self.backward.contains(y) && !domain.is_mandatory_arc(x, y) {
                        to_remove.push((x, y));
                    }
                }
            }
        } else {
            // Both endpoints are connected through the kernel without the enforced edge.
            self.forward.clear();
            self.stack.clear();
            self.forward.insert(from);
            self.stack.push(from);
            while let Some(node) = self.stack.pop() {
                for other in kernel.successors_of(node).iter() {
                    if node == from && other == to {
                        continue;
                    }
                    if other == to {
                        return Err(PropagatorConflict::new("mandatory edges form a cycle").into());
                    }
                    if !self.forward.put(other) {
                        self.stack.push(other);
                    }
                }
            }
            Self::mark_reachable(kernel, from, true, &mut self.forward, &mut self.stack);

            for x in self.forward.ones() {
                for y in domain.potential_successors_of(x).iter() {
                    if x < y && self.forward.contains(y) && !domain.is_mandatory_arc(x, y) {
                        to_remove.push((x, y));
                    }
                }
            }
        }

        for (x, y) in to_remove {
            let _ = context.remove_arc(self.graph, x, y)?;
        }
        Ok(())
    }

    fn propagate_from_scratch(&mut self, context: &mut PropagationContext) -> PropagationStatusCP {
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

impl Propagator for AcyclicPropagator {
    fn name(&self) -> &str {
        "Acyclic"
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
        if is_acyclic(domain.envelope()) {
            Entailment::True
        } else if !is_acyclic(domain.kernel()) {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}

fn is_acyclic(graph: &Graph) -> bool {
    if graph.arcs().any(|(from, to)| from == to) {
        return false;
    }
    if graph.is_directed() {
        let mut finder = StrongConnectivityFinder::default();
        finder.find_all_sccs(graph);
        finder.num_scc() == graph.node_count()
    } else {
        let mut finder = ConnectivityFinder::default();
        finder.find_all_components(graph);
        graph.num_arcs() + finder.num_cc() == graph.node_count()
    }
}
