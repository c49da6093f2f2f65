use crate::algorithms::ConnectivityFinder;
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
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// The mandatory edges of an undirected graph form a forest. Combined with a connectivity
/// constraint this yields a spanning tree over the final nodes.
#[derive(Clone, Copy, Debug)]
pub struct TreeNoCycleArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for TreeNoCycleArgs {
    type PropagatorImpl = TreeNoCyclePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            !context.graph_domain(self.graph).is_directed(),
            "trees are defined on undirected graphs"
        );
        context.register(self.graph, DomainEvents::ADD_ARC, LocalId::from(0));

        let num_nodes = context.graph_domain(self.graph).num_nodes();
        TreeNoCyclePropagator {
            graph: self.graph,
            monitor: GraphDeltaMonitor::new(&mut context, self.graph),
            components: TrailedUnionFind::new(&mut context, num_nodes),
            initialised: context.new_trailed_integer(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TreeNoCyclePropagator {
    graph: GraphVariable,
    monitor: GraphDeltaMonitor,
    components: TrailedUnionFind,
    initialised: TrailedInteger,
}

/// Union-find over trailed integers, using union by size without path compression. The members
/// of every component are linked in a circular list.
#[derive(Clone, Debug)]
struct TrailedUnionFind {
    parent: Box<[TrailedInteger]>,
    size: Box<[TrailedInteger]>,
    next: Box<[TrailedInteger]>,
}

impl TrailedUnionFind {
    fn new(context: &mut impl ManipulateTrailedValues, num_nodes: usize) -> Self {
        TrailedUnionFind {
            parent: (0..num_nodes)
                .map(|node| context.new_trailed_integer(node as i64))
                .collect(),
            size: (0..num_nodes)
                .map(|_| context.new_trailed_integer(1))
                .collect(),
            next: (0..num_nodes)
                .map(|node| context.new_trailed_integer(node as i64))
                .collect(),
        }
    }

    fn find(&self, context: &impl ReadDomains, mut node: usize) -> usize {
        loop {
            let parent = context.value(self.parent[node]) as usize;
            if parent == node {
                return node;
            }
            node = parent;
        }
    }

    fn size_of(&self, context: &impl ReadDomains, root: usize) -> usize {
        context.value(self.size[root]) as usize
    }

    fn members(&self, context: &impl ReadDomains, root: usize) -> Vec<usize> {
        let mut members = vec![root];
        let mut current = context.value(self.next[root]) as usize;
        while current != root {
            members.push(current);
            current = context.value(self.next[current]) as usize;
        }
        members
    }

    /// Joins the components with the given roots, returning the new root.
    fn union(&self, context: &mut impl ManipulateTrailedValues, a: usize, b: usize) -> usize {
        let (small, large) = if self.size_of(&*context, a) < self.size_of(&*context, b) {
            (a, b)
        } else {
            (b, a)
        };
        let size = self.size_of(&*context, small) + self.size_of(&*context, large);
        context.assign(self.parent[small], large as i64);
        context.assign(self.size[large], size as i64);

        let next_small = context.value(self.next[small]);
        let next_large = context.value(self.next[large]);
        context.assign(self.next[small], next_large);
        context.assign(self.next[large], next_small);
        large
    }
}

impl TreeNoCyclePropagator {
    fn on_edge_enforced(
        &self,
        context: &mut PropagationContext,
        u: usize,
        v: usize,
    ) -> PropagationStatusCP {
        if u == v {
            return Err(PropagatorConflict::new("a mandatory loop is a cycle").into());
        }
        let root_u = self.components.find(&*context, u);
        let root_v = self.components.find(&*context, v);
        if root_u == root_v {
            return Err(PropagatorConflict::new("the mandatory edges close a cycle").into());
        }

        // Every optional edge between the two components would now close a cycle.
        let (small, other) = if self.components.size_of(&*context, root_u)
            < self.components.size_of(&*context, root_v)
        {
            (root_u, root_v)
        } else {
            (root_v, root_u)
        };
        let domain = context.graph_domain(self.graph);
        let mut internal = Vec::new();
        for node in self.components.members(&*context, small) {
            for neighbour in domain.potential_successors_of(node).iter() {
                if !domain.is_mandatory_arc(node, neighbour)
                    && self.components.find(&*context, neighbour) == other
                {
                    internal.push((node, neighbour));
                }
            }
        }

        let _ = self.components.union(context, root_u, root_v);
        for (node, neighbour) in internal {
            let _ = context.remove_arc(self.graph, node, neighbour)?;
        }
        Ok(())
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
        let edges = domain.kernel().arcs().collect::<Vec<_>>();

        for (u, v) in edges {
            self.on_edge_enforced(context, u, v)?;
        }
        for node in loops {
            let _ = context.remove_arc(self.graph, node, node)?;
        }
        Ok(())
    }
}

impl Propagator for TreeNoCyclePropagator {
    fn name(&self) -> &str {
        "TreeNoCycle"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.value(self.initialised) == 0 {
            return self.propagate_from_scratch(&mut context);
        }

        let delta = self.monitor.freeze(&context);
        for (u, v) in delta.arcs(GraphDomainEvent::AddArc) {
            self.on_edge_enforced(&mut context, u, v)?;
        }
        self.monitor.unfreeze(&mut context, delta);
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        if is_forest(domain.envelope()) {
            Entailment::True
        } else if !is_forest(domain.kernel()) {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}

/// Whether the undirected graph contains no cycle.
fn is_forest(graph: &Graph) -> bool {
    let mut finder = ConnectivityFinder::default();
    finder.find_all_components(graph);
    graph.arcs().all(|(u, v)| u != v) && graph.num_arcs() + finder.num_cc() == graph.node_count()
}
