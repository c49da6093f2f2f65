use fixedbitset::FixedBitSet;

use crate::algorithms::dominators::DominatorAlgorithm;
use crate::algorithms::dominators::DominatorsFinder;
use crate::algorithms::dominators::FlowGraph;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::graph::GraphDomain;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// The directed graph is an arborescence rooted at `root`, or a forest of arborescences when no
/// root is given. Every node is reached from its root, and no arc points back towards a node
/// dominating its tail.
///
/// That every node has a single parent is left to a degree constraint.
#[derive(Clone, Copy, Debug)]
pub struct ArborescenceArgs {
    pub graph: GraphVariable,
    pub root: Option<usize>,
    pub algorithm: DominatorAlgorithm,
}

/// Every node of the directed graph can be reached from `root`. Cycles are allowed.
#[derive(Clone, Copy, Debug)]
pub struct ReachabilityArgs {
    pub graph: GraphVariable,
    pub root: usize,
    pub algorithm: DominatorAlgorithm,
}

impl PropagatorConstructor for ArborescenceArgs {
    type PropagatorImpl = DominatorPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        DominatorPropagator::new(context, self.graph, self.root, self.algorithm, true)
    }
}

impl PropagatorConstructor for ReachabilityArgs {
    type PropagatorImpl = DominatorPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        DominatorPropagator::new(context, self.graph, Some(self.root), self.algorithm, false)
    }
}

/// Reasons on the dominator tree of the envelope, seen from the root (or from a virtual root
/// pointing at every node without a mandatory predecessor).
///
/// Nodes out of reach are removed. The dominators of a mandatory node are enforced, and so is
/// the arc from its immediate dominator if every other way in passes through the node itself.
/// For arborescences, an arc `(x, y)` where `y` dominates `x` would close a cycle and is removed,
/// as is every loop.
#[derive(Clone, Debug)]
pub struct DominatorPropagator {
    graph: GraphVariable,
    root: Option<usize>,
    forbid_back_arcs: bool,

    flow_graph: FlowGraph,
    finder: DominatorsFinder,
    reached: FixedBitSet,
    stack: Vec<usize>,
}

impl DominatorPropagator {
    fn new(
        mut context: PropagatorConstructorContext,
        graph: GraphVariable,
        root: Option<usize>,
        algorithm: DominatorAlgorithm,
        forbid_back_arcs: bool,
    ) -> Self {
        let domain = context.graph_domain(graph);
        pumpkin_assert_simple!(domain.is_directed(), "dominators are defined on directed graphs");
        let num_nodes = domain.num_nodes();
        pumpkin_assert_simple!(root.iter().all(|&root| root < num_nodes));

        context.register(graph, DomainEvents::ANY_GRAPH, LocalId::from(0));

        DominatorPropagator {
            graph,
            root,
            forbid_back_arcs,
            flow_graph: FlowGraph::new(num_nodes + 1),
            finder: DominatorsFinder::new(algorithm),
            reached: FixedBitSet::with_capacity(num_nodes + 1),
            stack: Vec::with_capacity(num_nodes + 1),
        }
    }

    /// The root of the flow graph; the extra node `n` in forest mode.
    fn flow_root(&self, domain: &GraphDomain) -> usize {
        self.root.unwrap_or(domain.num_nodes())
    }

    /// Whether the virtual root may point at `node`.
    fn can_be_root(domain: &GraphDomain, node: usize) -> bool {
        domain
            .mandatory_predecessors_of(node)
            .iter()
            .all(|predecessor| predecessor == node)
    }

    /// Whether the arc `(from, to)` can be the arc entering `to`. In an arborescence a node with
    /// a mandatory parent has no other way in.
    fn can_enter(&self, domain: &GraphDomain, from: usize, to: usize) -> bool {
        if from == to || Some(to) == self.root {
            return false;
        }
        !self.forbid_back_arcs
            || domain.is_mandatory_arc(from, to)
            || Self::can_be_root(domain, to)
    }

    fn build_flow_graph(&mut self, domain: &GraphDomain) {
        let flow_root = self.flow_root(domain);
        self.flow_graph.clear();
        self.flow_graph.add_node(flow_root);

        for node in domain.potential_nodes().iter() {
            self.flow_graph.add_node(node);
            for successor in domain.potential_successors_of(node).iter() {
                if self.can_enter(domain, node, successor) {
                    self.flow_graph.add_arc(node, successor);
                }
            }
            if self.root.is_none() && Self::can_be_root(domain, node) {
                self.flow_graph.add_arc(flow_root, node);
            }
        }
    }

    /// Marks the nodes of the flow graph reachable from its root.
    fn mark_reachable(&mut self, flow_root: usize) {
        self.reached.clear();
        self.stack.clear();
        self.reached.insert(flow_root);
        self.stack.push(flow_root);

        while let Some(node) = self.stack.pop() {
            for &successor in self.flow_graph.successors_of(node) {
                if !self.reached.put(successor) {
                    self.stack.push(successor);
                }
            }
        }
    }

    /// Enforces the dominators of every mandatory node, and the arcs entering it which are
    /// unavoidable.
    fn enforce_dominators(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let num_nodes = domain.num_nodes();

        let mut nodes = Vec::new();
        let mut arcs = Vec::new();
        for node in domain.mandatory_nodes().iter() {
            nodes.extend(self.finder.dominators_of(node).filter(|&d| d < num_nodes));

            let Some(dominator) = self.finder.immediate_dominator_of(node) else {
                continue;
            };
            if dominator == num_nodes || !domain.is_potential_arc(dominator, node) {
                continue;
            }
            let unavoidable = domain
                .potential_predecessors_of(node)
                .iter()
                .filter(|&predecessor| predecessor != dominator && predecessor != node)
                .all(|predecessor| self.finder.is_dominated_by(predecessor, node));
            if unavoidable {
                arcs.push((dominator, node));
            }
        }

        for node in nodes {
            let _ = context.enforce_node(self.graph, node)?;
        }
        for (from, to) in arcs {
            let _ = context.enforce_arc(self.graph, from, to)?;
        }
        Ok(())
    }
}

impl Propagator for DominatorPropagator {
    fn name(&self) -> &str {
        if self.forbid_back_arcs {
            "Arborescence"
        } else {
            "Reachability"
        }
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if let Some(root) = self.root {
            let _ = context.enforce_node(self.graph, root)?;
            if self.forbid_back_arcs {
                let entering = context
                    .graph_domain(self.graph)
                    .potential_predecessors_of(root)
                    .iter()
                    .collect::<Vec<_>>();
                for predecessor in entering {
                    let _ = context.remove_arc(self.graph, predecessor, root)?;
                }
            }
        }

        let domain = context.graph_domain(self.graph);
        let flow_root = self.flow_root(domain);
        self.build_flow_graph(domain);
        self.mark_reachable(flow_root);
        let unreachable = domain
            .potential_nodes()
            .iter()
            .filter(|&node| !self.reached.contains(node))
            .collect::<Vec<_>>();
        if !unreachable.is_empty() {
            for node in unreachable {
                let _ = context.remove_node(self.graph, node)?;
            }
            self.build_flow_graph(context.graph_domain(self.graph));
        }

        if !self.finder.find_dominators(&self.flow_graph, flow_root) {
            return Err(PropagatorConflict::new("the root cannot reach all mandatory nodes").into());
        }

        if self.forbid_back_arcs {
            let domain = context.graph_domain(self.graph);
            let back_arcs = domain
                .envelope()
                .arcs()
                .filter(|&(from, to)| from == to || self.finder.is_dominated_by(from, to))
                .collect::<Vec<_>>();
            for (from, to) in back_arcs {
                let _ = context.remove_arc(self.graph, from, to)?;
            }
        }

        self.enforce_dominators(&mut context)
    }
}
