//! Dominator trees of flow graphs.
//!
//! A node `y` dominates a node `x` if every path from the root to `x` passes through `y`. The
//! [`DominatorsFinder`] computes the immediate dominator of every node reachable from the root,
//! and afterwards answers dominance queries in constant time through the pre- and post-order
//! numbers of the dominator tree.
mod alpha;
mod flow_graph;
mod simple;

pub use flow_graph::FlowGraph;

/// The algorithm used to compute immediate dominators. Both produce the same tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DominatorAlgorithm {
    /// Iterative data-flow analysis over the reverse post-order (Cooper, Harvey and Kennedy).
    Simple,
    /// Lengauer and Tarjan, with path compression.
    #[default]
    Alpha,
}

/// The depth-first numbering of the nodes reachable from the root.
#[derive(Debug, Clone, Default)]
pub(crate) struct DepthFirstOrder {
    /// The nodes in pre-order.
    pub(crate) vertex: Vec<usize>,
    /// The pre-order number of every node, [`None`] if unreachable.
    pub(crate) number: Vec<Option<usize>>,
    /// The pre-order number of the depth-first parent of every numbered node.
    pub(crate) parent: Vec<usize>,
    /// The nodes in post-order.
    pub(crate) post_order: Vec<usize>,
}

impl DepthFirstOrder {
    fn compute(&mut self, graph: &FlowGraph, root: usize) {
        let num_nodes = graph.num_nodes();
        self.vertex.clear();
        self.number.clear();
        self.number.resize(num_nodes, None);
        self.parent.clear();
        self.post_order.clear();

        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        self.number[root] = Some(0);
        self.vertex.push(root);
        self.parent.push(0);

        while let Some(&(node, position)) = stack.last() {
            let successors = graph.successors_of(node);
            if position < successors.len() {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                let successor = successors[position];
                if graph.contains_node(successor) && self.number[successor].is_none() {
                    let parent_number = self.number[node].unwrap_or(0);
                    self.number[successor] = Some(self.vertex.len());
                    self.vertex.push(successor);
                    self.parent.push(parent_number);
                    stack.push((successor, 0));
                }
            } else {
                let _ = stack.pop();
                self.post_order.push(node);
            }
        }
    }
}

/// Computes immediate dominators on a [`FlowGraph`].
#[derive(Debug, Clone, Default)]
pub struct DominatorsFinder {
    algorithm: DominatorAlgorithm,
    order: DepthFirstOrder,
    root: usize,
    immediate_dominator: Vec<Option<usize>>,
    tree_pre: Vec<usize>,
    tree_post: Vec<usize>,
}

impl DominatorsFinder {
    pub fn new(algorithm: DominatorAlgorithm) -> Self {
        DominatorsFinder {
            algorithm,
            ..Default::default()
        }
    }

    /// Computes the dominator tree of `graph` rooted at `root`. Returns `false` if some node of
    /// the graph cannot be reached from the root, in which case the tree is not computed.
    pub fn find_dominators(&mut self, graph: &FlowGraph, root: usize) -> bool {
        self.root = root;
        self.order.compute(graph, root);

        if graph.nodes().any(|node| self.order.number[node].is_none()) {
            return false;
        }

        self.immediate_dominator = match self.algorithm {
            DominatorAlgorithm::Simple => simple::immediate_dominators(graph, &self.order),
            DominatorAlgorithm::Alpha => alpha::immediate_dominators(graph, &self.order),
        };
        self.number_dominator_tree(graph.num_nodes());
        true
    }

    /// The immediate dominator of `node`; [`None`] for the root and for unreachable nodes.
    pub fn immediate_dominator_of(&self, node: usize) -> Option<usize> {
        if node == self.root {
            return None;
        }
        self.immediate_dominator.get(node).copied().flatten()
    }

    /// Whether `dominator` dominates `node`. Every node dominates itself.
    pub fn is_dominated_by(&self, node: usize, dominator: usize) -> bool {
        if self.order.number.get(node).copied().flatten().is_none()
            || self.order.number.get(dominator).copied().flatten().is_none()
        {
            return false;
        }
        self.tree_pre[dominator] <= self.tree_pre[node]
            && self.tree_post[node] <= self.tree_post[dominator]
    }

    /// The dominators of `node` from its immediate dominator up to the root.
    pub fn dominators_of(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.immediate_dominator_of(node), |&dominator| {
            self.immediate_dominator_of(dominator)
        })
    }

    /// Numbers the dominator tree in pre- and post-order with one shared counter.
    fn number_dominator_tree(&mut self, num_nodes: usize) {
        let mut children = vec![Vec::new(); num_nodes];
        for &node in &self.order.vertex {
            if let Some(dominator) = self.immediate_dominator_of(node) {
                children[dominator].push(node);
            }
        }

        self.tree_pre.clear();
        self.tree_pre.resize(num_nodes, 0);
        self.tree_post.clear();
        self.tree_post.resize(num_nodes, 0);

        let mut counter = 0;
        let mut stack = vec![(self.root, 0)];
        self.tree_pre[self.root] = counter;
        counter += 1;

        while let Some(&(node, position)) = stack.last() {
            if position < children[node].len() {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                let child = children[node][position];
                self.tree_pre[child] = counter;
                counter += 1;
                stack.push((child, 0));
            } else {
                let _ = stack.pop();
                self.tree_post[node] = counter;
                counter += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The example of Lengauer and Tarjan (1979), with R = 0, A..L = 1..12.
    fn lengauer_tarjan_example() -> FlowGraph {
        let arcs = [
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 4),
            (2, 1),
            (2, 4),
            (2, 5),
            (3, 6),
            (3, 7),
            (4, 12),
            (5, 8),
            (6, 9),
            (7, 9),
            (7, 10),
            (8, 5),
            (8, 11),
            (9, 11),
            (10, 9),
            (11, 0),
            (11, 9),
            (12, 8),
        ];
        let mut graph = FlowGraph::new(13);
        for (from, to) in arcs {
            graph.add_arc(from, to);
        }
        graph
    }

    const EXPECTED: [Option<usize>; 13] = [
        None,
        Some(0),
        Some(0),
        Some(0),
        Some(0),
        Some(0),
        Some(3),
        Some(3),
        Some(0),
        Some(0),
        Some(7),
        Some(0),
        Some(4),
    ];

    fn check(algorithm: DominatorAlgorithm) {
        let graph = lengauer_tarjan_example();
        let mut finder = DominatorsFinder::new(algorithm);
        assert!(finder.find_dominators(&graph, 0));

        for (node, expected) in EXPECTED.iter().enumerate() {
            assert_eq!(finder.immediate_dominator_of(node), *expected, "node {node}");
        }
        assert!(finder.is_dominated_by(10, 3));
        assert!(finder.is_dominated_by(10, 10));
        assert!(!finder.is_dominated_by(9, 3));
        assert_eq!(finder.dominators_of(10).collect::<Vec<_>>(), vec![7, 3, 0]);
    }

    #[test]
    fn simple_algorithm_on_the_classic_example() {
        check(DominatorAlgorithm::Simple);
    }

    #[test]
    fn alpha_algorithm_on_the_classic_example() {
        check(DominatorAlgorithm::Alpha);
    }

    #[test]
    fn unreachable_nodes_are_reported() {
        let mut graph = FlowGraph::new(3);
        graph.add_arc(0, 1);
        graph.add_node(2);

        let mut finder = DominatorsFinder::default();
        assert!(!finder.find_dominators(&graph, 0));
    }

    #[test]
    fn absent_nodes_are_ignored() {
        let mut graph = FlowGraph::new(4);
        graph.add_arc(0, 1);
        graph.add_arc(1, 2);

        let mut finder = DominatorsFinder::new(DominatorAlgorithm::Simple);
        assert!(finder.find_dominators(&graph, 0));
        assert_eq!(finder.immediate_dominator_of(2), Some(1));
        assert_eq!(finder.immediate_dominator_of(3), None);
    }
}
