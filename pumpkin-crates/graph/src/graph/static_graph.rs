use itertools::Either;

use crate::containers::SparseSet;

/// A graph over the node universe `0..n`, either directed or undirected.
///
/// Nodes are stored in a [`SparseSet`], and every node has a sparse-set adjacency row. For
/// undirected graphs the adjacency is symmetric and the row of a node holds its neighbours; for
/// directed graphs separate successor and predecessor rows are kept. Loops `(i, i)` are allowed.
///
/// Adding an arc adds its endpoints; removing a node removes its incident arcs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    nodes: SparseSet,
    successors: Vec<SparseSet>,
    /// Empty for undirected graphs.
    predecessors: Vec<SparseSet>,
    num_arcs: usize,
}

impl Graph {
    /// Creates a graph over `0..num_nodes` without any nodes or arcs.
    pub fn new(num_nodes: usize, directed: bool) -> Graph {
        Graph {
            directed,
            nodes: SparseSet::new_empty(num_nodes),
            successors: (0..num_nodes)
                .map(|_| SparseSet::new_empty(num_nodes))
                .collect(),
            predecessors: if directed {
                (0..num_nodes)
                    .map(|_| SparseSet::new_empty(num_nodes))
                    .collect()
            } else {
                vec![]
            },
            num_arcs: 0,
        }
    }

    /// Creates a graph over `0..num_nodes` containing every node and no arcs.
    pub fn with_all_nodes(num_nodes: usize, directed: bool) -> Graph {
        let mut graph = Graph::new(num_nodes, directed);
        for node in 0..num_nodes {
            let _ = graph.add_node(node);
        }
        graph
    }

    /// Creates the complete graph over `0..num_nodes`, without loops.
    pub fn complete(num_nodes: usize, directed: bool) -> Graph {
        let mut graph = Graph::with_all_nodes(num_nodes, directed);
        for from in 0..num_nodes {
            for to in 0..num_nodes {
                if from != to {
                    let _ = graph.add_arc(from, to);
                }
            }
        }
        graph
    }

    /// The size of the node universe.
    pub fn num_nodes(&self) -> usize {
        self.successors.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> &SparseSet {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    pub fn contains_node(&self, node: usize) -> bool {
        self.nodes.contains(node)
    }

    pub fn add_node(&mut self, node: usize) -> bool {
        self.nodes.insert(node)
    }

    /// Removes `node` together with all of its incident arcs.
    pub fn remove_node(&mut self, node: usize) -> bool {
        if !self.nodes.contains(node) {
            return false;
        }
        let successors = self.successors[node].iter().collect::<Vec<_>>();
        for successor in successors {
            let _ = self.remove_arc(node, successor);
        }
        if self.directed {
            let predecessors = self.predecessors[node].iter().collect::<Vec<_>>();
            for predecessor in predecessors {
                let _ = self.remove_arc(predecessor, node);
            }
        }
        self.nodes.remove(node)
    }

    /// Adds the arc `(from, to)`; for undirected graphs this is the edge `{from, to}`.
    pub fn add_arc(&mut self, from: usize, to: usize) -> bool {
        if self.contains_arc(from, to) {
            return false;
        }
        let _ = self.nodes.insert(from);
        let _ = self.nodes.insert(to);
        let _ = self.successors[from].insert(to);
        if self.directed {
            let _ = self.predecessors[to].insert(from);
        } else {
            let _ = self.successors[to].insert(from);
        }
        self.num_arcs += 1;
        true
    }

    pub fn remove_arc(&mut self, from: usize, to: usize) -> bool {
        if !self.contains_arc(from, to) {
            return false;
        }
        let _ = self.successors[from].remove(to);
        if self.directed {
            let _ = self.predecessors[to].remove(from);
        } else {
            let _ = self.successors[to].remove(from);
        }
        self.num_arcs -= 1;
        true
    }

    pub fn contains_arc(&self, from: usize, to: usize) -> bool {
        from < self.num_nodes() && self.successors[from].contains(to)
    }

    /// The successors of `node`, or its neighbours if the graph is undirected.
    pub fn successors_of(&self, node: usize) -> &SparseSet {
        &self.successors[node]
    }

    /// The predecessors of `node`, or its neighbours if the graph is undirected.
    pub fn predecessors_of(&self, node: usize) -> &SparseSet {
        if self.directed {
            &self.predecessors[node]
        } else {
            &self.successors[node]
        }
    }

    /// All nodes adjacent to `node` regardless of the orientation.
    ///
    /// For directed graphs a node which is both a successor and a predecessor is reported twice.
    pub fn neighbours_of(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        if self.directed {
            Either::Left(
                self.successors[node]
                    .iter()
                    .chain(self.predecessors[node].iter()),
            )
        } else {
            Either::Right(self.successors[node].iter())
        }
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.successors[node].len()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.predecessors_of(node).len()
    }

    /// Iterates over the arcs of the graph; undirected edges are reported once as `(i, j)` with
    /// `i <= j`.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().flat_map(move |from| {
            self.successors[from]
                .iter()
                .filter(move |&to| self.directed || from <= to)
                .map(move |to| (from, to))
        })
    }

    /// Whether `self` is a subgraph of `other`.
    pub fn is_subgraph_of(&self, other: &Graph) -> bool {
        self.nodes.iter().all(|node| other.contains_node(node))
            && self.arcs().all(|(from, to)| other.contains_arc(from, to))
    }
}
