use crate::graph::Graph;

/// Computes the strongly connected components of a directed [`Graph`] with an iterative version
/// of Tarjan's algorithm.
///
/// Components are numbered in the order in which Tarjan's algorithm completes them, which is a
/// reverse topological order of the condensation: an arc between two components always goes from
/// a higher to a lower number.
#[derive(Debug, Clone, Default)]
pub struct StrongConnectivityFinder {
    num_scc: usize,
    scc_of_node: Vec<Option<usize>>,
    first_node_of_scc: Vec<usize>,
    next_node_in_scc: Vec<Option<usize>>,
    size_of_scc: Vec<usize>,
    is_sink: Vec<bool>,

    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
}

impl StrongConnectivityFinder {
    pub fn num_scc(&self) -> usize {
        self.num_scc
    }

    /// The component of `node`, [`None`] if the node is not part of the graph.
    pub fn scc_of_node(&self, node: usize) -> Option<usize> {
        self.scc_of_node.get(node).copied().flatten()
    }

    pub fn first_node_of_scc(&self, scc: usize) -> usize {
        self.first_node_of_scc[scc]
    }

    pub fn next_node_in_scc(&self, node: usize) -> Option<usize> {
        self.next_node_in_scc[node]
    }

    pub fn size_of_scc(&self, scc: usize) -> usize {
        self.size_of_scc[scc]
    }

    pub fn nodes_of_scc(&self, scc: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.first_node_of_scc[scc]), |&node| {
            self.next_node_in_scc[node]
        })
    }

    /// Whether no arc leaves the component `scc`.
    pub fn is_sink_scc(&self, scc: usize) -> bool {
        self.is_sink[scc]
    }

    /// Fills the component tables for `graph`.
    pub fn find_all_sccs(&mut self, graph: &Graph) {
        let num_nodes = graph.num_nodes();

        self.num_scc = 0;
        self.scc_of_node.clear();
        self.scc_of_node.resize(num_nodes, None);
        self.next_node_in_scc.clear();
        self.next_node_in_scc.resize(num_nodes, None);
        self.first_node_of_scc.clear();
        self.size_of_scc.clear();
        self.is_sink.clear();

        self.index.clear();
        self.index.resize(num_nodes, None);
        self.low.clear();
        self.low.resize(num_nodes, 0);
        self.on_stack.clear();
        self.on_stack.resize(num_nodes, false);
        self.stack.clear();

        let mut time = 0;
        // (node, position of the next successor to explore)
        let mut call_stack: Vec<(usize, usize)> = Vec::new();

        for root in graph.nodes().iter() {
            if self.index[root].is_some() {
                continue;
            }
            self.visit(root, &mut time);
            call_stack.push((root, 0));

            while let Some((node, position)) = call_stack.last_mut().map(|frame| *frame) {
                let successors = graph.successors_of(node);
                if position < successors.len() {
                    if let Some(frame) = call_stack.last_mut() {
                        frame.1 += 1;
                    }
                    let successor = successors.get(position);
                    match self.index[successor] {
                        None => {
                            self.visit(successor, &mut time);
                            call_stack.push((successor, 0));
                        }
                        Some(index) if self.on_stack[successor] => {
                            self.low[node] = self.low[node].min(index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                let _ = call_stack.pop();
                if let Some(&(parent, _)) = call_stack.last() {
                    self.low[parent] = self.low[parent].min(self.low[node]);
                }
                if Some(self.low[node]) == self.index[node] {
                    self.pop_component(node);
                }
            }
        }

        self.is_sink.resize(self.num_scc, true);
        for (from, to) in graph.arcs() {
            if let (Some(scc_from), Some(scc_to)) = (self.scc_of_node[from], self.scc_of_node[to])
            {
                if scc_from != scc_to {
                    self.is_sink[scc_from] = false;
                }
            }
        }
    }

    fn visit(&mut self, node: usize, time: &mut usize) {
        self.index[node] = Some(*time);
        self.low[node] = *time;
        *time += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    fn pop_component(&mut self, root: usize) {
        let scc = self.num_scc;
        self.num_scc += 1;
        self.size_of_scc.push(0);
        self.first_node_of_scc.push(root);

        let mut previous: Option<usize> = None;
        while let Some(node) = self.stack.pop() {
            self.on_stack[node] = false;
            self.scc_of_node[node] = Some(scc);
            self.size_of_scc[scc] += 1;

            match previous {
                None => self.first_node_of_scc[scc] = node,
                Some(previous) => self.next_node_in_scc[previous] = Some(node),
            }
            previous = Some(node);

            if node == root {
                break;
            }
        }
    }
}
