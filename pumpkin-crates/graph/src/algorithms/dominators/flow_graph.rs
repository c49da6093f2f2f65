/// A directed graph on which dominators are computed.
///
/// Only the nodes which are added are considered to be part of the graph. Propagators usually
/// create it with one node more than the graph variable has, which serves as a virtual root.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    present: Vec<bool>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl FlowGraph {
    pub fn new(num_nodes: usize) -> FlowGraph {
        FlowGraph {
            present: vec![false; num_nodes],
            successors: vec![Vec::new(); num_nodes],
            predecessors: vec![Vec::new(); num_nodes],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.present.len()
    }

    /// Removes all nodes and arcs, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.present.iter_mut().for_each(|present| *present = false);
        self.successors.iter_mut().for_each(Vec::clear);
        self.predecessors.iter_mut().for_each(Vec::clear);
    }

    pub fn add_node(&mut self, node: usize) {
        self.present[node] = true;
    }

    pub fn contains_node(&self, node: usize) -> bool {
        self.present[node]
    }

    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter_map(|(node, &present)| present.then_some(node))
    }

    /// Adds the arc `(from, to)`, and both of its endpoints.
    pub fn add_arc(&mut self, from: usize, to: usize) {
        self.add_node(from);
        self.add_node(to);
        self.successors[from].push(to);
        self.predecessors[to].push(from);
    }

    pub fn successors_of(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    pub fn predecessors_of(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }
}
