use std::collections::VecDeque;

use crate::graph::Graph;

/// Computes the (weakly) connected components of a [`Graph`] and its isthmuses.
///
/// The component tables are rebuilt from scratch on every call: `cc_of_node`, the first node of
/// every component, a linked list through the nodes of a component, and the component sizes.
/// Arc directions are ignored, and only the nodes of the graph are considered.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityFinder {
    num_cc: usize,
    cc_of_node: Vec<Option<usize>>,
    first_node_of_cc: Vec<usize>,
    next_node_in_cc: Vec<Option<usize>>,
    size_of_cc: Vec<usize>,

    isthmuses: Vec<(usize, usize)>,

    queue: VecDeque<usize>,
    adjacency: Vec<Vec<usize>>,
    pre_order: Vec<Option<usize>>,
    low: Vec<usize>,
    subtree_weight: Vec<i64>,
}

/// A frame of the iterative depth-first search used to find isthmuses.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    parent: Option<usize>,
    next_neighbour: usize,
    skipped_parent_edge: bool,
}

impl ConnectivityFinder {
    pub fn num_cc(&self) -> usize {
        self.num_cc
    }

    /// The component of `node`, [`None`] if the node is not part of the graph.
    pub fn cc_of_node(&self, node: usize) -> Option<usize> {
        self.cc_of_node.get(node).copied().flatten()
    }

    pub fn first_node_of_cc(&self, cc: usize) -> usize {
        self.first_node_of_cc[cc]
    }

    pub fn next_node_in_cc(&self, node: usize) -> Option<usize> {
        self.next_node_in_cc[node]
    }

    pub fn size_of_cc(&self, cc: usize) -> usize {
        self.size_of_cc[cc]
    }

    /// The nodes of the component `cc`.
    pub fn nodes_of_cc(&self, cc: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.first_node_of_cc[cc]), |&node| {
            self.next_node_in_cc[node]
        })
    }

    /// The isthmuses found by the last call to [`ConnectivityFinder::find_isthmuses`] or
    /// [`ConnectivityFinder::is_connected_and_find_isthmuses`]. The arcs are oriented as they
    /// appear in the graph.
    pub fn isthmuses(&self) -> &[(usize, usize)] {
        &self.isthmuses
    }

    fn reset(&mut self, num_nodes: usize) {
        self.num_cc = 0;
        self.cc_of_node.clear();
        self.cc_of_node.resize(num_nodes, None);
        self.next_node_in_cc.clear();
        self.next_node_in_cc.resize(num_nodes, None);
        self.first_node_of_cc.clear();
        self.size_of_cc.clear();
        self.isthmuses.clear();
    }

    /// Fills the component tables for `graph`.
    pub fn find_all_components(&mut self, graph: &Graph) {
        self.reset(graph.num_nodes());

        for root in graph.nodes().iter() {
            if self.cc_of_node[root].is_some() {
                continue;
            }

            let cc = self.num_cc;
            self.num_cc += 1;
            self.first_node_of_cc.push(root);
            self.size_of_cc.push(0);

            let mut last = root;
            self.cc_of_node[root] = Some(cc);
            self.queue.push_back(root);

            while let Some(node) = self.queue.pop_front() {
                self.size_of_cc[cc] += 1;
                if node != root {
                    self.next_node_in_cc[last] = Some(node);
                    last = node;
                }

                for neighbour in graph.neighbours_of(node) {
                    if self.cc_of_node[neighbour].is_none() {
                        self.cc_of_node[neighbour] = Some(cc);
                        self.queue.push_back(neighbour);
                    }
                }
            }
        }
    }

    /// Returns whether `graph` consists of at most one component, and if so records every
    /// isthmus of it.
    pub fn is_connected_and_find_isthmuses(&mut self, graph: &Graph) -> bool {
        self.find_all_components(graph);
        if self.num_cc > 1 {
            return false;
        }

        let weights = vec![1; graph.num_nodes()];
        self.search_isthmuses(graph, &weights);
        true
    }

    /// Fills the component tables and records every isthmus which separates two nodes with a
    /// positive weight; removing such an arc would disconnect those nodes.
    pub fn find_isthmuses(&mut self, graph: &Graph, weights: &[i64]) {
        self.find_all_components(graph);
        self.search_isthmuses(graph, weights);
    }

    /// Tarjan's bridge-finding algorithm, with an explicit stack. Every candidate bridge is
    /// kept if both sides of it carry weight.
    fn search_isthmuses(&mut self, graph: &Graph, weights: &[i64]) {
        let num_nodes = graph.num_nodes();
        self.isthmuses.clear();

        self.adjacency.resize_with(num_nodes, Vec::new);
        for node in 0..num_nodes {
            self.adjacency[node].clear();
            if graph.contains_node(node) {
                self.adjacency[node].extend(graph.neighbours_of(node));
            }
        }
        self.pre_order.clear();
        self.pre_order.resize(num_nodes, None);
        self.low.clear();
        self.low.resize(num_nodes, 0);
        self.subtree_weight.clear();
        self.subtree_weight
            .extend((0..num_nodes).map(|node| weights[node].max(0)));

        let mut total_weight_of_cc = vec![0_i64; self.num_cc];
        for node in graph.nodes().iter() {
            if let Some(cc) = self.cc_of_node[node] {
                total_weight_of_cc[cc] += weights[node].max(0);
            }
        }

        let mut time = 0;
        let mut stack: Vec<Frame> = Vec::new();

        for root in graph.nodes().iter() {
            if self.pre_order[root].is_some() {
                continue;
            }
            self.pre_order[root] = Some(time);
            self.low[root] = time;
            time += 1;
            stack.push(Frame {
                node: root,
                parent: None,
                next_neighbour: 0,
                skipped_parent_edge: false,
            });

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;

                if frame.next_neighbour < self.adjacency[node].len() {
                    let neighbour = self.adjacency[node][frame.next_neighbour];
                    frame.next_neighbour += 1;

                    if neighbour == node {
                        continue;
                    }
                    // Parallel arcs between the same pair are a cycle, so only the first
                    // occurrence of the parent is the tree edge.
                    if Some(neighbour) == frame.parent && !frame.skipped_parent_edge {
                        frame.skipped_parent_edge = true;
                        continue;
                    }

                    match self.pre_order[neighbour] {
                        Some(order) => self.low[node] = self.low[node].min(order),
                        None => {
                            self.pre_order[neighbour] = Some(time);
                            self.low[neighbour] = time;
                            time += 1;
                            stack.push(Frame {
                                node: neighbour,
                                parent: Some(node),
                                next_neighbour: 0,
                                skipped_parent_edge: false,
                            });
                        }
                    }
                    continue;
                }

                let finished = *frame;
                let _ = stack.pop();

                let Some(parent) = finished.parent else {
                    continue;
                };
                self.low[parent] = self.low[parent].min(self.low[node]);
                self.subtree_weight[parent] += self.subtree_weight[node];

                let parent_order = self.pre_order[parent].unwrap_or(0);
                if self.low[node] > parent_order {
                    let below = self.subtree_weight[node];
                    let total = self.cc_of_node[node].map_or(0, |cc| total_weight_of_cc[cc]);

                    if below > 0 && total - below > 0 {
                        let arc = if graph.contains_arc(parent, node) {
                            (parent, node)
                        } else {
                            (node, parent)
                        };
                        self.isthmuses.push(arc);
                    }
                }
            }
        }
    }
}
