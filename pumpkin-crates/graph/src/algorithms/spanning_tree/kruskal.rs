use std::collections::VecDeque;

use itertools::Itertools;

use super::SpanningTreeError;
use crate::graph::Graph;

/// Computes a minimum spanning tree with Kruskal's algorithm, and the marginal costs used to
/// filter edges.
///
/// Mandatory edges are taken first. After [`KruskalFilter::compute`], the filter answers:
/// * for an edge outside the tree, the cost of the cheapest tree containing it
///   ([`KruskalFilter::cost_with_edge`]);
/// * for an optional tree edge, the cost of the cheapest tree avoiding it
///   ([`KruskalFilter::cost_without_edge`]).
#[derive(Debug, Clone, Default)]
pub struct KruskalFilter {
    edges: Vec<(usize, usize)>,
    representative: Vec<usize>,
    rank: Vec<u32>,

    tree: Vec<(usize, usize)>,
    cost: f64,

    tree_adjacency: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    depth: Vec<usize>,
    /// The cost of the edge to the parent in the rooted tree.
    parent_cost: Vec<f64>,
    parent_is_mandatory: Vec<bool>,
    /// The cheapest non-tree edge which reconnects the tree when the edge to the parent is
    /// removed.
    replacement_cost: Vec<Option<f64>>,
}

impl KruskalFilter {
    pub fn tree(&self) -> &[(usize, usize)] {
        &self.tree
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether the edge `(u, v)` is part of the computed tree.
    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        self.parent[u] == Some(v) || self.parent[v] == Some(u)
    }

    /// Computes a spanning tree over the nodes of `envelope` other than `excluded`.
    pub fn compute(
        &mut self,
        envelope: &Graph,
        kernel: &Graph,
        costs: &[Vec<f64>],
        excluded: Option<usize>,
    ) -> Result<(), SpanningTreeError> {
        let num_nodes = envelope.num_nodes();
        let is_spanned = |node: usize| envelope.contains_node(node) && Some(node) != excluded;

        self.edges.clear();
        self.edges.extend(
            envelope
                .arcs()
                .filter(|&(u, v)| u != v && is_spanned(u) && is_spanned(v)),
        );
        self.edges.sort_by(|&(a, b), &(c, d)| {
            let first_optional = !kernel.contains_arc(a, b);
            let second_optional = !kernel.contains_arc(c, d);
            first_optional
                .cmp(&second_optional)
                .then(costs[a][b].total_cmp(&costs[c][d]))
        });

        self.representative.clear();
        self.representative.extend(0..num_nodes);
        self.rank.clear();
        self.rank.resize(num_nodes, 0);
        self.tree.clear();
        self.cost = 0.0;

        for index in 0..self.edges.len() {
            let (u, v) = self.edges[index];
            let root_u = self.find(u);
            let root_v = self.find(v);

            if root_u == root_v {
                if kernel.contains_arc(u, v) {
                    return Err(SpanningTreeError::MandatoryCycle);
                }
                continue;
            }

            self.union(root_u, root_v);
            self.tree.push((u, v));
            self.cost += costs[u][v];
        }

        let num_spanned = (0..num_nodes).filter(|&node| is_spanned(node)).count();
        if num_spanned > 0 && self.tree.len() + 1 != num_spanned {
            return Err(SpanningTreeError::Disconnected);
        }

        self.root_tree(num_nodes, kernel, costs);
        self.compute_replacement_costs(kernel, costs);
        Ok(())
    }

    /// The cost of the cheapest tree which contains the non-tree edge `(u, v)`: the edge replaces
    /// the most expensive optional edge on the tree path between its endpoints. [`None`] if that
    /// path only consists of mandatory edges.
    pub fn cost_with_edge(&self, u: usize, v: usize, costs: &[Vec<f64>]) -> Option<f64> {
        let mut heaviest: Option<f64> = None;
        self.walk_path(u, v, |node| {
            if !self.parent_is_mandatory[node] {
                let cost = self.parent_cost[node];
                heaviest = Some(heaviest.map_or(cost, |heaviest: f64| heaviest.max(cost)));
            }
        });
        heaviest.map(|heaviest| self.cost + costs[u][v] - heaviest)
    }

    /// The cost of the cheapest tree which does not contain the tree edge `(u, v)`. [`None`] if
    /// no other edge reconnects the tree.
    pub fn cost_without_edge(&self, u: usize, v: usize, costs: &[Vec<f64>]) -> Option<f64> {
        let child = if self.parent[u] == Some(v) { u } else { v };
        self.replacement_cost[child].map(|replacement| self.cost - costs[u][v] + replacement)
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.representative[root] != root {
            root = self.representative[root];
        }
        let mut current = node;
        while self.representative[current] != root {
            let next = self.representative[current];
            self.representative[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, root_u: usize, root_v: usize) {
        match self.rank[root_u].cmp(&self.rank[root_v]) {
            std::cmp::Ordering::Less => self.representative[root_u] = root_v,
            std::cmp::Ordering::Greater => self.representative[root_v] = root_u,
            std::cmp::Ordering::Equal => {
                self.representative[root_v] = root_u;
                self.rank[root_u] += 1;
            }
        }
    }

    fn root_tree(&mut self, num_nodes: usize, kernel: &Graph, costs: &[Vec<f64>]) {
        self.tree_adjacency.resize_with(num_nodes, Vec::new);
        self.tree_adjacency.iter_mut().for_each(Vec::clear);
        for &(u, v) in &self.tree {
            self.tree_adjacency[u].push(v);
            self.tree_adjacency[v].push(u);
        }

        self.parent.clear();
        self.parent.resize(num_nodes, None);
        self.depth.clear();
        self.depth.resize(num_nodes, 0);
        self.parent_cost.clear();
        self.parent_cost.resize(num_nodes, 0.0);
        self.parent_is_mandatory.clear();
        self.parent_is_mandatory.resize(num_nodes, false);

        let Some(&(root, _)) = self.tree.first() else {
            return;
        };
        let mut visited = vec![false; num_nodes];
        let mut queue = VecDeque::from([root]);
        visited[root] = true;

        while let Some(node) = queue.pop_front() {
            for index in 0..self.tree_adjacency[node].len() {
                let child = self.tree_adjacency[node][index];
                if visited[child] {
                    continue;
                }
                visited[child] = true;
                self.parent[child] = Some(node);
                self.depth[child] = self.depth[node] + 1;
                self.parent_cost[child] = costs[node][child];
                self.parent_is_mandatory[child] = kernel.contains_arc(node, child);
                queue.push_back(child);
            }
        }
    }

    /// Assigns to every tree edge the cheapest non-tree edge covering it, by processing the
    /// non-tree edges in order of increasing cost.
    fn compute_replacement_costs(&mut self, kernel: &Graph, costs: &[Vec<f64>]) {
        let num_nodes = self.parent.len();
        self.replacement_cost.clear();
        self.replacement_cost.resize(num_nodes, None);

        let non_tree_edges = self
            .edges
            .iter()
            .copied()
            .filter(|&(u, v)| !self.contains_edge(u, v) && !kernel.contains_arc(u, v))
            .sorted_by(|&(a, b), &(c, d)| costs[a][b].total_cmp(&costs[c][d]))
            .collect::<Vec<_>>();

        let mut replacement_cost = std::mem::take(&mut self.replacement_cost);
        for (u, v) in non_tree_edges {
            self.walk_path(u, v, |node| {
                if replacement_cost[node].is_none() {
                    replacement_cost[node] = Some(costs[u][v]);
                }
            });
        }
        self.replacement_cost = replacement_cost;
    }

    /// Calls `f` with the child endpoint of every tree edge on the path between `u` and `v`.
    fn walk_path(&self, mut u: usize, mut v: usize, mut f: impl FnMut(usize)) {
        while u != v {
            if self.depth[u] < self.depth[v] {
                std::mem::swap(&mut u, &mut v);
            }
            let Some(parent) = self.parent[u] else {
                return;
            };
            f(u);
            u = parent;
        }
    }
}
