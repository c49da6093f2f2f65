use crate::graph::Graph;

/// Computes a minimum spanning tree with Prim's algorithm on a dense cost matrix.
///
/// Mandatory edges (those in the kernel) are preferred over any optional edge, so the tree
/// contains every mandatory edge as long as they do not form a cycle. Used for the many cheap
/// iterations of the subgradient optimisation.
#[derive(Debug, Clone, Default)]
pub struct PrimBoundFinder {
    in_tree: Vec<bool>,
    key: Vec<Key>,
    parent: Vec<Option<usize>>,
    tree: Vec<(usize, usize)>,
    cost: f64,
}

/// The priority of attaching a node to the tree; mandatory edges first, then the cheapest.
#[derive(Debug, Clone, Copy)]
struct Key {
    optional: bool,
    cost: f64,
}

impl Key {
    const UNREACHABLE: Key = Key {
        optional: true,
        cost: f64::INFINITY,
    };

    fn is_better_than(&self, other: &Key) -> bool {
        (!self.optional && other.optional)
            || (self.optional == other.optional && self.cost < other.cost)
    }
}

impl PrimBoundFinder {
    /// The edges of the last computed tree.
    pub fn tree(&self) -> &[(usize, usize)] {
        &self.tree
    }

    /// The cost of the last computed tree.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Computes a spanning tree over the nodes of `envelope` other than `excluded`, with the
    /// given (symmetric) edge costs. Returns `false` if these nodes are not connected.
    pub fn compute(
        &mut self,
        envelope: &Graph,
        kernel: &Graph,
        costs: &[Vec<f64>],
        excluded: Option<usize>,
    ) -> bool {
        let num_nodes = envelope.num_nodes();
        self.in_tree.clear();
        self.in_tree.resize(num_nodes, false);
        self.key.clear();
        self.key.resize(num_nodes, Key::UNREACHABLE);
        self.parent.clear();
        self.parent.resize(num_nodes, None);
        self.tree.clear();
        self.cost = 0.0;

        let is_spanned = |node: usize| envelope.contains_node(node) && Some(node) != excluded;
        let num_spanned = (0..num_nodes).filter(|&node| is_spanned(node)).count();
        let Some(start) = (0..num_nodes).find(|&node| is_spanned(node)) else {
            return true;
        };

        let mut current = start;
        for _ in 0..num_spanned {
            self.in_tree[current] = true;
            if let Some(parent) = self.parent[current] {
                self.tree.push((parent, current));
                self.cost += costs[parent][current];
            }

            for neighbour in envelope.successors_of(current).iter() {
                if self.in_tree[neighbour] || !is_spanned(neighbour) {
                    continue;
                }
                let key = Key {
                    optional: !kernel.contains_arc(current, neighbour),
                    cost: costs[current][neighbour],
                };
                if key.is_better_than(&self.key[neighbour]) {
                    self.key[neighbour] = key;
                    self.parent[neighbour] = Some(current);
                }
            }

            let next = (0..num_nodes)
                .filter(|&node| is_spanned(node) && !self.in_tree[node])
                .filter(|&node| self.parent[node].is_some())
                .reduce(|best, node| {
                    if self.key[node].is_better_than(&self.key[best]) {
                        node
                    } else {
                        best
                    }
                });

            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        self.tree.len() + 1 == num_spanned
    }
}
