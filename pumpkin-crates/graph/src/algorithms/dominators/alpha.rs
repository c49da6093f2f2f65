use super::DepthFirstOrder;
use super::FlowGraph;

/// "A Fast Algorithm for Finding Dominators in a Flowgraph" - Lengauer and Tarjan (1979), the
/// variant with simple path compression.
///
/// All arrays are indexed by depth-first number; the root has number 0.
pub(super) fn immediate_dominators(
    graph: &FlowGraph,
    order: &DepthFirstOrder,
) -> Vec<Option<usize>> {
    let num_reachable = order.vertex.len();

    let mut forest = Forest {
        semi: (0..num_reachable).collect(),
        label: (0..num_reachable).collect(),
        ancestor: vec![None; num_reachable],
        path: Vec::new(),
    };
    let mut dominator: Vec<usize> = vec![0; num_reachable];
    let mut bucket: Vec<Vec<usize>> = vec![Vec::new(); num_reachable];

    for w in (1..num_reachable).rev() {
        let node = order.vertex[w];

        for &predecessor in graph.predecessors_of(node) {
            let Some(v) = order.number[predecessor] else {
                continue;
            };
            let u = forest.eval(v);
            if forest.semi[u] < forest.semi[w] {
                forest.semi[w] = forest.semi[u];
            }
        }
        bucket[forest.semi[w]].push(w);

        let parent = order.parent[w];
        forest.ancestor[w] = Some(parent);

        for v in std::mem::take(&mut bucket[parent]) {
            let u = forest.eval(v);
            dominator[v] = if forest.semi[u] < forest.semi[v] {
                u
            } else {
                parent
            };
        }
    }

    for w in 1..num_reachable {
        if dominator[w] != forest.semi[w] {
            dominator[w] = dominator[dominator[w]];
        }
    }

    let mut immediate_dominator = vec![None; graph.num_nodes()];
    immediate_dominator[order.vertex[0]] = Some(order.vertex[0]);
    for w in 1..num_reachable {
        immediate_dominator[order.vertex[w]] = Some(order.vertex[dominator[w]]);
    }
    immediate_dominator
}

/// The forest of processed nodes, with the minimum semi-dominator label on compressed paths.
struct Forest {
    semi: Vec<usize>,
    label: Vec<usize>,
    ancestor: Vec<Option<usize>>,
    path: Vec<usize>,
}

impl Forest {
    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v].is_none() {
            return v;
        }
        self.compress(v);
        self.label[v]
    }

    fn compress(&mut self, v: usize) {
        self.path.clear();

        let mut current = v;
        while let Some(ancestor) = self.ancestor[current] {
            if self.ancestor[ancestor].is_none() {
                break;
            }
            self.path.push(current);
            current = ancestor;
        }

        // Nodes closest to the root are updated first, as in the recursive formulation.
        while let Some(node) = self.path.pop() {
            let Some(ancestor) = self.ancestor[node] else {
                continue;
            };
            if self.semi[self.label[ancestor]] < self.semi[self.label[node]] {
                self.label[node] = self.label[ancestor];
            }
            self.ancestor[node] = self.ancestor[ancestor];
        }
    }
}
