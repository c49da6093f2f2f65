use super::DepthFirstOrder;
use super::FlowGraph;

/// "A Simple, Fast Dominance Algorithm" - Cooper, Harvey and Kennedy (2001).
///
/// Iterates over the nodes in reverse post-order, intersecting the dominator sets of the
/// processed predecessors, until nothing changes.
pub(super) fn immediate_dominators(
    graph: &FlowGraph,
    order: &DepthFirstOrder,
) -> Vec<Option<usize>> {
    let num_nodes = graph.num_nodes();
    let root = order.vertex[0];

    let mut post_number = vec![0; num_nodes];
    for (number, &node) in order.post_order.iter().enumerate() {
        post_number[node] = number;
    }

    let mut immediate_dominator: Vec<Option<usize>> = vec![None; num_nodes];
    immediate_dominator[root] = Some(root);

    let mut changed = true;
    while changed {
        changed = false;

        for &node in order.post_order.iter().rev() {
            if node == root {
                continue;
            }

            let mut new_dominator: Option<usize> = None;
            for &predecessor in graph.predecessors_of(node) {
                if immediate_dominator[predecessor].is_none() {
                    continue;
                }
                new_dominator = Some(match new_dominator {
                    None => predecessor,
                    Some(current) => intersect(
                        predecessor,
                        current,
                        root,
                        &immediate_dominator,
                        &post_number,
                    ),
                });
            }

            if new_dominator.is_some() && immediate_dominator[node] != new_dominator {
                immediate_dominator[node] = new_dominator;
                changed = true;
            }
        }
    }

    immediate_dominator
}

/// Walks both fingers up the current dominator tree until they meet.
fn intersect(
    mut first: usize,
    mut second: usize,
    root: usize,
    immediate_dominator: &[Option<usize>],
    post_number: &[usize],
) -> usize {
    while first != second {
        while post_number[first] < post_number[second] {
            first = immediate_dominator[first].unwrap_or(root);
        }
        while post_number[second] < post_number[first] {
            second = immediate_dominator[second].unwrap_or(root);
        }
    }
    first
}
