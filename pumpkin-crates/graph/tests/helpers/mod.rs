//! A depth-first search over a single graph variable, used to run the propagators end to end.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use pumpkin_graph::State;
use pumpkin_graph::branching::GraphSearch;
use pumpkin_graph::graph::Graph;
use pumpkin_graph::variables::DomainId;
use pumpkin_graph::variables::GraphVariable;

/// Initialises the logger once per test binary; `RUST_LOG` controls the output.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Visits every solution below the current state, calling `on_solution` with the instantiated
/// state. The state is restored to where it started.
pub(crate) fn for_each_solution(
    state: &mut State,
    search: &mut GraphSearch,
    on_solution: &mut impl FnMut(&State),
) {
    let checkpoint = state.get_checkpoint();
    explore(state, search, None, &mut |state: &State| -> Option<i32> {
        on_solution(state);
        None
    });
    state.restore_to(checkpoint);
}

/// The kernel of every solution below the current state.
pub(crate) fn all_solutions(
    state: &mut State,
    search: &mut GraphSearch,
    graph: GraphVariable,
) -> Vec<Graph> {
    let mut solutions = Vec::new();
    for_each_solution(state, search, &mut |state: &State| {
        solutions.push(state.graph_domain(graph).kernel().clone())
    });
    solutions
}

/// Branch and bound on `objective`: every solution tightens the upper bound for the remainder of
/// the search. Returns the optimal value and the kernel of the graph in the optimal solution.
pub(crate) fn minimise(
    state: &mut State,
    search: &mut GraphSearch,
    graph: GraphVariable,
    objective: DomainId,
) -> Option<(i32, Graph)> {
    let checkpoint = state.get_checkpoint();
    let mut best: Option<(i32, Graph)> = None;
    explore(state, search, Some(objective), &mut |state: &State| -> Option<i32> {
        let value = state.lower_bound(objective);
        assert_eq!(
            value,
            state.upper_bound(objective),
            "the objective is fixed once the graph is instantiated"
        );
        best = Some((value, state.graph_domain(graph).kernel().clone()));
        Some(value)
    });
    state.restore_to(checkpoint);
    best
}

/// The recursive search. `on_solution` returns a new upper bound for `objective`, if any.
fn explore(
    state: &mut State,
    search: &mut GraphSearch,
    objective: Option<DomainId>,
    on_solution: &mut dyn FnMut(&State) -> Option<i32>,
) {
    let mut bound = None;
    let _ = explore_node(state, search, objective, &mut bound, on_solution);
}

/// Returns `false` if the node fails before any decision is taken.
fn explore_node(
    state: &mut State,
    search: &mut GraphSearch,
    objective: Option<DomainId>,
    bound: &mut Option<i32>,
    on_solution: &mut dyn FnMut(&State) -> Option<i32>,
) -> bool {
    if let (Some(objective), Some(value)) = (objective, *bound) {
        if state.post_upper_bound(objective, value - 1).is_err() {
            return false;
        }
    }
    if state.propagate_to_fixed_point().is_err() {
        return false;
    }

    let Some(decision) = search.next_decision(state) else {
        if let Some(value) = on_solution(state) {
            *bound = Some(value);
        }
        return true;
    };

    for branch in [decision, decision.negate()] {
        let checkpoint = state.get_checkpoint();
        state.new_checkpoint();
        let consistent = search.apply(state, branch).is_ok()
            && explore_node(state, search, objective, bound, on_solution);
        if !consistent {
            search.on_conflict(branch);
        }
        state.restore_to(checkpoint);
    }
    true
}

/// Whether the undirected graph connects all of its nodes.
pub(crate) fn is_connected(graph: &Graph) -> bool {
    let Some(start) = graph.nodes().iter().next() else {
        return false;
    };
    let mut seen = vec![false; graph.num_nodes()];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(node) = stack.pop() {
        for neighbour in graph.neighbours_of(node) {
            if !seen[neighbour] {
                seen[neighbour] = true;
                stack.push(neighbour);
            }
        }
    }
    graph.nodes().iter().all(|node| seen[node])
}

/// The sum of `costs[i][j]` over the arcs of `graph`.
pub(crate) fn cost_of(graph: &Graph, costs: &[Vec<i32>]) -> i32 {
    graph.arcs().map(|(from, to)| costs[from][to]).sum()
}

/// The sorted nodes and arcs of `graph`, independent of the internal order of its sets.
pub(crate) fn contents(graph: &Graph) -> (Vec<usize>, Vec<(usize, usize)>) {
    let mut nodes = graph.nodes().iter().collect::<Vec<_>>();
    nodes.sort_unstable();
    let mut arcs = graph.arcs().collect::<Vec<_>>();
    arcs.sort_unstable();
    (nodes, arcs)
}
