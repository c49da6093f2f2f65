#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::all_solutions;
use helpers::init_logging;
use pumpkin_graph::State;
use pumpkin_graph::algorithms::dominators::DominatorAlgorithm;
use pumpkin_graph::branching::GraphSearch;
use pumpkin_graph::branching::GraphSearchPolicy;
use pumpkin_graph::graph::Graph;
use pumpkin_graph::graph::IncidentSet;
use pumpkin_graph::propagators::ArborescenceArgs;
use pumpkin_graph::propagators::ConnectedArgs;
use pumpkin_graph::propagators::DegreePropagation;
use pumpkin_graph::propagators::NodeDegreeAtMostArgs;
use pumpkin_graph::propagators::NodeDegreeVariableArgs;
use pumpkin_graph::propagators::TreeNoCycleArgs;

/// Counts the subgraphs of `envelope` accepted by `accept`, given their nodes and arcs.
fn count_subgraphs(
    envelope: &Graph,
    accept: impl Fn(&[usize], &[(usize, usize)]) -> bool,
) -> usize {
    let nodes = envelope.nodes().iter().collect::<Vec<_>>();
    let arcs = envelope.arcs().collect::<Vec<_>>();

    let mut count = 0;
    for node_mask in 0..1_u32 << nodes.len() {
        let chosen_nodes = nodes
            .iter()
            .enumerate()
            .filter(|&(index, _)| node_mask >> index & 1 == 1)
            .map(|(_, &node)| node)
            .collect::<Vec<_>>();
        let allowed_arcs = arcs
            .iter()
            .copied()
            .filter(|(from, to)| chosen_nodes.contains(from) && chosen_nodes.contains(to))
            .collect::<Vec<_>>();

        for arc_mask in 0..1_u32 << allowed_arcs.len() {
            let chosen_arcs = allowed_arcs
                .iter()
                .enumerate()
                .filter(|&(index, _)| arc_mask >> index & 1 == 1)
                .map(|(_, &arc)| arc)
                .collect::<Vec<_>>();
            if accept(&chosen_nodes, &chosen_arcs) {
                count += 1;
            }
        }
    }
    count
}

/// Every node has at most one parent, no node is its own parent and following parents never
/// returns to the start.
fn is_directed_forest(num_nodes: usize, arcs: &[(usize, usize)]) -> bool {
    let mut parent = vec![None; num_nodes];
    for &(from, to) in arcs {
        if from == to || parent[to].replace(from).is_some() {
            return false;
        }
    }
    (0..num_nodes).all(|start| {
        let mut node = start;
        for _ in 0..num_nodes {
            match parent[node] {
                Some(next) => node = next,
                None => return true,
            }
        }
        false
    })
}

/// The edges connect all `nodes` and there is one edge fewer than there are nodes.
fn is_spanning_tree_of(nodes: &[usize], edges: &[(usize, usize)]) -> bool {
    let Some(&start) = nodes.first() else {
        return false;
    };
    if edges.len() + 1 != nodes.len() {
        return false;
    }
    let mut reached = vec![start];
    let mut grew = true;
    while grew {
        grew = false;
        for &(from, to) in edges {
            let (has_from, has_to) = (reached.contains(&from), reached.contains(&to));
            if has_from != has_to {
                reached.push(if has_from { to } else { from });
                grew = true;
            }
        }
    }
    reached.len() == nodes.len()
}

#[test]
fn forests_found_by_search_match_enumeration_with_loops_in_the_envelope() {
    init_logging();
    let mut envelope = Graph::complete(3, true);
    for node in 0..3 {
        let _ = envelope.add_arc(node, node);
    }

    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::new(3, true), envelope.clone())
        .expect("valid domain");
    let _ = state.add_propagator(ArborescenceArgs {
        graph,
        root: None,
        algorithm: DominatorAlgorithm::Simple,
    });
    let _ = state.add_propagator(NodeDegreeAtMostArgs {
        graph,
        incident_set: IncidentSet::PredOrNeigh,
        degrees: vec![1; 3],
        propagation: DegreePropagation::Coarse,
    });

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex);
    let solutions = all_solutions(&mut state, &mut search, graph);

    let expected = count_subgraphs(&envelope, |_, arcs| is_directed_forest(3, arcs));
    assert_eq!(solutions.len(), expected);
    for forest in &solutions {
        assert!((0..3).all(|node| !forest.contains_arc(node, node)));
    }
}

#[test]
fn connected_trees_found_by_search_match_enumeration() {
    init_logging();
    let envelope = Graph::complete(3, false);

    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::new(3, false), envelope.clone())
        .expect("valid domain");
    let _ = state.add_propagator(TreeNoCycleArgs { graph });
    let _ = state.add_propagator(ConnectedArgs { graph });

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex);
    let solutions = all_solutions(&mut state, &mut search, graph);

    let expected = count_subgraphs(&envelope, is_spanning_tree_of);
    assert_eq!(expected, 9);
    assert_eq!(solutions.len(), expected);
    assert!(solutions.iter().all(|tree| tree.num_nodes() == 3 && !tree.nodes().is_empty()));
}

#[test]
fn degree_variables_with_negative_lower_bounds_allow_every_subgraph() {
    init_logging();
    let envelope = Graph::complete(3, false);

    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::new(3, false), envelope.clone())
        .expect("valid domain");
    let degrees = (0..3)
        .map(|_| state.new_interval_variable(-1, 2))
        .collect::<Vec<_>>();
    let _ = state.add_propagator(NodeDegreeVariableArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees,
    });
    state.propagate_to_fixed_point().expect("no conflict");
    assert_eq!(state.graph_domain(graph).potential_nodes().len(), 3);

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex);
    let solutions = all_solutions(&mut state, &mut search, graph);

    assert_eq!(solutions.len(), count_subgraphs(&envelope, |_, _| true));
}
