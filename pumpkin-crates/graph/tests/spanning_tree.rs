#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::all_solutions;
use helpers::cost_of;
use helpers::init_logging;
use helpers::is_connected;
use helpers::minimise;
use pumpkin_graph::State;
use pumpkin_graph::branching::BranchingPolarity;
use pumpkin_graph::branching::GraphSearch;
use pumpkin_graph::branching::GraphSearchPolicy;
use pumpkin_graph::graph::Graph;
use pumpkin_graph::graph::IncidentSet;
use pumpkin_graph::propagators::ArcCostSumArgs;
use pumpkin_graph::propagators::ConnectedArgs;
use pumpkin_graph::propagators::DegreePropagation;
use pumpkin_graph::propagators::LagrangianDcmstArgs;
use pumpkin_graph::propagators::LagrangianOptions;
use pumpkin_graph::propagators::NodeDegreeAtMostArgs;
use pumpkin_graph::propagators::TreeNoCycleArgs;
use pumpkin_graph::variables::DomainId;
use pumpkin_graph::variables::GraphVariable;

fn costs() -> Vec<Vec<i32>> {
    vec![
        vec![0, 1, 2, 3],
        vec![1, 0, 4, 5],
        vec![2, 4, 0, 6],
        vec![3, 5, 6, 0],
    ]
}

/// Posts a spanning tree over all nodes of the complete undirected graph.
fn spanning_tree(state: &mut State, num_nodes: usize) -> GraphVariable {
    let graph = state
        .new_graph_variable(
            Graph::with_all_nodes(num_nodes, false),
            Graph::complete(num_nodes, false),
        )
        .expect("valid domain");
    let _ = state.add_propagator(TreeNoCycleArgs { graph });
    let _ = state.add_propagator(ConnectedArgs { graph });
    graph
}

fn with_cost(state: &mut State, graph: GraphVariable) -> DomainId {
    let objective = state.new_interval_variable(0, 100);
    let _ = state.add_propagator(ArcCostSumArgs {
        graph,
        costs: costs(),
        objective,
    });
    objective
}

fn is_spanning_tree(graph: &Graph) -> bool {
    graph.num_arcs() + 1 == graph.num_nodes() && is_connected(graph)
}

#[test]
fn all_spanning_trees_of_the_complete_graph() {
    init_logging();
    let mut state = State::default();
    let graph = spanning_tree(&mut state, 4);

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex)
        .with_polarity(BranchingPolarity::Remove)
        .with_last_conflict();
    let solutions = all_solutions(&mut state, &mut search, graph);

    // Cayley's formula: 4^(4 - 2).
    assert_eq!(solutions.len(), 16);
    assert!(solutions.iter().all(is_spanning_tree));
}

#[test]
fn the_minimum_spanning_tree_is_the_star() {
    init_logging();
    let mut state = State::default();
    let graph = spanning_tree(&mut state, 4);
    let objective = with_cost(&mut state, graph);

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::MinPotentialDegree);
    let (value, tree) = minimise(&mut state, &mut search, graph, objective).expect("a tree exists");

    assert_eq!(value, 6);
    assert_eq!(cost_of(&tree, &costs()), 6);
    assert!((1..4).all(|node| tree.contains_arc(0, node)));
}

#[test]
fn the_lagrangian_bound_closes_the_gap_at_the_root() {
    init_logging();
    let mut state = State::default();
    let graph = spanning_tree(&mut state, 4);
    let objective = with_cost(&mut state, graph);
    let _ = state.add_propagator(LagrangianDcmstArgs {
        graph,
        costs: costs(),
        objective,
        min_degrees: vec![1; 4],
        max_degrees: vec![3; 4],
        options: LagrangianOptions::default(),
    });
    state.propagate_to_fixed_point().expect("no conflict");
    assert_eq!(state.lower_bound(objective), 6);

    let mut search = GraphSearch::with_costs(graph, GraphSearchPolicy::MinCost, costs());
    let (value, _) = minimise(&mut state, &mut search, graph, objective).expect("a tree exists");
    assert_eq!(value, 6);
}

#[test]
fn degree_limits_make_the_star_infeasible() {
    init_logging();
    let mut state = State::default();
    let graph = spanning_tree(&mut state, 4);
    let objective = with_cost(&mut state, graph);
    let max_degrees = vec![1, 3, 3, 3];
    let _ = state.add_propagator(NodeDegreeAtMostArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees: max_degrees.clone(),
        propagation: DegreePropagation::Incremental,
    });
    let _ = state.add_propagator(LagrangianDcmstArgs {
        graph,
        costs: costs(),
        objective,
        min_degrees: vec![1; 4],
        max_degrees,
        options: LagrangianOptions::default(),
    });

    let mut search = GraphSearch::with_costs(graph, GraphSearchPolicy::MaxCost, costs())
        .with_polarity(BranchingPolarity::Remove);
    let (value, tree) = minimise(&mut state, &mut search, graph, objective).expect("a tree exists");

    assert_eq!(value, 10);
    assert!(is_spanning_tree(&tree));
    assert_eq!(tree.successors_of(0).len(), 1);
    assert!(tree.contains_arc(0, 1));
    assert!(tree.contains_arc(1, 2));
    assert!(tree.contains_arc(1, 3));
}
