#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::all_solutions;
use helpers::cost_of;
use helpers::init_logging;
use helpers::minimise;
use pumpkin_graph::State;
use pumpkin_graph::branching::GraphSearch;
use pumpkin_graph::branching::GraphSearchPolicy;
use pumpkin_graph::graph::Graph;
use pumpkin_graph::graph::IncidentSet;
use pumpkin_graph::propagators::ArcCostSumArgs;
use pumpkin_graph::propagators::CircuitNoSubtourArgs;
use pumpkin_graph::propagators::CycleNoSubtourArgs;
use pumpkin_graph::propagators::DegreePropagation;
use pumpkin_graph::propagators::LagrangianOneTreeArgs;
use pumpkin_graph::propagators::LagrangianOptions;
use pumpkin_graph::propagators::NodeDegreeAtLeastArgs;
use pumpkin_graph::propagators::NodeDegreeAtMostArgs;
use pumpkin_graph::variables::GraphVariable;

fn post_exact_degree(
    state: &mut State,
    graph: GraphVariable,
    incident_set: IncidentSet,
    degree: usize,
    num_nodes: usize,
) {
    let _ = state.add_propagator(NodeDegreeAtLeastArgs {
        graph,
        incident_set,
        degrees: vec![degree; num_nodes],
        propagation: DegreePropagation::Incremental,
    });
    let _ = state.add_propagator(NodeDegreeAtMostArgs {
        graph,
        incident_set,
        degrees: vec![degree; num_nodes],
        propagation: DegreePropagation::Coarse,
    });
}

/// Posts a Hamiltonian cycle over all nodes of an undirected graph.
fn undirected_cycle(state: &mut State, num_nodes: usize) -> GraphVariable {
    let graph = state
        .new_graph_variable(
            Graph::with_all_nodes(num_nodes, false),
            Graph::complete(num_nodes, false),
        )
        .expect("valid domain");
    let _ = state.add_propagator(CycleNoSubtourArgs { graph });
    post_exact_degree(state, graph, IncidentSet::SuccOrNeigh, 2, num_nodes);
    graph
}

/// Follows the unique successors from node 0 and checks that all nodes are visited once.
fn is_single_circuit(graph: &Graph) -> bool {
    let num_nodes = graph.num_nodes();
    let mut current = 0;
    for step in 0..num_nodes {
        if graph.successors_of(current).len() != 1 {
            return false;
        }
        current = graph.successors_of(current).get(0);
        if current == 0 {
            return step + 1 == num_nodes;
        }
    }
    false
}

fn is_hamiltonian_cycle(graph: &Graph) -> bool {
    graph.num_arcs() == graph.num_nodes()
        && (0..graph.num_nodes()).all(|node| graph.successors_of(node).len() == 2)
        && helpers::is_connected(graph)
}

#[test]
fn all_directed_circuits_of_the_complete_graph() {
    init_logging();
    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::with_all_nodes(4, true), Graph::complete(4, true))
        .expect("valid domain");
    let _ = state.add_propagator(CircuitNoSubtourArgs { graph });
    post_exact_degree(&mut state, graph, IncidentSet::SuccOrNeigh, 1, 4);
    post_exact_degree(&mut state, graph, IncidentSet::PredOrNeigh, 1, 4);

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex);
    let solutions = all_solutions(&mut state, &mut search, graph);

    assert_eq!(solutions.len(), 6);
    assert!(solutions.iter().all(is_single_circuit));
    let mut distinct = solutions.iter().map(helpers::contents).collect::<Vec<_>>();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 6);
}

#[test]
fn all_undirected_cycles_over_five_nodes() {
    init_logging();
    let mut state = State::default();
    let graph = undirected_cycle(&mut state, 5);

    let mut search = GraphSearch::new(graph, GraphSearchPolicy::MaxDeltaDegree);
    let solutions = all_solutions(&mut state, &mut search, graph);

    // (5 - 1)! / 2 distinct cycles.
    assert_eq!(solutions.len(), 12);
    assert!(solutions.iter().all(is_hamiltonian_cycle));
}

fn tour_costs() -> Vec<Vec<i32>> {
    vec![
        vec![0, 3, 4, 2, 7],
        vec![3, 0, 4, 6, 3],
        vec![4, 4, 0, 5, 8],
        vec![2, 6, 5, 0, 6],
        vec![7, 3, 8, 6, 0],
    ]
}

/// The cheapest tour over all permutations starting at node 0.
fn cheapest_tour(costs: &[Vec<i32>]) -> i32 {
    fn extend(costs: &[Vec<i32>], tour: &mut Vec<usize>, cost: i32, best: &mut i32) {
        let last = *tour.last().expect("the tour starts at node 0");
        if tour.len() == costs.len() {
            *best = (*best).min(cost + costs[last][0]);
            return;
        }
        for next in 1..costs.len() {
            if !tour.contains(&next) {
                tour.push(next);
                extend(costs, tour, cost + costs[last][next], best);
                let _ = tour.pop();
            }
        }
    }

    let mut best = i32::MAX;
    extend(costs, &mut vec![0], 0, &mut best);
    best
}

fn solve_tour(with_relaxation: bool) -> (i32, Graph) {
    let costs = tour_costs();
    let mut state = State::default();
    let graph = undirected_cycle(&mut state, 5);
    let objective = state.new_interval_variable(0, 1000);
    let _ = state.add_propagator(ArcCostSumArgs {
        graph,
        costs: costs.clone(),
        objective,
    });
    if with_relaxation {
        let _ = state.add_propagator(LagrangianOneTreeArgs {
            graph,
            costs: costs.clone(),
            objective,
            options: LagrangianOptions::default(),
        });
    }

    let mut search = GraphSearch::with_costs(graph, GraphSearchPolicy::MinCost, costs);
    minimise(&mut state, &mut search, graph, objective).expect("a tour exists")
}

#[test]
fn branch_and_bound_finds_the_cheapest_tour() {
    init_logging();
    let expected = cheapest_tour(&tour_costs());

    let (value, tour) = solve_tour(false);
    assert_eq!(value, expected);
    assert!(is_hamiltonian_cycle(&tour));
    assert_eq!(cost_of(&tour, &tour_costs()), expected);
}

#[test]
fn the_one_tree_relaxation_keeps_the_optimum() {
    init_logging();
    let expected = cheapest_tour(&tour_costs());

    let (value, tour) = solve_tour(true);
    assert_eq!(value, expected);
    assert!(is_hamiltonian_cycle(&tour));
    assert_eq!(cost_of(&tour, &tour_costs()), expected);
}
