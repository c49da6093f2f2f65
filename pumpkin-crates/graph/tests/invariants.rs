#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::contents;
use helpers::init_logging;
use pumpkin_graph::State;
use pumpkin_graph::algorithms::dominators::DominatorAlgorithm;
use pumpkin_graph::graph::Graph;
use pumpkin_graph::graph::IncidentSet;
use pumpkin_graph::propagation::Entailment;
use pumpkin_graph::propagators::AcyclicArgs;
use pumpkin_graph::propagators::ArborescenceArgs;
use pumpkin_graph::propagators::ConnectedArgs;
use pumpkin_graph::propagators::DegreePropagation;
use pumpkin_graph::propagators::NbArcsArgs;
use pumpkin_graph::propagators::NbConnectedComponentsArgs;
use pumpkin_graph::propagators::NodeBoolsChannelArgs;
use pumpkin_graph::propagators::NodeDegreeAtLeastArgs;
use pumpkin_graph::propagators::NodeDegreeAtMostArgs;
use pumpkin_graph::propagators::TransitivityArgs;
use pumpkin_graph::variables::GraphVariable;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const NUM_NODES: usize = 6;

fn random_domain(rng: &mut SmallRng, directed: bool) -> (Graph, Graph) {
    let mut envelope = Graph::new(NUM_NODES, directed);
    for node in 0..NUM_NODES {
        if rng.gen_bool(0.9) {
            let _ = envelope.add_node(node);
        }
    }
    let nodes = envelope.nodes().iter().collect::<Vec<_>>();
    for &from in &nodes {
        for &to in &nodes {
            if from != to && (directed || from < to) && rng.gen_bool(0.5) {
                let _ = envelope.add_arc(from, to);
            }
        }
    }

    let mut kernel = Graph::new(NUM_NODES, directed);
    for &node in &nodes {
        if rng.gen_bool(0.3) {
            let _ = kernel.add_node(node);
        }
    }
    for (from, to) in envelope.arcs() {
        if rng.gen_bool(0.1) {
            let _ = kernel.add_arc(from, to);
        }
    }
    (kernel, envelope)
}

fn assert_well_formed(state: &State, graph: GraphVariable) {
    let domain = state.graph_domain(graph);
    assert!(domain.kernel().is_subgraph_of(domain.envelope()));
    for (from, to) in domain.envelope().arcs() {
        assert!(domain.is_potential_node(from) && domain.is_potential_node(to));
    }
}

/// Takes random decisions, checking the domain after every propagation and every backtrack.
fn random_walk(rng: &mut SmallRng, state: &mut State, graph: GraphVariable) {
    for _ in 0..12 {
        let before = {
            let domain = state.graph_domain(graph);
            (contents(domain.kernel()), contents(domain.envelope()))
        };

        let undecided_arcs = {
            let domain = state.graph_domain(graph);
            domain
                .envelope()
                .arcs()
                .filter(|&(from, to)| !domain.is_mandatory_arc(from, to))
                .collect::<Vec<_>>()
        };
        let Some(&(from, to)) = undecided_arcs.get(rng.gen_range(0..undecided_arcs.len().max(1)))
        else {
            return;
        };

        let checkpoint = state.get_checkpoint();
        state.new_checkpoint();
        let decision = if rng.gen_bool(0.5) {
            state.enforce_arc(graph, from, to)
        } else {
            state.remove_arc(graph, from, to)
        };
        assert!(decision.is_ok(), "undecided arcs accept both decisions");

        if state.propagate_to_fixed_point().is_ok() {
            assert_well_formed(state, graph);
            continue;
        }

        state.restore_to(checkpoint);
        let domain = state.graph_domain(graph);
        assert_eq!(
            (contents(domain.kernel()), contents(domain.envelope())),
            before,
            "backtracking restores the domain"
        );
    }
}

/// Posting fresh copies of the constraints at a fixed point changes nothing, and a fresh arc count
/// reads its bounds straight from the kernel and the envelope.
fn assert_fixed_point(
    state: &mut State,
    graph: GraphVariable,
    post: fn(&mut State, GraphVariable),
) {
    let before = {
        let domain = state.graph_domain(graph);
        (contents(domain.kernel()), contents(domain.envelope()))
    };
    post(state, graph);
    let num_arcs = state.new_interval_variable(0, (NUM_NODES * NUM_NODES) as i32);
    let _ = state.add_propagator(NbArcsArgs { graph, num_arcs });
    state
        .propagate_to_fixed_point()
        .expect("the domain was at a fixed point");

    let domain = state.graph_domain(graph);
    assert_eq!(
        (contents(domain.kernel()), contents(domain.envelope())),
        before
    );
    assert_eq!(state.lower_bound(num_arcs), domain.kernel().num_arcs() as i32);
    assert_eq!(state.upper_bound(num_arcs), domain.envelope().num_arcs() as i32);
}

fn post_undirected_constraints(state: &mut State, graph: GraphVariable) {
    let _ = state.add_propagator(ConnectedArgs { graph });
    let _ = state.add_propagator(NodeDegreeAtMostArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees: vec![3; NUM_NODES],
        propagation: DegreePropagation::Incremental,
    });
    let _ = state.add_propagator(NodeDegreeAtLeastArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees: vec![1; NUM_NODES],
        propagation: DegreePropagation::Coarse,
    });
}

fn post_directed_constraints(state: &mut State, graph: GraphVariable) {
    let _ = state.add_propagator(AcyclicArgs { graph });
    let _ = state.add_propagator(TransitivityArgs { graph });
    let _ = state.add_propagator(NodeDegreeAtMostArgs {
        graph,
        incident_set: IncidentSet::PredOrNeigh,
        degrees: vec![2; NUM_NODES],
        propagation: DegreePropagation::Coarse,
    });
}

fn check_random_domains(directed: bool, post: fn(&mut State, GraphVariable)) {
    init_logging();
    let mut consistent_seeds = 0;
    for seed in 0..30 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (kernel, envelope) = random_domain(&mut rng, directed);
        let mut state = State::default();
        let graph = state
            .new_graph_variable(kernel, envelope)
            .expect("valid domain");
        post(&mut state, graph);

        if state.propagate_to_fixed_point().is_err() {
            continue;
        }
        consistent_seeds += 1;
        assert_well_formed(&state, graph);
        random_walk(&mut rng, &mut state, graph);
        assert_fixed_point(&mut state, graph, post);
    }
    assert!(consistent_seeds > 0);
}

#[test]
fn undirected_domains_stay_well_formed() {
    check_random_domains(false, post_undirected_constraints);
}

#[test]
fn directed_domains_stay_well_formed() {
    check_random_domains(true, post_directed_constraints);
}

#[test]
fn acyclicity_removes_the_closing_arc() {
    let mut state = State::default();
    let mut kernel = Graph::new(4, true);
    let _ = kernel.add_arc(0, 1);
    let _ = kernel.add_arc(1, 2);
    let graph = state
        .new_graph_variable(kernel, Graph::complete(4, true))
        .expect("valid domain");
    let handle = state.add_propagator(AcyclicArgs { graph });
    state.propagate_to_fixed_point().expect("no conflict");

    let domain = state.graph_domain(graph);
    assert!(!domain.is_potential_arc(2, 0));
    assert!(!domain.is_potential_arc(2, 1));
    assert!(!domain.is_potential_arc(1, 0));
    assert!(domain.is_potential_arc(0, 2));
    assert!(domain.is_potential_arc(2, 3));
    assert_eq!(state.is_entailed(handle), Entailment::Undefined);
}

#[test]
fn minimum_degrees_hold_on_the_complete_graph_and_the_cycle() {
    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::new(5, false), Graph::complete(5, false))
        .expect("valid domain");
    let _ = state.add_propagator(NodeDegreeAtLeastArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees: vec![2; 5],
        propagation: DegreePropagation::Incremental,
    });
    state.propagate_to_fixed_point().expect("no conflict");
    let domain = state.graph_domain(graph);
    assert!((0..5).all(|node| domain.potential_successors_of(node).len() >= 2));

    let mut cycle = Graph::new(5, false);
    for node in 0..5 {
        let _ = cycle.add_arc(node, (node + 1) % 5);
    }
    let mut state = State::default();
    let graph = state
        .new_graph_variable(cycle.clone(), cycle.clone())
        .expect("valid domain");
    let handle = state.add_propagator(NodeDegreeAtLeastArgs {
        graph,
        incident_set: IncidentSet::SuccOrNeigh,
        degrees: vec![2; 5],
        propagation: DegreePropagation::Incremental,
    });
    state.propagate_to_fixed_point().expect("no conflict");

    assert_eq!(contents(state.graph_domain(graph).kernel()), contents(&cycle));
    assert_eq!(state.is_entailed(handle), Entailment::True);
}

#[test]
fn two_mandatory_components_cannot_form_one() {
    let mut envelope = Graph::new(5, false);
    let _ = envelope.add_arc(0, 1);
    let _ = envelope.add_arc(1, 2);
    let _ = envelope.add_arc(3, 4);

    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::with_all_nodes(5, false), envelope)
        .expect("valid domain");
    let num_components = state.new_interval_variable(1, 1);
    let _ = state.add_propagator(NbConnectedComponentsArgs {
        graph,
        num_components,
    });

    assert!(state.propagate_to_fixed_point().is_err());
}

fn unreachable_third_node(state: &mut State, kernel: Graph) -> GraphVariable {
    let mut envelope = Graph::with_all_nodes(4, true);
    let _ = envelope.add_arc(0, 1);
    let _ = envelope.add_arc(1, 2);
    let _ = envelope.add_arc(3, 1);
    let graph = state
        .new_graph_variable(kernel, envelope)
        .expect("valid domain");
    let _ = state.add_propagator(ArborescenceArgs {
        graph,
        root: Some(0),
        algorithm: DominatorAlgorithm::Simple,
    });
    graph
}

#[test]
fn nodes_out_of_reach_of_the_root_are_removed() {
    let mut state = State::default();
    let graph = unreachable_third_node(&mut state, Graph::new(4, true));
    state.propagate_to_fixed_point().expect("no conflict");

    let domain = state.graph_domain(graph);
    assert!(!domain.is_potential_node(3));
    assert!(domain.is_mandatory_node(0));

    let mut kernel = Graph::new(4, true);
    let _ = kernel.add_node(3);
    let mut state = State::default();
    let _ = unreachable_third_node(&mut state, kernel);
    assert!(state.propagate_to_fixed_point().is_err());
}

#[test]
fn node_literals_and_graph_nodes_agree_in_both_directions() {
    let mut state = State::default();
    let graph = state
        .new_graph_variable(Graph::new(3, false), Graph::complete(3, false))
        .expect("valid domain");
    let node_literals = (0..3).map(|_| state.new_literal()).collect::<Vec<_>>();
    let _ = state.add_propagator(NodeBoolsChannelArgs {
        graph,
        node_literals: node_literals.clone(),
    });
    state.propagate_to_fixed_point().expect("no conflict");

    let _ = state.set_literal(node_literals[0], true).expect("unassigned");
    let _ = state.enforce_node(graph, 1).expect("potential node");
    let _ = state.set_literal(node_literals[2], false).expect("unassigned");
    state.propagate_to_fixed_point().expect("no conflict");

    let domain = state.graph_domain(graph);
    assert!(domain.is_mandatory_node(0));
    assert_eq!(state.literal_value(node_literals[1]), Some(true));
    assert!(!domain.is_potential_node(2));
    assert!(!domain.is_potential_arc(0, 2));
}
