use log::warn;

use super::Direction;
use super::InOrderTieBreaker;
use super::TieBreaker;
use crate::engine::EmptyDomain;
use crate::engine::State;
use crate::graph::GraphDomain;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// A decision on a single node or arc of a graph variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphDecision {
    EnforceNode(usize),
    RemoveNode(usize),
    EnforceArc(usize, usize),
    RemoveArc(usize, usize),
}

impl GraphDecision {
    /// The decision taken on the other branch.
    pub fn negate(self) -> GraphDecision {
        match self {
            GraphDecision::EnforceNode(node) => GraphDecision::RemoveNode(node),
            GraphDecision::RemoveNode(node) => GraphDecision::EnforceNode(node),
            GraphDecision::EnforceArc(from, to) => GraphDecision::RemoveArc(from, to),
            GraphDecision::RemoveArc(from, to) => GraphDecision::EnforceArc(from, to),
        }
    }

    /// The node the decision is about; the tail for arcs.
    pub fn node(self) -> usize {
        match self {
            GraphDecision::EnforceNode(node) | GraphDecision::RemoveNode(node) => node,
            GraphDecision::EnforceArc(from, _) | GraphDecision::RemoveArc(from, _) => from,
        }
    }
}

/// How [`GraphSearch`] ranks the undecided arcs. The degree of an arc `(u, v)` is the out-degree
/// of `u` plus the in-degree of `v` (the number of neighbours of both endpoints when undirected).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum GraphSearchPolicy {
    /// The lexicographically smallest arc.
    #[default]
    Lex,
    /// Smallest degree in the envelope.
    MinPotentialDegree,
    /// Largest degree in the envelope.
    MaxPotentialDegree,
    /// Smallest degree in the kernel.
    MinMandatoryDegree,
    /// Largest degree in the kernel.
    MaxMandatoryDegree,
    /// Smallest number of undecided arcs at the endpoints.
    MinDeltaDegree,
    /// Largest number of undecided arcs at the endpoints.
    MaxDeltaDegree,
    /// Cheapest arc according to the cost matrix.
    MinCost,
    /// Most expensive arc according to the cost matrix.
    MaxCost,
}

impl GraphSearchPolicy {
    fn direction(self) -> Direction {
        match self {
            GraphSearchPolicy::MaxPotentialDegree
            | GraphSearchPolicy::MaxMandatoryDegree
            | GraphSearchPolicy::MaxDeltaDegree
            | GraphSearchPolicy::MaxCost => Direction::Maximum,
            _ => Direction::Minimum,
        }
    }

    fn needs_costs(self) -> bool {
        matches!(self, GraphSearchPolicy::MinCost | GraphSearchPolicy::MaxCost)
    }
}

/// Which branch [`GraphSearch`] proposes first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingPolarity {
    /// Put the node or arc into the kernel first.
    #[default]
    Enforce,
    /// Remove the node or arc from the envelope first.
    Remove,
}

/// Proposes decisions for a single graph variable: the undecided nodes first, in increasing
/// order, then the undecided arc which is best according to the [`GraphSearchPolicy`].
///
/// With the last-conflict heuristic, the arcs at the node of the most recent failed decision are
/// tried before any other arc, for as long as that node has undecided arcs.
#[derive(Debug, Clone)]
pub struct GraphSearch {
    graph: GraphVariable,
    policy: GraphSearchPolicy,
    polarity: BranchingPolarity,
    costs: Option<Vec<Vec<i32>>>,
    use_last_conflict: bool,
    last_conflict: Option<usize>,
    tie_breaker: InOrderTieBreaker<(usize, usize), i64>,
}

impl GraphSearch {
    pub fn new(graph: GraphVariable, policy: GraphSearchPolicy) -> Self {
        pumpkin_assert_simple!(
            !policy.needs_costs(),
            "cost-based policies are created with `GraphSearch::with_costs`"
        );
        GraphSearch {
            graph,
            policy,
            polarity: BranchingPolarity::default(),
            costs: None,
            use_last_conflict: false,
            last_conflict: None,
            tie_breaker: InOrderTieBreaker::new(policy.direction()),
        }
    }

    /// A search whose policy may rank arcs by `costs[from][to]`.
    pub fn with_costs(
        graph: GraphVariable,
        policy: GraphSearchPolicy,
        costs: Vec<Vec<i32>>,
    ) -> Self {
        GraphSearch {
            graph,
            policy,
            polarity: BranchingPolarity::default(),
            costs: Some(costs),
            use_last_conflict: false,
            last_conflict: None,
            tie_breaker: InOrderTieBreaker::new(policy.direction()),
        }
    }

    pub fn with_polarity(mut self, polarity: BranchingPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_last_conflict(mut self) -> Self {
        self.use_last_conflict = true;
        self
    }

    /// Reports that `decision` led to a conflict.
    pub fn on_conflict(&mut self, decision: GraphDecision) {
        if self.use_last_conflict {
            self.last_conflict = Some(decision.node());
        }
    }

    /// The next decision, or [`None`] when the graph variable is instantiated.
    pub fn next_decision(&mut self, state: &State) -> Option<GraphDecision> {
        let domain = state.graph_domain(self.graph);
        if domain.num_nodes() == 0 {
            warn!("Searching over a graph variable without nodes");
            return None;
        }

        if let Some(node) = (0..domain.num_nodes())
            .find(|&node| domain.is_potential_node(node) && !domain.is_mandatory_node(node))
        {
            return Some(match self.polarity {
                BranchingPolarity::Enforce => GraphDecision::EnforceNode(node),
                BranchingPolarity::Remove => GraphDecision::RemoveNode(node),
            });
        }

        let arc = self
            .last_conflict
            .and_then(|node| self.select_arc_at(domain, node))
            .or_else(|| self.select_arc(domain))?;
        Some(match self.polarity {
            BranchingPolarity::Enforce => GraphDecision::EnforceArc(arc.0, arc.1),
            BranchingPolarity::Remove => GraphDecision::RemoveArc(arc.0, arc.1),
        })
    }

    /// Applies `decision` to the graph variable of this search.
    pub fn apply(&self, state: &mut State, decision: GraphDecision) -> Result<bool, EmptyDomain> {
        match decision {
            GraphDecision::EnforceNode(node) => state.enforce_node(self.graph, node),
            GraphDecision::RemoveNode(node) => state.remove_node(self.graph, node),
            GraphDecision::EnforceArc(from, to) => state.enforce_arc(self.graph, from, to),
            GraphDecision::RemoveArc(from, to) => state.remove_arc(self.graph, from, to),
        }
    }

    fn select_arc(&mut self, domain: &GraphDomain) -> Option<(usize, usize)> {
        for from in 0..domain.num_nodes() {
            for to in 0..domain.num_nodes() {
                if is_undecided(domain, from, to) {
                    let value = self.value_of(domain, from, to);
                    self.tie_breaker.consider((from, to), value);
                }
            }
        }
        self.tie_breaker.select()
    }

    /// The best undecided arc with `node` as one of its endpoints.
    fn select_arc_at(&mut self, domain: &GraphDomain, node: usize) -> Option<(usize, usize)> {
        for other in 0..domain.num_nodes() {
            for (from, to) in [(node, other), (other, node)] {
                if is_undecided(domain, from, to) {
                    let value = self.value_of(domain, from, to);
                    self.tie_breaker.consider((from, to), value);
                }
            }
        }
        self.tie_breaker.select()
    }

    fn value_of(&self, domain: &GraphDomain, from: usize, to: usize) -> i64 {
        let potential = (domain.potential_successors_of(from).len()
            + domain.potential_predecessors_of(to).len()) as i64;
        let mandatory = (domain.mandatory_successors_of(from).len()
            + domain.mandatory_predecessors_of(to).len()) as i64;

        match self.policy {
            GraphSearchPolicy::Lex => 0,
            GraphSearchPolicy::MinPotentialDegree | GraphSearchPolicy::MaxPotentialDegree => {
                potential
            }
            GraphSearchPolicy::MinMandatoryDegree | GraphSearchPolicy::MaxMandatoryDegree => {
                mandatory
            }
            GraphSearchPolicy::MinDeltaDegree | GraphSearchPolicy::MaxDeltaDegree => {
                potential - mandatory
            }
            GraphSearchPolicy::MinCost | GraphSearchPolicy::MaxCost => self
                .costs
                .as_ref()
                .map_or(0, |costs| i64::from(costs[from][to])),
        }
    }
}

/// Whether `(from, to)` is potential but not mandatory. Undirected edges are only reported as
/// `from <= to`.
fn is_undecided(domain: &GraphDomain, from: usize, to: usize) -> bool {
    (domain.is_directed() || from <= to)
        && domain.is_potential_arc(from, to)
        && !domain.is_mandatory_arc(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn triangle(state: &mut State) -> GraphVariable {
        state
            .new_graph_variable(Graph::with_all_nodes(3, false), Graph::complete(3, false))
            .expect("valid domain")
    }

    #[test]
    fn undecided_nodes_come_first() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, false), Graph::complete(3, false))
            .expect("valid domain");
        let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex)
            .with_polarity(BranchingPolarity::Remove);

        assert_eq!(search.next_decision(&state), Some(GraphDecision::RemoveNode(0)));
    }

    #[test]
    fn lexicographic_arcs_after_the_nodes() {
        let mut state = State::default();
        let graph = triangle(&mut state);
        let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex);

        assert_eq!(search.next_decision(&state), Some(GraphDecision::EnforceArc(0, 1)));
        let _ = state.enforce_arc(graph, 0, 1).expect("potential arc");
        assert_eq!(search.next_decision(&state), Some(GraphDecision::EnforceArc(0, 2)));
    }

    #[test]
    fn cost_policies_pick_the_extremes() {
        let mut state = State::default();
        let graph = triangle(&mut state);
        let costs = vec![vec![0, 5, 1], vec![5, 0, 3], vec![1, 3, 0]];

        let mut cheapest =
            GraphSearch::with_costs(graph, GraphSearchPolicy::MinCost, costs.clone());
        let mut priciest = GraphSearch::with_costs(graph, GraphSearchPolicy::MaxCost, costs);

        assert_eq!(cheapest.next_decision(&state), Some(GraphDecision::EnforceArc(0, 2)));
        assert_eq!(priciest.next_decision(&state), Some(GraphDecision::EnforceArc(0, 1)));
    }

    #[test]
    fn degree_policies_rank_by_the_endpoints() {
        let mut state = State::default();
        let mut envelope = Graph::complete(4, false);
        let _ = envelope.remove_arc(2, 3);
        let _ = envelope.remove_arc(1, 3);
        let mut kernel = Graph::with_all_nodes(4, false);
        let _ = kernel.add_arc(0, 1);
        let graph = state.new_graph_variable(kernel, envelope).expect("valid domain");

        // Undecided edges (0, 2), (0, 3) and (1, 2) with potential degrees 5, 4 and 4, and
        // mandatory degree 1 each.
        let mut max_potential = GraphSearch::new(graph, GraphSearchPolicy::MaxPotentialDegree);
        assert_eq!(max_potential.next_decision(&state), Some(GraphDecision::EnforceArc(0, 2)));

        let mut min_potential = GraphSearch::new(graph, GraphSearchPolicy::MinPotentialDegree);
        assert_eq!(min_potential.next_decision(&state), Some(GraphDecision::EnforceArc(0, 3)));

        let mut min_delta = GraphSearch::new(graph, GraphSearchPolicy::MinDeltaDegree);
        assert_eq!(min_delta.next_decision(&state), Some(GraphDecision::EnforceArc(0, 3)));

        let mut max_mandatory = GraphSearch::new(graph, GraphSearchPolicy::MaxMandatoryDegree);
        assert_eq!(max_mandatory.next_decision(&state), Some(GraphDecision::EnforceArc(0, 2)));
    }

    #[test]
    fn the_last_conflict_is_revisited_first() {
        let mut state = State::default();
        let graph = triangle(&mut state);
        let mut search = GraphSearch::new(graph, GraphSearchPolicy::Lex).with_last_conflict();

        search.on_conflict(GraphDecision::EnforceArc(2, 1));
        assert_eq!(search.next_decision(&state), Some(GraphDecision::EnforceArc(0, 2)));

        let _ = state.remove_arc(graph, 0, 2).expect("potential arc");
        let _ = state.remove_arc(graph, 1, 2).expect("potential arc");
        assert_eq!(search.next_decision(&state), Some(GraphDecision::EnforceArc(0, 1)));
    }

    #[test]
    fn instantiated_graphs_need_no_decision() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::complete(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let mut search = GraphSearch::new(graph, GraphSearchPolicy::MaxDeltaDegree);

        assert_eq!(search.next_decision(&state), None);
    }

    #[test]
    fn decisions_negate_into_the_other_branch() {
        let decision = GraphDecision::EnforceArc(1, 2);
        assert_eq!(decision.negate(), GraphDecision::RemoveArc(1, 2));
        assert_eq!(decision.negate().negate(), decision);
        assert_eq!(GraphDecision::RemoveNode(3).negate().node(), 3);
    }
}
