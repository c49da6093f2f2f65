use super::EdgeDecisions;
use super::Rejection;
use super::TreeRelaxation;
use super::filter_by_marginal_costs;
use super::spanning_tree_conflict;
use crate::algorithms::spanning_tree::KruskalFilter;
use crate::algorithms::spanning_tree::PrimBoundFinder;
use crate::basic_types::PropagatorConflict;
use crate::graph::GraphDomain;

/// The node whose two edges are chosen apart from the spanning tree.
const ROOT: usize = 0;

/// The 1-tree relaxation of a Hamiltonian cycle: a spanning tree over all nodes except
/// [`ROOT`], plus the two cheapest edges at [`ROOT`].
#[derive(Debug, Default)]
pub(crate) struct OneTreeRelaxation {
    prim: PrimBoundFinder,
    kruskal: KruskalFilter,
}

/// The edges at the root ranked mandatory first, then by cost.
#[derive(Debug)]
struct RootEdges {
    first: usize,
    second: usize,
    /// The best edge not chosen, which replaces a chosen edge that is left out.
    third: Option<usize>,
    second_is_mandatory: bool,
}

impl RootEdges {
    fn rank(domain: &GraphDomain, costs: &[Vec<f64>]) -> Result<RootEdges, PropagatorConflict> {
        let mut candidates = domain
            .potential_successors_of(ROOT)
            .iter()
            .filter(|&node| node != ROOT)
            .collect::<Vec<_>>();
        candidates.sort_by(|&a, &b| {
            domain
                .is_mandatory_arc(ROOT, b)
                .cmp(&domain.is_mandatory_arc(ROOT, a))
                .then(costs[ROOT][a].total_cmp(&costs[ROOT][b]))
        });

        let num_mandatory = candidates
            .iter()
            .filter(|&&node| domain.is_mandatory_arc(ROOT, node))
            .count();
        if num_mandatory > 2 {
            return Err(PropagatorConflict::new(
                "the root of the 1-tree has more than two mandatory edges",
            ));
        }
        if candidates.len() < 2 {
            return Err(PropagatorConflict::new(
                "the root of the 1-tree has fewer than two potential edges",
            ));
        }

        Ok(RootEdges {
            first: candidates[0],
            second: candidates[1],
            third: candidates.get(2).copied(),
            second_is_mandatory: domain.is_mandatory_arc(ROOT, candidates[1]),
        })
    }

    fn cost(&self, costs: &[Vec<f64>]) -> f64 {
        costs[ROOT][self.first] + costs[ROOT][self.second]
    }
}

impl TreeRelaxation for OneTreeRelaxation {
    fn name(&self) -> &'static str {
        "LagrangianOneTree"
    }

    fn solve(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        degrees: &mut [usize],
    ) -> Result<f64, PropagatorConflict> {
        let root_edges = RootEdges::rank(domain, costs)?;
        if !self
            .prim
            .compute(domain.envelope(), domain.kernel(), costs, Some(ROOT))
        {
            return Err(PropagatorConflict::new(
                "the nodes other than the root of the 1-tree are not connected",
            ));
        }

        degrees.fill(0);
        for &(u, v) in self.prim.tree() {
            degrees[u] += 1;
            degrees[v] += 1;
        }
        degrees[ROOT] = 2;
        degrees[root_edges.first] += 1;
        degrees[root_edges.second] += 1;

        Ok(self.prim.cost() + root_edges.cost(costs))
    }

    fn filter(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        rejection: Rejection,
        decisions: &mut EdgeDecisions,
    ) -> Result<(), PropagatorConflict> {
        let root_edges = RootEdges::rank(domain, costs)?;
        self.kruskal
            .compute(domain.envelope(), domain.kernel(), costs, Some(ROOT))
            .map_err(spanning_tree_conflict)?;

        let root_cost = root_edges.cost(costs);
        filter_by_marginal_costs(
            &self.kruskal,
            domain,
            costs,
            Some(ROOT),
            root_cost,
            rejection,
            decisions,
        );

        let tree_cost = self.kruskal.cost() + root_cost;
        for node in domain.potential_successors_of(ROOT).iter() {
            if node == ROOT || domain.is_mandatory_arc(ROOT, node) {
                continue;
            }
            if node == root_edges.first || node == root_edges.second {
                let without = root_edges
                    .third
                    .map(|third| tree_cost - costs[ROOT][node] + costs[ROOT][third]);
                if without.map_or(true, |cost| rejection.exceeds(cost)) {
                    decisions.to_enforce.push((ROOT, node));
                }
            } else if root_edges.second_is_mandatory
                || rejection.exceeds(tree_cost - costs[ROOT][root_edges.second] + costs[ROOT][node])
            {
                decisions.to_remove.push((ROOT, node));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    fn costs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 5.0],
            vec![2.0, 4.0, 0.0, 6.0],
            vec![3.0, 5.0, 6.0, 0.0],
        ]
    }

    #[test]
    fn the_one_tree_adds_the_two_cheapest_root_edges() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::with_all_nodes(4, false), Graph::complete(4, false))
            .expect("valid domain");
        let mut relaxation = OneTreeRelaxation::default();
        let mut degrees = vec![0; 4];

        let cost = relaxation
            .solve(state.graph_domain(graph), &costs(), &mut degrees)
            .expect("the 1-tree exists");

        // Tree (1, 2), (1, 3) over the other nodes, then (0, 1) and (0, 2).
        assert_eq!(cost, 12.0);
        assert_eq!(degrees, vec![2, 3, 2, 1]);
    }

    #[test]
    fn mandatory_root_edges_are_chosen_first() {
        let mut state = State::default();
        let mut kernel = Graph::with_all_nodes(4, false);
        let _ = kernel.add_arc(0, 3);
        let graph = state
            .new_graph_variable(kernel, Graph::complete(4, false))
            .expect("valid domain");

        let root_edges =
            RootEdges::rank(state.graph_domain(graph), &costs()).expect("enough root edges");
        assert_eq!(root_edges.first, 3);
        assert_eq!(root_edges.second, 1);
        assert_eq!(root_edges.third, Some(2));
        assert!(!root_edges.second_is_mandatory);
    }

    #[test]
    fn three_mandatory_root_edges_are_a_conflict() {
        let mut state = State::default();
        let mut kernel = Graph::with_all_nodes(4, false);
        for node in 1..4 {
            let _ = kernel.add_arc(0, node);
        }
        let graph = state
            .new_graph_variable(kernel, Graph::complete(4, false))
            .expect("valid domain");

        assert!(RootEdges::rank(state.graph_domain(graph), &costs()).is_err());
    }
}
