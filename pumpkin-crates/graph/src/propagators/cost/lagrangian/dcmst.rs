use super::EdgeDecisions;
use super::Rejection;
use super::TreeRelaxation;
use super::filter_by_marginal_costs;
use super::spanning_tree_conflict;
use crate::algorithms::spanning_tree::KruskalFilter;
use crate::algorithms::spanning_tree::PrimBoundFinder;
use crate::basic_types::PropagatorConflict;
use crate::graph::GraphDomain;

/// The relaxation of a degree-constrained spanning tree: a plain minimum spanning tree.
#[derive(Debug, Default)]
pub(crate) struct SpanningTreeRelaxation {
    prim: PrimBoundFinder,
    kruskal: KruskalFilter,
}

impl TreeRelaxation for SpanningTreeRelaxation {
    fn name(&self) -> &'static str {
        "LagrangianDcmst"
    }

    fn solve(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        degrees: &mut [usize],
    ) -> Result<f64, PropagatorConflict> {
        if !self
            .prim
            .compute(domain.envelope(), domain.kernel(), costs, None)
        {
            return Err(PropagatorConflict::new("the envelope is not connected"));
        }

        degrees.fill(0);
        for &(u, v) in self.prim.tree() {
            degrees[u] += 1;
            degrees[v] += 1;
        }
        Ok(self.prim.cost())
    }

    fn filter(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        rejection: Rejection,
        decisions: &mut EdgeDecisions,
    ) -> Result<(), PropagatorConflict> {
        self.kruskal
            .compute(domain.envelope(), domain.kernel(), costs, None)
            .map_err(spanning_tree_conflict)?;
        filter_by_marginal_costs(&self.kruskal, domain, costs, None, 0.0, rejection, decisions);
        Ok(())
    }
}
