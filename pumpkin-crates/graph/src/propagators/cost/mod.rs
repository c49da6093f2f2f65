//! Propagators relating the arcs of a graph variable to an integer objective given by a cost
//! matrix.
//!
//! [`ArcCostSumArgs`] channels the objective with the exact sum of the arc costs. The Lagrangian
//! propagators ([`LagrangianOneTreeArgs`] for Hamiltonian cycles, [`LagrangianDcmstArgs`] for
//! degree-constrained spanning trees) derive a stronger lower bound from spanning trees under
//! penalised costs, and remove the edges which cannot be part of a solution below the upper
//! bound of the objective.
mod arc_cost_sum;
mod lagrangian;

pub use arc_cost_sum::ArcCostSumArgs;
pub use arc_cost_sum::ArcCostSumPropagator;
pub use lagrangian::LagrangianDcmstArgs;
pub use lagrangian::LagrangianOneTreeArgs;
pub use lagrangian::LagrangianOptions;
pub use lagrangian::LagrangianPropagator;

use crate::graph::GraphDomain;
use crate::pumpkin_assert_simple;

/// Checks that `costs` holds one row and one column per node, and is symmetric when the graph is
/// undirected.
fn assert_square_costs(costs: &[Vec<i32>], domain: &GraphDomain) {
    let num_nodes = domain.num_nodes();
    pumpkin_assert_simple!(
        costs.len() == num_nodes && costs.iter().all(|row| row.len() == num_nodes),
        "the cost matrix needs one row and one column per node"
    );
    pumpkin_assert_simple!(
        domain.is_directed()
            || (0..num_nodes).all(|i| (0..i).all(|j| costs[i][j] == costs[j][i])),
        "the cost matrix of an undirected graph is symmetric"
    );
}
