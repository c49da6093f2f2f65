use crate::pumpkin_assert_simple;

/// The multipliers of the relaxed degree constraints and the costs they induce.
///
/// Every node `i` has a multiplier `lambda_min[i] <= 0` for its minimum degree and
/// `lambda_max[i] >= 0` for its maximum degree. The reduced cost of the edge `(i, j)` is its
/// cost plus the four multipliers of its endpoints, and a tree of reduced cost `W` bounds the
/// objective from below by `W - C` where `C` weighs every multiplier with its degree.
#[derive(Debug, Clone)]
pub(crate) struct LagrangianRelaxation {
    costs: Vec<Vec<f64>>,
    min_degrees: Box<[usize]>,
    max_degrees: Box<[usize]>,
    lambda_min: Vec<f64>,
    lambda_max: Vec<f64>,
    reduced_costs: Vec<Vec<f64>>,
    /// Multipliers stay within `[-limit, limit]`.
    limit: f64,
}

impl LagrangianRelaxation {
    pub(crate) fn new(
        costs: &[Vec<i32>],
        min_degrees: Vec<usize>,
        max_degrees: Vec<usize>,
    ) -> Self {
        let num_nodes = costs.len();
        pumpkin_assert_simple!(min_degrees.len() == num_nodes && max_degrees.len() == num_nodes);

        let costs = costs
            .iter()
            .map(|row| row.iter().map(|&cost| f64::from(cost)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let largest = costs
            .iter()
            .flatten()
            .fold(0.0_f64, |largest, cost| largest.max(cost.abs()));

        LagrangianRelaxation {
            reduced_costs: costs.clone(),
            costs,
            min_degrees: min_degrees.into_boxed_slice(),
            max_degrees: max_degrees.into_boxed_slice(),
            lambda_min: vec![0.0; num_nodes],
            lambda_max: vec![0.0; num_nodes],
            limit: (largest + 1.0) * num_nodes as f64,
        }
    }

    pub(crate) fn reduced_costs(&self) -> &[Vec<f64>] {
        &self.reduced_costs
    }

    pub(crate) fn update_reduced_costs(&mut self) {
        let num_nodes = self.costs.len();
        for i in 0..num_nodes {
            let penalty_i = self.lambda_min[i] + self.lambda_max[i];
            for j in 0..num_nodes {
                self.reduced_costs[i][j] =
                    self.costs[i][j] + penalty_i + self.lambda_min[j] + self.lambda_max[j];
            }
        }
    }

    /// The constant `C` subtracted from the reduced cost of a tree.
    pub(crate) fn constant(&self) -> f64 {
        (0..self.costs.len())
            .map(|node| {
                self.lambda_min[node] * self.min_degrees[node] as f64
                    + self.lambda_max[node] * self.max_degrees[node] as f64
            })
            .sum()
    }

    /// Moves the multipliers along the subgradient given by the degrees of the last tree, with a
    /// step proportional to `gap`, the distance between the bound and the best known solution.
    ///
    /// Returns `false` when no multiplier can move: the tree respects every degree bound which is
    /// still penalised, or the gap is closed.
    pub(crate) fn subgradient_step(
        &mut self,
        degrees: &[usize],
        step_factor: f64,
        gap: f64,
    ) -> bool {
        let mut norm = 0.0;
        for node in 0..degrees.len() {
            let below = degrees[node] as f64 - self.min_degrees[node] as f64;
            if below < 0.0 || self.lambda_min[node] < 0.0 {
                norm += below * below;
            }
            let above = degrees[node] as f64 - self.max_degrees[node] as f64;
            if above > 0.0 || self.lambda_max[node] > 0.0 {
                norm += above * above;
            }
        }
        if norm == 0.0 || gap <= 0.0 {
            return false;
        }

        let step = step_factor * gap / norm;
        for node in 0..degrees.len() {
            let below = degrees[node] as f64 - self.min_degrees[node] as f64;
            self.lambda_min[node] = (self.lambda_min[node] + step * below).clamp(-self.limit, 0.0);
            let above = degrees[node] as f64 - self.max_degrees[node] as f64;
            self.lambda_max[node] = (self.lambda_max[node] + step * above).clamp(0.0, self.limit);
        }
        true
    }
}
