mod dcmst;
mod one_tree;
mod options;
mod relaxation;

use log::debug;
pub use options::LagrangianOptions;

use self::dcmst::SpanningTreeRelaxation;
use self::one_tree::OneTreeRelaxation;
use self::relaxation::LagrangianRelaxation;
use super::assert_square_costs;
use crate::algorithms::spanning_tree::KruskalFilter;
use crate::algorithms::spanning_tree::SpanningTreeError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::create_statistics_struct;
use crate::graph::GraphDomain;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// Bounds derived from floating-point trees are rounded up only beyond this tolerance.
const TOLERANCE: f64 = 1e-6;

/// The undirected graph is a Hamiltonian cycle over all nodes, and `objective` is at least the sum
/// of the costs of its edges.
///
/// The bound is the Held-Karp 1-tree bound: a spanning tree over the nodes other than `0`, plus
/// the two cheapest edges at node `0`, under costs penalised to push every degree to two.
#[derive(Clone, Debug)]
pub struct LagrangianOneTreeArgs {
    pub graph: GraphVariable,
    pub costs: Vec<Vec<i32>>,
    pub objective: DomainId,
    pub options: LagrangianOptions,
}

/// The undirected graph is a spanning tree over all nodes in which node `i` has between
/// `min_degrees[i]` and `max_degrees[i]` neighbours, and `objective` is at least the sum of the
/// costs of its edges.
///
/// The degree bounds only enter the relaxation; they are enforced by degree propagators posted
/// next to this one.
#[derive(Clone, Debug)]
pub struct LagrangianDcmstArgs {
    pub graph: GraphVariable,
    pub costs: Vec<Vec<i32>>,
    pub objective: DomainId,
    pub min_degrees: Vec<usize>,
    pub max_degrees: Vec<usize>,
    pub options: LagrangianOptions,
}

impl PropagatorConstructor for LagrangianOneTreeArgs {
    type PropagatorImpl = LagrangianPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let num_nodes = context.graph_domain(self.graph).num_nodes();
        let relaxation =
            LagrangianRelaxation::new(&self.costs, vec![2; num_nodes], vec![2; num_nodes]);
        LagrangianPropagator::new(
            context,
            self.graph,
            &self.costs,
            self.objective,
            self.options,
            relaxation,
            Box::<OneTreeRelaxation>::default(),
        )
    }
}

impl PropagatorConstructor for LagrangianDcmstArgs {
    type PropagatorImpl = LagrangianPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        pumpkin_assert_simple!(
            self.min_degrees
                .iter()
                .zip(&self.max_degrees)
                .all(|(minimum, maximum)| minimum <= maximum),
            "every minimum degree is at most the matching maximum degree"
        );
        let relaxation = LagrangianRelaxation::new(&self.costs, self.min_degrees, self.max_degrees);
        LagrangianPropagator::new(
            context,
            self.graph,
            &self.costs,
            self.objective,
            self.options,
            relaxation,
            Box::<SpanningTreeRelaxation>::default(),
        )
    }
}

create_statistics_struct!(
    /// Counters of the subgradient optimisation and of the filtering.
    LagrangianStatistics {
        num_calls: usize,
        num_iterations: usize,
        num_removed_edges: usize,
        num_enforced_edges: usize,
    }
);

/// Raises the lower bound of the objective with the Lagrangian relaxation of the degree
/// constraints of a tree problem, and filters edges by their marginal cost in the tree.
///
/// The multipliers are kept between calls. A call runs
/// [`LagrangianOptions::full_iterations`] subgradient iterations whenever the upper bound of the
/// objective differs from the one at the last such run, and
/// [`LagrangianOptions::sprint_iterations`] otherwise.
#[derive(Debug)]
pub struct LagrangianPropagator {
    graph: GraphVariable,
    objective: DomainId,
    options: LagrangianOptions,
    relaxation: LagrangianRelaxation,
    tree: Box<dyn TreeRelaxation>,
    degrees: Vec<usize>,
    decisions: EdgeDecisions,
    last_full_upper_bound: Option<i32>,
    statistics: LagrangianStatistics,
}

impl LagrangianPropagator {
    fn new(
        mut context: PropagatorConstructorContext,
        graph: GraphVariable,
        costs: &[Vec<i32>],
        objective: DomainId,
        options: LagrangianOptions,
        relaxation: LagrangianRelaxation,
        tree: Box<dyn TreeRelaxation>,
    ) -> Self {
        let domain = context.graph_domain(graph);
        pumpkin_assert_simple!(
            !domain.is_directed(),
            "tree relaxations are defined on undirected graphs"
        );
        assert_square_costs(costs, domain);
        let num_nodes = domain.num_nodes();

        context.register(graph, DomainEvents::ANY_GRAPH, LocalId::from(0));
        context.register(objective, DomainEvents::BOUNDS, LocalId::from(1));

        LagrangianPropagator {
            graph,
            objective,
            options,
            relaxation,
            tree,
            degrees: vec![0; num_nodes],
            decisions: EdgeDecisions::default(),
            last_full_upper_bound: None,
            statistics: LagrangianStatistics::default(),
        }
    }

    /// Runs the subgradient optimisation, raising the lower bound of the objective after every
    /// tree.
    fn optimise(
        &mut self,
        context: &mut PropagationContext,
        iterations: usize,
    ) -> PropagationStatusCP {
        let mut step_factor = self.options.initial_step;
        for iteration in 0..iterations {
            self.statistics.num_iterations += 1;
            self.relaxation.update_reduced_costs();

            let tree_cost = self.tree.solve(
                context.graph_domain(self.graph),
                self.relaxation.reduced_costs(),
                &mut self.degrees,
            )?;
            let bound = tree_cost - self.relaxation.constant();
            let _ = context.set_lower_bound(self.objective, round_up(bound))?;

            let gap = f64::from(context.upper_bound(self.objective)) - bound;
            if !self
                .relaxation
                .subgradient_step(&self.degrees, step_factor, gap)
            {
                break;
            }
            if (iteration + 1) % self.options.decay_period.max(1) == 0 {
                step_factor *= self.options.step_decay;
            }
        }
        self.relaxation.update_reduced_costs();
        Ok(())
    }

    /// Applies the marginal-cost filtering of the tree relaxation; returns whether any edge was
    /// removed or enforced.
    fn filter(&mut self, context: &mut PropagationContext) -> Result<bool, Inconsistency> {
        let rejection = Rejection {
            constant: self.relaxation.constant(),
            upper_bound: context.upper_bound(self.objective),
        };
        self.decisions.clear();
        self.tree.filter(
            context.graph_domain(self.graph),
            self.relaxation.reduced_costs(),
            rejection,
            &mut self.decisions,
        )?;

        let mut changed = false;
        for &(u, v) in &self.decisions.to_remove {
            if context.remove_arc(self.graph, u, v)? {
                self.statistics.num_removed_edges += 1;
                changed = true;
            }
        }
        for &(u, v) in &self.decisions.to_enforce {
            if context.enforce_arc(self.graph, u, v)? {
                self.statistics.num_enforced_edges += 1;
                changed = true;
            }
        }
        Ok(changed)
    }
}

impl Propagator for LagrangianPropagator {
    fn name(&self) -> &str {
        self.tree.name()
    }

    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for node in 0..self.degrees.len() {
            let _ = context.enforce_node(self.graph, node)?;
        }
        self.statistics.num_calls += 1;

        let upper_bound = context.upper_bound(self.objective);
        let iterations = if self.last_full_upper_bound == Some(upper_bound) {
            self.options.sprint_iterations
        } else {
            self.last_full_upper_bound = Some(upper_bound);
            self.options.full_iterations
        };

        for _ in 0..self.options.max_filtering_rounds.max(1) {
            let lower_bound = context.lower_bound(self.objective);
            self.optimise(&mut context, iterations)?;
            let changed = self.filter(&mut context)?;
            if !changed && context.lower_bound(self.objective) <= lower_bound {
                break;
            }
        }

        debug!(
            "{}: objective in [{}, {}] after {} iterations",
            self.tree.name(),
            context.lower_bound(self.objective),
            context.upper_bound(self.objective),
            self.statistics.num_iterations,
        );
        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

/// A tree problem whose degree constraints are relaxed into the edge costs.
trait TreeRelaxation: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Computes a minimum tree under `costs`, writes the degree of every node in it to `degrees`
    /// and returns its cost.
    fn solve(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        degrees: &mut [usize],
    ) -> Result<f64, PropagatorConflict>;

    /// Collects the optional edges whose presence, or absence, forces the tree cost beyond the
    /// upper bound of the objective.
    fn filter(
        &mut self,
        domain: &GraphDomain,
        costs: &[Vec<f64>],
        rejection: Rejection,
        decisions: &mut EdgeDecisions,
    ) -> Result<(), PropagatorConflict>;
}

/// Decides whether a tree of a given reduced cost is too expensive for the objective.
#[derive(Clone, Copy, Debug)]
struct Rejection {
    constant: f64,
    upper_bound: i32,
}

impl Rejection {
    fn exceeds(self, tree_cost: f64) -> bool {
        round_up(tree_cost - self.constant) > self.upper_bound
    }
}

#[derive(Debug, Default)]
struct EdgeDecisions {
    to_remove: Vec<(usize, usize)>,
    to_enforce: Vec<(usize, usize)>,
}

impl EdgeDecisions {
    fn clear(&mut self) {
        self.to_remove.clear();
        self.to_enforce.clear();
    }
}

fn round_up(bound: f64) -> i32 {
    (bound - TOLERANCE)
        .ceil()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn spanning_tree_conflict(error: SpanningTreeError) -> PropagatorConflict {
    match error {
        SpanningTreeError::Disconnected => {
            PropagatorConflict::new("the nodes to span are not connected")
        }
        SpanningTreeError::MandatoryCycle => {
            PropagatorConflict::new("the mandatory edges contain a cycle")
        }
    }
}

/// Removes the non-tree edges whose insertion, and enforces the tree edges whose removal, costs
/// too much. `offset` is added to every marginal tree cost; nodes equal to `excluded` are skipped.
fn filter_by_marginal_costs(
    kruskal: &KruskalFilter,
    domain: &GraphDomain,
    costs: &[Vec<f64>],
    excluded: Option<usize>,
    offset: f64,
    rejection: Rejection,
    decisions: &mut EdgeDecisions,
) {
    for (u, v) in domain.envelope().arcs() {
        if u == v
            || Some(u) == excluded
            || Some(v) == excluded
            || domain.is_mandatory_arc(u, v)
        {
            continue;
        }
        if kruskal.contains_edge(u, v) {
            let without = kruskal.cost_without_edge(u, v, costs);
            if without.map_or(true, |cost| rejection.exceeds(cost + offset)) {
                decisions.to_enforce.push((u, v));
            }
        } else {
            let with = kruskal.cost_with_edge(u, v, costs);
            if with.map_or(true, |cost| rejection.exceeds(cost + offset)) {
                decisions.to_remove.push((u, v));
            }
        }
    }
}
