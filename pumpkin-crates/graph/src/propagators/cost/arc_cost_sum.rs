use super::assert_square_costs;
use crate::basic_types::PropagationStatusCP;
use crate::graph::GraphDomain;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// `objective` equals the sum of `costs[i][j]` over the arcs `(i, j)` of the final graph. Edges of
/// undirected graphs are counted once.
#[derive(Clone, Debug)]
pub struct ArcCostSumArgs {
    pub graph: GraphVariable,
    pub costs: Vec<Vec<i32>>,
    pub objective: DomainId,
}

impl PropagatorConstructor for ArcCostSumArgs {
    type PropagatorImpl = ArcCostSumPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        assert_square_costs(&self.costs, context.graph_domain(self.graph));
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        context.register(self.objective, DomainEvents::BOUNDS, LocalId::from(1));
        ArcCostSumPropagator {
            graph: self.graph,
            costs: self.costs,
            objective: self.objective,
        }
    }
}

/// Bounds the objective by the mandatory arcs plus the optional arcs of negative (for the lower
/// bound) or positive (for the upper bound) cost, and decides every optional arc whose presence
/// or absence alone would push the sum out of the bounds of the objective.
#[derive(Clone, Debug)]
pub struct ArcCostSumPropagator {
    graph: GraphVariable,
    costs: Vec<Vec<i32>>,
    objective: DomainId,
}

impl ArcCostSumPropagator {
    fn cost(&self, from: usize, to: usize) -> i64 {
        i64::from(self.costs[from][to])
    }

    /// The smallest and largest sums over the graphs of the domain.
    fn sum_bounds(&self, domain: &GraphDomain) -> (i64, i64) {
        let mut minimum = 0;
        let mut maximum = 0;
        for (from, to) in domain.envelope().arcs() {
            let cost = self.cost(from, to);
            if domain.is_mandatory_arc(from, to) {
                minimum += cost;
                maximum += cost;
            } else if cost < 0 {
                minimum += cost;
            } else {
                maximum += cost;
            }
        }
        (minimum, maximum)
    }
}

impl Propagator for ArcCostSumPropagator {
    fn name(&self) -> &str {
        "ArcCostSum"
    }

    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let (minimum, maximum) = self.sum_bounds(context.graph_domain(self.graph));
        let _ = context.set_lower_bound(self.objective, saturate(minimum))?;
        let _ = context.set_upper_bound(self.objective, saturate(maximum))?;
        let lower_bound = i64::from(context.lower_bound(self.objective));
        let upper_bound = i64::from(context.upper_bound(self.objective));

        let domain = context.graph_domain(self.graph);
        let mut to_remove = Vec::new();
        let mut to_enforce = Vec::new();
        for (from, to) in domain.envelope().arcs() {
            if domain.is_mandatory_arc(from, to) {
                continue;
            }
            let cost = self.cost(from, to);
            // The sums when the arc is taken, and when it is left out.
            let (with_minimum, with_maximum, without_minimum, without_maximum) = if cost < 0 {
                (minimum, maximum + cost, minimum - cost, maximum)
            } else {
                (minimum + cost, maximum, minimum, maximum - cost)
            };
            if with_minimum > upper_bound || with_maximum < lower_bound {
                to_remove.push((from, to));
            } else if without_minimum > upper_bound || without_maximum < lower_bound {
                to_enforce.push((from, to));
            }
        }

        for (from, to) in to_remove {
            let _ = context.remove_arc(self.graph, from, to)?;
        }
        for (from, to) in to_enforce {
            let _ = context.enforce_arc(self.graph, from, to)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let (minimum, maximum) = self.sum_bounds(domains.graph_domain(self.graph));
        let lower_bound = i64::from(domains.lower_bound(self.objective));
        let upper_bound = i64::from(domains.upper_bound(self.objective));

        if minimum > upper_bound || maximum < lower_bound {
            Entailment::False
        } else if minimum == maximum && lower_bound == upper_bound {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
