use fixedbitset::FixedBitSet;

use crate::basic_types::PropagationStatusCP;
use crate::graph::IncidentSet;
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
use crate::pumpkin_assert_simple;
use crate::variables::DomainId;
use crate::variables::GraphVariable;

/// The number of incident arcs of every node of the final graph equals `degrees[i]`. Nodes which
/// are not part of the final graph leave their degree variable unconstrained.
#[derive(Clone, Debug)]
pub struct NodeDegreeVariableArgs {
    pub graph: GraphVariable,
    pub incident_set: IncidentSet,
    pub degrees: Vec<DomainId>,
}

impl PropagatorConstructor for NodeDegreeVariableArgs {
    type PropagatorImpl = NodeDegreeVariablePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let num_nodes = context.graph_domain(self.graph).num_nodes();
        pumpkin_assert_simple!(
            self.degrees.len() == num_nodes,
            "one degree variable per node is required"
        );

        context.register(self.graph, DomainEvents::ANY_GRAPH, LocalId::from(0));
        for (index, &degree) in self.degrees.iter().enumerate() {
            context.register(degree, DomainEvents::BOUNDS, LocalId::from(index as u32 + 1));
        }

        NodeDegreeVariablePropagator {
            graph: self.graph,
            incident_set: self.incident_set,
            degrees: self.degrees.into_boxed_slice(),
            pending: FixedBitSet::with_capacity(num_nodes),
        }
    }
}

/// Filters the degree bounds from the graph and the graph from the degree bounds, revisiting the
/// nodes whose incident sets changed until nothing changes.
#[derive(Clone, Debug)]
pub struct NodeDegreeVariablePropagator {
    graph: GraphVariable,
    incident_set: IncidentSet,
    degrees: Box<[DomainId]>,
    pending: FixedBitSet,
}

impl NodeDegreeVariablePropagator {
    /// The nodes which have `node` in their incident set.
    fn watchers_of(&self, context: &PropagationContext, node: usize) -> Vec<usize> {
        let domain = context.graph_domain(self.graph);
        let opposite = match self.incident_set {
            IncidentSet::SuccOrNeigh => IncidentSet::PredOrNeigh,
            IncidentSet::PredOrNeigh => IncidentSet::SuccOrNeigh,
        };
        opposite.potential_set(domain, node).iter().collect()
    }

    fn filter_node(
        &mut self,
        context: &mut PropagationContext,
        node: usize,
    ) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if !domain.is_potential_node(node) {
            return Ok(());
        }
        let degree = self.degrees[node];
        let num_mandatory = self.incident_set.mandatory_set(domain, node).len();
        let num_potential = self.incident_set.potential_set(domain, node).len();

        if !domain.is_mandatory_node(node) {
            if (num_potential as i64) < i64::from(context.lower_bound(degree))
                || i64::from(context.upper_bound(degree)) < num_mandatory as i64
            {
                for watcher in self.watchers_of(context, node) {
                    self.pending.insert(watcher);
                }
                let _ = context.remove_node(self.graph, node)?;
            }
            return Ok(());
        }

        let _ = context.set_lower_bound(degree, num_mandatory as i32)?;
        let _ = context.set_upper_bound(degree, num_potential as i32)?;
        // Both bounds now lie in [num_mandatory, num_potential].
        let lower_bound = context.lower_bound(degree) as usize;
        let upper_bound = context.upper_bound(degree) as usize;

        let domain = context.graph_domain(self.graph);
        let mandatory = self.incident_set.mandatory_set(domain, node);
        let optional = self
            .incident_set
            .potential_set(domain, node)
            .iter()
            .filter(|&other| !mandatory.contains(other))
            .collect::<Vec<_>>();
        if optional.is_empty() {
            return Ok(());
        }

        let directed = domain.is_directed();
        if num_potential == lower_bound {
            for other in optional {
                if self.incident_set.enforce(context, self.graph, node, other)? && !directed {
                    self.pending.insert(other);
                }
            }
        } else if num_mandatory == upper_bound {
            for other in optional {
                if self.incident_set.remove(context, self.graph, node, other)? && !directed {
                    self.pending.insert(other);
                }
            }
        }
        Ok(())
    }
}

impl Propagator for NodeDegreeVariablePropagator {
    fn name(&self) -> &str {
        "NodeDegreeVariable"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        self.pending.clear();
        for node in context.graph_domain(self.graph).potential_nodes().iter() {
            self.pending.insert(node);
        }

        while let Some(node) = self.pending.ones().next() {
            self.pending.set(node, false);
            self.filter_node(&mut context, node)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let violated = domain.mandatory_nodes().iter().any(|node| {
            let degree = self.degrees[node];
            let num_mandatory = self.incident_set.mandatory_set(domain, node).len() as i64;
            let num_potential = self.incident_set.potential_set(domain, node).len() as i64;
            num_mandatory > i64::from(domains.upper_bound(degree))
                || num_potential < i64::from(domains.lower_bound(degree))
        });
        if violated {
            return Entailment::False;
        }

        let satisfied = domain.is_instantiated()
            && domain.potential_nodes().iter().all(|node| {
                domains.is_fixed(self.degrees[node])
                    && i64::from(domains.lower_bound(self.degrees[node]))
                        == self.incident_set.mandatory_set(domain, node).len() as i64
            });
        if satisfied {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}
