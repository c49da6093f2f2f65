use super::Membership;
use super::combine;
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
use crate::variables::GraphVariable;
use crate::variables::SetVariable;

/// `sets[i]` equals the incident set of node `i` in the final graph.
#[derive(Clone, Debug)]
pub struct NeighborSetChannelArgs {
    pub graph: GraphVariable,
    pub incident_set: IncidentSet,
    pub sets: Vec<SetVariable>,
}

impl PropagatorConstructor for NeighborSetChannelArgs {
    type PropagatorImpl = NeighborSetChannelPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let num_nodes = context.graph_domain(self.graph).num_nodes();
        pumpkin_assert_simple!(
            self.sets.len() == num_nodes
                && self
                    .sets
                    .iter()
                    .all(|&set| context.set_domain(set).universe() == num_nodes),
            "one set over the nodes per node is required"
        );
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        for (index, &set) in self.sets.iter().enumerate() {
            context.register(set, DomainEvents::ANY_SET, LocalId::from(index as u32 + 1));
        }

        NeighborSetChannelPropagator {
            graph: self.graph,
            incident_set: self.incident_set,
            sets: self.sets.into_boxed_slice(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NeighborSetChannelPropagator {
    graph: GraphVariable,
    incident_set: IncidentSet,
    sets: Box<[SetVariable]>,
}

impl NeighborSetChannelPropagator {
    fn channel_node(&self, context: &mut PropagationContext, node: usize) -> PropagationStatusCP {
        let set_variable = self.sets[node];
        let set = context.set_domain(set_variable);
        let domain = context.graph_domain(self.graph);
        let mandatory = self.incident_set.mandatory_set(domain, node);
        let potential = self.incident_set.potential_set(domain, node);

        let to_enforce = set
            .kernel()
            .iter()
            .filter(|&other| !mandatory.contains(other))
            .collect::<Vec<_>>();
        let to_remove = potential
            .iter()
            .filter(|&other| !set.envelope().contains(other))
            .collect::<Vec<_>>();
        let values_to_enforce = mandatory
            .iter()
            .filter(|&other| !set.kernel().contains(other))
            .collect::<Vec<_>>();
        let values_to_remove = set
            .envelope()
            .iter()
            .filter(|&other| !potential.contains(other))
            .collect::<Vec<_>>();

        for other in to_enforce {
            let _ = self
                .incident_set
                .enforce(context, self.graph, node, other)?;
        }
        for other in to_remove {
            let _ = self.incident_set.remove(context, self.graph, node, other)?;
        }
        for other in values_to_enforce {
            let _ = context.enforce_set_value(set_variable, other)?;
        }
        for other in values_to_remove {
            let _ = context.remove_set_value(set_variable, other)?;
        }
        Ok(())
    }
}

impl Propagator for NeighborSetChannelPropagator {
    fn name(&self) -> &str {
        "NeighborSetChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        for node in 0..self.sets.len() {
            self.channel_node(&mut context, node)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        let num_nodes = self.sets.len();
        combine((0..num_nodes).flat_map(|node| {
            let set = domains.set_domain(self.sets[node]);
            (0..num_nodes).map(move |other| {
                Membership::of(
                    self.incident_set.mandatory_set(domain, node).contains(other),
                    self.incident_set.potential_set(domain, node).contains(other),
                )
                .entailment(Membership::of_value(set, other))
            })
        }))
    }
}
