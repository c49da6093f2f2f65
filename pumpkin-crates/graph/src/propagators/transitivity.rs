use crate::basic_types::PropagationStatusCP;
use crate::engine::TrailedInteger;
use crate::graph::GraphChange;
use crate::graph::GraphDeltaMonitor;
use crate::graph::GraphDomain;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::variables::GraphVariable;

/// The final graph is transitive: whenever `(x, y)` and `(y, z)` are arcs with `x != z`, so is
/// `(x, z)`. Loops are not implied.
#[derive(Clone, Copy, Debug)]
pub struct TransitivityArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for TransitivityArgs {
    type PropagatorImpl = TransitivityPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        TransitivityPropagator {
            graph: self.graph,
            monitor: GraphDeltaMonitor::new(&mut context, self.graph),
            initialised: context.new_trailed_integer(0),
            worklist: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Enforced(usize, usize),
    Removed(usize, usize),
}

/// Drains a worklist of enforced and removed arcs. An enforced arc is composed with the mandatory
/// arcs around it; a removed arc forbids every pair of arcs which would imply it.
#[derive(Clone, Debug)]
pub struct TransitivityPropagator {
    graph: GraphVariable,
    monitor: GraphDeltaMonitor,
    initialised: TrailedInteger,
    worklist: Vec<Pending>,
}

impl TransitivityPropagator {
    fn push(&mut self, pending: Pending, directed: bool) {
        let (from, to) = match pending {
            Pending::Enforced(from, to) | Pending::Removed(from, to) => (from, to),
        };
        if from == to {
            return;
        }
        self.worklist.push(pending);
        if !directed {
            self.worklist.push(match pending {
                Pending::Enforced(_, _) => Pending::Enforced(to, from),
                Pending::Removed(_, _) => Pending::Removed(to, from),
            });
        }
    }

    fn enforce(
        &mut self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
        directed: bool,
    ) -> PropagationStatusCP {
        if context.enforce_arc(self.graph, from, to)? {
            self.push(Pending::Enforced(from, to), directed);
        }
        Ok(())
    }

    fn remove(
        &mut self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
        directed: bool,
    ) -> PropagationStatusCP {
        if context.remove_arc(self.graph, from, to)? {
            self.push(Pending::Removed(from, to), directed);
        }
        Ok(())
    }

    /// `(x, y)` is mandatory.
    fn on_enforced(
        &mut self,
        context: &mut PropagationContext,
        x: usize,
        y: usize,
        directed: bool,
    ) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let forward = domain
            .mandatory_successors_of(y)
            .iter()
            .filter(|&z| z != x)
            .collect::<Vec<_>>();
        let backward = domain
            .mandatory_predecessors_of(x)
            .iter()
            .filter(|&w| w != y)
            .collect::<Vec<_>>();
        // (x, z) absent forbids (y, z), and (w, y) absent forbids (w, x).
        let forbidden_after = (0..domain.num_nodes())
            .filter(|&z| z != x && z != y)
            .filter(|&z| domain.is_potential_arc(y, z) && !domain.is_potential_arc(x, z))
            .collect::<Vec<_>>();
        let forbidden_before = (0..domain.num_nodes())
            .filter(|&w| w != x && w != y)
            .filter(|&w| domain.is_potential_arc(w, x) && !domain.is_potential_arc(w, y))
            .collect::<Vec<_>>();

        for z in forward {
            self.enforce(context, x, z, directed)?;
        }
        for w in backward {
            self.enforce(context, w, y, directed)?;
        }
        for z in forbidden_after {
            self.remove(context, y, z, directed)?;
        }
        for w in forbidden_before {
            self.remove(context, w, x, directed)?;
        }
        Ok(())
    }

    /// `(x, z)` is absent.
    fn on_removed(
        &mut self,
        context: &mut PropagationContext,
        x: usize,
        z: usize,
        directed: bool,
    ) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let after = domain
            .mandatory_successors_of(x)
            .iter()
            .filter(|&y| y != z && domain.is_potential_arc(y, z))
            .collect::<Vec<_>>();
        let before = domain
            .mandatory_predecessors_of(z)
            .iter()
            .filter(|&y| y != x && domain.is_potential_arc(x, y))
            .collect::<Vec<_>>();

        for y in after {
            self.remove(context, y, z, directed)?;
        }
        for y in before {
            self.remove(context, x, y, directed)?;
        }
        Ok(())
    }

    fn drain(&mut self, context: &mut PropagationContext, directed: bool) -> PropagationStatusCP {
        while let Some(pending) = self.worklist.pop() {
            match pending {
                Pending::Enforced(x, y) => self.on_enforced(context, x, y, directed)?,
                Pending::Removed(x, z) => self.on_removed(context, x, z, directed)?,
            }
        }
        Ok(())
    }

    /// A pair of mandatory arcs `(x, y), (y, z)` whose composition is no longer potential.
    fn has_violation(domain: &GraphDomain) -> bool {
        domain.kernel().arcs().any(|(x, y)| {
            let check = |x: usize, y: usize| {
                domain
                    .mandatory_successors_of(y)
                    .iter()
                    .any(|z| z != x && !domain.is_potential_arc(x, z))
            };
            x != y && (check(x, y) || (!domain.is_directed() && check(y, x)))
        })
    }
}

impl Propagator for TransitivityPropagator {
    fn name(&self) -> &str {
        "Transitivity"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let directed = context.graph_domain(self.graph).is_directed();
        self.worklist.clear();

        if context.value(self.initialised) == 0 {
            self.monitor.catch_up(&mut context);
            context.assign(self.initialised, 1);
            let mandatory = context
                .graph_domain(self.graph)
                .kernel()
                .arcs()
                .collect::<Vec<_>>();
            for (from, to) in mandatory {
                self.push(Pending::Enforced(from, to), directed);
            }
            return self.drain(&mut context, directed);
        }

        let delta = self.monitor.freeze(&context);
        for entry in delta.entries() {
            match entry.change {
                GraphChange::AddArc(from, to) => self.push(Pending::Enforced(from, to), directed),
                GraphChange::RemoveArc(from, to) => {
                    self.push(Pending::Removed(from, to), directed)
                }
                GraphChange::AddNode(_) | GraphChange::RemoveNode(_) => {}
            }
        }
        let result = self.drain(&mut context, directed);
        self.monitor.unfreeze(&mut context, delta);
        result
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let domain = domains.graph_domain(self.graph);
        if Self::has_violation(domain) {
            Entailment::False
        } else if domain.is_instantiated() {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    #[test]
    fn chains_of_mandatory_arcs_are_closed() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(4, true), Graph::complete(4, true))
            .expect("valid domain");
        let _ = state.add_propagator(TransitivityArgs { graph });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.enforce_arc(graph, 0, 1).expect("potential arc");
        let _ = state.enforce_arc(graph, 1, 2).expect("potential arc");
        let _ = state.enforce_arc(graph, 2, 3).expect("potential arc");
        state.propagate_to_fixed_point().expect("no conflict");

        let domain = state.graph_domain(graph);
        assert!(domain.is_mandatory_arc(0, 2));
        assert!(domain.is_mandatory_arc(1, 3));
        assert!(domain.is_mandatory_arc(0, 3));
        assert!(!domain.is_mandatory_arc(0, 0));
    }

    #[test]
    fn removed_arcs_forbid_the_arcs_implying_them() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let _ = state.add_propagator(TransitivityArgs { graph });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.enforce_arc(graph, 0, 1).expect("potential arc");
        let _ = state.remove_arc(graph, 0, 2).expect("optional arc");
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(!state.graph_domain(graph).is_potential_arc(1, 2));
    }

    #[test]
    fn composing_with_a_removed_arc_is_a_conflict() {
        let mut state = State::default();
        let mut kernel = Graph::new(3, false);
        let _ = kernel.add_arc(0, 1);
        let _ = kernel.add_arc(1, 2);
        let mut envelope = kernel.clone();
        let _ = envelope.add_node(0);
        let graph = state
            .new_graph_variable(kernel, envelope)
            .expect("valid domain");
        let handle = state.add_propagator(TransitivityArgs { graph });

        assert_eq!(state.is_entailed(handle), Entailment::False);
        assert!(state.propagate_to_fixed_point().is_err());
    }
}
