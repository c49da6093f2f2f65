use super::Membership;
use super::fix_literal;
use super::literal_membership;
use crate::basic_types::PropagationStatusCP;
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
use crate::variables::GraphVariable;
use crate::variables::Literal;

/// `literal` is true if and only if the arc `(from, to)` is part of the final graph.
#[derive(Clone, Copy, Debug)]
pub struct ArcBoolChannelArgs {
    pub graph: GraphVariable,
    pub from: usize,
    pub to: usize,
    pub literal: Literal,
}

impl PropagatorConstructor for ArcBoolChannelArgs {
    type PropagatorImpl = ArcBoolChannelPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.graph, DomainEvents::ARCS, LocalId::from(0));
        context.register(self.literal, DomainEvents::ANY_INT, LocalId::from(1));
        ArcBoolChannelPropagator { args: self }
    }
}

#[derive(Clone, Debug)]
pub struct ArcBoolChannelPropagator {
    args: ArcBoolChannelArgs,
}

impl ArcBoolChannelPropagator {
    fn arc_membership(&self, domains: &impl ReadDomains) -> Membership {
        let ArcBoolChannelArgs {
            graph, from, to, ..
        } = self.args;
        let domain = domains.graph_domain(graph);
        Membership::of(
            domain.is_mandatory_arc(from, to),
            domain.is_potential_arc(from, to),
        )
    }
}

impl Propagator for ArcBoolChannelPropagator {
    fn name(&self) -> &str {
        "ArcBoolChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        let ArcBoolChannelArgs {
            graph,
            from,
            to,
            literal,
        } = self.args;
        match context.literal_value(literal) {
            Some(true) => {
                let _ = context.enforce_arc(graph, from, to)?;
            }
            Some(false) => {
                let _ = context.remove_arc(graph, from, to)?;
            }
            None => {
                let membership = self.arc_membership(&context);
                fix_literal(&mut context, literal, membership)?;
            }
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        self.arc_membership(&domains)
            .entailment(literal_membership(&domains, self.args.literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::State;
    use crate::graph::Graph;

    #[test]
    fn the_literal_decides_the_arc() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, true), Graph::complete(3, true))
            .expect("valid domain");
        let literal = state.new_literal();
        let handle = state.add_propagator(ArcBoolChannelArgs {
            graph,
            from: 2,
            to: 0,
            literal,
        });
        state.propagate_to_fixed_point().expect("no conflict");
        assert_eq!(state.is_entailed(handle), Entailment::Undefined);

        let _ = state.set_literal(literal, true).expect("unassigned");
        state.propagate_to_fixed_point().expect("no conflict");

        assert!(state.graph_domain(graph).is_mandatory_arc(2, 0));
        assert!(!state.graph_domain(graph).is_mandatory_arc(0, 2));
        assert_eq!(state.is_entailed(handle), Entailment::True);
    }

    #[test]
    fn removing_the_arc_falsifies_the_literal() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(Graph::new(3, false), Graph::complete(3, false))
            .expect("valid domain");
        let literal = state.new_literal();
        let _ = state.add_propagator(ArcBoolChannelArgs {
            graph,
            from: 2,
            to: 1,
            literal,
        });
        state.propagate_to_fixed_point().expect("no conflict");

        let _ = state.remove_node(graph, 1).expect("optional node");
        state.propagate_to_fixed_point().expect("no conflict");

        assert_eq!(state.literal_value(literal), Some(false));
    }
}
