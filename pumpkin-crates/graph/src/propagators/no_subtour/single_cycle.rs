use crate::algorithms::PathExtremities;
use crate::algorithms::PathMerge;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::TrailedInteger;
use crate::engine::notifications::GraphDomainEvent;
use crate::graph::GraphDeltaMonitor;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::pumpkin_assert_simple;
use crate::variables::GraphVariable;

/// The mandatory edges of an undirected graph form paths which may only be closed into a cycle
/// once that cycle covers every mandatory node. Combined with degree constraints of exactly two
/// this yields a Hamiltonian cycle over the final nodes.
#[derive(Clone, Copy, Debug)]
pub struct CycleNoSubtourArgs {
    pub graph: GraphVariable,
}

/// The directed counterpart of [`CycleNoSubtourArgs`]: the mandatory arcs form directed paths
/// which may only be closed into a circuit covering every mandatory node.
#[derive(Clone, Copy, Debug)]
pub struct CircuitNoSubtourArgs {
    pub graph: GraphVariable,
}

impl PropagatorConstructor for CycleNoSubtourArgs {
    type PropagatorImpl = SingleCyclePropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        SingleCyclePropagator::new(context, self.graph, false)
    }
}

impl PropagatorConstructor for CircuitNoSubtourArgs {
    type PropagatorImpl = SingleCyclePropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        SingleCyclePropagator::new(context, self.graph, true)
    }
}

/// Forbids sub-cycles by tracking the extremities of the paths formed by mandatory arcs
/// (Caseau and Laburthe).
#[derive(Clone, Debug)]
pub struct SingleCyclePropagator {
    graph: GraphVariable,
    directed: bool,
    monitor: GraphDeltaMonitor,
    paths: PathExtremities,
    initialised: TrailedInteger,
}

impl SingleCyclePropagator {
    fn new(
        mut context: PropagatorConstructorContext,
        graph: GraphVariable,
        directed: bool,
    ) -> Self {
        pumpkin_assert_simple!(
            context.graph_domain(graph).is_directed() == directed,
            "the orientation of the graph does not match the constraint"
        );
        context.register(graph, DomainEvents::ANY_GRAPH, LocalId::from(0));

        let num_nodes = context.graph_domain(graph).num_nodes();
        let monitor = GraphDeltaMonitor::new(&mut context, graph);
        let paths = PathExtremities::new(&mut context, num_nodes);
        let initialised = context.new_trailed_integer(0);

        SingleCyclePropagator {
            graph,
            directed,
            monitor,
            paths,
            initialised,
        }
    }

    /// The smallest closed path which does not need the arc between its extremities.
    fn smallest_closable_size(&self) -> usize {
        if self.directed { 2 } else { 3 }
    }

    fn check_degrees(
        &self,
        context: &PropagationContext,
        from: usize,
        to: usize,
    ) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let too_many = if self.directed {
            domain.mandatory_successors_of(from).len() > 1
                || domain.mandatory_predecessors_of(to).len() > 1
        } else {
            domain.mandatory_neighbours_of(from).count() > 2
                || domain.mandatory_neighbours_of(to).count() > 2
        };
        if too_many {
            return Err(PropagatorConflict::new("too many mandatory arcs at a node").into());
        }
        Ok(())
    }

    fn remove_loops(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if domain.mandatory_nodes().len() <= 1 {
            return Ok(());
        }
        let loops = domain
            .potential_nodes()
            .iter()
            .filter(|&node| domain.is_potential_arc(node, node))
            .collect::<Vec<_>>();
        for node in loops {
            let _ = context.remove_arc(self.graph, node, node)?;
        }
        Ok(())
    }

    /// The cycle is closed; every node outside of it is removed.
    fn close(&self, context: &mut PropagationContext, size: usize) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        if size < domain.mandatory_nodes().len() {
            return Err(PropagatorConflict::new("a sub-cycle misses mandatory nodes").into());
        }
        let optional = domain
            .potential_nodes()
            .iter()
            .filter(|&node| !domain.is_mandatory_node(node))
            .collect::<Vec<_>>();
        for node in optional {
            let _ = context.remove_node(self.graph, node)?;
        }
        Ok(())
    }

    /// Decides on the arc closing the path from `first` to `last` of `size` nodes.
    fn check_closing_arc(
        &self,
        context: &mut PropagationContext,
        first: usize,
        last: usize,
        size: usize,
    ) -> PropagationStatusCP {
        if size < self.smallest_closable_size() {
            return Ok(());
        }
        let domain = context.graph_domain(self.graph);
        let num_mandatory = domain.mandatory_nodes().len();
        let num_potential = domain.potential_nodes().len();

        if size < num_mandatory {
            let _ = context.remove_arc(self.graph, last, first)?;
        } else if size == num_potential {
            let _ = context.enforce_arc(self.graph, last, first)?;
        }
        Ok(())
    }

    fn on_arc_enforced(
        &self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
    ) -> PropagationStatusCP {
        if from == to {
            return self.close(context, 1);
        }
        self.check_degrees(context, from, to)?;

        match self.paths.merge(context, from, to) {
            PathMerge::Closed { size } => self.close(context, size),
            PathMerge::Merged { first, last, size } => {
                self.check_closing_arc(context, first, last, size)
            }
        }
    }

    /// Re-evaluates the closing arc of every path, as the number of mandatory or potential nodes
    /// changed.
    fn check_all_paths(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        let domain = context.graph_domain(self.graph);
        let mut paths = Vec::new();
        for last in domain.mandatory_nodes().iter() {
            let first = self.paths.end_of(context, last);
            if first == last {
                continue;
            }
            let is_path_end = if self.directed {
                domain.mandatory_successors_of(last).is_empty()
            } else {
                first < last && domain.mandatory_neighbours_of(last).count() == 1
            };
            if is_path_end {
                paths.push((first, last, self.paths.size_of(context, last)));
            }
        }

        for (first, last, size) in paths {
            self.check_closing_arc(context, first, last, size)?;
        }
        Ok(())
    }

    fn propagate_from_scratch(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        self.monitor.catch_up(context);
        context.assign(self.initialised, 1);

        let domain = context.graph_domain(self.graph);
        let arcs = domain.kernel().arcs().collect::<Vec<_>>();
        for (from, to) in arcs {
            self.on_arc_enforced(context, from, to)?;
        }

        self.remove_loops(context)?;
        self.check_all_paths(context)
    }
}

impl Propagator for SingleCyclePropagator {
    fn name(&self) -> &str {
        if self.directed {
            "CircuitNoSubtour"
        } else {
            "CycleNoSubtour"
        }
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.value(self.initialised) == 0 {
            return self.propagate_from_scratch(&mut context);
        }

        let delta = self.monitor.freeze(&context);
        for (from, to) in delta.arcs(GraphDomainEvent::AddArc) {
            self.on_arc_enforced(&mut context, from, to)?;
        }
        if delta.contains(GraphDomainEvent::AddNode) || delta.contains(GraphDomainEvent::RemoveNode)
        {
            self.remove_loops(&mut context)?;
            self.check_all_paths(&mut context)?;
        }
        self.monitor.unfreeze(&mut context, delta);
        Ok(())
    }
}
