use super::Graph;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Trail;
use crate::containers::SparseSet;
use crate::engine::EmptyDomain;
use crate::engine::notifications::GraphDomainEvent;
use crate::propagation::PropagatorId;

/// A single modification of a graph domain.
///
/// Arcs of undirected graphs are normalised so that the first endpoint is the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphChange {
    AddNode(usize),
    RemoveNode(usize),
    AddArc(usize, usize),
    RemoveArc(usize, usize),
}

impl GraphChange {
    pub fn event(&self) -> GraphDomainEvent {
        match self {
            GraphChange::AddNode(_) => GraphDomainEvent::AddNode,
            GraphChange::RemoveNode(_) => GraphDomainEvent::RemoveNode,
            GraphChange::AddArc(_, _) => GraphDomainEvent::AddArc,
            GraphChange::RemoveArc(_, _) => GraphDomainEvent::RemoveArc,
        }
    }
}

/// An entry of the event trail of a graph domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphTrailEntry {
    pub change: GraphChange,
    /// The propagator which performed the change, [`None`] for decisions.
    pub cause: Option<PropagatorId>,
}

/// The domain of a graph variable: every graph `G` with `kernel ⊆ G ⊆ envelope`.
///
/// All modifications are recorded on a trail, which serves both for backtracking and as the
/// event log consumed by [`GraphDeltaMonitor`]s.
///
/// [`GraphDeltaMonitor`]: crate::graph::GraphDeltaMonitor
#[derive(Debug, Clone)]
pub struct GraphDomain {
    kernel: Graph,
    envelope: Graph,
    trail: Trail<GraphTrailEntry>,
}

impl GraphDomain {
    pub(crate) fn new(
        kernel: Graph,
        envelope: Graph,
        checkpoint: usize,
    ) -> Result<GraphDomain, ConstraintOperationError> {
        if kernel.num_nodes() != envelope.num_nodes() {
            return Err(ConstraintOperationError::GraphSizeMismatch(
                kernel.num_nodes(),
                envelope.num_nodes(),
            ));
        }
        if kernel.is_directed() != envelope.is_directed() {
            return Err(ConstraintOperationError::OrientationMismatch);
        }
        if !kernel.is_subgraph_of(&envelope) {
            return Err(ConstraintOperationError::KernelNotInEnvelope);
        }

        let mut trail = Trail::default();
        for _ in 0..checkpoint {
            trail.new_checkpoint();
        }

        Ok(GraphDomain {
            kernel,
            envelope,
            trail,
        })
    }

    pub fn kernel(&self) -> &Graph {
        &self.kernel
    }

    pub fn envelope(&self) -> &Graph {
        &self.envelope
    }

    pub fn num_nodes(&self) -> usize {
        self.envelope.num_nodes()
    }

    pub fn is_directed(&self) -> bool {
        self.envelope.is_directed()
    }

    pub fn mandatory_nodes(&self) -> &SparseSet {
        self.kernel.nodes()
    }

    pub fn potential_nodes(&self) -> &SparseSet {
        self.envelope.nodes()
    }

    pub fn is_mandatory_node(&self, node: usize) -> bool {
        self.kernel.contains_node(node)
    }

    pub fn is_potential_node(&self, node: usize) -> bool {
        self.envelope.contains_node(node)
    }

    pub fn is_mandatory_arc(&self, from: usize, to: usize) -> bool {
        self.kernel.contains_arc(from, to)
    }

    pub fn is_potential_arc(&self, from: usize, to: usize) -> bool {
        self.envelope.contains_arc(from, to)
    }

    pub fn mandatory_successors_of(&self, node: usize) -> &SparseSet {
        self.kernel.successors_of(node)
    }

    pub fn mandatory_predecessors_of(&self, node: usize) -> &SparseSet {
        self.kernel.predecessors_of(node)
    }

    pub fn potential_successors_of(&self, node: usize) -> &SparseSet {
        self.envelope.successors_of(node)
    }

    pub fn potential_predecessors_of(&self, node: usize) -> &SparseSet {
        self.envelope.predecessors_of(node)
    }

    /// The mandatory neighbours of `node`; for directed graphs successors and predecessors.
    pub fn mandatory_neighbours_of(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.kernel.neighbours_of(node)
    }

    /// The potential neighbours of `node`; for directed graphs successors and predecessors.
    pub fn potential_neighbours_of(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.envelope.neighbours_of(node)
    }

    /// A graph variable is instantiated when its kernel equals its envelope.
    pub fn is_instantiated(&self) -> bool {
        self.kernel.node_count() == self.envelope.node_count()
            && self.kernel.num_arcs() == self.envelope.num_arcs()
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entries(&self, start: usize, end: usize) -> &[GraphTrailEntry] {
        &self.trail[start..end]
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        if checkpoint >= self.trail.get_checkpoint() {
            return;
        }
        let GraphDomain {
            kernel,
            envelope,
            trail,
        } = self;
        for entry in trail.synchronise(checkpoint) {
            match entry.change {
                GraphChange::AddNode(node) => {
                    let _ = kernel.remove_node(node);
                }
                GraphChange::RemoveNode(node) => {
                    let _ = envelope.add_node(node);
                }
                GraphChange::AddArc(from, to) => {
                    let _ = kernel.remove_arc(from, to);
                }
                GraphChange::RemoveArc(from, to) => {
                    let _ = envelope.add_arc(from, to);
                }
            }
        }
    }

    fn normalise(&self, from: usize, to: usize) -> (usize, usize) {
        if self.is_directed() || from <= to {
            (from, to)
        } else {
            (to, from)
        }
    }

    fn record(&mut self, change: GraphChange, cause: Option<PropagatorId>) {
        self.trail.push(GraphTrailEntry { change, cause });
    }

    /// Moves `node` into the kernel.
    pub(crate) fn enforce_node(
        &mut self,
        node: usize,
        cause: Option<PropagatorId>,
    ) -> Result<bool, EmptyDomain> {
        if self.kernel.contains_node(node) {
            return Ok(false);
        }
        if !self.envelope.contains_node(node) {
            return Err(EmptyDomain);
        }
        let _ = self.kernel.add_node(node);
        self.record(GraphChange::AddNode(node), cause);
        Ok(true)
    }

    /// Removes `node` and its incident arcs from the envelope. The arc removals are recorded
    /// before the node removal.
    pub(crate) fn remove_node(
        &mut self,
        node: usize,
        cause: Option<PropagatorId>,
    ) -> Result<bool, EmptyDomain> {
        if !self.envelope.contains_node(node) {
            return Ok(false);
        }
        if self.kernel.contains_node(node) {
            return Err(EmptyDomain);
        }
        let successors = self.envelope.successors_of(node).iter().collect::<Vec<_>>();
        for successor in successors {
            let _ = self.remove_arc(node, successor, cause)?;
        }
        if self.is_directed() {
            let predecessors = self
                .envelope
                .predecessors_of(node)
                .iter()
                .collect::<Vec<_>>();
            for predecessor in predecessors {
                let _ = self.remove_arc(predecessor, node, cause)?;
            }
        }
        let _ = self.envelope.remove_node(node);
        self.record(GraphChange::RemoveNode(node), cause);
        Ok(true)
    }

    /// Moves the arc into the kernel, enforcing both of its endpoints first.
    pub(crate) fn enforce_arc(
        &mut self,
        from: usize,
        to: usize,
        cause: Option<PropagatorId>,
    ) -> Result<bool, EmptyDomain> {
        if self.kernel.contains_arc(from, to) {
            return Ok(false);
        }
        if !self.envelope.contains_arc(from, to) {
            return Err(EmptyDomain);
        }
        let _ = self.enforce_node(from, cause)?;
        let _ = self.enforce_node(to, cause)?;
        let _ = self.kernel.add_arc(from, to);
        let (from, to) = self.normalise(from, to);
        self.record(GraphChange::AddArc(from, to), cause);
        Ok(true)
    }

    pub(crate) fn remove_arc(
        &mut self,
        from: usize,
        to: usize,
        cause: Option<PropagatorId>,
    ) -> Result<bool, EmptyDomain> {
        if !self.envelope.contains_arc(from, to) {
            return Ok(false);
        }
        if self.kernel.contains_arc(from, to) {
            return Err(EmptyDomain);
        }
        let _ = self.envelope.remove_arc(from, to);
        let (from, to) = self.normalise(from, to);
        self.record(GraphChange::RemoveArc(from, to), cause);
        Ok(true)
    }
}
