use std::fmt::Display;

use enum_map::Enum;
use enumset::EnumSet;
use enumset::EnumSetType;
use enumset::enum_set;

/// A description of the kinds of events that can happen on an integer variable.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum IntDomainEvent {
    /// Event where an (integer) variable domain collapses to a single value.
    Assign,
    /// Event where an (integer) variable domain tightens the lower bound.
    LowerBound,
    /// Event where an (integer) variable domain tightens the upper bound.
    UpperBound,
}

/// The kinds of events that can happen on a set variable.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum SetDomainEvent {
    /// A value was added to the kernel.
    Enforce,
    /// A value was removed from the envelope.
    Remove,
}

/// The kinds of events that can happen on a graph variable.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum GraphDomainEvent {
    AddNode,
    RemoveNode,
    AddArc,
    RemoveArc,
}

/// The event passed to [`Propagator::notify`].
///
/// [`Propagator::notify`]: crate::propagation::Propagator::notify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainEvent {
    Int(IntDomainEvent),
    Set(SetDomainEvent),
    Graph(GraphDomainEvent),
}

impl Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainEvent::Int(IntDomainEvent::Assign) => write!(f, "[Event:Assign]"),
            DomainEvent::Int(IntDomainEvent::LowerBound) => write!(f, "[Event:LB]"),
            DomainEvent::Int(IntDomainEvent::UpperBound) => write!(f, "[Event:UB]"),
            DomainEvent::Set(SetDomainEvent::Enforce) => write!(f, "[Event:SetEnforce]"),
            DomainEvent::Set(SetDomainEvent::Remove) => write!(f, "[Event:SetRemove]"),
            DomainEvent::Graph(GraphDomainEvent::AddNode) => write!(f, "[Event:AddNode]"),
            DomainEvent::Graph(GraphDomainEvent::RemoveNode) => write!(f, "[Event:RemoveNode]"),
            DomainEvent::Graph(GraphDomainEvent::AddArc) => write!(f, "[Event:AddArc]"),
            DomainEvent::Graph(GraphDomainEvent::RemoveArc) => write!(f, "[Event:RemoveArc]"),
        }
    }
}

/// The events a propagator subscribes to for one variable. Only the events matching the kind of
/// the variable are used.
#[derive(Debug, Copy, Clone)]
pub struct DomainEvents {
    int_events: EnumSet<IntDomainEvent>,
    set_events: EnumSet<SetDomainEvent>,
    graph_events: EnumSet<GraphDomainEvent>,
}

impl DomainEvents {
    /// DomainEvents with both lower and upper bound tightening.
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// DomainEvents with lower and upper bound tightening, and assigning to a single value.
    pub const ANY_INT: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        IntDomainEvent::Assign | IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// DomainEvents with only lower bound tightening.
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::LowerBound));
    /// DomainEvents with only upper bound tightening.
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::UpperBound));
    /// DomainEvents with only assigning to a single value.
    pub const ASSIGN: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(IntDomainEvent::Assign));

    /// Any change of a set variable.
    pub const ANY_SET: DomainEvents = DomainEvents::create_with_set_events(enum_set!(
        SetDomainEvent::Enforce | SetDomainEvent::Remove
    ));

    /// Any change of a graph variable.
    pub const ANY_GRAPH: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::AddNode
            | GraphDomainEvent::RemoveNode
            | GraphDomainEvent::AddArc
            | GraphDomainEvent::RemoveArc
    ));
    /// Node enforcements and node removals.
    pub const NODES: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::AddNode | GraphDomainEvent::RemoveNode
    ));
    /// Arc enforcements and arc removals.
    pub const ARCS: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::AddArc | GraphDomainEvent::RemoveArc
    ));
    /// Changes which grow the kernel.
    pub const KERNEL: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::AddNode | GraphDomainEvent::AddArc
    ));
    /// Changes which shrink the envelope.
    pub const ENVELOPE: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::RemoveNode | GraphDomainEvent::RemoveArc
    ));
    /// Only arc enforcements.
    pub const ADD_ARC: DomainEvents =
        DomainEvents::create_with_graph_events(enum_set!(GraphDomainEvent::AddArc));
    /// Node enforcements and arc removals.
    pub const ADD_NODE_REMOVE_ARC: DomainEvents = DomainEvents::create_with_graph_events(
        enum_set!(GraphDomainEvent::AddNode | GraphDomainEvent::RemoveArc),
    );
    /// Every change except arc enforcements.
    pub const NODES_REMOVE_ARC: DomainEvents = DomainEvents::create_with_graph_events(enum_set!(
        GraphDomainEvent::AddNode | GraphDomainEvent::RemoveNode | GraphDomainEvent::RemoveArc
    ));

    pub(crate) const fn create_with_int_events(
        int_events: EnumSet<IntDomainEvent>,
    ) -> DomainEvents {
        DomainEvents {
            int_events,
            set_events: EnumSet::empty(),
            graph_events: EnumSet::empty(),
        }
    }

    pub(crate) const fn create_with_set_events(
        set_events: EnumSet<SetDomainEvent>,
    ) -> DomainEvents {
        DomainEvents {
            int_events: EnumSet::empty(),
            set_events,
            graph_events: EnumSet::empty(),
        }
    }

    pub(crate) const fn create_with_graph_events(
        graph_events: EnumSet<GraphDomainEvent>,
    ) -> DomainEvents {
        DomainEvents {
            int_events: EnumSet::empty(),
            set_events: EnumSet::empty(),
            graph_events,
        }
    }

    pub(crate) fn int_events(&self) -> EnumSet<IntDomainEvent> {
        self.int_events
    }

    pub(crate) fn set_events(&self) -> EnumSet<SetDomainEvent> {
        self.set_events
    }

    pub(crate) fn graph_events(&self) -> EnumSet<GraphDomainEvent> {
        self.graph_events
    }
}
