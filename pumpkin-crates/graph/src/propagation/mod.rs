//! Contains the main building blocks for propagators.
//!
//! # Background
//!
//! A propagator takes as input a set of variables (graph, set and integer variables) and removes
//! values from their domains which cannot be part of any solution of the constraint it
//! represents. For a graph variable this means moving nodes and arcs into the kernel, or removing
//! them from the envelope.
//!
//! # Practical
//!
//! Each concrete propagator is associated with two traits: the [`PropagatorConstructor`] and the
//! [`Propagator`]. The constructor registers the events the propagator subscribes to and creates
//! its trailed state; the [`Propagator`] is called by the state during fixed-point propagation.
//!
//! Graph propagators track the changes of their graph variables with a
//! [`GraphDeltaMonitor`], which replays the events since the last time they propagated.
//!
//! [`GraphDeltaMonitor`]: crate::graph::GraphDeltaMonitor
mod constructor;
mod contexts;
mod domains;
mod identifiers;
mod propagator;

pub(crate) mod store;

pub use constructor::*;
pub use contexts::*;
pub use domains::*;
pub use identifiers::LocalId;
pub use identifiers::PropagatorId;
pub(crate) use identifiers::PropagatorVarId;
pub use propagator::*;
pub use store::PropagatorHandle;

pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
