//! # Pumpkin Graph
//! Graph variables and graph propagators in the style of the Pumpkin constraint solver.
//!
//! A graph variable has a domain bounded by two graphs over the nodes `0..n`: the _kernel_ holds
//! the nodes and arcs which must be part of every solution, the _envelope_ those which may still
//! be part of a solution. Propagators move nodes and arcs into the kernel or remove them from the
//! envelope until a fixed point is reached, or report a conflict.
//!
//! The crate carries a small engine ([`State`]) which stores the domains of graph, set, integer
//! and Boolean variables together with the propagators, supports checkpoints and backtracking, and
//! propagates to a fixed point. A search procedure drives it through decisions such as
//! [`State::enforce_arc`] and [`State::restore_to`]; [`branching::GraphSearch`] selects such
//! decisions.
//!
//! # Example
//! ```rust
//! use pumpkin_graph::graph::Graph;
//! use pumpkin_graph::propagators::CircuitNoSubtourArgs;
//! use pumpkin_graph::State;
//!
//! let mut state = State::default();
//! let graph = state
//!     .new_graph_variable(Graph::with_all_nodes(3, true), Graph::complete(3, true))
//!     .expect("the kernel is contained in the envelope");
//! let _ = state.add_propagator(CircuitNoSubtourArgs { graph });
//!
//! let _ = state.enforce_arc(graph, 0, 1).expect("the arc is potential");
//! state.propagate_to_fixed_point().expect("no conflict");
//!
//! // The arc back would close a circuit over two of the three nodes.
//! assert!(!state.graph_domain(graph).is_potential_arc(1, 0));
//! ```
#[doc(hidden)]
pub mod asserts;

pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;

pub mod algorithms;
pub mod branching;
pub mod graph;
pub mod propagation;
pub mod propagators;
pub mod statistics;
pub mod variables;

pub use convert_case;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::Assignments;
pub use crate::engine::Conflict;
pub use crate::engine::EmptyDomain;
pub use crate::engine::SetDomain;
pub use crate::engine::State;
pub use crate::engine::TrailedInteger;
pub use crate::engine::TrailedValues;
pub use crate::engine::notifications::GraphDomainEvent;
pub use crate::engine::notifications::IntDomainEvent;
pub use crate::engine::notifications::SetDomainEvent;
